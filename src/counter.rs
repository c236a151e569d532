use crate::models::{FacetValue, FilterNode, SelectionMode};
use std::collections::{BTreeMap, BTreeSet};

const RESERVED_SORT_KEY: &str = "sort";

/// Schema-free badge count: number of distinct top-level keys with a
/// contributing value. `logType.form` and `logType.update` both roll up
/// under `logType`.
pub fn count_active(values: &BTreeMap<String, FacetValue>) -> usize {
    let mut active: BTreeSet<&str> = BTreeSet::new();
    for (key, value) in values {
        if key == RESERVED_SORT_KEY || !value.contributes() {
            continue;
        }
        let top_level = key.split('.').next().unwrap_or(key.as_str());
        active.insert(top_level);
    }
    active.len()
}

/// Precise contribution of one schema node.
pub fn count_active_for_group(values: &BTreeMap<String, FacetValue>, node: &FilterNode) -> usize {
    match node {
        FilterNode::Text(leaf) => match values.get(&leaf.base.id) {
            Some(FacetValue::Text(text)) if !text.is_empty() => 1,
            _ => 0,
        },
        FilterNode::DateRange(leaf) => match values.get(&leaf.base.id) {
            Some(FacetValue::Range(range)) if range.is_set() => 1,
            _ => 0,
        },
        // Options are counted by their group.
        FilterNode::Choice(_) => 0,
        FilterNode::Group(group) => match group.selection {
            SelectionMode::Single => {
                let own = usize::from(values.get(&group.base.id).is_some_and(FacetValue::contributes));
                // A date-range child is the drill-in for the "custom" option and
                // is already represented by the group's own value.
                let nested: usize = group
                    .children
                    .iter()
                    .filter(|child| !matches!(child, FilterNode::Choice(_) | FilterNode::DateRange(_)))
                    .map(|child| count_active_for_group(values, child))
                    .sum();
                own + nested
            }
            SelectionMode::Multi => {
                let own = match values.get(&group.base.id) {
                    Some(FacetValue::List(items)) => items.len(),
                    Some(FacetValue::Text(text)) if !text.is_empty() => 1,
                    _ => 0,
                };
                let nested: usize = group
                    .children
                    .iter()
                    .filter(|child| !matches!(child, FilterNode::Choice(_)))
                    .map(|child| count_active_for_group(values, child))
                    .sum();
                own + nested
            }
            SelectionMode::Container => group
                .children
                .iter()
                .map(|child| count_active_for_group(values, child))
                .sum(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DateRangeLeaf, DateRangeValue, NodeBase, QueryState, TextLeaf};
    use crate::schema::{make_group, make_options, time_group, OptionSeed};
    use serde_json::json;

    fn values(raw: serde_json::Value) -> BTreeMap<String, FacetValue> {
        serde_json::from_value(raw).expect("facet values")
    }

    #[test]
    fn flat_count_rolls_up_compound_keys_and_skips_sort() {
        let map = values(json!({
            "search": "abc",
            "logType.form": ["x"],
            "logType.update": ["y"],
            "sort": { "by": "a", "direction": "asc" }
        }));
        assert_eq!(count_active(&map), 2);
    }

    #[test]
    fn flat_count_ignores_empty_values() {
        let map = values(json!({ "search": "", "author": [], "time": null }));
        assert_eq!(count_active(&map), 0);
    }

    #[test]
    fn flat_count_treats_objects_and_scalars() {
        let map = values(json!({
            "timeRange": { "from": "", "to": "2025-02-05" },
            "emptyRange": {},
            "pinned": false,
            "limit": 0
        }));
        assert_eq!(count_active(&map), 3);
    }

    #[test]
    fn flat_count_checks_every_field_of_other_objects() {
        let map = values(json!({
            "geo": { "radius": "5km" },
            "blank": { "radius": "", "pinned": false, "limit": 0 }
        }));
        assert!(matches!(map.get("geo"), Some(FacetValue::Object(_))));
        assert_eq!(count_active(&map), 1);
    }

    #[test]
    fn single_group_does_not_double_count_custom_range() {
        let map = values(json!({ "time": "custom", "timeRange": { "from": "2025-02-01" } }));
        let node = FilterNode::from(time_group());
        assert_eq!(count_active_for_group(&map, &node), 1);

        let unset = values(json!({ "timeRange": { "from": "2025-02-01" } }));
        assert_eq!(count_active_for_group(&unset, &node), 0);
    }

    #[test]
    fn multi_group_counts_each_selected_option() {
        let group = make_group(
            "author",
            "Author",
            SelectionMode::Multi,
            make_options(vec![
                OptionSeed::new("alice", "Alice"),
                OptionSeed::new("bob", "Bob"),
                OptionSeed::new("carol", "Carol"),
            ])
            .into_iter()
            .map(FilterNode::from)
            .collect(),
        );
        let map = values(json!({ "author": ["alice", "bob"] }));
        assert_eq!(count_active_for_group(&map, &FilterNode::from(group)), 2);
    }

    #[test]
    fn multi_group_adds_nested_sub_facets() {
        let forms = make_group(
            "logType.form",
            "Forms",
            SelectionMode::Multi,
            make_options(vec![OptionSeed::new("form::a", "A"), OptionSeed::new("form::b", "B")])
                .into_iter()
                .map(FilterNode::from)
                .collect(),
        );
        let mut children: Vec<FilterNode> = make_options(vec![OptionSeed::new("update", "Update")])
            .into_iter()
            .map(FilterNode::from)
            .collect();
        children.push(forms.into());
        let log_type = FilterNode::from(make_group("logType", "Log type", SelectionMode::Multi, children));

        let map = values(json!({ "logType": ["update"], "logType.form": ["form::a", "form::b"] }));
        assert_eq!(count_active_for_group(&map, &log_type), 3);
        // The flat badge still collapses both keys to one facet.
        assert_eq!(count_active(&map), 1);
    }

    #[test]
    fn container_sums_children() {
        let search = FilterNode::from(TextLeaf {
            base: NodeBase::new("search", "Search"),
            placeholder: None,
        });
        let range = FilterNode::from(DateRangeLeaf {
            base: NodeBase::new("window", "Window"),
        });
        let container = FilterNode::from(make_group(
            "misc",
            "Misc",
            SelectionMode::Container,
            vec![search, range, FilterNode::from(time_group())],
        ));

        let state = QueryState::new()
            .with_value("search", "smoke")
            .with_value("window", DateRangeValue::new(None, Some("2025-02-05")))
            .with_value("time", "today");
        assert_eq!(count_active_for_group(&state.values, &container), 3);
        assert_eq!(count_active_for_group(&BTreeMap::new(), &container), 0);
    }

    #[test]
    fn text_and_range_leaves_require_content() {
        let text = FilterNode::from(TextLeaf {
            base: NodeBase::new("search", "Search"),
            placeholder: Some("Name".to_string()),
        });
        let blank = QueryState::new().with_value("search", "");
        assert_eq!(count_active_for_group(&blank.values, &text), 0);

        let range = FilterNode::from(DateRangeLeaf {
            base: NodeBase::new("timeRange", "Range"),
        });
        let empty = QueryState::new().with_value("timeRange", DateRangeValue::default());
        assert_eq!(count_active_for_group(&empty.values, &range), 0);
    }
}
