mod accessors;
mod domains;
mod facets;
mod sort;

pub use accessors::{Accessor, AttachmentProbe, ItemAccessors, LogTypeProbe};
pub use domains::{engine_for, incident_engine, log_engine, task_engine, user_engine};
pub use facets::{AttachmentKind, FacetBinding};
pub use sort::{compare_text, compare_timestamps, SortTable};

use crate::counter::{count_active, count_active_for_group};
use crate::models::{FilterTree, QueryState};
use crate::schema::lint_tree;
use chrono::{DateTime, Local, TimeZone};
use std::cmp::Ordering;

/// Filter and sort pipeline for one list page: a schema, the facets bound
/// to item accessors, and the sort comparators.
pub struct QueryEngine<'a, T> {
    tree: FilterTree,
    facets: Vec<FacetBinding<'a, T>>,
    sorts: SortTable<'a, T>,
}

impl<'a, T> QueryEngine<'a, T> {
    pub fn new(tree: FilterTree, default_sort: &str) -> Self {
        for issue in lint_tree(&tree) {
            tracing::warn!(title = ?tree.title, issue = %issue.message(), "filter schema issue");
        }
        Self {
            tree,
            facets: Vec::new(),
            sorts: SortTable::new(default_sort),
        }
    }

    pub fn tree(&self) -> &FilterTree {
        &self.tree
    }

    pub fn facet_keys(&self) -> Vec<&str> {
        self.facets.iter().map(FacetBinding::key).collect()
    }

    pub fn sort_ids(&self) -> Vec<&str> {
        self.sorts.ids()
    }

    pub fn default_sort(&self) -> &str {
        self.sorts.default_id()
    }

    pub fn with_facet(mut self, facet: FacetBinding<'a, T>) -> Self {
        self.facets.push(facet);
        self
    }

    pub fn with_sort(mut self, id: &str, compare: impl Fn(&T, &T) -> Ordering + 'a) -> Self {
        self.sorts.insert(id, compare);
        self
    }

    /// Visible subset of `items` in display order, evaluated at the local
    /// wall clock. `items` is never reordered.
    pub fn apply<'i>(&self, items: &'i [T], state: &QueryState) -> Vec<&'i T> {
        self.apply_at(items, state, Local::now())
    }

    pub fn apply_at<'i, Tz: TimeZone>(&self, items: &'i [T], state: &QueryState, now: DateTime<Tz>) -> Vec<&'i T> {
        let predicates: Vec<_> = self
            .facets
            .iter()
            .filter_map(|facet| facet.compile(state, &self.tree, &now))
            .collect();

        let mut visible: Vec<&T> = items
            .iter()
            .filter(|item| predicates.iter().all(|predicate| predicate.matches(item)))
            .collect();
        self.sorts.sort(&mut visible, state.sort.as_ref());

        tracing::debug!(
            total = items.len(),
            visible = visible.len(),
            active_facets = predicates.len(),
            sort = ?state.sort.as_ref().map(|sort| sort.by.as_str()),
            "applied query"
        );
        visible
    }

    pub fn apply_cloned(&self, items: &[T], state: &QueryState) -> Vec<T>
    where
        T: Clone,
    {
        self.apply(items, state).into_iter().cloned().collect()
    }

    /// Schema-free badge number for the drawer button.
    pub fn badge_count(&self, state: &QueryState) -> usize {
        count_active(&state.values)
    }

    /// Precise count for one node of the schema; unknown ids count 0.
    pub fn group_count(&self, state: &QueryState, node_id: &str) -> usize {
        self.tree
            .find_node(node_id)
            .map(|node| count_active_for_group(&state.values, node))
            .unwrap_or(0)
    }

    /// Precise count across the whole schema, root treated as a container.
    pub fn total_count(&self, state: &QueryState) -> usize {
        self.tree
            .items
            .iter()
            .map(|node| count_active_for_group(&state.values, node))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SortDirection, SortSpec};
    use chrono::Utc;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: String,
        kind: String,
    }

    fn row(name: &str, kind: &str) -> Row {
        Row {
            name: name.to_string(),
            kind: kind.to_string(),
        }
    }

    fn engine() -> QueryEngine<'static, Row> {
        QueryEngine::new(FilterTree::default(), "name_asc")
            .with_facet(FacetBinding::Membership {
                key: "type".to_string(),
                expand_implied: false,
                ids: Arc::new(|item: &Row| vec![item.kind.clone()]),
            })
            .with_sort("name_asc", |a: &Row, b: &Row| compare_text(&a.name, &b.name))
            .with_sort("name_desc", |a: &Row, b: &Row| compare_text(&b.name, &a.name))
    }

    #[test]
    fn empty_state_returns_everything_in_default_order() {
        let rows = vec![row("b", "x"), row("a", "y")];
        let visible = engine().apply(&rows, &QueryState::new());
        let names: Vec<&str> = visible.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(rows[0].name, "b");
    }

    #[test]
    fn membership_and_sort_compose() {
        let rows = vec![row("b", "x"), row("a", "y"), row("c", "x")];
        let state = QueryState::new()
            .with_value("type", vec!["x"])
            .with_sort(SortSpec::new("name_desc", SortDirection::Desc));
        let visible = engine().apply_cloned(&rows, &state);
        assert_eq!(visible, vec![row("c", "x"), row("b", "x")]);
    }

    #[test]
    fn applying_twice_yields_equal_results() {
        let rows = vec![row("b", "x"), row("a", "y")];
        let state = QueryState::new().with_value("type", vec!["y"]);
        let now = Utc::now();
        let engine = engine();
        assert_eq!(
            engine.apply_at(&rows, &state, now),
            engine.apply_at(&rows, &state, now)
        );
    }

    #[test]
    fn counts_unknown_node_as_zero() {
        let state = QueryState::new().with_value("type", vec!["x"]);
        let engine = engine();
        assert_eq!(engine.group_count(&state, "nope"), 0);
        assert_eq!(engine.badge_count(&state), 1);
        assert_eq!(engine.facet_keys(), vec!["type"]);
        assert_eq!(engine.sort_ids(), vec!["name_asc", "name_desc"]);
        assert_eq!(engine.default_sort(), "name_asc");
    }
}
