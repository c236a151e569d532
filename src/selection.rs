use crate::implied::apply_implied_selections;
use crate::models::{DateRangeValue, FacetValue, FilterNode, FilterTree, GroupNode, QueryState, SelectionMode};
use serde::Serialize;

/// How one option of a group should render in the drawer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionState {
    pub id: String,
    pub label: String,
    pub checked: bool,
    pub locked: bool,
}

fn find_group<'t>(tree: &'t FilterTree, group_id: &str) -> Option<&'t GroupNode> {
    tree.find_group(group_id)
        .or_else(|| tree.find_node(group_id).and_then(FilterNode::as_group))
}

/// Visible options of `group_id` with implied selections applied.
pub fn option_states(state: &QueryState, tree: &FilterTree, group_id: &str) -> Vec<OptionState> {
    let Some(group) = find_group(tree, group_id) else {
        return Vec::new();
    };
    let resolved = apply_implied_selections(&state.selected_ids(group_id), group_id, tree);
    group
        .options()
        .filter(|option| !option.base.hidden)
        .map(|option| OptionState {
            id: option.base.id.clone(),
            label: option.base.label.clone(),
            checked: resolved.selected.contains(&option.base.id),
            locked: resolved.locked.contains(&option.base.id),
        })
        .collect()
}

/// Toggles `option_id` in the working copy. Returns `false` and leaves the
/// state untouched for unknown ids and for ids locked by implication.
pub fn toggle_option(state: &mut QueryState, tree: &FilterTree, group_id: &str, option_id: &str) -> bool {
    let Some(group) = find_group(tree, group_id) else {
        tracing::debug!(group_id = %group_id, "toggle on unknown group");
        return false;
    };
    if group.find_option(option_id).is_none() {
        tracing::debug!(group_id = %group_id, option_id = %option_id, "toggle on unknown option");
        return false;
    }

    let current = state.selected_ids(group_id);
    let resolved = apply_implied_selections(&current, group_id, tree);
    if resolved.locked.contains(option_id) && !current.contains(option_id) {
        return false;
    }

    match group.selection {
        SelectionMode::Single => {
            if state.text(group_id) == Some(option_id) {
                state.values.remove(group_id);
            } else {
                state.values.insert(group_id.to_string(), FacetValue::from(option_id));
            }
        }
        SelectionMode::Multi => {
            let mut selected: Vec<String> = match state.values.get(group_id) {
                Some(FacetValue::List(items)) => items.clone(),
                _ => current.into_iter().collect(),
            };
            if let Some(position) = selected.iter().position(|id| id == option_id) {
                selected.remove(position);
            } else {
                selected.push(option_id.to_string());
            }
            if selected.is_empty() {
                state.values.remove(group_id);
            } else {
                state.values.insert(group_id.to_string(), FacetValue::List(selected));
            }
        }
        SelectionMode::Container => return false,
    }
    true
}

pub fn set_text(state: &mut QueryState, id: &str, text: &str) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        state.values.remove(id);
    } else {
        state.values.insert(id.to_string(), FacetValue::from(trimmed));
    }
}

pub fn set_range(state: &mut QueryState, id: &str, range: DateRangeValue) {
    if range.is_set() {
        state.values.insert(id.to_string(), FacetValue::Range(range));
    } else {
        state.values.remove(id);
    }
}

/// Removes `id` and every dotted child key under it.
pub fn clear_facet(state: &mut QueryState, id: &str) {
    let prefix = format!("{}.", id);
    state
        .values
        .retain(|key, _| key != id && !key.starts_with(&prefix));
}
