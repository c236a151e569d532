use crate::models::FilterTree;
use std::collections::BTreeSet;

/// A selection after implication: `locked` holds the ids pulled in by an
/// implying option. Those render checked but cannot be toggled on their own.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImpliedSelection {
    pub selected: BTreeSet<String>,
    pub locked: BTreeSet<String>,
}

/// Expands `selected` by one hop of `implies` declared on the options of the
/// top-level group `group_id`. Unknown groups leave the selection unchanged.
pub fn apply_implied_selections(
    selected: &BTreeSet<String>,
    group_id: &str,
    tree: &FilterTree,
) -> ImpliedSelection {
    let mut result = ImpliedSelection {
        selected: selected.clone(),
        locked: BTreeSet::new(),
    };

    let Some(group) = tree.find_group(group_id) else {
        return result;
    };

    for option in group.options() {
        if option.implies.is_empty() || !selected.contains(&option.base.id) {
            continue;
        }
        for implied in &option.implies {
            result.selected.insert(implied.clone());
            result.locked.insert(implied.clone());
        }
    }

    result
}

/// Fixed-point variant: keeps expanding until the selection stops growing,
/// so chains like `a -> b -> c` resolve without listing `c` on `a`.
pub fn apply_implied_selections_closure(
    selected: &BTreeSet<String>,
    group_id: &str,
    tree: &FilterTree,
) -> ImpliedSelection {
    let mut result = apply_implied_selections(selected, group_id, tree);
    loop {
        let next = apply_implied_selections(&result.selected, group_id, tree);
        if next.selected.len() == result.selected.len() {
            return result;
        }
        result.locked.extend(next.locked);
        result.selected = next.selected;
    }
}
