use super::{make_group, option_nodes, search_leaf, FilterSchema, TYPE_KEY};
use crate::models::{FilterNode, FilterTree, SelectionMode, SortDirection, SortOption};

#[derive(Debug, Clone, Default)]
pub struct UserReference {
    /// `(id, label)` pairs of roles.
    pub roles: Vec<(String, String)>,
}

pub fn build_user_filters(reference: &UserReference) -> FilterSchema {
    let mut items: Vec<FilterNode> = vec![search_leaf("Name or email").into()];
    if !reference.roles.is_empty() {
        let roles = option_nodes(reference.roles.iter().cloned());
        items.push(make_group(TYPE_KEY, "Role", SelectionMode::Multi, roles).into());
    }

    FilterSchema {
        tree: FilterTree {
            title: Some("Sort & Filter users".to_string()),
            items,
        },
        sort_options: vec![
            SortOption::new("name_asc", "Name (A-Z)").on_field("name", SortDirection::Asc),
            SortOption::new("name_desc", "Name (Z-A)").on_field("name", SortDirection::Desc),
        ],
        default_sort: "name_asc".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn users_have_no_time_facet() {
        let schema = build_user_filters(&UserReference {
            roles: vec![("admin".to_string(), "Admin".to_string())],
        });
        assert!(schema.tree.find_group("time").is_none());
        assert_eq!(schema.tree.find_group("type").map(|group| group.options().count()), Some(1));
        assert_eq!(schema.default_sort, "name_asc");
    }
}
