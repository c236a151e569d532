use super::{author_group, make_group, option_nodes, search_leaf, time_group, FilterSchema, TYPE_KEY};
use crate::models::{FilterNode, FilterTree, SelectionMode, SortDirection, SortOption};

#[derive(Debug, Clone)]
pub struct TaskReference {
    pub assignees: Vec<String>,
    /// `(id, label)` pairs of task statuses.
    pub statuses: Vec<(String, String)>,
}

impl Default for TaskReference {
    fn default() -> Self {
        Self {
            assignees: Vec::new(),
            statuses: vec![
                ("open".to_string(), "Open".to_string()),
                ("in-progress".to_string(), "In progress".to_string()),
                ("completed".to_string(), "Completed".to_string()),
            ],
        }
    }
}

pub fn build_task_filters(reference: &TaskReference) -> FilterSchema {
    let mut items: Vec<FilterNode> = vec![search_leaf("Task title").into()];
    if !reference.statuses.is_empty() {
        let statuses = option_nodes(reference.statuses.iter().cloned());
        items.push(make_group(TYPE_KEY, "Status", SelectionMode::Multi, statuses).into());
    }
    items.push(author_group("Assigned to", &reference.assignees).into());
    items.push(time_group().into());

    FilterSchema {
        tree: FilterTree {
            title: Some("Sort & Filter tasks".to_string()),
            items,
        },
        sort_options: vec![
            SortOption::new("date_desc", "Newest first").on_field("createdAt", SortDirection::Desc),
            SortOption::new("date_asc", "Oldest first").on_field("createdAt", SortDirection::Asc),
            SortOption::new("name_asc", "Title (A-Z)").on_field("title", SortDirection::Asc),
            SortOption::new("name_desc", "Title (Z-A)").on_field("title", SortDirection::Desc),
        ],
        default_sort: "date_desc".to_string(),
    }
}
