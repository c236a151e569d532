use super::{
    author_group, make_group, option_nodes, search_leaf, time_group, FilterSchema, OptionSeed, ATTACHMENT_KEY,
    LOG_TYPE_KEY,
};
use crate::models::{FilterNode, FilterTree, SelectionMode, SortDirection, SortOption};

/// Attachment facet options; each is checked independently and OR-ed.
pub const ATTACHMENT_KINDS: [(&str, &str); 4] = [
    ("location", "Location"),
    ("file", "File"),
    ("sketch", "Sketch"),
    ("recording", "Recording"),
];

/// Pseudo log-type id for entries submitted through a custom form.
pub fn form_type_id(template_id: &str) -> String {
    format!("form::{}", template_id)
}

#[derive(Debug, Clone, Default)]
pub struct LogReference {
    pub authors: Vec<String>,
    /// `(id, label)` pairs of built-in log entry types.
    pub log_types: Vec<(String, String)>,
    /// `(template id, title)` pairs of custom form templates.
    pub form_templates: Vec<(String, String)>,
}

pub fn build_log_filters(reference: &LogReference) -> FilterSchema {
    let mut type_children = option_nodes(reference.log_types.iter().cloned());
    type_children.extend(option_nodes([("task", "Tasks")]));

    if !reference.form_templates.is_empty() {
        let forms = option_nodes(
            reference
                .form_templates
                .iter()
                .map(|(id, title)| OptionSeed::new(form_type_id(id), title.clone())),
        );
        let form_group_id = format!("{}.form", LOG_TYPE_KEY);
        type_children.push(make_group(&form_group_id, "Forms", SelectionMode::Multi, forms).into());
    }

    let items: Vec<FilterNode> = vec![
        search_leaf("Search entries").into(),
        make_group(LOG_TYPE_KEY, "Entry type", SelectionMode::Multi, type_children).into(),
        make_group(ATTACHMENT_KEY, "Attachments", SelectionMode::Multi, option_nodes(ATTACHMENT_KINDS)).into(),
        author_group("Author", &reference.authors).into(),
        time_group().into(),
    ];

    FilterSchema {
        tree: FilterTree {
            title: Some("Sort & Filter log".to_string()),
            items,
        },
        sort_options: vec![
            SortOption::new("date_desc", "Newest first").on_field("date", SortDirection::Desc),
            SortOption::new("date_asc", "Oldest first").on_field("date", SortDirection::Asc),
            SortOption::new("author_asc", "Author (A-Z)").on_field("author", SortDirection::Asc),
            SortOption::new("author_desc", "Author (Z-A)").on_field("author", SortDirection::Desc),
        ],
        default_sort: "date_desc".to_string(),
    }
}
