use super::{author_group, make_group, option_nodes, search_leaf, time_group, FilterSchema, OptionSeed, STAGE_KEY, TYPE_KEY};
use crate::models::{FilterNode, FilterTree, SelectionMode, SortDirection, SortOption};

/// Incident stages in display order. `all` and `active` are umbrella options.
pub const INCIDENT_STAGES: [&str; 6] = ["all", "active", "monitoring", "recovery", "response", "closed"];

#[derive(Debug, Clone, Default)]
pub struct IncidentReference {
    pub authors: Vec<String>,
    /// `(id, label)` pairs of incident types.
    pub incident_types: Vec<(String, String)>,
}

pub fn build_incident_filters(reference: &IncidentReference) -> FilterSchema {
    let stages = option_nodes(vec![
        OptionSeed::new("all", "All").implies(["active", "monitoring", "recovery", "response", "closed"]),
        OptionSeed::new("active", "Active").implies(["monitoring", "recovery", "response"]),
        OptionSeed::new("monitoring", "Monitoring"),
        OptionSeed::new("recovery", "Recovery"),
        OptionSeed::new("response", "Response"),
        OptionSeed::new("closed", "Closed"),
    ]);

    let mut items: Vec<FilterNode> = vec![
        search_leaf("Incident name").into(),
        make_group(STAGE_KEY, "Stage", SelectionMode::Multi, stages).into(),
    ];

    if !reference.incident_types.is_empty() {
        let types = option_nodes(reference.incident_types.iter().cloned());
        items.push(make_group(TYPE_KEY, "Incident type", SelectionMode::Multi, types).into());
    }

    items.push(author_group("Created by", &reference.authors).into());
    items.push(time_group().into());

    FilterSchema {
        tree: FilterTree {
            title: Some("Sort & Filter incidents".to_string()),
            items,
        },
        sort_options: vec![
            SortOption::new("date_desc", "Newest first").on_field("createdAt", SortDirection::Desc),
            SortOption::new("date_asc", "Oldest first").on_field("createdAt", SortDirection::Asc),
            SortOption::new("name_asc", "Name (A-Z)").on_field("name", SortDirection::Asc),
            SortOption::new("name_desc", "Name (Z-A)").on_field("name", SortDirection::Desc),
        ],
        default_sort: "date_desc".to_string(),
    }
}
