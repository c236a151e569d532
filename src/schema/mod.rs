mod incidents;
mod logs;
mod tasks;
mod users;

pub use incidents::{build_incident_filters, IncidentReference, INCIDENT_STAGES};
pub use logs::{build_log_filters, form_type_id, LogReference, ATTACHMENT_KINDS};
pub use tasks::{build_task_filters, TaskReference};
pub use users::{build_user_filters, UserReference};

use crate::models::{
    DateRangeLeaf, FilterNode, FilterTree, GroupNode, NodeBase, OptionLeaf, SelectionMode, SortOption, TextLeaf,
};
use crate::time_range::TimePreset;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

pub const SEARCH_KEY: &str = "search";
pub const AUTHOR_KEY: &str = "author";
pub const TYPE_KEY: &str = "type";
pub const STAGE_KEY: &str = "stage";
pub const TIME_KEY: &str = "time";
pub const TIME_RANGE_KEY: &str = "timeRange";
pub const ATTACHMENT_KEY: &str = "attachment";
pub const LOG_TYPE_KEY: &str = "logType";

/// Author facet ids: trimmed, lowercase, whitespace runs turned into hyphens.
pub fn slugify(value: &str) -> String {
    WHITESPACE_RUN.replace_all(&value.trim().to_lowercase(), "-").into_owned()
}

/// A schema plus the sort choices offered next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSchema {
    pub tree: FilterTree,
    pub sort_options: Vec<SortOption>,
    pub default_sort: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSeed {
    pub id: String,
    pub label: String,
    pub implies: Vec<String>,
}

impl OptionSeed {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            implies: Vec::new(),
        }
    }

    pub fn implies<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.implies = ids.into_iter().map(Into::into).collect();
        self
    }
}

impl From<(&str, &str)> for OptionSeed {
    fn from((id, label): (&str, &str)) -> Self {
        Self::new(id, label)
    }
}

impl From<(String, String)> for OptionSeed {
    fn from((id, label): (String, String)) -> Self {
        Self::new(id, label)
    }
}

pub fn make_options<I, S>(items: I) -> Vec<OptionLeaf>
where
    I: IntoIterator<Item = S>,
    S: Into<OptionSeed>,
{
    items
        .into_iter()
        .map(Into::into)
        .map(|seed| OptionLeaf {
            base: NodeBase::new(seed.id, seed.label),
            implies: seed.implies,
        })
        .collect()
}

pub fn make_group(id: &str, label: &str, selection: SelectionMode, children: Vec<FilterNode>) -> GroupNode {
    GroupNode {
        base: NodeBase::new(id, label),
        selection,
        children,
    }
}

pub fn make_text(id: &str, label: &str, placeholder: Option<&str>) -> TextLeaf {
    TextLeaf {
        base: NodeBase::new(id, label),
        placeholder: placeholder.map(str::to_string),
    }
}

pub fn make_date_range(id: &str, label: &str) -> DateRangeLeaf {
    DateRangeLeaf {
        base: NodeBase::new(id, label),
    }
}

pub(crate) fn option_nodes<I, S>(items: I) -> Vec<FilterNode>
where
    I: IntoIterator<Item = S>,
    S: Into<OptionSeed>,
{
    make_options(items).into_iter().map(FilterNode::from).collect()
}

/// Single-select time window with the presets and a `timeRange` drill-in
/// for the custom option.
pub fn time_group() -> GroupNode {
    let mut children = option_nodes(TimePreset::ALL.iter().map(|preset| (preset.as_str(), preset.label())));
    let mut range = make_date_range(TIME_RANGE_KEY, "Custom range");
    range.base.helper_text = Some("Used when \"Custom range\" is selected".to_string());
    children.push(range.into());
    make_group(TIME_KEY, "Time", SelectionMode::Single, children)
}

/// Multi-select author group keyed by slug, deduplicated, in input order.
pub fn author_group(label: &str, names: &[String]) -> GroupNode {
    let mut seen = BTreeSet::new();
    let seeds: Vec<OptionSeed> = names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(slugify(name)))
        .map(|name| OptionSeed::new(slugify(name), name))
        .collect();
    make_group(AUTHOR_KEY, label, SelectionMode::Multi, option_nodes(seeds))
}

pub fn search_leaf(placeholder: &str) -> TextLeaf {
    make_text(SEARCH_KEY, "Search", Some(placeholder))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum SchemaIssue {
    DuplicateId { scope: String, id: String },
    UnknownImplied { group: String, option: String, implied: String },
    RangeInMultiGroup { group: String, id: String },
}

impl SchemaIssue {
    pub fn message(&self) -> String {
        match self {
            Self::DuplicateId { scope, id } => format!("id '{}' appears more than once under '{}'", id, scope),
            Self::UnknownImplied { group, option, implied } => format!(
                "option '{}' in '{}' implies '{}', which is not a sibling option",
                option, group, implied
            ),
            Self::RangeInMultiGroup { group, id } => {
                format!("date-range '{}' sits under multi-select group '{}'", id, group)
            }
        }
    }
}

/// Reports schema conventions a tree breaks. Trees are never rejected.
pub fn lint_tree(tree: &FilterTree) -> Vec<SchemaIssue> {
    let mut issues = Vec::new();
    lint_siblings("<root>", &tree.items, &mut issues);
    issues
}

fn lint_siblings(scope: &str, nodes: &[FilterNode], issues: &mut Vec<SchemaIssue>) {
    let mut seen = BTreeSet::new();
    for node in nodes {
        if !seen.insert(node.id()) {
            issues.push(SchemaIssue::DuplicateId {
                scope: scope.to_string(),
                id: node.id().to_string(),
            });
        }

        let FilterNode::Group(group) = node else {
            continue;
        };

        let option_ids: BTreeSet<&str> = group.options().map(|option| option.base.id.as_str()).collect();
        for option in group.options() {
            for implied in &option.implies {
                if !option_ids.contains(implied.as_str()) {
                    issues.push(SchemaIssue::UnknownImplied {
                        group: group.base.id.clone(),
                        option: option.base.id.clone(),
                        implied: implied.clone(),
                    });
                }
            }
        }

        if group.selection == SelectionMode::Multi {
            for child in &group.children {
                if let FilterNode::DateRange(range) = child {
                    issues.push(SchemaIssue::RangeInMultiGroup {
                        group: group.base.id.clone(),
                        id: range.base.id.clone(),
                    });
                }
            }
        }

        lint_siblings(&group.base.id, &group.children, issues);
    }
}
