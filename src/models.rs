use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Fields shared by every node kind of a filter schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NodeBase {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

impl NodeBase {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            helper_text: None,
            hidden: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Pure container: holds no value of its own, aggregates its children.
    #[serde(rename = "none")]
    Container,
    Multi,
    Single,
}

impl SelectionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Container => "none",
            Self::Multi => "multi",
            Self::Single => "single",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupNode {
    #[serde(flatten)]
    pub base: NodeBase,
    pub selection: SelectionMode,
    #[serde(default)]
    pub children: Vec<FilterNode>,
}

impl GroupNode {
    /// Direct option children, in schema order.
    pub fn options(&self) -> impl Iterator<Item = &OptionLeaf> {
        self.children.iter().filter_map(|child| match child {
            FilterNode::Choice(option) => Some(option),
            _ => None,
        })
    }

    pub fn find_option(&self, option_id: &str) -> Option<&OptionLeaf> {
        self.options().find(|option| option.base.id == option_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionLeaf {
    #[serde(flatten)]
    pub base: NodeBase,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLeaf {
    #[serde(flatten)]
    pub base: NodeBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeLeaf {
    #[serde(flatten)]
    pub base: NodeBase,
}

/// One facet of a filter schema, discriminated by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FilterNode {
    Group(GroupNode),
    #[serde(rename = "option")]
    Choice(OptionLeaf),
    Text(TextLeaf),
    DateRange(DateRangeLeaf),
}

impl FilterNode {
    pub fn base(&self) -> &NodeBase {
        match self {
            Self::Group(node) => &node.base,
            Self::Choice(node) => &node.base,
            Self::Text(node) => &node.base,
            Self::DateRange(node) => &node.base,
        }
    }

    pub fn id(&self) -> &str {
        &self.base().id
    }

    pub fn label(&self) -> &str {
        &self.base().label
    }

    pub fn is_hidden(&self) -> bool {
        self.base().hidden
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Group(_) => "group",
            Self::Choice(_) => "option",
            Self::Text(_) => "text",
            Self::DateRange(_) => "date-range",
        }
    }

    pub fn as_group(&self) -> Option<&GroupNode> {
        match self {
            Self::Group(group) => Some(group),
            _ => None,
        }
    }
}

impl From<GroupNode> for FilterNode {
    fn from(value: GroupNode) -> Self {
        Self::Group(value)
    }
}

impl From<OptionLeaf> for FilterNode {
    fn from(value: OptionLeaf) -> Self {
        Self::Choice(value)
    }
}

impl From<TextLeaf> for FilterNode {
    fn from(value: TextLeaf) -> Self {
        Self::Text(value)
    }
}

impl From<DateRangeLeaf> for FilterNode {
    fn from(value: DateRangeLeaf) -> Self {
        Self::DateRange(value)
    }
}

/// Root of a filter schema. The root behaves as an implicit `none` container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FilterTree {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub items: Vec<FilterNode>,
}

impl FilterTree {
    /// Top-level group lookup, the scope used for implied selections.
    pub fn find_group(&self, group_id: &str) -> Option<&GroupNode> {
        self.items
            .iter()
            .filter_map(FilterNode::as_group)
            .find(|group| group.base.id == group_id)
    }

    /// Depth-first lookup by id across the whole tree.
    pub fn find_node(&self, node_id: &str) -> Option<&FilterNode> {
        fn walk<'a>(nodes: &'a [FilterNode], node_id: &str) -> Option<&'a FilterNode> {
            for node in nodes {
                if node.id() == node_id {
                    return Some(node);
                }
                if let FilterNode::Group(group) = node {
                    if let Some(found) = walk(&group.children, node_id) {
                        return Some(found);
                    }
                }
            }
            None
        }
        walk(&self.items, node_id)
    }

    pub fn from_json(raw: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_yaml(raw: &str) -> AppResult<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    pub by: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(by: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            by: by.into(),
            direction,
        }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::new("date_desc", SortDirection::Desc)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortOption {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directions: Option<Vec<SortDirection>>,
}

impl SortOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            field: None,
            directions: None,
        }
    }

    pub fn on_field(mut self, field: &str, direction: SortDirection) -> Self {
        self.field = Some(field.to_string());
        self.directions = Some(vec![direction]);
        self
    }
}

/// A `{from?, to?}` pair of calendar dates as entered in the drawer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DateRangeValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl DateRangeValue {
    pub fn new(from: Option<&str>, to: Option<&str>) -> Self {
        Self {
            from: from.map(str::to_string),
            to: to.map(str::to_string),
        }
    }

    pub fn from_str_opt(&self) -> Option<&str> {
        self.from.as_deref().filter(|value| !value.is_empty())
    }

    pub fn to_str_opt(&self) -> Option<&str> {
        self.to.as_deref().filter(|value| !value.is_empty())
    }

    /// True when either bound holds a non-empty value.
    pub fn is_set(&self) -> bool {
        self.from_str_opt().is_some() || self.to_str_opt().is_some()
    }
}

/// Value stored under one key of `QueryState::values`.
///
/// Variant order matters for untagged decoding: `null` first, objects last,
/// and any object that is not a `{from?, to?}` pair lands in `Object`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacetValue {
    Null,
    Text(String),
    List(Vec<String>),
    Flag(bool),
    Number(f64),
    Range(DateRangeValue),
    Object(BTreeMap<String, serde_json::Value>),
}

impl FacetValue {
    /// Whether this value counts as an active facet for badge purposes.
    pub fn contributes(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Text(text) => !text.is_empty(),
            Self::List(items) => !items.is_empty(),
            Self::Range(range) => range.is_set(),
            Self::Object(fields) => fields.values().any(is_truthy),
            Self::Flag(_) | Self::Number(_) => true,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_range(&self) -> Option<&DateRangeValue> {
        match self {
            Self::Range(range) => Some(range),
            _ => None,
        }
    }
}

fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(flag) => *flag,
        serde_json::Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        serde_json::Value::String(text) => !text.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

impl From<&str> for FacetValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FacetValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for FacetValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for FacetValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(str::to_string).collect())
    }
}

impl From<DateRangeValue> for FacetValue {
    fn from(value: DateRangeValue) -> Self {
        Self::Range(value)
    }
}

/// Sort choice plus the flat map of facet values the drawer produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct QueryState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
    #[serde(default)]
    pub values: BTreeMap<String, FacetValue>,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_value(mut self, key: &str, value: impl Into<FacetValue>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&FacetValue> {
        self.values.get(key)
    }

    /// Non-empty string value stored under `key`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(FacetValue::as_text)
            .filter(|value| !value.is_empty())
    }

    pub fn range(&self, key: &str) -> Option<&DateRangeValue> {
        self.get(key).and_then(FacetValue::as_range)
    }

    /// Ids selected under `key`: a string is one id, a list is many.
    pub fn selected_ids(&self, key: &str) -> BTreeSet<String> {
        match self.get(key) {
            Some(FacetValue::Text(value)) if !value.is_empty() => BTreeSet::from([value.clone()]),
            Some(FacetValue::List(values)) => values
                .iter()
                .filter(|value| !value.is_empty())
                .cloned()
                .collect(),
            _ => BTreeSet::new(),
        }
    }

    /// Ids selected under `key` and under every dotted child key `key.*`.
    pub fn selected_ids_with_children(&self, key: &str) -> BTreeSet<String> {
        let prefix = format!("{}.", key);
        let mut ids = self.selected_ids(key);
        for child_key in self.values.keys().filter(|candidate| candidate.starts_with(&prefix)) {
            ids.extend(self.selected_ids(child_key));
        }
        ids
    }

    pub fn from_json(raw: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// The list pages that host a "Sort & Filter" drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    Incidents,
    Logs,
    Tasks,
    Users,
}

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Incidents => "incidents",
            Self::Logs => "logs",
            Self::Tasks => "tasks",
            Self::Users => "users",
        }
    }

    pub fn has_time_window(self) -> bool {
        !matches!(self, Self::Users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_node_uses_type_tag() {
        let raw = json!({
            "title": "Incidents",
            "items": [
                {
                    "type": "group",
                    "id": "stage",
                    "label": "Stage",
                    "selection": "multi",
                    "children": [
                        { "type": "option", "id": "all", "label": "All", "implies": ["active"] },
                        { "type": "option", "id": "active", "label": "Active" }
                    ]
                },
                { "type": "text", "id": "search", "label": "Search", "placeholder": "Name" },
                { "type": "date-range", "id": "timeRange", "label": "Range", "hidden": true }
            ]
        });
        let tree: FilterTree = serde_json::from_value(raw).expect("tree");
        assert_eq!(tree.items.len(), 3);
        let stage = tree.find_group("stage").expect("stage group");
        assert_eq!(stage.selection, SelectionMode::Multi);
        assert_eq!(stage.find_option("all").expect("all").implies, vec!["active"]);
        assert_eq!(tree.items[1].kind(), "text");
        assert!(tree.items[2].is_hidden());
        assert_eq!(tree.find_node("active").map(FilterNode::label), Some("Active"));
    }

    #[test]
    fn filter_tree_round_trips_through_json_and_yaml() {
        let tree = crate::schema::build_log_filters(&crate::schema::LogReference {
            authors: vec!["Alice Smith".to_string()],
            log_types: vec![("update".to_string(), "Update".to_string())],
            form_templates: vec![("tpl-1".to_string(), "Damage".to_string())],
        })
        .tree;

        let json = serde_json::to_string(&tree).expect("json");
        assert_eq!(FilterTree::from_json(&json).expect("parse json"), tree);

        let yaml = serde_yaml::to_string(&tree).expect("yaml");
        assert_eq!(FilterTree::from_yaml(&yaml).expect("parse yaml"), tree);
    }

    #[test]
    fn malformed_trees_are_parse_errors() {
        use crate::errors::AppError;

        assert!(matches!(FilterTree::from_json("{ not json"), Err(AppError::Parse(_))));
        assert!(matches!(FilterTree::from_yaml("items: [unclosed"), Err(AppError::Parse(_))));
        assert!(matches!(
            FilterTree::from_yaml("items:\n  - type: slider\n    id: x\n    label: X\n"),
            Err(AppError::Parse(_))
        ));
        assert!(matches!(QueryState::from_json("\"stage\""), Err(AppError::Parse(_))));
    }

    #[test]
    fn container_selection_serializes_as_none() {
        let value = serde_json::to_value(SelectionMode::Container).expect("serialize");
        assert_eq!(value, json!("none"));
    }

    #[test]
    fn facet_values_decode_from_wire_shapes() {
        let state: QueryState = serde_json::from_value(json!({
            "sort": { "by": "date_desc", "direction": "desc" },
            "values": {
                "search": "smoke",
                "author": ["alice", "bob"],
                "timeRange": { "from": "2025-02-01" },
                "time": null
            }
        }))
        .expect("state");

        assert_eq!(state.text("search"), Some("smoke"));
        assert_eq!(state.selected_ids("author").len(), 2);
        assert_eq!(state.range("timeRange").and_then(DateRangeValue::from_str_opt), Some("2025-02-01"));
        assert_eq!(state.get("time"), Some(&FacetValue::Null));
        assert_eq!(state.sort.as_ref().map(|sort| sort.by.as_str()), Some("date_desc"));
    }

    #[test]
    fn selected_ids_with_children_unions_dotted_keys() {
        let state = QueryState::new()
            .with_value("logType", vec!["update"])
            .with_value("logType.form", vec!["form::a"])
            .with_value("logTypeExtra", vec!["ignored"]);
        let ids = state.selected_ids_with_children("logType");
        assert_eq!(
            ids,
            BTreeSet::from(["update".to_string(), "form::a".to_string()])
        );
    }

    #[test]
    fn query_state_json_roundtrip_is_value_equal() {
        let state = QueryState::new()
            .with_sort(SortSpec::new("name_asc", SortDirection::Asc))
            .with_value("stage", vec!["active"])
            .with_value("timeRange", DateRangeValue::new(Some("2025-02-01"), None));
        let raw = state.to_json().expect("json");
        assert_eq!(QueryState::from_json(&raw).expect("parse"), state);
    }
}
