use super::accessors::{Accessor, AttachmentProbe, LogTypeProbe};
use crate::implied::apply_implied_selections;
use crate::models::{FilterTree, QueryState};
use crate::schema::slugify;
use crate::time_range::{resolve_time_range_at, TimeBounds};
use chrono::{DateTime, TimeZone};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttachmentKind {
    Location,
    File,
    Sketch,
    Recording,
}

impl AttachmentKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "location" => Some(Self::Location),
            "file" => Some(Self::File),
            "sketch" => Some(Self::Sketch),
            "recording" => Some(Self::Recording),
            _ => None,
        }
    }

    fn attachment_type(self) -> Option<&'static str> {
        match self {
            Self::Location => None,
            Self::File => Some("File"),
            Self::Sketch => Some("Sketch"),
            Self::Recording => Some("Recording"),
        }
    }

    pub fn present_in(self, probe: &AttachmentProbe) -> bool {
        match self.attachment_type() {
            None => probe.has_location,
            Some(expected) => probe
                .attachment_types
                .iter()
                .any(|kind| kind.eq_ignore_ascii_case(expected)),
        }
    }
}

/// Binds a `QueryState` key to the item attribute it filters on.
pub enum FacetBinding<'a, T> {
    /// Case-insensitive substring match on a display name.
    Search { key: String, text: Accessor<'a, T, String> },
    /// Membership of the item's author slug in the selected author slugs.
    Author { key: String, author: Accessor<'a, T, Option<String>> },
    /// Membership of any item id in the selected ids; `expand_implied`
    /// first resolves umbrella options of the top-level group `key`.
    Membership {
        key: String,
        expand_implied: bool,
        ids: Accessor<'a, T, Vec<String>>,
    },
    /// OR over per-kind existence checks.
    Attachment { key: String, probe: Accessor<'a, T, AttachmentProbe> },
    /// Ids under `key` and `key.*`, matched against own and pseudo type ids.
    LogType { key: String, probe: Accessor<'a, T, LogTypeProbe> },
    /// Preset under `preset_key`, custom bounds under `range_key`.
    TimeWindow {
        preset_key: String,
        range_key: String,
        timestamp: Accessor<'a, T, Option<i64>>,
    },
}

impl<'a, T> FacetBinding<'a, T> {
    pub fn key(&self) -> &str {
        match self {
            Self::Search { key, .. }
            | Self::Author { key, .. }
            | Self::Membership { key, .. }
            | Self::Attachment { key, .. }
            | Self::LogType { key, .. } => key,
            Self::TimeWindow { preset_key, .. } => preset_key,
        }
    }

    /// Turns the binding into a ready predicate, or `None` when the state
    /// holds nothing that would narrow the list.
    pub(crate) fn compile<Tz: TimeZone>(
        &self,
        state: &QueryState,
        tree: &FilterTree,
        now: &DateTime<Tz>,
    ) -> Option<CompiledFacet<'a, T>> {
        match self {
            Self::Search { key, text } => {
                let needle = state.text(key)?.to_lowercase();
                if needle.is_empty() {
                    return None;
                }
                Some(CompiledFacet::Search {
                    needle,
                    text: text.clone(),
                })
            }
            Self::Author { key, author } => {
                let slugs: BTreeSet<String> = state.selected_ids(key).iter().map(|id| slugify(id)).collect();
                if slugs.is_empty() {
                    return None;
                }
                Some(CompiledFacet::Author {
                    slugs,
                    author: author.clone(),
                })
            }
            Self::Membership {
                key,
                expand_implied,
                ids,
            } => {
                let selected = state.selected_ids(key);
                if selected.is_empty() {
                    return None;
                }
                let selected = if *expand_implied {
                    apply_implied_selections(&selected, key, tree).selected
                } else {
                    selected
                };
                Some(CompiledFacet::Membership {
                    selected,
                    ids: ids.clone(),
                })
            }
            Self::Attachment { key, probe } => {
                let selected = state.selected_ids(key);
                let kinds: Vec<AttachmentKind> = selected.iter().filter_map(|id| AttachmentKind::parse(id)).collect();
                if kinds.is_empty() {
                    if !selected.is_empty() {
                        tracing::debug!(key = %key, "ignoring attachment facet with no known kinds");
                    }
                    return None;
                }
                Some(CompiledFacet::Attachment {
                    kinds,
                    probe: probe.clone(),
                })
            }
            Self::LogType { key, probe } => {
                let selected = state.selected_ids_with_children(key);
                if selected.is_empty() {
                    return None;
                }
                Some(CompiledFacet::LogType {
                    selected,
                    probe: probe.clone(),
                })
            }
            Self::TimeWindow {
                preset_key,
                range_key,
                timestamp,
            } => {
                let bounds = resolve_time_range_at(state.text(preset_key), state.range(range_key), now.clone());
                if bounds.is_unbounded() {
                    return None;
                }
                Some(CompiledFacet::TimeWindow {
                    bounds,
                    timestamp: timestamp.clone(),
                })
            }
        }
    }
}

pub(crate) enum CompiledFacet<'a, T> {
    Search {
        needle: String,
        text: Accessor<'a, T, String>,
    },
    Author {
        slugs: BTreeSet<String>,
        author: Accessor<'a, T, Option<String>>,
    },
    Membership {
        selected: BTreeSet<String>,
        ids: Accessor<'a, T, Vec<String>>,
    },
    Attachment {
        kinds: Vec<AttachmentKind>,
        probe: Accessor<'a, T, AttachmentProbe>,
    },
    LogType {
        selected: BTreeSet<String>,
        probe: Accessor<'a, T, LogTypeProbe>,
    },
    TimeWindow {
        bounds: TimeBounds,
        timestamp: Accessor<'a, T, Option<i64>>,
    },
}

impl<'a, T> CompiledFacet<'a, T> {
    pub(crate) fn matches(&self, item: &T) -> bool {
        match self {
            Self::Search { needle, text } => text(item).to_lowercase().contains(needle.as_str()),
            Self::Author { slugs, author } => author(item)
                .map(|name| slugs.contains(&slugify(&name)))
                .unwrap_or(false),
            Self::Membership { selected, ids } => ids(item).iter().any(|id| selected.contains(id)),
            Self::Attachment { kinds, probe } => {
                let probe = probe(item);
                kinds.iter().any(|kind| kind.present_in(&probe))
            }
            Self::LogType { selected, probe } => probe(item)
                .type_ids()
                .iter()
                .any(|id| selected.contains(id)),
            // Items without a timestamp are not excluded by the window.
            Self::TimeWindow { bounds, timestamp } => timestamp(item)
                .map(|value| bounds.contains(value))
                .unwrap_or(true),
        }
    }
}
