pub mod counter;
pub mod errors;
pub mod implied;
pub mod models;
pub mod query;
pub mod schema;
pub mod selection;
pub mod settings;
pub mod telemetry;
pub mod time_range;

pub use crate::counter::{count_active, count_active_for_group};
pub use crate::errors::{AppError, AppResult};
pub use crate::implied::{apply_implied_selections, apply_implied_selections_closure, ImpliedSelection};
pub use crate::models::{
    DateRangeLeaf, DateRangeValue, Domain, FacetValue, FilterNode, FilterTree, GroupNode, NodeBase, OptionLeaf,
    QueryState, SelectionMode, SortDirection, SortOption, SortSpec, TextLeaf,
};
pub use crate::query::{
    engine_for, incident_engine, log_engine, task_engine, user_engine, AttachmentProbe, ItemAccessors, LogTypeProbe,
    QueryEngine,
};
pub use crate::schema::{
    build_incident_filters, build_log_filters, build_task_filters, build_user_filters, make_group, make_options,
    FilterSchema, IncidentReference, LogReference, TaskReference, UserReference,
};
pub use crate::settings::{load_settings, FacetSettings};
pub use crate::telemetry::init_tracing;
pub use crate::time_range::{resolve_time_range, resolve_time_range_at, TimeBounds, TimePreset};
