use super::accessors::{Accessor, ItemAccessors};
use super::facets::FacetBinding;
use super::sort::{compare_text, compare_timestamps};
use super::QueryEngine;
use crate::models::Domain;
use crate::schema::{
    FilterSchema, ATTACHMENT_KEY, AUTHOR_KEY, LOG_TYPE_KEY, SEARCH_KEY, STAGE_KEY, TIME_KEY, TIME_RANGE_KEY, TYPE_KEY,
};
use std::sync::Arc;

/// Engine for `domain`, wiring whichever accessors are present.
pub fn engine_for<'a, T: 'a>(domain: Domain, schema: &FilterSchema, accessors: ItemAccessors<'a, T>) -> QueryEngine<'a, T> {
    match domain {
        Domain::Incidents => incident_engine(schema, accessors),
        Domain::Logs => log_engine(schema, accessors),
        Domain::Tasks => task_engine(schema, accessors),
        Domain::Users => user_engine(schema, accessors),
    }
}

/// Search on name, author, stage (with implied stages), incident type and
/// time window; sorted by date or name.
pub fn incident_engine<'a, T: 'a>(schema: &FilterSchema, accessors: ItemAccessors<'a, T>) -> QueryEngine<'a, T> {
    let mut engine = base_engine(schema, &accessors);

    if let Some(stage) = accessors.stage.clone() {
        engine = engine.with_facet(FacetBinding::Membership {
            key: STAGE_KEY.to_string(),
            expand_implied: true,
            ids: Arc::new(move |item: &T| stage(item).into_iter().collect::<Vec<String>>()),
        });
    }
    if let Some(type_ids) = accessors.type_ids.clone() {
        engine = engine.with_facet(type_membership(type_ids));
    }

    engine = with_time_window(engine, &accessors);
    engine = with_date_sorts(engine, &accessors);
    with_name_sorts(engine, &accessors)
}

/// Search on entry text, log type (own, task and form pseudo types),
/// attachments, author and time window; sorted by date or author.
pub fn log_engine<'a, T: 'a>(schema: &FilterSchema, accessors: ItemAccessors<'a, T>) -> QueryEngine<'a, T> {
    let mut engine = base_engine(schema, &accessors);

    if let Some(probe) = accessors.log_type.clone() {
        engine = engine.with_facet(FacetBinding::LogType {
            key: LOG_TYPE_KEY.to_string(),
            probe,
        });
    }
    if let Some(probe) = accessors.attachments.clone() {
        engine = engine.with_facet(FacetBinding::Attachment {
            key: ATTACHMENT_KEY.to_string(),
            probe,
        });
    }

    engine = with_time_window(engine, &accessors);
    engine = with_date_sorts(engine, &accessors);

    if let Some(author) = accessors.author.clone() {
        let descending = author.clone();
        engine = engine
            .with_sort("author_asc", move |a: &T, b: &T| {
                compare_text(&author(a).unwrap_or_default(), &author(b).unwrap_or_default())
            })
            .with_sort("author_desc", move |a: &T, b: &T| {
                compare_text(&descending(b).unwrap_or_default(), &descending(a).unwrap_or_default())
            });
    }
    engine
}

/// Search on title, status, assignee and time window; sorted by date or title.
pub fn task_engine<'a, T: 'a>(schema: &FilterSchema, accessors: ItemAccessors<'a, T>) -> QueryEngine<'a, T> {
    let mut engine = base_engine(schema, &accessors);
    if let Some(type_ids) = accessors.type_ids.clone() {
        engine = engine.with_facet(type_membership(type_ids));
    }
    engine = with_time_window(engine, &accessors);
    engine = with_date_sorts(engine, &accessors);
    with_name_sorts(engine, &accessors)
}

/// Search on name and role; sorted by name.
pub fn user_engine<'a, T: 'a>(schema: &FilterSchema, accessors: ItemAccessors<'a, T>) -> QueryEngine<'a, T> {
    let mut engine = QueryEngine::new(schema.tree.clone(), &schema.default_sort);
    if let Some(text) = accessors.display_name.clone() {
        engine = engine.with_facet(FacetBinding::Search {
            key: SEARCH_KEY.to_string(),
            text,
        });
    }
    if let Some(type_ids) = accessors.type_ids.clone() {
        engine = engine.with_facet(type_membership(type_ids));
    }
    with_name_sorts(engine, &accessors)
}

/// Search and author facets shared by every time-bearing domain.
fn base_engine<'a, T: 'a>(schema: &FilterSchema, accessors: &ItemAccessors<'a, T>) -> QueryEngine<'a, T> {
    let mut engine = QueryEngine::new(schema.tree.clone(), &schema.default_sort);
    if let Some(text) = accessors.display_name.clone() {
        engine = engine.with_facet(FacetBinding::Search {
            key: SEARCH_KEY.to_string(),
            text,
        });
    }
    if let Some(author) = accessors.author.clone() {
        engine = engine.with_facet(FacetBinding::Author {
            key: AUTHOR_KEY.to_string(),
            author,
        });
    }
    engine
}

fn type_membership<'a, T: 'a>(type_ids: Accessor<'a, T, Vec<String>>) -> FacetBinding<'a, T> {
    FacetBinding::Membership {
        key: TYPE_KEY.to_string(),
        expand_implied: false,
        ids: type_ids,
    }
}

fn with_time_window<'a, T: 'a>(engine: QueryEngine<'a, T>, accessors: &ItemAccessors<'a, T>) -> QueryEngine<'a, T> {
    let Some(timestamp) = accessors.timestamp.clone() else {
        return engine;
    };
    engine.with_facet(FacetBinding::TimeWindow {
        preset_key: TIME_KEY.to_string(),
        range_key: TIME_RANGE_KEY.to_string(),
        timestamp,
    })
}

fn with_date_sorts<'a, T: 'a>(engine: QueryEngine<'a, T>, accessors: &ItemAccessors<'a, T>) -> QueryEngine<'a, T> {
    let Some(timestamp) = accessors.timestamp.clone() else {
        return engine;
    };
    let ascending = timestamp.clone();
    engine
        .with_sort("date_desc", move |a: &T, b: &T| compare_timestamps(timestamp(b), timestamp(a)))
        .with_sort("date_asc", move |a: &T, b: &T| compare_timestamps(ascending(a), ascending(b)))
}

fn with_name_sorts<'a, T: 'a>(engine: QueryEngine<'a, T>, accessors: &ItemAccessors<'a, T>) -> QueryEngine<'a, T> {
    let Some(name) = accessors.display_name.clone() else {
        return engine;
    };
    let descending = name.clone();
    engine
        .with_sort("name_asc", move |a: &T, b: &T| compare_text(&name(a), &name(b)))
        .with_sort("name_desc", move |a: &T, b: &T| compare_text(&descending(b), &descending(a)))
}
