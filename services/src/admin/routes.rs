//! Admin page handlers under `/_fake/admin`.

use axum::{
    Router,
    extract::{Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use debug_api_table::{
    CellValue, DownloadDescriptor, Record, RenderContext, TableError, TableSource, parse_timezone,
};
use serde::Deserialize;

use super::{ADMIN_PATH, AdminError, pages};
use crate::AppState;
use crate::things::{Thing, ThingStorage};

#[derive(Debug, Deserialize)]
pub struct DisplayParams {
    pub timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ThingPageParams {
    pub thing_id: String,
    pub timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    pub thing_id: String,
    pub column: String,
}

pub fn routes<T: ThingStorage>() -> Router<AppState<T>> {
    Router::new()
        .route(ADMIN_PATH, get(index::<T>))
        .route("/_fake/admin/things/list", get(list_things::<T>))
        .route("/_fake/admin/things/get", get(get_thing::<T>))
        .route("/_fake/admin/things/download", get(download::<T>))
}

/// An explicit `timezone` query parameter wins over the configured one.
fn render_context<T>(
    state: &AppState<T>,
    timezone: Option<&str>,
) -> Result<RenderContext, AdminError> {
    let explicit = timezone
        .filter(|name| !name.trim().is_empty())
        .map(parse_timezone)
        .transpose()
        .map_err(AdminError::BadTimezone)?;
    Ok(RenderContext::resolve(explicit, state.display_timezone))
}

async fn load_things<T: ThingStorage>(state: &AppState<T>) -> Result<Vec<Thing>, AdminError> {
    state
        .thing_storage
        .list_things()
        .await
        .map_err(|e| AdminError::Storage(e.to_string()))
}

async fn load_thing<T: ThingStorage>(
    state: &AppState<T>,
    thing_id: &str,
) -> Result<Thing, AdminError> {
    state
        .thing_storage
        .get_thing(thing_id)
        .await
        .map_err(|e| AdminError::Storage(e.to_string()))?
        .ok_or_else(|| AdminError::NotFound("Thing".to_owned()))
}

fn thing_rows(things: &[Thing], with_actions: bool) -> Result<Vec<Record>, TableError> {
    things
        .iter()
        .map(|thing| {
            let mut record = Record::from_serialize(thing)?;
            if with_actions {
                record.insert(
                    "actions",
                    pages::delete_control(&thing.thing_id, &thing.name),
                );
            }
            Ok(record)
        })
        .collect()
}

/// GET /_fake/admin
pub async fn index<T: ThingStorage>(
    State(state): State<AppState<T>>,
    Query(params): Query<DisplayParams>,
) -> Result<Html<String>, AdminError> {
    let ctx = render_context(&state, params.timezone.as_deref())?;
    let things = load_things(&state).await?;
    let rows = thing_rows(&things, true)?;
    let table = state.renderer.render(TableSource::Rows(&rows), &ctx)?;
    Ok(Html(pages::admin_page(&table, ctx.timezone())))
}

/// GET /_fake/admin/things/list
pub async fn list_things<T: ThingStorage>(
    State(state): State<AppState<T>>,
    Query(params): Query<DisplayParams>,
) -> Result<Html<String>, AdminError> {
    let ctx = render_context(&state, params.timezone.as_deref())?;
    let things = load_things(&state).await?;
    let rows = thing_rows(&things, false)?;
    let table = state.renderer.render(TableSource::Rows(&rows), &ctx)?;
    Ok(Html(pages::thing_list_page(&table, ctx.timezone())))
}

/// GET /_fake/admin/things/get?thing_id=
pub async fn get_thing<T: ThingStorage>(
    State(state): State<AppState<T>>,
    Query(params): Query<ThingPageParams>,
) -> Result<Html<String>, AdminError> {
    let ctx = render_context(&state, params.timezone.as_deref())?;
    let thing = load_thing(&state, &params.thing_id).await?;
    let record = Record::from_serialize(&thing)?;
    let table = state.renderer.render(TableSource::Object(&record), &ctx)?;
    Ok(Html(pages::thing_page(&thing.name, &table, ctx.timezone())))
}

/// Serve one downloadable column of a thing as an attachment.
///
/// GET /_fake/admin/things/download?thing_id=&column=
pub async fn download<T: ThingStorage>(
    State(state): State<AppState<T>>,
    Query(params): Query<DownloadParams>,
) -> Result<Response, AdminError> {
    if !state.table_config.is_downloadable(&params.column) {
        return Err(AdminError::NotFound(format!("Column `{}`", params.column)));
    }

    let thing = load_thing(&state, &params.thing_id).await?;
    let record = Record::from_serialize(&thing)?;
    let value = record
        .get(&params.column)
        .and_then(CellValue::as_json)
        .filter(|value| !value.is_null())
        .ok_or_else(|| AdminError::NotFound(format!("Column `{}`", params.column)))?;

    let descriptor = DownloadDescriptor::from_value(&params.column, value)?;
    tracing::debug!(
        thing_id = %params.thing_id,
        column = %params.column,
        size = descriptor.size(),
        "serving download"
    );

    let disposition = format!("attachment; filename=\"{}\"", descriptor.filename);
    Ok((
        [
            (CONTENT_TYPE, descriptor.content_type.to_owned()),
            (CONTENT_DISPOSITION, disposition),
        ],
        descriptor.bytes,
    )
        .into_response())
}
