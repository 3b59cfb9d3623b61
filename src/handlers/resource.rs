//! Resource CRUD handlers: list, create, update, delete. The resource is resolved from the path segment.

use crate::error::AppError;
use crate::resource::ResourceDef;
use crate::response::{no_content, success_many, success_one};
use crate::service::{CrudService, Fields};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

fn resolve<'a>(state: &'a AppState, path_segment: &str) -> Result<&'a ResourceDef, AppError> {
    state
        .registry
        .by_path(path_segment)
        .ok_or_else(|| AppError::NotFound(format!("unknown resource '{}'", path_segment)))
}

fn body_to_fields(payload: Result<Json<Value>, JsonRejection>) -> Result<Fields, AppError> {
    match payload {
        Ok(Json(Value::Object(m))) => Ok(m),
        Ok(_) => Err(AppError::invalid("body", "must be a JSON object")),
        Err(rejection) => {
            tracing::debug!(%rejection, "rejected request body");
            Err(AppError::invalid("body", "must be valid JSON"))
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let resource = resolve(&state, &path_segment)?;
    let rows = CrudService::list(state.gateway.as_ref(), resource).await?;
    Ok(success_many(rows))
}

pub async fn create(
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let resource = resolve(&state, &path_segment)?;
    let body = body_to_fields(payload)?;
    let row = CrudService::create(state.gateway.as_ref(), resource, &body).await?;
    Ok(success_one(resource.create_status, row))
}

/// Serves both PUT and PATCH; the resource's update mode decides replace vs. merge.
pub async fn update(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let resource = resolve(&state, &path_segment)?;
    let id = CrudService::parse_id(&id_str)?;
    let body = body_to_fields(payload)?;
    let row = CrudService::update(state.gateway.as_ref(), resource, id, &body).await?;
    Ok(success_one(StatusCode::OK, row))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let resource = resolve(&state, &path_segment)?;
    let id = CrudService::parse_id(&id_str)?;
    CrudService::delete(state.gateway.as_ref(), resource, id).await?;
    Ok(no_content())
}
