//! Service catalog endpoints.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use super::{require_patch, SearchQuery};
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{non_blank, NewService, Service, ServicePatch};
use crate::state::AppState;

const NOT_FOUND: &str = "Service not found";

// GET /api/services
pub async fn list_services(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Service>>, AppError> {
    let services = state.db.with_conn(queries::list_services)?;
    Ok(Json(services))
}

// GET /api/services/:id
pub async fn get_service(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Service>, AppError> {
    let Path(id) = id?;
    state
        .db
        .with_conn(|conn| queries::get_service(conn, id))?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

// GET /api/services/search?query=
pub async fn search_services(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Service>>, AppError> {
    let Query(query) = query?;
    let term = query.term()?;
    let services = state
        .db
        .with_conn(|conn| queries::search_services(conn, &term))?;
    Ok(Json(services))
}

// POST /api/services
pub async fn create_service(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewService>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(body) = payload?;
    // a zero price is treated as missing
    let price = body.price.filter(|p| *p != 0.0);
    let (Some(name), Some(price)) = (non_blank(body.name), price) else {
        return Err(AppError::BadRequest("Name and price are required".to_string()));
    };
    let description = non_blank(body.description);
    let availability = body.availability.unwrap_or(false);

    let id = state.db.with_conn(|conn| {
        queries::insert_service(conn, &name, description.as_deref(), price, availability)
    })?;

    tracing::info!(service_id = id, "service added");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Service added", "id": id })),
    ))
}

// PUT /api/services/:id
pub async fn update_service(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ServicePatch>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    let patch = patch.normalized();
    require_patch(patch.is_empty(), "Service")?;

    let updated = state
        .db
        .with_conn(|conn| queries::update_service(conn, id, &patch))?;
    if updated == 0 {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(Json(json!({ "message": "Service updated" })))
}

// DELETE /api/services/:id
pub async fn delete_service(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(id) = id?;
    let deleted = state
        .db
        .with_conn(|conn| queries::delete_service(conn, id))?;
    if deleted == 0 {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(Json(json!({ "message": "Service deleted" })))
}
