//! Row counts, served both under `/api/dashboard` and per entity.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::db::queries;
use crate::errors::AppError;
use crate::state::AppState;

pub async fn customers_count(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let count = state.db.with_conn(queries::count_customers)?;
    Ok(Json(json!({ "customersCount": count })))
}

pub async fn services_count(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let count = state.db.with_conn(queries::count_services)?;
    Ok(Json(json!({ "servicesCount": count })))
}

pub async fn bookings_count(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let count = state.db.with_conn(queries::count_bookings)?;
    Ok(Json(json!({ "bookingsCount": count })))
}
