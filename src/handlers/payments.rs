use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{non_blank, CreateOrderRequest, OrderCreated, Transaction};
use crate::services::checkout;
use crate::state::AppState;

// POST /api/pg/create-order
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<OrderCreated>, AppError> {
    let Json(req) = payload?;
    let created = checkout::create_order(&state, req).await?;
    Ok(Json(created))
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub id: Option<String>,
}

// POST /api/pg/callback?id=
pub async fn payment_callback(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CallbackQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(query) = query?;
    let order_id = non_blank(query.id)
        .ok_or_else(|| AppError::BadRequest("Transaction id is required".to_string()))?;

    checkout::reconcile_callback(&state, &order_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Transaction updated successfully",
    })))
}

// GET /api/pg/transactions/:order_id
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    order_id: Result<Path<String>, PathRejection>,
) -> Result<Json<Transaction>, AppError> {
    let Path(order_id) = order_id?;
    state
        .db
        .with_conn(|conn| queries::get_transaction(conn, &order_id))?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))
}
