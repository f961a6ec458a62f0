use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use super::{require_patch, SearchQuery};
use crate::db::{self, queries};
use crate::errors::AppError;
use crate::models::{non_blank, Customer, CustomerPatch, NewCustomer};
use crate::state::AppState;

const NOT_FOUND: &str = "Customer not found";

fn duplicate_contact() -> AppError {
    AppError::Conflict("Contact number already exists".to_string())
}

// GET /api/customers
pub async fn list_customers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Customer>>, AppError> {
    let customers = state.db.with_conn(queries::list_customers)?;
    Ok(Json(customers))
}

// GET /api/customers/:id
pub async fn get_customer(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Customer>, AppError> {
    let Path(id) = id?;
    state
        .db
        .with_conn(|conn| queries::get_customer(conn, id))?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

// GET /api/customers/search?q=
pub async fn search_customers(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Customer>>, AppError> {
    let Query(query) = query?;
    let term = query.term()?;
    let customers = state
        .db
        .with_conn(|conn| queries::search_customers(conn, &term))?;
    Ok(Json(customers))
}

// POST /api/customers
pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewCustomer>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(body) = payload?;
    let (Some(name), Some(contact_no)) = (non_blank(body.name), non_blank(body.contact_no)) else {
        return Err(AppError::BadRequest(
            "Name and contact number are required".to_string(),
        ));
    };

    let inserted = state.db.with_conn(|conn| {
        if queries::contact_exists(conn, &contact_no)? {
            return Ok(None);
        }
        queries::insert_customer(conn, &name, &contact_no).map(Some)
    });

    match inserted {
        Ok(Some(id)) => {
            tracing::info!(customer_id = id, "customer added");
            Ok((
                StatusCode::CREATED,
                Json(json!({ "message": "Customer added successfully", "customerId": id })),
            ))
        }
        Ok(None) => Err(duplicate_contact()),
        Err(e) if db::is_unique_violation(&e) => Err(duplicate_contact()),
        Err(e) => Err(e.into()),
    }
}

// PUT /api/customers/:id
pub async fn update_customer(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CustomerPatch>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    let patch = patch.normalized();
    require_patch(patch.is_empty(), "Customer")?;

    match state.db.with_conn(|conn| queries::update_customer(conn, id, &patch)) {
        Ok(0) => Err(AppError::NotFound(NOT_FOUND.to_string())),
        Ok(_) => Ok(Json(json!({ "message": "Customer updated successfully" }))),
        Err(e) if db::is_unique_violation(&e) => Err(duplicate_contact()),
        Err(e) => Err(e.into()),
    }
}

// DELETE /api/customers/:id
pub async fn delete_customer(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(id) = id?;
    let deleted = state
        .db
        .with_conn(|conn| queries::delete_customer(conn, id))?;
    if deleted == 0 {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(Json(json!({ "message": "Customer deleted successfully" })))
}
