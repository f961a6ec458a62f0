use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use super::require_patch;
use crate::db::queries::{self, BookingInsert};
use crate::db;
use crate::errors::AppError;
use crate::models::{non_blank, Booking, BookingPatch, NewBooking};
use crate::state::AppState;

const NOT_FOUND: &str = "Booking not found";

// GET /api/bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = state.db.with_conn(queries::list_bookings)?;
    Ok(Json(bookings))
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Booking>, AppError> {
    let Path(id) = id?;
    state
        .db
        .with_conn(|conn| queries::get_booking(conn, id))?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewBooking>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(body) = payload?;
    let (Some(customer_id), Some(date), Some(time), Some(service), Some(address)) = (
        body.customer_id,
        non_blank(body.date),
        non_blank(body.time),
        non_blank(body.service),
        non_blank(body.address),
    ) else {
        return Err(AppError::BadRequest(
            "All fields (customerId, date, time, service, address) are required".to_string(),
        ));
    };

    let insert = BookingInsert {
        customer_id,
        service_date: &date,
        time: &time,
        service: &service,
        address: &address,
    };

    match state.db.with_conn(|conn| queries::insert_booking(conn, &insert)) {
        Ok(id) => {
            tracing::info!(booking_id = id, customer_id, "booking created");
            Ok((
                StatusCode::CREATED,
                Json(json!({ "message": "Booking created successfully", "bookingId": id })),
            ))
        }
        Err(e) if db::is_foreign_key_violation(&e) => {
            Err(AppError::NotFound("Customer not found".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

// PUT /api/bookings/:id
pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<BookingPatch>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    let patch = patch.normalized();
    require_patch(patch.is_empty(), "Booking")?;

    let updated = state
        .db
        .with_conn(|conn| queries::update_booking(conn, id, &patch))?;
    if updated == 0 {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(Json(json!({ "message": "Booking updated successfully" })))
}

// DELETE /api/bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(id) = id?;
    let deleted = state
        .db
        .with_conn(|conn| queries::delete_booking(conn, id))?;
    if deleted == 0 {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(Json(json!({ "message": "Booking deleted successfully" })))
}
