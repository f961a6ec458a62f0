use axum::Json;
use serde_json::{json, Value};

pub async fn root() -> &'static str {
    "Home Service API is running"
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
