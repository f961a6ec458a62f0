use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const PENDING_STATUS: &str = "PENDING";
pub const UNKNOWN_PAYMENT_METHOD: &str = "UNKNOWN";

/// One payment attempt, from order creation to the gateway-reported outcome.
/// Serialized with its column names, like the other table rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub order_id: String,
    pub booking_id: Option<i64>,
    pub transaction_id: Option<String>,
    pub amount: f64,
    pub user_mobile: String,
    pub status: String,
    pub payment_method: Option<String>,
    pub reference_id: Option<String>,
    pub error_message: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Outcome of a gateway status query, written onto the row keyed by `order_id`.
#[derive(Debug, Clone)]
pub struct TransactionStatusUpdate {
    pub order_id: String,
    pub status: String,
    pub transaction_id: Option<String>,
    pub payment_method: String,
    pub reference_id: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub amount: Option<f64>,
    pub mobile: Option<String>,
    pub booking_id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub success: bool,
    pub order_id: String,
    pub transaction_id: Option<String>,
    pub payment_url: String,
}
