//! Payment order creation and callback reconciliation.
//!
//! The two phases share no in-process state: the transaction row written at
//! order creation is what the callback later updates.

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{
    non_blank, CreateOrderRequest, OrderCreated, Transaction, TransactionStatusUpdate,
    PENDING_STATUS, UNKNOWN_PAYMENT_METHOD,
};
use crate::services::payment::{self, PaymentOrder};
use crate::state::AppState;

/// Creates a gateway order and records it as `PENDING`.
///
/// Validation and the booking lookup happen before the gateway is called; the
/// row is written only after the gateway accepts the order.
pub async fn create_order(
    state: &AppState,
    req: CreateOrderRequest,
) -> Result<OrderCreated, AppError> {
    let amount = req.amount.filter(|a| *a > 0.0);
    let mobile = non_blank(req.mobile);
    let (Some(amount), Some(mobile)) = (amount, mobile) else {
        return Err(AppError::BadRequest(
            "Amount and mobile number are required".to_string(),
        ));
    };
    let amount_minor = payment::amount_in_paise(amount).ok_or_else(|| {
        AppError::BadRequest("Amount must be at least 0.01".to_string())
    })?;

    if let Some(booking_id) = req.booking_id {
        let exists = state
            .db
            .with_conn(|conn| queries::booking_exists(conn, booking_id))?;
        if !exists {
            return Err(AppError::NotFound("Booking not found".to_string()));
        }
    }

    let stamp = payment::next_order_stamp();
    let order_id = payment::order_id(stamp);
    let order = PaymentOrder {
        merchant_transaction_id: order_id.clone(),
        merchant_user_id: payment::merchant_user_id(stamp),
        amount_minor,
        mobile_number: mobile.clone(),
        redirect_url: format!(
            "{}/?id={order_id}",
            state.config.callback_url.trim_end_matches('/')
        ),
    };

    let initiation = state
        .gateway
        .initiate_payment(&order)
        .await
        .map_err(AppError::Gateway)?;

    if !initiation.success {
        return Err(AppError::PaymentDeclined(format!(
            "{}: {}",
            initiation.code, initiation.message
        )));
    }

    let payment_url = initiation.redirect_url.ok_or_else(|| {
        AppError::Gateway(anyhow::anyhow!(
            "pay response for {order_id} has no redirect url"
        ))
    })?;

    tracing::info!(order_id = %order_id, payment_url = %payment_url, "payment order created");

    let now = queries::now_timestamp();
    let tx = Transaction {
        order_id: order_id.clone(),
        booking_id: req.booking_id,
        transaction_id: initiation.transaction_id.clone(),
        amount,
        user_mobile: mobile,
        status: PENDING_STATUS.to_string(),
        payment_method: None,
        reference_id: None,
        error_message: None,
        created_at: now,
        updated_at: now,
    };
    state
        .db
        .with_conn(|conn| queries::insert_transaction(conn, &tx))?;

    Ok(OrderCreated {
        success: true,
        order_id,
        transaction_id: initiation.transaction_id,
        payment_url,
    })
}

/// Queries the gateway for the final state of `order_id` and stores it.
///
/// The inbound id is trusted as-is. A callback for an order with no stored
/// row is reported as not found.
pub async fn reconcile_callback(state: &AppState, order_id: &str) -> Result<(), AppError> {
    tracing::info!(order_id = %order_id, "processing payment callback");

    let status = state
        .gateway
        .payment_status(order_id)
        .await
        .map_err(AppError::Gateway)?;

    if let Some(reported) = status.merchant_transaction_id.as_deref() {
        if reported != order_id {
            tracing::warn!(order_id = %order_id, reported = %reported, "gateway reported a different merchant transaction id");
        }
    }

    let Some(gateway_state) = status.state else {
        return Err(AppError::Gateway(anyhow::anyhow!(
            "status response for {order_id} has no state ({}: {})",
            status.code,
            status.message
        )));
    };

    let update = TransactionStatusUpdate {
        order_id: order_id.to_string(),
        status: gateway_state,
        transaction_id: status.transaction_id,
        payment_method: status
            .payment_method
            .unwrap_or_else(|| UNKNOWN_PAYMENT_METHOD.to_string()),
        reference_id: status.reference_id,
        message: non_blank(Some(status.message)),
    };

    let affected = state
        .db
        .with_conn(|conn| queries::update_transaction_status(conn, &update))?;

    if affected == 0 {
        tracing::warn!(order_id = %order_id, "callback for unknown transaction");
        return Err(AppError::NotFound("Transaction not found".to_string()));
    }

    tracing::info!(order_id = %order_id, status = %update.status, success = status.success, "transaction updated");
    Ok(())
}
