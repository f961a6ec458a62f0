pub mod checksum;
pub mod phonepe;

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;

/// A pay-page order as sent to the gateway.
#[derive(Debug, Clone)]
pub struct PaymentOrder {
    pub merchant_transaction_id: String,
    pub merchant_user_id: String,
    /// Amount in the smallest currency unit (paise).
    pub amount_minor: i64,
    pub mobile_number: String,
    pub redirect_url: String,
}

/// Gateway answer to a pay request.
#[derive(Debug, Clone, Default)]
pub struct PaymentInitiation {
    pub success: bool,
    pub code: String,
    pub message: String,
    pub transaction_id: Option<String>,
    pub redirect_url: Option<String>,
}

/// Gateway answer to a status query.
#[derive(Debug, Clone, Default)]
pub struct PaymentStatus {
    pub success: bool,
    pub code: String,
    pub message: String,
    pub merchant_transaction_id: Option<String>,
    pub transaction_id: Option<String>,
    pub state: Option<String>,
    pub payment_method: Option<String>,
    pub reference_id: Option<String>,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn initiate_payment(&self, order: &PaymentOrder) -> anyhow::Result<PaymentInitiation>;

    async fn payment_status(&self, merchant_transaction_id: &str) -> anyhow::Result<PaymentStatus>;
}

static LAST_ORDER_STAMP: AtomicI64 = AtomicI64::new(0);

/// Millisecond timestamp that never repeats within this process: two calls in
/// the same millisecond get consecutive values.
pub fn next_order_stamp() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_ORDER_STAMP.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_ORDER_STAMP.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(current) => last = current,
        }
    }
}

/// Converts a rupee amount to whole paise. `None` when the result is less
/// than one paisa or does not fit in an `i64`.
pub fn amount_in_paise(amount: f64) -> Option<i64> {
    let paise = (amount * 100.0).round();
    (paise.is_finite() && paise >= 1.0 && paise < i64::MAX as f64).then_some(paise as i64)
}

pub fn order_id(stamp: i64) -> String {
    format!("ORD{stamp}")
}

pub fn merchant_user_id(stamp: i64) -> String {
    format!("muid{stamp}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_stamps_strictly_increase() {
        let stamps: Vec<i64> = (0..1000).map(|_| next_order_stamp()).collect();
        assert!(stamps.windows(2).all(|w| w[1] > w[0]));
        assert!(stamps[0] >= Utc::now().timestamp_millis() - 60_000);
    }

    #[test]
    fn test_amount_in_paise() {
        assert_eq!(amount_in_paise(499.0), Some(49900));
        assert_eq!(amount_in_paise(0.01), Some(1));
        assert_eq!(amount_in_paise(19.999), Some(2000));

        assert_eq!(amount_in_paise(0.001), None);
        assert_eq!(amount_in_paise(0.0), None);
        assert_eq!(amount_in_paise(-5.0), None);
        assert_eq!(amount_in_paise(1e300), None);
        assert_eq!(amount_in_paise(f64::NAN), None);
        assert_eq!(amount_in_paise(f64::INFINITY), None);
    }

    #[test]
    fn test_identifiers_share_stamp() {
        assert_eq!(order_id(1700000000000), "ORD1700000000000");
        assert_eq!(merchant_user_id(1700000000000), "muid1700000000000");
    }
}
