use anyhow::Context;
use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;

use super::checksum::checksum;
use super::{PaymentGateway, PaymentInitiation, PaymentOrder, PaymentStatus};

const PAY_ENDPOINT: &str = "/pg/v1/pay";

pub struct PhonePeGateway {
    base_url: String,
    merchant_id: String,
    salt_key: String,
    salt_index: String,
    client: reqwest::Client,
}

impl PhonePeGateway {
    pub fn new(base_url: String, merchant_id: String, salt_key: String, salt_index: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            merchant_id,
            salt_key,
            salt_index,
            client: reqwest::Client::new(),
        }
    }

    fn sign(&self, payload: &str, endpoint: &str) -> String {
        checksum(payload, endpoint, &self.salt_key, &self.salt_index)
    }

    /// Base64 of the JSON pay payload, as carried in the `request` field.
    fn encode_pay_request(&self, order: &PaymentOrder) -> anyhow::Result<String> {
        let payload = json!({
            "merchantId": self.merchant_id,
            "merchantTransactionId": order.merchant_transaction_id,
            "merchantUserId": order.merchant_user_id,
            "amount": order.amount_minor,
            "redirectMode": "POST",
            "redirectUrl": order.redirect_url,
            "mobileNumber": order.mobile_number,
            "paymentInstrument": { "type": "PAY_PAGE" },
        });
        let raw = serde_json::to_vec(&payload).context("failed to serialize pay request")?;
        Ok(base64::engine::general_purpose::STANDARD.encode(raw))
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayData {
    transaction_id: Option<String>,
    instrument_response: Option<InstrumentResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstrumentResponse {
    redirect_info: Option<RedirectInfo>,
}

#[derive(Debug, Deserialize)]
struct RedirectInfo {
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusData {
    merchant_transaction_id: Option<String>,
    transaction_id: Option<String>,
    state: Option<String>,
    auth_ref_id: Option<String>,
    payment_instrument: Option<StatusInstrument>,
}

#[derive(Debug, Deserialize)]
struct StatusInstrument {
    #[serde(rename = "type")]
    kind: Option<String>,
    utr: Option<String>,
}

#[async_trait]
impl PaymentGateway for PhonePeGateway {
    async fn initiate_payment(&self, order: &PaymentOrder) -> anyhow::Result<PaymentInitiation> {
        let encoded = self.encode_pay_request(order)?;
        let x_verify = self.sign(&encoded, PAY_ENDPOINT);

        let resp = self
            .client
            .post(format!("{}{PAY_ENDPOINT}", self.base_url))
            .header("X-VERIFY", x_verify)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&json!({ "request": encoded }))
            .send()
            .await
            .context("failed to call PhonePe pay API")?;

        let status = resp.status();
        // Declined orders come back as non-2xx with a JSON envelope, so the
        // body is parsed either way.
        let envelope: Envelope<PayData> = resp
            .json()
            .await
            .with_context(|| format!("failed to parse PhonePe pay response ({status})"))?;

        let (transaction_id, redirect_url) = match envelope.data {
            Some(data) => (
                data.transaction_id,
                data.instrument_response
                    .and_then(|r| r.redirect_info)
                    .map(|r| r.url),
            ),
            None => (None, None),
        };

        Ok(PaymentInitiation {
            success: envelope.success,
            code: envelope.code,
            message: envelope.message,
            transaction_id,
            redirect_url,
        })
    }

    async fn payment_status(&self, merchant_transaction_id: &str) -> anyhow::Result<PaymentStatus> {
        let endpoint = format!(
            "/pg/v1/status/{}/{}",
            self.merchant_id, merchant_transaction_id
        );
        let x_verify = self.sign("", &endpoint);

        let resp = self
            .client
            .get(format!("{}{endpoint}", self.base_url))
            .header("X-VERIFY", x_verify)
            .header("X-MERCHANT-ID", &self.merchant_id)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .context("failed to call PhonePe status API")?;

        let status = resp.status();
        let envelope: Envelope<StatusData> = resp
            .json()
            .await
            .with_context(|| format!("failed to parse PhonePe status response ({status})"))?;

        let data = envelope.data.ok_or_else(|| {
            anyhow::anyhow!(
                "PhonePe status response has no data ({status}, {}: {})",
                envelope.code,
                envelope.message
            )
        })?;

        let (payment_method, utr) = match data.payment_instrument {
            Some(instrument) => (instrument.kind, instrument.utr),
            None => (None, None),
        };

        Ok(PaymentStatus {
            success: envelope.success,
            code: envelope.code,
            message: envelope.message,
            merchant_transaction_id: data.merchant_transaction_id,
            transaction_id: data.transaction_id,
            state: data.state,
            payment_method,
            reference_id: data.auth_ref_id.or(utr),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> PhonePeGateway {
        PhonePeGateway::new(
            "https://example.test/pg-sandbox/".to_string(),
            "PGTESTPAYUAT".to_string(),
            "salt".to_string(),
            "1".to_string(),
        )
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(gateway().base_url, "https://example.test/pg-sandbox");
    }

    #[test]
    fn test_pay_request_round_trips_through_base64() {
        let order = PaymentOrder {
            merchant_transaction_id: "ORD1".to_string(),
            merchant_user_id: "muid1".to_string(),
            amount_minor: 49_900,
            mobile_number: "9876500001".to_string(),
            redirect_url: "http://localhost:5000/api/pg/callback/?id=ORD1".to_string(),
        };
        let encoded = gateway().encode_pay_request(&order).unwrap();
        let raw = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&raw).unwrap();

        assert_eq!(payload["merchantId"], "PGTESTPAYUAT");
        assert_eq!(payload["amount"], 49_900);
        assert_eq!(payload["redirectMode"], "POST");
        assert_eq!(payload["paymentInstrument"]["type"], "PAY_PAGE");
    }

    #[test]
    fn test_status_envelope_parses() {
        let body = r#"{
            "success": false,
            "code": "PAYMENT_ERROR",
            "message": "Payment Failed",
            "data": {
                "merchantId": "PGTESTPAYUAT",
                "merchantTransactionId": "ORD1",
                "transactionId": "T2306",
                "amount": 49900,
                "state": "FAILED",
                "paymentInstrument": { "type": "UPI", "utr": "UTR77" }
            }
        }"#;
        let envelope: Envelope<StatusData> = serde_json::from_str(body).unwrap();
        assert!(!envelope.success);
        let data = envelope.data.unwrap();
        assert_eq!(data.state.as_deref(), Some("FAILED"));
        assert_eq!(data.payment_instrument.unwrap().utr.as_deref(), Some("UTR77"));
    }
}
