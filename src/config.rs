use std::env;

pub const DEFAULT_PHONEPE_BASE_URL: &str = "https://api-preprod.phonepe.com/apis/pg-sandbox";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub phonepe_base_url: String,
    pub phonepe_merchant_id: String,
    pub phonepe_salt_key: String,
    pub phonepe_salt_index: String,
    pub callback_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5000);

        Self {
            port,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "home_service.db".to_string()),
            phonepe_base_url: env::var("PHONEPE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_PHONEPE_BASE_URL.to_string()),
            phonepe_merchant_id: env::var("PHONEPE_MERCHANT_ID").unwrap_or_default(),
            phonepe_salt_key: env::var("PHONEPE_SALT_KEY").unwrap_or_default(),
            phonepe_salt_index: env::var("PHONEPE_SALT_INDEX").unwrap_or_else(|_| "1".to_string()),
            callback_url: env::var("PHONEPE_CALLBACK_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}/api/pg/callback")),
        }
    }

    /// True when the merchant credentials needed to sign gateway requests are set.
    pub fn has_gateway_credentials(&self) -> bool {
        !self.phonepe_merchant_id.is_empty() && !self.phonepe_salt_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_credentials_required() {
        let mut config = AppConfig {
            port: 5000,
            database_url: ":memory:".to_string(),
            phonepe_base_url: DEFAULT_PHONEPE_BASE_URL.to_string(),
            phonepe_merchant_id: String::new(),
            phonepe_salt_key: "salt".to_string(),
            phonepe_salt_index: "1".to_string(),
            callback_url: "http://localhost:5000/api/pg/callback".to_string(),
        };
        assert!(!config.has_gateway_credentials());

        config.phonepe_merchant_id = "PGTESTPAYUAT".to_string();
        assert!(config.has_gateway_credentials());
    }
}
