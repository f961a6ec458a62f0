use crate::config::AppConfig;
use crate::db::Database;
use crate::services::payment::PaymentGateway;

pub struct AppState {
    pub db: Database,
    pub config: AppConfig,
    pub gateway: Box<dyn PaymentGateway>,
}
