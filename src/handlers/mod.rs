pub mod bookings;
pub mod catalog;
pub mod customers;
pub mod dashboard;
pub mod health;
pub mod payments;

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::non_blank;

/// `?q=` or `?query=` search term.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(alias = "query")]
    pub q: Option<String>,
}

impl SearchQuery {
    pub fn term(self) -> Result<String, AppError> {
        non_blank(self.q).ok_or_else(|| AppError::BadRequest("Search query is required".to_string()))
    }
}

fn require_patch(empty: bool, entity: &str) -> Result<(), AppError> {
    if empty {
        return Err(AppError::BadRequest(format!(
            "{entity} ID and at least one field to update are required"
        )));
    }
    Ok(())
}
