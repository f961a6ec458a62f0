use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::non_blank;

pub const DEFAULT_BOOKING_STATUS: &str = "active";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub customer_id: i64,
    pub service_date: String,
    pub time: String,
    pub service: String,
    pub address: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub customer_id: Option<i64>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub service: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPatch {
    pub service_date: Option<String>,
    pub time: Option<String>,
    pub service: Option<String>,
    pub status: Option<String>,
}

impl BookingPatch {
    pub fn normalized(self) -> Self {
        Self {
            service_date: non_blank(self.service_date),
            time: non_blank(self.time),
            service: non_blank(self.service),
            status: non_blank(self.status),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.service_date.is_none()
            && self.time.is_none()
            && self.service.is_none()
            && self.status.is_none()
    }
}
