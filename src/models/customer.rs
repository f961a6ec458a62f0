use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::non_blank;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub contact_no: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: Option<String>,
    pub contact_no: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub contact_no: Option<String>,
}

impl CustomerPatch {
    /// Drops blank values so they leave the stored column untouched.
    pub fn normalized(self) -> Self {
        Self {
            name: non_blank(self.name),
            contact_no: non_blank(self.contact_no),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.contact_no.is_none()
    }
}
