use serde::{Deserialize, Serialize};

use super::non_blank;

/// An offering in the service catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub availability: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewService {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub availability: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServicePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub availability: Option<bool>,
}

impl ServicePatch {
    pub fn normalized(self) -> Self {
        Self {
            name: non_blank(self.name),
            description: non_blank(self.description),
            ..self
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.availability.is_none()
    }
}
