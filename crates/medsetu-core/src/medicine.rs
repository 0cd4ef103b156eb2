use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A medicine listed in one store's catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medicine {
  pub medicine_id:           Uuid,
  pub store_id:              Uuid,
  pub name:                  String,
  pub price:                 f64,
  pub requires_prescription: bool,
  pub created_at:            DateTime<Utc>,
}

/// Input to [`crate::repo::Repository::add_medicine`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewMedicine {
  pub store_id:              Uuid,
  pub name:                  String,
  pub price:                 f64,
  #[serde(default)]
  pub requires_prescription: bool,
}
