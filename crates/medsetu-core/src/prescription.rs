use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An uploaded prescription; at most one per order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
  pub prescription_id: Uuid,
  pub order_id:        Uuid,
  /// Location of the uploaded file. The file itself lives outside the
  /// database.
  pub file_url:        String,
  pub verified:        bool,
  pub created_at:      DateTime<Utc>,
}

/// Input to [`crate::repo::Repository::add_prescription`].
#[derive(Debug, Clone)]
pub struct NewPrescription {
  pub order_id: Uuid,
  pub file_url: String,
}
