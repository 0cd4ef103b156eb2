//! Store is a pharmacy that fulfils orders within a single pincode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use uuid::Uuid;

/// Approval state of a store. Only `Approved` stores receive orders.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum StoreStatus {
  Pending,
  Approved,
  Rejected,
  Suspended,
}

/// A pharmacy registered on the marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
  pub store_id:       Uuid,
  pub name:           String,
  pub license_number: String,
  pub address:        String,
  /// Postal code; matched by exact string equality, never normalised.
  pub pincode:        String,
  /// Admin-assigned rank among stores sharing a pincode. Lower is preferred.
  pub priority:       i32,
  pub status:         StoreStatus,
  pub created_at:     DateTime<Utc>,
}

impl Store {
  pub fn is_approved(&self) -> bool { self.status == StoreStatus::Approved }
}

/// Input to [`crate::repo::Repository::add_store`]. New stores always start
/// out [`StoreStatus::Pending`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewStore {
  pub name:           String,
  pub license_number: String,
  pub address:        String,
  pub pincode:        String,
  pub priority:       i32,
}
