//! Order is a customer's request bound to exactly one store.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Status ──────────────────────────────────────────────────────────────────

/// The status of an order.
///
/// The named variants are the statuses the marketplace itself uses. Any other
/// string a store sets is kept verbatim in [`OrderStatus::Other`], so every
/// value serialises back to exactly the string it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
  Created,
  Approved,
  Rejected,
  Packing,
  Ready,
  Delivered,
  Cancelled,
  Other(String),
}

impl OrderStatus {
  pub fn as_str(&self) -> &str {
    match self {
      Self::Created => "CREATED",
      Self::Approved => "APPROVED",
      Self::Rejected => "REJECTED",
      Self::Packing => "PACKING",
      Self::Ready => "READY",
      Self::Delivered => "DELIVERED",
      Self::Cancelled => "CANCELLED",
      Self::Other(s) => s,
    }
  }

  /// `false` only for free-text statuses outside the named set.
  pub fn is_known(&self) -> bool { !matches!(self, Self::Other(_)) }
}

impl From<String> for OrderStatus {
  fn from(s: String) -> Self {
    match s.as_str() {
      "CREATED" => Self::Created,
      "APPROVED" => Self::Approved,
      "REJECTED" => Self::Rejected,
      "PACKING" => Self::Packing,
      "READY" => Self::Ready,
      "DELIVERED" => Self::Delivered,
      "CANCELLED" => Self::Cancelled,
      _ => Self::Other(s),
    }
  }
}

impl From<&str> for OrderStatus {
  fn from(s: &str) -> Self { Self::from(s.to_owned()) }
}

impl From<OrderStatus> for String {
  fn from(status: OrderStatus) -> Self {
    match status {
      OrderStatus::Other(s) => s,
      known => known.as_str().to_owned(),
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Order ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
  pub order_id:    Uuid,
  pub customer_id: Uuid,
  /// The store chosen at creation time. Never reassigned.
  pub store_id:    Uuid,
  pub status:      OrderStatus,
  pub created_at:  DateTime<Utc>,
  /// Refreshed by every status transition.
  pub updated_at:  DateTime<Utc>,
}

/// Input to [`crate::repo::Repository::add_order`]. The backend persists the
/// order with [`OrderStatus::Created`].
#[derive(Debug, Clone)]
pub struct NewOrder {
  pub customer_id: Uuid,
  pub store_id:    Uuid,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn named_statuses_parse_exactly() {
    assert_eq!(OrderStatus::from("APPROVED"), OrderStatus::Approved);
    assert_eq!(
      OrderStatus::from("approved"),
      OrderStatus::Other("approved".into())
    );
  }

  #[test]
  fn free_text_status_is_kept_verbatim() {
    let status = OrderStatus::from("SHIPPED");
    assert!(!status.is_known());
    assert_eq!(status.as_str(), "SHIPPED");
    assert_eq!(String::from(status), "SHIPPED");
  }

  #[test]
  fn status_serialises_as_plain_string() {
    let json = serde_json::to_string(&OrderStatus::Created).unwrap();
    assert_eq!(json, "\"CREATED\"");

    let parsed: OrderStatus = serde_json::from_str("\"OUT_FOR_DELIVERY\"").unwrap();
    assert_eq!(parsed, OrderStatus::Other("OUT_FOR_DELIVERY".into()));
  }
}
