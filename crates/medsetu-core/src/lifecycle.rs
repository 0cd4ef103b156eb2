//! The order lifecycle: creation with store assignment, then status
//! transitions.
//!
//! Transitions are unguarded. Any status may follow any other, and every
//! transition overwrites the current status regardless of its value.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  assignment::assign_store,
  order::{NewOrder, Order, OrderStatus},
  prescription::{NewPrescription, Prescription},
  repo::Repository,
};

// ─── Policy ──────────────────────────────────────────────────────────────────

/// Which statuses [`OrderLifecycle::set_status`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusPolicy {
  /// Any string is stored verbatim.
  #[default]
  Open,
  /// Only the named [`OrderStatus`] variants are accepted.
  Closed,
}

impl StatusPolicy {
  fn admits(self, status: &OrderStatus) -> bool {
    match self {
      Self::Open => true,
      Self::Closed => status.is_known(),
    }
  }
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// Owns every write to `Order.status`.
///
/// Cloning is cheap; the repository is reference-counted.
pub struct OrderLifecycle<R> {
  repo:   Arc<R>,
  policy: StatusPolicy,
}

impl<R> Clone for OrderLifecycle<R> {
  fn clone(&self) -> Self {
    Self { repo: Arc::clone(&self.repo), policy: self.policy }
  }
}

impl<R: Repository> OrderLifecycle<R> {
  pub fn new(repo: Arc<R>, policy: StatusPolicy) -> Self {
    Self { repo, policy }
  }

  pub fn policy(&self) -> StatusPolicy { self.policy }

  // ── Creation ──────────────────────────────────────────────────────────

  /// Place an order for `customer_id`, assigned to the preferred approved
  /// store in `pincode`.
  ///
  /// Store selection is a point-in-time read with no reservation; persisting
  /// the order is the last step, so a failure leaves nothing behind.
  pub async fn create_order(
    &self,
    customer_id: Uuid,
    pincode: &str,
  ) -> Result<Order> {
    self
      .repo
      .get_user(customer_id)
      .await
      .map_err(Error::backend)?
      .ok_or(Error::CustomerNotFound(customer_id))?;

    let candidates = self
      .repo
      .list_approved_stores(pincode)
      .await
      .map_err(Error::backend)?;
    tracing::debug!(pincode, candidates = candidates.len(), "store candidates");

    let Some(store) = assign_store(&candidates) else {
      tracing::warn!(pincode, %customer_id, "no store available");
      return Err(Error::NoStoreAvailable(pincode.to_owned()));
    };

    let order = self
      .repo
      .add_order(NewOrder { customer_id, store_id: store.store_id })
      .await
      .map_err(Error::backend)?;

    tracing::info!(
      order_id = %order.order_id,
      store_id = %store.store_id,
      priority = store.priority,
      "order assigned"
    );
    Ok(order)
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  pub async fn get_order(&self, order_id: Uuid) -> Result<Order> {
    self
      .repo
      .get_order(order_id)
      .await
      .map_err(Error::backend)?
      .ok_or(Error::OrderNotFound(order_id))
  }

  pub async fn orders_for_store(&self, store_id: Uuid) -> Result<Vec<Order>> {
    self
      .repo
      .list_orders_for_store(store_id)
      .await
      .map_err(Error::backend)
  }

  // ── Transitions ───────────────────────────────────────────────────────

  pub async fn approve(&self, order_id: Uuid) -> Result<Order> {
    self.transition(order_id, OrderStatus::Approved).await
  }

  pub async fn reject(&self, order_id: Uuid) -> Result<Order> {
    self.transition(order_id, OrderStatus::Rejected).await
  }

  /// Overwrite the status with a caller-supplied value.
  ///
  /// Under [`StatusPolicy::Closed`], free-text statuses are refused with
  /// [`Error::UnknownStatus`] before anything is read or written.
  pub async fn set_status(
    &self,
    order_id: Uuid,
    status: OrderStatus,
  ) -> Result<Order> {
    if !self.policy.admits(&status) {
      return Err(Error::UnknownStatus(status.into()));
    }
    self.transition(order_id, status).await
  }

  async fn transition(&self, order_id: Uuid, status: OrderStatus) -> Result<Order> {
    let label = status.to_string();
    let order = self
      .repo
      .update_order_status(order_id, status)
      .await
      .map_err(Error::backend)?
      .ok_or(Error::OrderNotFound(order_id))?;

    tracing::info!(%order_id, status = %label, "order status updated");
    Ok(order)
  }

  // ── Prescriptions ─────────────────────────────────────────────────────

  /// Attach an uploaded prescription to an order. One per order.
  pub async fn attach_prescription(
    &self,
    order_id: Uuid,
    file_url: String,
  ) -> Result<Prescription> {
    self.get_order(order_id).await?;

    let existing = self
      .repo
      .get_prescription_for_order(order_id)
      .await
      .map_err(Error::backend)?;
    if existing.is_some() {
      return Err(Error::PrescriptionExists(order_id));
    }

    self
      .repo
      .add_prescription(NewPrescription { order_id, file_url })
      .await
      .map_err(|e| Error::backend_or(e, Error::PrescriptionExists(order_id)))
  }

  pub async fn prescription_for_order(&self, order_id: Uuid) -> Result<Prescription> {
    self.get_order(order_id).await?;
    self
      .repo
      .get_prescription_for_order(order_id)
      .await
      .map_err(Error::backend)?
      .ok_or(Error::PrescriptionNotFound(order_id))
  }

  pub async fn verify_prescription(&self, prescription_id: Uuid) -> Result<Prescription> {
    let prescription = self
      .repo
      .set_prescription_verified(prescription_id, true)
      .await
      .map_err(Error::backend)?
      .ok_or(Error::PrescriptionNotFound(prescription_id))?;

    tracing::info!(%prescription_id, order_id = %prescription.order_id, "prescription verified");
    Ok(prescription)
  }
}
