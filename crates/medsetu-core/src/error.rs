//! Error types for `medsetu-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::repo::RepoError;

#[derive(Debug, Error)]
pub enum Error {
  #[error("customer not found: {0}")]
  CustomerNotFound(Uuid),

  #[error("order not found: {0}")]
  OrderNotFound(Uuid),

  #[error("store not found: {0}")]
  StoreNotFound(Uuid),

  #[error("prescription not found: {0}")]
  PrescriptionNotFound(Uuid),

  #[error("no store available for pincode {0:?}")]
  NoStoreAvailable(String),

  #[error("phone number already registered: {0}")]
  PhoneTaken(String),

  #[error("store {0} still has orders")]
  StoreHasOrders(Uuid),

  #[error("order {0} already has a prescription")]
  PrescriptionExists(Uuid),

  #[error("unknown order status: {0:?}")]
  UnknownStatus(String),

  /// The persistence backend failed; the source is the backend's own error.
  #[error("backend error: {0}")]
  Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error.
  pub fn backend<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Backend(Box::new(e))
  }

  /// Wrap a backend error, reporting `duplicate` instead when the backend
  /// refused the write as a unique-key violation.
  pub fn backend_or<E: RepoError>(e: E, duplicate: Error) -> Self {
    if e.is_unique_violation() { duplicate } else { Self::backend(e) }
  }

  /// `true` for every variant meaning "the referenced entity does not exist".
  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::CustomerNotFound(_)
        | Self::OrderNotFound(_)
        | Self::StoreNotFound(_)
        | Self::PrescriptionNotFound(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
