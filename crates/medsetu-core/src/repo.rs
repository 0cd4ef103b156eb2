//! The persistence traits and the store-directory query.
//!
//! The traits are implemented by storage backends (e.g. `medsetu-sqlite`).
//! Higher layers (`medsetu-api`, the services in this crate) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  medicine::{Medicine, NewMedicine},
  order::{NewOrder, Order, OrderStatus},
  prescription::{NewPrescription, Prescription},
  store::{NewStore, Store, StoreStatus},
  user::{NewUser, User},
};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Error type of a persistence backend.
pub trait RepoError: std::error::Error + Send + Sync + 'static {
  /// `true` when a write was refused because it would duplicate a unique
  /// key (a user's phone, an order's prescription).
  fn is_unique_violation(&self) -> bool;
}

// ─── Directory ───────────────────────────────────────────────────────────────

/// The read-only store query consumed by order assignment.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait StoreDirectory: Send + Sync {
  type Error: RepoError;

  /// Stores with status `Approved` whose pincode equals `pincode` exactly,
  /// sorted by priority ascending. Ties keep insertion order.
  fn list_approved_stores<'a>(
    &'a self,
    pincode: &'a str,
  ) -> impl Future<Output = Result<Vec<Store>, Self::Error>> + Send + 'a;

  /// Retrieve a store by UUID. Returns `None` if not found.
  fn get_store(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Store>, Self::Error>> + Send + '_;
}

// ─── Repository ──────────────────────────────────────────────────────────────

/// Abstraction over a MedSetu persistence backend.
///
/// Status updates are single atomic writes that return `None` (and write
/// nothing) when the target row does not exist.
pub trait Repository: StoreDirectory {
  // ── Stores ────────────────────────────────────────────────────────────

  /// Persist a new store with status `Pending`.
  fn add_store(
    &self,
    input: NewStore,
  ) -> impl Future<Output = Result<Store, Self::Error>> + Send + '_;

  /// List all stores, optionally filtered by status, in insertion order.
  fn list_stores(
    &self,
    status: Option<StoreStatus>,
  ) -> impl Future<Output = Result<Vec<Store>, Self::Error>> + Send + '_;

  /// Persist a new `Pending` store and its login user atomically. The
  /// login's `store_id` is set to the new store. If either write fails,
  /// neither row is kept.
  fn register_store(
    &self,
    store: NewStore,
    login: NewUser,
  ) -> impl Future<Output = Result<(Store, User), Self::Error>> + Send + '_;

  fn update_store_status(
    &self,
    id: Uuid,
    status: StoreStatus,
  ) -> impl Future<Output = Result<Option<Store>, Self::Error>> + Send + '_;

  /// Delete a store and its medicines. Returns `false` if it did not exist.
  fn delete_store(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Fails with a unique violation if the phone is already registered.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn find_user_by_phone<'a>(
    &'a self,
    phone: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  // ── Catalog ───────────────────────────────────────────────────────────

  fn add_medicine(
    &self,
    input: NewMedicine,
  ) -> impl Future<Output = Result<Medicine, Self::Error>> + Send + '_;

  /// Case-insensitive substring match on medicine names. An empty query
  /// matches everything. Case folding may be ASCII-only, depending on the
  /// backend.
  fn search_medicines<'a>(
    &'a self,
    query: &'a str,
  ) -> impl Future<Output = Result<Vec<Medicine>, Self::Error>> + Send + 'a;

  // ── Orders ────────────────────────────────────────────────────────────

  /// Persist a new order with status `Created`.
  fn add_order(
    &self,
    input: NewOrder,
  ) -> impl Future<Output = Result<Order, Self::Error>> + Send + '_;

  fn get_order(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Order>, Self::Error>> + Send + '_;

  /// Overwrite the status of an order and refresh `updated_at`.
  fn update_order_status(
    &self,
    id: Uuid,
    status: OrderStatus,
  ) -> impl Future<Output = Result<Option<Order>, Self::Error>> + Send + '_;

  /// Orders assigned to `store_id`, oldest first. Empty for unknown stores.
  fn list_orders_for_store(
    &self,
    store_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Order>, Self::Error>> + Send + '_;

  // ── Prescriptions ─────────────────────────────────────────────────────

  /// Fails with a unique violation if the order already has one.
  fn add_prescription(
    &self,
    input: NewPrescription,
  ) -> impl Future<Output = Result<Prescription, Self::Error>> + Send + '_;

  fn get_prescription_for_order(
    &self,
    order_id: Uuid,
  ) -> impl Future<Output = Result<Option<Prescription>, Self::Error>> + Send + '_;

  fn set_prescription_verified(
    &self,
    id: Uuid,
    verified: bool,
  ) -> impl Future<Output = Result<Option<Prescription>, Self::Error>> + Send + '_;
}
