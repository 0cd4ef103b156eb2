//! Store administration: registration, approval and removal.
//!
//! Status changes are unconditional overwrites, like order transitions. A
//! suspended store can be approved again; a rejected one can be suspended.

use serde::Deserialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  accounts::ensure_phone_free,
  repo::{Repository, StoreDirectory},
  store::{NewStore, Store, StoreStatus},
  user::{NewUser, Role},
};

/// Everything needed to register a store and its login.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRegistration {
  pub name:           String,
  pub license_number: String,
  pub address:        String,
  pub pincode:        String,
  pub priority:       i32,
  /// Phone number for the store's login user.
  pub phone:          String,
}

/// Register a store in `Pending` status together with a `Store`-role login
/// user linked to it.
pub async fn register_store<R: Repository>(
  repo: &R,
  reg: StoreRegistration,
) -> Result<Store> {
  ensure_phone_free(repo, &reg.phone).await?;

  let phone = reg.phone.clone();
  let login = NewUser {
    name:     format!("{} Login", reg.name),
    phone:    reg.phone,
    role:     Role::Store,
    store_id: None,
  };
  let (store, _) = repo
    .register_store(
      NewStore {
        name:           reg.name,
        license_number: reg.license_number,
        address:        reg.address,
        pincode:        reg.pincode,
        priority:       reg.priority,
      },
      login,
    )
    .await
    .map_err(|e| Error::backend_or(e, Error::PhoneTaken(phone)))?;

  tracing::info!(store_id = %store.store_id, pincode = %store.pincode, "store registered");
  Ok(store)
}

pub async fn get_store<R: StoreDirectory>(repo: &R, store_id: Uuid) -> Result<Store> {
  repo
    .get_store(store_id)
    .await
    .map_err(Error::backend)?
    .ok_or(Error::StoreNotFound(store_id))
}

pub async fn list_stores<R: Repository>(
  repo: &R,
  status: Option<StoreStatus>,
) -> Result<Vec<Store>> {
  repo.list_stores(status).await.map_err(Error::backend)
}

pub async fn pending_stores<R: Repository>(repo: &R) -> Result<Vec<Store>> {
  list_stores(repo, Some(StoreStatus::Pending)).await
}

pub async fn approve_store<R: Repository>(repo: &R, store_id: Uuid) -> Result<Store> {
  set_store_status(repo, store_id, StoreStatus::Approved).await
}

pub async fn reject_store<R: Repository>(repo: &R, store_id: Uuid) -> Result<Store> {
  set_store_status(repo, store_id, StoreStatus::Rejected).await
}

pub async fn suspend_store<R: Repository>(repo: &R, store_id: Uuid) -> Result<Store> {
  set_store_status(repo, store_id, StoreStatus::Suspended).await
}

async fn set_store_status<R: Repository>(
  repo: &R,
  store_id: Uuid,
  status: StoreStatus,
) -> Result<Store> {
  let store = repo
    .update_store_status(store_id, status)
    .await
    .map_err(Error::backend)?
    .ok_or(Error::StoreNotFound(store_id))?;
  tracing::info!(%store_id, %status, "store status updated");
  Ok(store)
}

/// Delete a store and its catalog. Stores that have received orders cannot
/// be deleted, since orders are never deleted.
pub async fn delete_store<R: Repository>(repo: &R, store_id: Uuid) -> Result<()> {
  get_store(repo, store_id).await?;

  let orders = repo
    .list_orders_for_store(store_id)
    .await
    .map_err(Error::backend)?;
  if !orders.is_empty() {
    return Err(Error::StoreHasOrders(store_id));
  }

  if !repo.delete_store(store_id).await.map_err(Error::backend)? {
    return Err(Error::StoreNotFound(store_id));
  }
  tracing::info!(%store_id, "store deleted");
  Ok(())
}
