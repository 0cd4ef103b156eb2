//! [`SqliteBackend`]: the SQLite implementation of [`Repository`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use medsetu_core::{
  medicine::{Medicine, NewMedicine},
  order::{NewOrder, Order, OrderStatus},
  prescription::{NewPrescription, Prescription},
  repo::{Repository, StoreDirectory},
  store::{NewStore, Store, StoreStatus},
  user::{NewUser, User},
};

use crate::{
  encode::{
    MEDICINE_COLUMNS, ORDER_COLUMNS, PRESCRIPTION_COLUMNS, RawMedicine, RawOrder,
    RawPrescription, RawStore, RawUser, STORE_COLUMNS, USER_COLUMNS, encode_dt,
    encode_role, encode_store_status, encode_uuid, escape_like,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Backend ─────────────────────────────────────────────────────────────────

/// A MedSetu database backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteBackend {
  conn: tokio_rusqlite::Connection,
}

impl SqliteBackend {
  /// Open (or create) a database at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let backend = Self { conn };
    backend.init_schema().await?;
    Ok(backend)
  }

  /// Open an in-memory database, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let backend = Self { conn };
    backend.init_schema().await?;
    Ok(backend)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── StoreDirectory impl ─────────────────────────────────────────────────────

impl StoreDirectory for SqliteBackend {
  type Error = Error;

  async fn list_approved_stores(&self, pincode: &str) -> Result<Vec<Store>> {
    let pincode = pincode.to_owned();
    let approved = encode_store_status(StoreStatus::Approved);

    let raws: Vec<RawStore> = self
      .conn
      .call(move |conn| {
        // rowid breaks priority ties in insertion order.
        let mut stmt = conn.prepare(&format!(
          "SELECT {STORE_COLUMNS} FROM stores
           WHERE pincode = ?1 AND status = ?2
           ORDER BY priority ASC, rowid ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![pincode, approved], RawStore::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStore::into_store).collect()
  }

  async fn get_store(&self, id: Uuid) -> Result<Option<Store>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawStore> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {STORE_COLUMNS} FROM stores WHERE store_id = ?1"),
              rusqlite::params![id_str],
              RawStore::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStore::into_store).transpose()
  }
}

// ─── Repository impl ─────────────────────────────────────────────────────────

impl Repository for SqliteBackend {
  // ── Stores ────────────────────────────────────────────────────────────────

  async fn add_store(&self, input: NewStore) -> Result<Store> {
    let store = Store {
      store_id:       Uuid::new_v4(),
      name:           input.name,
      license_number: input.license_number,
      address:        input.address,
      pincode:        input.pincode,
      priority:       input.priority,
      status:         StoreStatus::Pending,
      created_at:     Utc::now(),
    };

    let id_str      = encode_uuid(store.store_id);
    let name        = store.name.clone();
    let license     = store.license_number.clone();
    let address     = store.address.clone();
    let pincode     = store.pincode.clone();
    let priority    = store.priority;
    let status_str  = encode_store_status(store.status);
    let created_str = encode_dt(store.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO stores (
             store_id, name, license_number, address, pincode,
             priority, status, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str,
            name,
            license,
            address,
            pincode,
            priority,
            status_str,
            created_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(store)
  }

  async fn register_store(&self, input: NewStore, login: NewUser) -> Result<(Store, User)> {
    let now = Utc::now();
    let store = Store {
      store_id:       Uuid::new_v4(),
      name:           input.name,
      license_number: input.license_number,
      address:        input.address,
      pincode:        input.pincode,
      priority:       input.priority,
      status:         StoreStatus::Pending,
      created_at:     now,
    };
    let user = User {
      user_id:    Uuid::new_v4(),
      name:       login.name,
      phone:      login.phone,
      role:       login.role,
      store_id:   Some(store.store_id),
      created_at: now,
    };

    let store_id_str = encode_uuid(store.store_id);
    let name         = store.name.clone();
    let license      = store.license_number.clone();
    let address      = store.address.clone();
    let pincode      = store.pincode.clone();
    let priority     = store.priority;
    let status_str   = encode_store_status(store.status);
    let user_id_str  = encode_uuid(user.user_id);
    let login_name   = user.name.clone();
    let phone        = user.phone.clone();
    let role_str     = encode_role(user.role);
    let created_str  = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        // Dropping the transaction on error rolls back the store row.
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO stores (
             store_id, name, license_number, address, pincode,
             priority, status, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            store_id_str,
            name,
            license,
            address,
            pincode,
            priority,
            status_str,
            created_str,
          ],
        )?;
        tx.execute(
          "INSERT INTO users (user_id, name, phone, role, store_id, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![user_id_str, login_name, phone, role_str, store_id_str, created_str],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok((store, user))
  }

  async fn list_stores(&self, status: Option<StoreStatus>) -> Result<Vec<Store>> {
    let status_str = status.map(encode_store_status);

    let raws: Vec<RawStore> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(s) = status_str {
          let mut stmt = conn.prepare(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE status = ?1 ORDER BY rowid"
          ))?;
          stmt
            .query_map(rusqlite::params![s], RawStore::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt =
            conn.prepare(&format!("SELECT {STORE_COLUMNS} FROM stores ORDER BY rowid"))?;
          stmt
            .query_map([], RawStore::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStore::into_store).collect()
  }

  async fn update_store_status(
    &self,
    id:     Uuid,
    status: StoreStatus,
  ) -> Result<Option<Store>> {
    let id_str     = encode_uuid(id);
    let status_str = encode_store_status(status);

    let raw: Option<RawStore> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE stores SET status = ?1 WHERE store_id = ?2",
          rusqlite::params![status_str, id_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        let raw = tx.query_row(
          &format!("SELECT {STORE_COLUMNS} FROM stores WHERE store_id = ?1"),
          rusqlite::params![id_str],
          RawStore::from_row,
        )?;
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawStore::into_store).transpose()
  }

  async fn delete_store(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM stores WHERE store_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:    Uuid::new_v4(),
      name:       input.name,
      phone:      input.phone,
      role:       input.role,
      store_id:   input.store_id,
      created_at: Utc::now(),
    };

    let id_str       = encode_uuid(user.user_id);
    let name         = user.name.clone();
    let phone        = user.phone.clone();
    let role_str     = encode_role(user.role);
    let store_id_str = user.store_id.map(encode_uuid);
    let created_str  = encode_dt(user.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, name, phone, role, store_id, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, name, phone, role_str, store_id_str, created_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
              rusqlite::params![id_str],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn find_user_by_phone(&self, phone: &str) -> Result<Option<User>> {
    let phone = phone.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE phone = ?1"),
              rusqlite::params![phone],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Catalog ───────────────────────────────────────────────────────────────

  async fn add_medicine(&self, input: NewMedicine) -> Result<Medicine> {
    let medicine = Medicine {
      medicine_id:           Uuid::new_v4(),
      store_id:              input.store_id,
      name:                  input.name,
      price:                 input.price,
      requires_prescription: input.requires_prescription,
      created_at:            Utc::now(),
    };

    let id_str       = encode_uuid(medicine.medicine_id);
    let store_id_str = encode_uuid(medicine.store_id);
    let name         = medicine.name.clone();
    let price        = medicine.price;
    let requires_rx  = medicine.requires_prescription;
    let created_str  = encode_dt(medicine.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO medicines (
             medicine_id, store_id, name, price, requires_prescription, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, store_id_str, name, price, requires_rx, created_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(medicine)
  }

  async fn search_medicines(&self, query: &str) -> Result<Vec<Medicine>> {
    // LIKE is case-insensitive for ASCII in SQLite.
    let pattern = format!("%{}%", escape_like(query));

    let raws: Vec<RawMedicine> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {MEDICINE_COLUMNS} FROM medicines
           WHERE name LIKE ?1 ESCAPE '\\'
           ORDER BY name, rowid"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![pattern], RawMedicine::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMedicine::into_medicine).collect()
  }

  // ── Orders ────────────────────────────────────────────────────────────────

  async fn add_order(&self, input: NewOrder) -> Result<Order> {
    let now = Utc::now();
    let order = Order {
      order_id:    Uuid::new_v4(),
      customer_id: input.customer_id,
      store_id:    input.store_id,
      status:      OrderStatus::Created,
      created_at:  now,
      updated_at:  now,
    };

    let id_str          = encode_uuid(order.order_id);
    let customer_id_str = encode_uuid(order.customer_id);
    let store_id_str    = encode_uuid(order.store_id);
    let status_str      = order.status.as_str().to_owned();
    let at_str          = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO orders (
             order_id, customer_id, store_id, status, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
          rusqlite::params![id_str, customer_id_str, store_id_str, status_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(order)
  }

  async fn get_order(&self, id: Uuid) -> Result<Option<Order>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawOrder> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = ?1"),
              rusqlite::params![id_str],
              RawOrder::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawOrder::into_order).transpose()
  }

  async fn update_order_status(
    &self,
    id:     Uuid,
    status: OrderStatus,
  ) -> Result<Option<Order>> {
    let id_str     = encode_uuid(id);
    let status_str = String::from(status);
    let at_str     = encode_dt(Utc::now());

    let raw: Option<RawOrder> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE orders SET status = ?1, updated_at = ?2 WHERE order_id = ?3",
          rusqlite::params![status_str, at_str, id_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        let raw = tx.query_row(
          &format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = ?1"),
          rusqlite::params![id_str],
          RawOrder::from_row,
        )?;
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawOrder::into_order).transpose()
  }

  async fn list_orders_for_store(&self, store_id: Uuid) -> Result<Vec<Order>> {
    let store_id_str = encode_uuid(store_id);

    let raws: Vec<RawOrder> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ORDER_COLUMNS} FROM orders WHERE store_id = ?1 ORDER BY rowid"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![store_id_str], RawOrder::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawOrder::into_order).collect()
  }

  // ── Prescriptions ─────────────────────────────────────────────────────────

  async fn add_prescription(&self, input: NewPrescription) -> Result<Prescription> {
    let prescription = Prescription {
      prescription_id: Uuid::new_v4(),
      order_id:        input.order_id,
      file_url:        input.file_url,
      verified:        false,
      created_at:      Utc::now(),
    };

    let id_str       = encode_uuid(prescription.prescription_id);
    let order_id_str = encode_uuid(prescription.order_id);
    let file_url     = prescription.file_url.clone();
    let created_str  = encode_dt(prescription.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO prescriptions (prescription_id, order_id, file_url, verified, created_at)
           VALUES (?1, ?2, ?3, 0, ?4)",
          rusqlite::params![id_str, order_id_str, file_url, created_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(prescription)
  }

  async fn get_prescription_for_order(&self, order_id: Uuid) -> Result<Option<Prescription>> {
    let order_id_str = encode_uuid(order_id);

    let raw: Option<RawPrescription> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions WHERE order_id = ?1"),
              rusqlite::params![order_id_str],
              RawPrescription::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPrescription::into_prescription).transpose()
  }

  async fn set_prescription_verified(
    &self,
    id:       Uuid,
    verified: bool,
  ) -> Result<Option<Prescription>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPrescription> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE prescriptions SET verified = ?1 WHERE prescription_id = ?2",
          rusqlite::params![verified, id_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        let raw = tx.query_row(
          &format!("SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions WHERE prescription_id = ?1"),
          rusqlite::params![id_str],
          RawPrescription::from_row,
        )?;
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawPrescription::into_prescription).transpose()
  }
}
