//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings. Enums are stored as their
//! SCREAMING_SNAKE_CASE names.

use chrono::{DateTime, Utc};
use medsetu_core::{
  medicine::Medicine,
  order::{Order, OrderStatus},
  prescription::Prescription,
  store::{Store, StoreStatus},
  user::{Role, User},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enums ────────────────────────────────────────────────────────────────────

pub fn encode_store_status(s: StoreStatus) -> &'static str { s.into() }

pub fn decode_store_status(s: &str) -> Result<StoreStatus> {
  s.parse().map_err(|_| Error::UnknownVariant {
    column: "stores.status",
    value:  s.to_owned(),
  })
}

pub fn encode_role(r: Role) -> &'static str { r.into() }

pub fn decode_role(s: &str) -> Result<Role> {
  s.parse().map_err(|_| Error::UnknownVariant {
    column: "users.role",
    value:  s.to_owned(),
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const STORE_COLUMNS: &str =
  "store_id, name, license_number, address, pincode, priority, status, created_at";

/// Raw values read directly from a `stores` row.
pub struct RawStore {
  pub store_id:       String,
  pub name:           String,
  pub license_number: String,
  pub address:        String,
  pub pincode:        String,
  pub priority:       i32,
  pub status:         String,
  pub created_at:     String,
}

impl RawStore {
  /// Expects the columns in [`STORE_COLUMNS`] order.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      store_id:       row.get(0)?,
      name:           row.get(1)?,
      license_number: row.get(2)?,
      address:        row.get(3)?,
      pincode:        row.get(4)?,
      priority:       row.get(5)?,
      status:         row.get(6)?,
      created_at:     row.get(7)?,
    })
  }

  pub fn into_store(self) -> Result<Store> {
    Ok(Store {
      store_id:       decode_uuid(&self.store_id)?,
      name:           self.name,
      license_number: self.license_number,
      address:        self.address,
      pincode:        self.pincode,
      priority:       self.priority,
      status:         decode_store_status(&self.status)?,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

pub const USER_COLUMNS: &str = "user_id, name, phone, role, store_id, created_at";

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub name:       String,
  pub phone:      String,
  pub role:       String,
  pub store_id:   Option<String>,
  pub created_at: String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:    row.get(0)?,
      name:       row.get(1)?,
      phone:      row.get(2)?,
      role:       row.get(3)?,
      store_id:   row.get(4)?,
      created_at: row.get(5)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    decode_uuid(&self.user_id)?,
      name:       self.name,
      phone:      self.phone,
      role:       decode_role(&self.role)?,
      store_id:   self.store_id.as_deref().map(decode_uuid).transpose()?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub const MEDICINE_COLUMNS: &str =
  "medicine_id, store_id, name, price, requires_prescription, created_at";

/// Raw values read directly from a `medicines` row.
pub struct RawMedicine {
  pub medicine_id:           String,
  pub store_id:              String,
  pub name:                  String,
  pub price:                 f64,
  pub requires_prescription: bool,
  pub created_at:            String,
}

impl RawMedicine {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      medicine_id:           row.get(0)?,
      store_id:              row.get(1)?,
      name:                  row.get(2)?,
      price:                 row.get(3)?,
      requires_prescription: row.get(4)?,
      created_at:            row.get(5)?,
    })
  }

  pub fn into_medicine(self) -> Result<Medicine> {
    Ok(Medicine {
      medicine_id:           decode_uuid(&self.medicine_id)?,
      store_id:              decode_uuid(&self.store_id)?,
      name:                  self.name,
      price:                 self.price,
      requires_prescription: self.requires_prescription,
      created_at:            decode_dt(&self.created_at)?,
    })
  }
}

pub const ORDER_COLUMNS: &str =
  "order_id, customer_id, store_id, status, created_at, updated_at";

/// Raw values read directly from an `orders` row.
pub struct RawOrder {
  pub order_id:    String,
  pub customer_id: String,
  pub store_id:    String,
  pub status:      String,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawOrder {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      order_id:    row.get(0)?,
      customer_id: row.get(1)?,
      store_id:    row.get(2)?,
      status:      row.get(3)?,
      created_at:  row.get(4)?,
      updated_at:  row.get(5)?,
    })
  }

  pub fn into_order(self) -> Result<Order> {
    Ok(Order {
      order_id:    decode_uuid(&self.order_id)?,
      customer_id: decode_uuid(&self.customer_id)?,
      store_id:    decode_uuid(&self.store_id)?,
      // Status is open-ended text; every stored string is a valid status.
      status:      OrderStatus::from(self.status),
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

pub const PRESCRIPTION_COLUMNS: &str =
  "prescription_id, order_id, file_url, verified, created_at";

/// Raw values read directly from a `prescriptions` row.
pub struct RawPrescription {
  pub prescription_id: String,
  pub order_id:        String,
  pub file_url:        String,
  pub verified:        bool,
  pub created_at:      String,
}

impl RawPrescription {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      prescription_id: row.get(0)?,
      order_id:        row.get(1)?,
      file_url:        row.get(2)?,
      verified:        row.get(3)?,
      created_at:      row.get(4)?,
    })
  }

  pub fn into_prescription(self) -> Result<Prescription> {
    Ok(Prescription {
      prescription_id: decode_uuid(&self.prescription_id)?,
      order_id:        decode_uuid(&self.order_id)?,
      file_url:        self.file_url,
      verified:        self.verified,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

/// Escape `%`, `_` and `\` so `s` matches literally inside a `LIKE` pattern
/// declared with `ESCAPE '\'`.
pub fn escape_like(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out
}
