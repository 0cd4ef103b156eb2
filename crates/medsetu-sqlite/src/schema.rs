//! SQL schema for the MedSetu SQLite database.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS stores (
    store_id       TEXT PRIMARY KEY,
    name           TEXT NOT NULL,
    license_number TEXT NOT NULL,
    address        TEXT NOT NULL,
    pincode        TEXT NOT NULL,     -- exact-match key, never normalised
    priority       INTEGER NOT NULL,  -- lower is preferred
    status         TEXT NOT NULL,     -- 'PENDING' | 'APPROVED' | 'REJECTED' | 'SUSPENDED'
    created_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    user_id    TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    phone      TEXT NOT NULL UNIQUE,
    role       TEXT NOT NULL,         -- 'CUSTOMER' | 'STORE' | 'ADMIN'
    store_id   TEXT REFERENCES stores(store_id) ON DELETE SET NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS medicines (
    medicine_id           TEXT PRIMARY KEY,
    store_id              TEXT NOT NULL REFERENCES stores(store_id) ON DELETE CASCADE,
    name                  TEXT NOT NULL,
    price                 REAL NOT NULL,
    requires_prescription INTEGER NOT NULL DEFAULT 0,
    created_at            TEXT NOT NULL
);

-- Orders are never deleted. Status is free text.
CREATE TABLE IF NOT EXISTS orders (
    order_id    TEXT PRIMARY KEY,
    customer_id TEXT NOT NULL REFERENCES users(user_id),
    store_id    TEXT NOT NULL REFERENCES stores(store_id),
    status      TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS prescriptions (
    prescription_id TEXT PRIMARY KEY,
    order_id        TEXT NOT NULL UNIQUE REFERENCES orders(order_id),
    file_url        TEXT NOT NULL,
    verified        INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS stores_directory_idx ON stores(pincode, status, priority);
CREATE INDEX IF NOT EXISTS medicines_store_idx  ON medicines(store_id);
CREATE INDEX IF NOT EXISTS orders_store_idx     ON orders(store_id);

PRAGMA user_version = 1;
";
