//! User is a customer, a store login, or an administrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use uuid::Uuid;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
  #[default]
  Customer,
  Store,
  Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  pub user_id:    Uuid,
  pub name:       String,
  /// Unique across all users; doubles as the login key.
  pub phone:      String,
  pub role:       Role,
  /// Set for `Store` logins created by store registration.
  pub store_id:   Option<Uuid>,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::repo::Repository::add_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub name:     String,
  pub phone:    String,
  pub role:     Role,
  pub store_id: Option<Uuid>,
}
