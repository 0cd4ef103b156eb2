//! Error type for `medsetu-sqlite`.

use medsetu_core::repo::RepoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored enum column held a value no variant matches.
  #[error("unknown {column} value: {value:?}")]
  UnknownVariant { column: &'static str, value: String },
}

impl RepoError for Error {
  fn is_unique_violation(&self) -> bool {
    let Self::Database(tokio_rusqlite::Error::Rusqlite(
      rusqlite::Error::SqliteFailure(e, _),
    )) = self
    else {
      return false;
    };
    matches!(
      e.extended_code,
      rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
