//! Error type for `bankreview-store-sqlite`.

use bankreview_core::{bank::BankId, review::ReviewId};
use rusqlite::{ErrorCode, ffi};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] bankreview_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// The (`bank_name`, `app_name`) pair is already taken.
  #[error("bank {bank_name:?} / app {app_name:?} already exists")]
  DuplicateBank { bank_name: String, app_name: String },

  #[error("bank not found: {0}")]
  BankNotFound(BankId),

  #[error("review not found: {0}")]
  ReviewNotFound(ReviewId),

  /// A CHECK constraint rejected the row.
  #[error("constraint violation: {0}")]
  ConstraintViolation(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Which declarative constraint the engine reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Constraint {
  Unique,
  ForeignKey,
  Check,
  Other,
}

/// Inspect a database error for a constraint violation, returning the kind
/// and the engine's message.
pub(crate) fn violated_constraint(
  err: &tokio_rusqlite::Error,
) -> Option<(Constraint, String)> {
  let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, msg)) =
    err
  else {
    return None;
  };
  if e.code != ErrorCode::ConstraintViolation {
    return None;
  }
  let kind = match e.extended_code {
    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
      Constraint::Unique
    }
    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Constraint::ForeignKey,
    ffi::SQLITE_CONSTRAINT_CHECK => Constraint::Check,
    _ => Constraint::Other,
  };
  Some((kind, msg.clone().unwrap_or_else(|| e.to_string())))
}

/// Map CHECK failures to [`Error::ConstraintViolation`]; leave everything
/// else as a database error.
pub(crate) fn classify(err: tokio_rusqlite::Error) -> Error {
  match violated_constraint(&err) {
    Some((Constraint::Check, msg)) => Error::ConstraintViolation(msg),
    _ => Error::Database(err),
  }
}
