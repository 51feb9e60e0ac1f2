//! Bank: a banking application tracked for reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Surrogate key of the `banks` table.
pub type BankId = i64;

/// A bank/app pairing. The pair (`bank_name`, `app_name`) is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bank {
  pub bank_id:    BankId,
  pub bank_name:  String,
  pub app_name:   String,
  /// Assigned by the database at insertion time.
  pub created_at: DateTime<Utc>,
}

/// Input to [`ReviewStore::add_bank`](crate::store::ReviewStore::add_bank).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBank {
  pub bank_name: String,
  pub app_name:  String,
}

impl NewBank {
  pub fn new(bank_name: impl Into<String>, app_name: impl Into<String>) -> Self {
    Self { bank_name: bank_name.into(), app_name: app_name.into() }
  }
}
