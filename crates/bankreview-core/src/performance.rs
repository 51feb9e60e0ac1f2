//! The `bank_performance` read model, computed by the database on every
//! query, never stored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::bank::BankId;

/// One row of the `bank_performance` view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankPerformance {
  pub bank_id:           BankId,
  pub bank_name:         String,
  pub app_name:          String,
  pub total_reviews:     u64,
  /// Rounded to two decimals; `None` when no review carries a rating.
  pub avg_rating:        Option<f64>,
  /// Rounded to three decimals; `None` when no review carries a score.
  pub avg_sentiment:     Option<f64>,
  pub positive_count:    u64,
  pub neutral_count:     u64,
  pub negative_count:    u64,
  pub first_review_date: Option<NaiveDate>,
  pub last_review_date:  Option<NaiveDate>,
}

impl BankPerformance {
  /// Reviews carrying any sentiment label.
  pub fn labelled_reviews(&self) -> u64 {
    self.positive_count + self.neutral_count + self.negative_count
  }
}
