//! Monthly sentiment counts per bank.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{bank::BankId, comparison::percent};

/// Label counts for one bank in one calendar month.
///
/// Only reviews with both a `review_date` and a `sentiment_label` are
/// counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentTrend {
  pub bank_id:   BankId,
  pub bank_name: String,
  /// First day of the month.
  pub month:     NaiveDate,
  pub positive:  u64,
  pub neutral:   u64,
  pub negative:  u64,
}

impl SentimentTrend {
  pub fn total(&self) -> u64 { self.positive + self.neutral + self.negative }

  pub fn positive_rate(&self) -> f64 { percent(self.positive, self.total()) }

  pub fn negative_rate(&self) -> f64 { percent(self.negative, self.total()) }
}
