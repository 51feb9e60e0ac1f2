//! Side-by-side comparison of banks that have reviews.
//!
//! Computed from the `reviews` table on request. Unlike the
//! `bank_performance` view, banks without reviews are left out, and each row
//! also carries a rating histogram and the most common themes.

use serde::{Deserialize, Serialize};

use crate::bank::BankId;

/// How many themes [`BankComparison::common_themes`] keeps per bank.
pub const TOP_THEMES: usize = 5;

/// Number of reviews given one exact rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingCount {
  pub rating: f64,
  pub count:  u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeCount {
  pub theme: String,
  pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankComparison {
  pub bank_id:             BankId,
  pub bank_name:           String,
  pub app_name:            String,
  pub total_reviews:       u64,
  pub avg_rating:          Option<f64>,
  pub avg_sentiment:       Option<f64>,
  pub positive_count:      u64,
  pub negative_count:      u64,
  /// Ascending by rating; unrated reviews are not counted.
  pub rating_distribution: Vec<RatingCount>,
  /// At most [`TOP_THEMES`] entries, most frequent first.
  pub common_themes:       Vec<ThemeCount>,
}

impl BankComparison {
  /// Positive reviews as a percentage of all of the bank's reviews,
  /// labelled or not.
  pub fn positive_pct(&self) -> f64 { percent(self.positive_count, self.total_reviews) }

  pub fn negative_pct(&self) -> f64 { percent(self.negative_count, self.total_reviews) }
}

pub(crate) fn percent(part: u64, whole: u64) -> f64 {
  if whole == 0 {
    return 0.0;
  }
  part as f64 / whole as f64 * 100.0
}

#[cfg(test)]
mod tests {
  use super::*;

  fn bank(total: u64, positive: u64, negative: u64) -> BankComparison {
    BankComparison {
      bank_id:             1,
      bank_name:           "Dashen Bank".into(),
      app_name:            "Amole".into(),
      total_reviews:       total,
      avg_rating:          None,
      avg_sentiment:       None,
      positive_count:      positive,
      negative_count:      negative,
      rating_distribution: Vec::new(),
      common_themes:       Vec::new(),
    }
  }

  #[test]
  fn percentages_use_every_review_as_denominator() {
    let b = bank(8, 2, 4);
    assert_eq!(b.positive_pct(), 25.0);
    assert_eq!(b.negative_pct(), 50.0);
  }

  #[test]
  fn percentages_of_empty_bank_are_zero() {
    let b = bank(0, 0, 0);
    assert_eq!(b.positive_pct(), 0.0);
    assert_eq!(b.negative_pct(), 0.0);
  }
}
