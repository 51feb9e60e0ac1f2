//! Verification statistics over a populated store.
//!
//! The report is a snapshot of counts; [`VerifyThresholds`] turns it into a
//! pass/warn verdict for the store as a whole and for each bank.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::review::SentimentLabel;

/// Review count for one bank/app pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankReviewCount {
  pub bank_name:    String,
  pub app_name:     String,
  pub review_count: u64,
}

/// Number of reviews carrying a given sentiment label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCount {
  pub label: SentimentLabel,
  pub count: u64,
}

/// Earliest and latest `review_date` across all reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
  pub earliest: NaiveDate,
  pub latest:   NaiveDate,
}

/// Counts of rows failing each data-quality check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityChecks {
  pub missing_text:      u64,
  pub missing_rating:    u64,
  pub missing_sentiment: u64,
  pub future_dates:      u64,
}

impl QualityChecks {
  pub fn is_clean(&self) -> bool { *self == Self::default() }

  /// `(check name, issue count)` pairs in display order.
  pub fn entries(&self) -> [(&'static str, u64); 4] {
    [
      ("Missing review text", self.missing_text),
      ("Missing ratings", self.missing_rating),
      ("Missing sentiment", self.missing_sentiment),
      ("Future dates", self.future_dates),
    ]
  }
}

/// Column layout of one table or view, as the engine reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStructure {
  pub table_name: String,
  /// In declaration order.
  pub columns:    Vec<String>,
}

impl TableStructure {
  pub fn column_count(&self) -> usize { self.columns.len() }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
  pub total_reviews:          u64,
  /// Ordered by descending review count.
  pub reviews_per_bank:       Vec<BankReviewCount>,
  /// Ordered by descending count; unlabelled reviews are not counted.
  pub sentiment_distribution: Vec<SentimentCount>,
  pub date_range:             Option<DateRange>,
  pub quality:                QualityChecks,
}

impl IntegrityReport {
  pub fn labelled_total(&self) -> u64 {
    self.sentiment_distribution.iter().map(|s| s.count).sum()
  }

  /// Share of labelled reviews carrying `label`, in percent.
  pub fn sentiment_percentage(&self, label: SentimentLabel) -> f64 {
    let total = self.labelled_total();
    if total == 0 {
      return 0.0;
    }
    let count = self
      .sentiment_distribution
      .iter()
      .find(|s| s.label == label)
      .map_or(0, |s| s.count);
    count as f64 / total as f64 * 100.0
  }

  pub fn assess(&self, thresholds: &VerifyThresholds) -> Assessment {
    if self.total_reviews >= thresholds.target_total {
      Assessment::Excellent
    } else if self.total_reviews >= thresholds.min_total {
      Assessment::Satisfactory
    } else {
      Assessment::Incomplete
    }
  }

  /// Banks whose review count is below the per-bank minimum.
  pub fn underfilled_banks<'a>(
    &'a self,
    thresholds: &'a VerifyThresholds,
  ) -> impl Iterator<Item = &'a BankReviewCount> + 'a {
    self
      .reviews_per_bank
      .iter()
      .filter(move |b| b.review_count < thresholds.min_per_bank)
  }
}

/// Review-count targets used by [`IntegrityReport::assess`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyThresholds {
  pub target_total: u64,
  pub min_total:    u64,
  pub min_per_bank: u64,
}

impl Default for VerifyThresholds {
  fn default() -> Self {
    Self { target_total: 1000, min_total: 400, min_per_bank: 400 }
  }
}

/// Overall verdict for a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Assessment {
  /// At or above the target total.
  Excellent,
  /// At or above the minimum total but short of the target.
  Satisfactory,
  Incomplete,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn report(total: u64, per_bank: &[(&str, u64)]) -> IntegrityReport {
    IntegrityReport {
      total_reviews:          total,
      reviews_per_bank:       per_bank
        .iter()
        .map(|(name, n)| BankReviewCount {
          bank_name:    (*name).into(),
          app_name:     format!("{name} Mobile"),
          review_count: *n,
        })
        .collect(),
      sentiment_distribution: vec![],
      date_range:             None,
      quality:                QualityChecks::default(),
    }
  }

  #[test]
  fn assessment_thresholds() {
    let t = VerifyThresholds::default();
    assert_eq!(report(1000, &[]).assess(&t), Assessment::Excellent);
    assert_eq!(report(999, &[]).assess(&t), Assessment::Satisfactory);
    assert_eq!(report(400, &[]).assess(&t), Assessment::Satisfactory);
    assert_eq!(report(399, &[]).assess(&t), Assessment::Incomplete);
  }

  #[test]
  fn underfilled_banks_filtered_by_minimum() {
    let t = VerifyThresholds::default();
    let r = report(900, &[("Awash", 500), ("Dashen", 399), ("CBE", 1)]);
    let names: Vec<_> =
      r.underfilled_banks(&t).map(|b| b.bank_name.as_str()).collect();
    assert_eq!(names, ["Dashen", "CBE"]);
  }

  #[test]
  fn sentiment_percentages() {
    let mut r = report(4, &[]);
    assert_eq!(r.sentiment_percentage(SentimentLabel::Positive), 0.0);

    r.sentiment_distribution = vec![
      SentimentCount { label: SentimentLabel::Positive, count: 3 },
      SentimentCount { label: SentimentLabel::Negative, count: 1 },
    ];
    assert_eq!(r.labelled_total(), 4);
    assert_eq!(r.sentiment_percentage(SentimentLabel::Positive), 75.0);
    assert_eq!(r.sentiment_percentage(SentimentLabel::Neutral), 0.0);
  }

  #[test]
  fn quality_checks_clean_only_when_all_zero() {
    assert!(QualityChecks::default().is_clean());
    let q = QualityChecks { future_dates: 2, ..Default::default() };
    assert!(!q.is_clean());
    assert_eq!(q.entries()[3], ("Future dates", 2));
  }
}
