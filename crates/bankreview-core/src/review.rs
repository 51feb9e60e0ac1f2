//! Review types: a single user review of a bank's app plus the sentiment and
//! NLP metadata attached to it by an external analysis step.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use crate::{Error, Result, bank::BankId};

/// Surrogate key of the `reviews` table.
pub type ReviewId = i64;

/// Source recorded when the producer does not name one.
pub const DEFAULT_SOURCE: &str = "Google Play Store";

fn round_to(value: f64, decimals: i32) -> f64 {
  let factor = 10f64.powi(decimals);
  (value * factor).round() / factor
}

// ─── Rating ──────────────────────────────────────────────────────────────────

/// A star rating in `[1, 5]` with one decimal of precision.
///
/// The value is rounded to one decimal before the range check, so `5.04` is
/// accepted as `5.0` while `0` and `6` are rejected.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(f64);

impl Rating {
  pub const MIN: f64 = 1.0;
  pub const MAX: f64 = 5.0;

  pub fn new(value: f64) -> Result<Self> {
    let rounded = round_to(value, 1);
    if rounded.is_nan() || !(Self::MIN..=Self::MAX).contains(&rounded) {
      return Err(Error::InvalidRating(value));
    }
    Ok(Self(rounded))
  }

  pub fn get(self) -> f64 { self.0 }
}

impl TryFrom<f64> for Rating {
  type Error = Error;

  fn try_from(value: f64) -> Result<Self> { Self::new(value) }
}

impl From<Rating> for f64 {
  fn from(r: Rating) -> f64 { r.0 }
}

// ─── SentimentScore ──────────────────────────────────────────────────────────

/// A continuous sentiment measure in `[-1, 1]` with three decimals of
/// precision.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct SentimentScore(f64);

impl SentimentScore {
  pub const MIN: f64 = -1.0;
  pub const MAX: f64 = 1.0;

  pub fn new(value: f64) -> Result<Self> {
    let rounded = round_to(value, 3);
    if rounded.is_nan() || !(Self::MIN..=Self::MAX).contains(&rounded) {
      return Err(Error::InvalidSentimentScore(value));
    }
    Ok(Self(rounded))
  }

  pub fn get(self) -> f64 { self.0 }
}

impl TryFrom<f64> for SentimentScore {
  type Error = Error;

  fn try_from(value: f64) -> Result<Self> { Self::new(value) }
}

impl From<SentimentScore> for f64 {
  fn from(s: SentimentScore) -> f64 { s.0 }
}

// ─── SentimentLabel ──────────────────────────────────────────────────────────

/// Categorical review tone. Stored as the lowercase variant name.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
  IntoStaticStr,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SentimentLabel {
  Positive,
  Neutral,
  Negative,
}

impl SentimentLabel {
  /// Parse one of `positive`, `neutral`, `negative`. Matching is exact.
  pub fn parse(s: &str) -> Result<Self> {
    s.parse()
      .map_err(|_| Error::UnknownSentimentLabel(s.to_owned()))
  }
}

// ─── Review ──────────────────────────────────────────────────────────────────

/// A persisted review row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
  pub review_id:       ReviewId,
  pub bank_id:         BankId,
  pub review_text:     String,
  pub rating:          Option<Rating>,
  pub review_date:     Option<NaiveDate>,
  pub sentiment_label: Option<SentimentLabel>,
  pub sentiment_score: Option<SentimentScore>,
  /// `None` only if a writer explicitly stored NULL; the column defaults to
  /// [`DEFAULT_SOURCE`].
  pub source:          Option<String>,
  pub cleaned_text:    Option<String>,
  pub keywords:        Option<Vec<String>>,
  pub theme:           Option<String>,
  pub created_at:      DateTime<Utc>,
}

/// Input to [`ReviewStore::add_review`](crate::store::ReviewStore::add_review).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReview {
  pub bank_id:         BankId,
  pub review_text:     String,
  pub rating:          Option<Rating>,
  pub review_date:     Option<NaiveDate>,
  pub sentiment_label: Option<SentimentLabel>,
  pub sentiment_score: Option<SentimentScore>,
  /// Falls back to [`DEFAULT_SOURCE`] when `None`.
  pub source:          Option<String>,
  pub cleaned_text:    Option<String>,
  pub keywords:        Option<Vec<String>>,
  pub theme:           Option<String>,
}

impl NewReview {
  /// Construct a bare review with every optional field unset.
  pub fn new(bank_id: BankId, review_text: impl Into<String>) -> Self {
    Self {
      bank_id,
      review_text: review_text.into(),
      rating: None,
      review_date: None,
      sentiment_label: None,
      sentiment_score: None,
      source: None,
      cleaned_text: None,
      keywords: None,
      theme: None,
    }
  }
}

/// Enrichment fields written after a review has been stored.
///
/// Only fields set to `Some` are written; the rest keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
  pub sentiment_label: Option<SentimentLabel>,
  pub sentiment_score: Option<SentimentScore>,
  pub cleaned_text:    Option<String>,
  pub keywords:        Option<Vec<String>>,
  pub theme:           Option<String>,
}

impl Enrichment {
  pub fn is_empty(&self) -> bool {
    self.sentiment_label.is_none()
      && self.sentiment_score.is_none()
      && self.cleaned_text.is_none()
      && self.keywords.is_none()
      && self.theme.is_none()
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator as _;

  use super::*;

  #[test]
  fn rating_bounds_are_inclusive() {
    assert_eq!(Rating::new(1.0).unwrap().get(), 1.0);
    assert_eq!(Rating::new(5.0).unwrap().get(), 5.0);
    assert!(matches!(Rating::new(0.0), Err(Error::InvalidRating(_))));
    assert!(matches!(Rating::new(6.0), Err(Error::InvalidRating(_))));
    assert!(Rating::new(f64::NAN).is_err());
  }

  #[test]
  fn rating_rounds_to_one_decimal() {
    assert_eq!(Rating::new(4.26).unwrap().get(), 4.3);
    assert_eq!(Rating::new(5.04).unwrap().get(), 5.0);
    assert_eq!(Rating::new(0.96).unwrap().get(), 1.0);
  }

  #[test]
  fn sentiment_score_bounds() {
    assert_eq!(SentimentScore::new(-1.0).unwrap().get(), -1.0);
    assert_eq!(SentimentScore::new(1.0).unwrap().get(), 1.0);
    assert_eq!(SentimentScore::new(0.12345).unwrap().get(), 0.123);
    assert!(matches!(
      SentimentScore::new(-1.5),
      Err(Error::InvalidSentimentScore(_))
    ));
    assert!(SentimentScore::new(1.01).is_err());
  }

  #[test]
  fn sentiment_label_parses_exact_lowercase() {
    for label in SentimentLabel::iter() {
      assert_eq!(SentimentLabel::parse(label.as_ref()).unwrap(), label);
    }
    assert_eq!(SentimentLabel::Negative.to_string(), "negative");
    let stored: &'static str = SentimentLabel::Neutral.into();
    assert_eq!(stored, "neutral");
    assert!(matches!(
      SentimentLabel::parse("mixed"),
      Err(Error::UnknownSentimentLabel(s)) if s == "mixed"
    ));
    assert!(SentimentLabel::parse("Positive").is_err());
  }

  #[test]
  fn serde_rejects_out_of_range_values() {
    assert!(serde_json::from_str::<Rating>("4.5").is_ok());
    assert!(serde_json::from_str::<Rating>("0").is_err());
    assert!(serde_json::from_str::<SentimentScore>("-1.5").is_err());
    assert!(serde_json::from_str::<SentimentLabel>("\"mixed\"").is_err());
    assert_eq!(
      serde_json::to_string(&SentimentLabel::Positive).unwrap(),
      "\"positive\""
    );
  }

  #[test]
  fn empty_enrichment() {
    assert!(Enrichment::default().is_empty());
    let e = Enrichment { theme: Some("Customer Support".into()), ..Default::default() };
    assert!(!e.is_empty());
  }
}
