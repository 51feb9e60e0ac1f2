//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, calendar dates are `YYYY-MM-DD`, keywords
//! are a compact JSON array and labels are their lowercase names.

use std::collections::HashMap;

use bankreview_core::{
  bank::{Bank, BankId},
  comparison::{BankComparison, RatingCount, ThemeCount},
  integrity::{
    BankReviewCount, DateRange, IntegrityReport, QualityChecks, SentimentCount,
    TableStructure,
  },
  performance::BankPerformance,
  review::{Rating, Review, SentimentLabel, SentimentScore},
  trends::SentimentTrend,
};
use chrono::{DateTime, NaiveDate, Utc};

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── SentimentLabel ──────────────────────────────────────────────────────────

pub fn encode_label(l: SentimentLabel) -> &'static str { l.into() }

pub fn decode_label(s: &str) -> Result<SentimentLabel> {
  Ok(SentimentLabel::parse(s)?)
}

// ─── Keywords ────────────────────────────────────────────────────────────────

pub fn encode_keywords(keywords: &[String]) -> Result<String> {
  Ok(serde_json::to_string(keywords)?)
}

pub fn decode_keywords(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

fn count(n: i64) -> u64 { u64::try_from(n).unwrap_or(0) }

// ─── Row types ───────────────────────────────────────────────────────────────

pub const BANK_COLUMNS: &str = "bank_id, bank_name, app_name, created_at";

/// Raw values read directly from a `banks` row selected with
/// [`BANK_COLUMNS`].
pub struct RawBank {
  pub bank_id:    i64,
  pub bank_name:  String,
  pub app_name:   String,
  pub created_at: String,
}

impl RawBank {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      bank_id:    row.get(0)?,
      bank_name:  row.get(1)?,
      app_name:   row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_bank(self) -> Result<Bank> {
    Ok(Bank {
      bank_id:    self.bank_id,
      bank_name:  self.bank_name,
      app_name:   self.app_name,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub const REVIEW_COLUMNS: &str = "review_id, bank_id, review_text, rating, \
  review_date, sentiment_label, sentiment_score, source, cleaned_text, \
  keywords, theme, created_at";

/// Raw values read directly from a `reviews` row selected with
/// [`REVIEW_COLUMNS`].
pub struct RawReview {
  pub review_id:       i64,
  pub bank_id:         i64,
  pub review_text:     String,
  pub rating:          Option<f64>,
  pub review_date:     Option<String>,
  pub sentiment_label: Option<String>,
  pub sentiment_score: Option<f64>,
  pub source:          Option<String>,
  pub cleaned_text:    Option<String>,
  pub keywords:        Option<String>,
  pub theme:           Option<String>,
  pub created_at:      String,
}

impl RawReview {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      review_id:       row.get(0)?,
      bank_id:         row.get(1)?,
      review_text:     row.get(2)?,
      rating:          row.get(3)?,
      review_date:     row.get(4)?,
      sentiment_label: row.get(5)?,
      sentiment_score: row.get(6)?,
      source:          row.get(7)?,
      cleaned_text:    row.get(8)?,
      keywords:        row.get(9)?,
      theme:           row.get(10)?,
      created_at:      row.get(11)?,
    })
  }

  pub fn into_review(self) -> Result<Review> {
    Ok(Review {
      review_id:       self.review_id,
      bank_id:         self.bank_id,
      review_text:     self.review_text,
      rating:          self.rating.map(Rating::new).transpose()?,
      review_date:     self.review_date.as_deref().map(decode_date).transpose()?,
      sentiment_label: self
        .sentiment_label
        .as_deref()
        .map(decode_label)
        .transpose()?,
      sentiment_score: self
        .sentiment_score
        .map(SentimentScore::new)
        .transpose()?,
      source:          self.source,
      cleaned_text:    self.cleaned_text,
      keywords:        self.keywords.as_deref().map(decode_keywords).transpose()?,
      theme:           self.theme,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

pub const PERFORMANCE_COLUMNS: &str = "bank_id, bank_name, app_name, \
  total_reviews, avg_rating, avg_sentiment, positive_count, neutral_count, \
  negative_count, first_review_date, last_review_date";

/// Raw values read from one `bank_performance` row.
pub struct RawPerformance {
  pub bank_id:           i64,
  pub bank_name:         String,
  pub app_name:          String,
  pub total_reviews:     i64,
  pub avg_rating:        Option<f64>,
  pub avg_sentiment:     Option<f64>,
  pub positive_count:    i64,
  pub neutral_count:     i64,
  pub negative_count:    i64,
  pub first_review_date: Option<String>,
  pub last_review_date:  Option<String>,
}

impl RawPerformance {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      bank_id:           row.get(0)?,
      bank_name:         row.get(1)?,
      app_name:          row.get(2)?,
      total_reviews:     row.get(3)?,
      avg_rating:        row.get(4)?,
      avg_sentiment:     row.get(5)?,
      positive_count:    row.get(6)?,
      neutral_count:     row.get(7)?,
      negative_count:    row.get(8)?,
      first_review_date: row.get(9)?,
      last_review_date:  row.get(10)?,
    })
  }

  pub fn into_performance(self) -> Result<BankPerformance> {
    Ok(BankPerformance {
      bank_id:           self.bank_id,
      bank_name:         self.bank_name,
      app_name:          self.app_name,
      total_reviews:     count(self.total_reviews),
      avg_rating:        self.avg_rating,
      avg_sentiment:     self.avg_sentiment,
      positive_count:    count(self.positive_count),
      neutral_count:     count(self.neutral_count),
      negative_count:    count(self.negative_count),
      first_review_date: self
        .first_review_date
        .as_deref()
        .map(decode_date)
        .transpose()?,
      last_review_date:  self
        .last_review_date
        .as_deref()
        .map(decode_date)
        .transpose()?,
    })
  }
}

/// Raw aggregates gathered for an integrity report, in query order.
pub struct RawIntegrity {
  pub total_reviews:     i64,
  /// `(bank_name, app_name, review_count)`
  pub per_bank:          Vec<(String, String, i64)>,
  /// `(sentiment_label, count)`
  pub sentiment:         Vec<(String, i64)>,
  pub earliest:          Option<String>,
  pub latest:            Option<String>,
  pub missing_text:      i64,
  pub missing_rating:    i64,
  pub missing_sentiment: i64,
  pub future_dates:      i64,
}

impl RawIntegrity {
  pub fn into_report(self) -> Result<IntegrityReport> {
    let reviews_per_bank = self
      .per_bank
      .into_iter()
      .map(|(bank_name, app_name, n)| BankReviewCount {
        bank_name,
        app_name,
        review_count: count(n),
      })
      .collect();

    let sentiment_distribution = self
      .sentiment
      .into_iter()
      .map(|(label, n)| {
        Ok(SentimentCount { label: decode_label(&label)?, count: count(n) })
      })
      .collect::<Result<Vec<_>>>()?;

    let date_range = match (self.earliest, self.latest) {
      (Some(earliest), Some(latest)) => Some(DateRange {
        earliest: decode_date(&earliest)?,
        latest:   decode_date(&latest)?,
      }),
      _ => None,
    };

    Ok(IntegrityReport {
      total_reviews: count(self.total_reviews),
      reviews_per_bank,
      sentiment_distribution,
      date_range,
      quality: QualityChecks {
        missing_text:      count(self.missing_text),
        missing_rating:    count(self.missing_rating),
        missing_sentiment: count(self.missing_sentiment),
        future_dates:      count(self.future_dates),
      },
    })
  }
}

/// One bank's summary row of a comparison.
pub struct RawBankSummary {
  pub bank_id:        i64,
  pub bank_name:      String,
  pub app_name:       String,
  pub total_reviews:  i64,
  pub avg_rating:     Option<f64>,
  pub avg_sentiment:  Option<f64>,
  pub positive_count: i64,
  pub negative_count: i64,
}

impl RawBankSummary {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      bank_id:        row.get(0)?,
      bank_name:      row.get(1)?,
      app_name:       row.get(2)?,
      total_reviews:  row.get(3)?,
      avg_rating:     row.get(4)?,
      avg_sentiment:  row.get(5)?,
      positive_count: row.get(6)?,
      negative_count: row.get(7)?,
    })
  }
}

/// Raw aggregates gathered for a bank comparison.
pub struct RawComparison {
  pub summaries: Vec<RawBankSummary>,
  /// `(bank_id, rating, count)`, ascending by rating within a bank.
  pub ratings:   Vec<(i64, f64, i64)>,
  /// `(bank_id, theme, count)`, most frequent first within a bank.
  pub themes:    Vec<(i64, String, i64)>,
}

impl RawComparison {
  pub fn into_comparisons(self) -> Vec<BankComparison> {
    let mut ratings: HashMap<BankId, Vec<RatingCount>> = HashMap::new();
    for (bank_id, rating, n) in self.ratings {
      ratings
        .entry(bank_id)
        .or_default()
        .push(RatingCount { rating, count: count(n) });
    }

    let mut themes: HashMap<BankId, Vec<ThemeCount>> = HashMap::new();
    for (bank_id, theme, n) in self.themes {
      themes
        .entry(bank_id)
        .or_default()
        .push(ThemeCount { theme, count: count(n) });
    }

    self
      .summaries
      .into_iter()
      .map(|s| BankComparison {
        bank_id:             s.bank_id,
        bank_name:           s.bank_name,
        app_name:            s.app_name,
        total_reviews:       count(s.total_reviews),
        avg_rating:          s.avg_rating,
        avg_sentiment:       s.avg_sentiment,
        positive_count:      count(s.positive_count),
        negative_count:      count(s.negative_count),
        rating_distribution: ratings.remove(&s.bank_id).unwrap_or_default(),
        common_themes:       themes.remove(&s.bank_id).unwrap_or_default(),
      })
      .collect()
  }
}

/// One `(bank, month)` group of labelled, dated reviews.
pub struct RawTrend {
  pub bank_id:   i64,
  pub bank_name: String,
  /// `YYYY-MM-01`
  pub month:     String,
  pub positive:  i64,
  pub neutral:   i64,
  pub negative:  i64,
}

impl RawTrend {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      bank_id:   row.get(0)?,
      bank_name: row.get(1)?,
      month:     row.get(2)?,
      positive:  row.get(3)?,
      neutral:   row.get(4)?,
      negative:  row.get(5)?,
    })
  }

  pub fn into_trend(self) -> Result<SentimentTrend> {
    Ok(SentimentTrend {
      bank_id:   self.bank_id,
      bank_name: self.bank_name,
      month:     decode_date(&self.month)?,
      positive:  count(self.positive),
      neutral:   count(self.neutral),
      negative:  count(self.negative),
    })
  }
}

/// Fold `(table, column)` rows, already ordered by table, into one entry per
/// table.
pub fn group_columns(rows: Vec<(String, String)>) -> Vec<TableStructure> {
  let mut tables: Vec<TableStructure> = Vec::new();
  for (table_name, column) in rows {
    match tables.last_mut() {
      Some(last) if last.table_name == table_name => last.columns.push(column),
      _ => tables.push(TableStructure { table_name, columns: vec![column] }),
    }
  }
  tables
}
