//! The `ReviewStore` trait and supporting query types.
//!
//! Implemented by storage backends (e.g. `bankreview-store-sqlite`). The CLI
//! depends on this abstraction for everything except opening the store.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  bank::{Bank, BankId, NewBank},
  comparison::BankComparison,
  integrity::{IntegrityReport, TableStructure},
  performance::BankPerformance,
  review::{Enrichment, NewReview, Review, ReviewId, SentimentLabel},
  trends::SentimentTrend,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`ReviewStore::list_reviews`]. Unset fields do not filter.
#[derive(Debug, Clone, Default)]
pub struct ReviewQuery {
  pub bank_id:     Option<BankId>,
  pub sentiment:   Option<SentimentLabel>,
  /// Inclusive lower bound on `rating`; unrated reviews never match.
  pub min_rating:  Option<f64>,
  /// Inclusive bounds on `review_date`; undated reviews never match.
  pub from_date:   Option<NaiveDate>,
  pub until_date:  Option<NaiveDate>,
  pub limit:       Option<usize>,
  pub offset:      Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a review store backend.
///
/// Banks are never mutated once created. Reviews are written once and later
/// enriched; both disappear only when their bank is deleted.
pub trait ReviewStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Banks ─────────────────────────────────────────────────────────────

  /// Persist a new bank/app pairing. Fails if the pair already exists.
  fn add_bank(
    &self,
    input: NewBank,
  ) -> impl Future<Output = Result<Bank, Self::Error>> + Send + '_;

  fn get_bank(
    &self,
    id: BankId,
  ) -> impl Future<Output = Result<Option<Bank>, Self::Error>> + Send + '_;

  /// Look a bank up by its unique (`bank_name`, `app_name`) pair.
  fn find_bank<'a>(
    &'a self,
    bank_name: &'a str,
    app_name: &'a str,
  ) -> impl Future<Output = Result<Option<Bank>, Self::Error>> + Send + 'a;

  /// Return the existing bank for the pair, creating it on first sight.
  fn get_or_add_bank(
    &self,
    input: NewBank,
  ) -> impl Future<Output = Result<Bank, Self::Error>> + Send + '_;

  /// All banks, ordered by id.
  fn list_banks(
    &self,
  ) -> impl Future<Output = Result<Vec<Bank>, Self::Error>> + Send + '_;

  /// Delete a bank together with all of its reviews. Returns the number of
  /// reviews removed by the cascade.
  fn delete_bank(
    &self,
    id: BankId,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Reviews ───────────────────────────────────────────────────────────

  /// Persist a review. The referenced bank must exist.
  fn add_review(
    &self,
    input: NewReview,
  ) -> impl Future<Output = Result<Review, Self::Error>> + Send + '_;

  fn get_review(
    &self,
    id: ReviewId,
  ) -> impl Future<Output = Result<Option<Review>, Self::Error>> + Send + '_;

  fn list_reviews<'a>(
    &'a self,
    query: &'a ReviewQuery,
  ) -> impl Future<Output = Result<Vec<Review>, Self::Error>> + Send + 'a;

  /// Write the provided enrichment fields onto an existing review and return
  /// the updated row.
  fn enrich_review(
    &self,
    id: ReviewId,
    enrichment: Enrichment,
  ) -> impl Future<Output = Result<Review, Self::Error>> + Send + '_;

  // ── Analytics ─────────────────────────────────────────────────────────

  /// Read the `bank_performance` view, best average rating first.
  fn bank_performance(
    &self,
  ) -> impl Future<Output = Result<Vec<BankPerformance>, Self::Error>> + Send + '_;

  /// Gather verification statistics. Reviews dated after `today` are
  /// counted as future-dated.
  fn integrity_report(
    &self,
    today: NaiveDate,
  ) -> impl Future<Output = Result<IntegrityReport, Self::Error>> + Send + '_;

  /// One entry per bank that has reviews, ordered by bank id.
  fn compare_banks(
    &self,
  ) -> impl Future<Output = Result<Vec<BankComparison>, Self::Error>> + Send + '_;

  /// Monthly label counts, ordered by bank id then month.
  fn sentiment_trends(
    &self,
  ) -> impl Future<Output = Result<Vec<SentimentTrend>, Self::Error>> + Send + '_;

  /// Columns of every table and view in the store, ordered by name.
  fn table_structure(
    &self,
  ) -> impl Future<Output = Result<Vec<TableStructure>, Self::Error>> + Send + '_;
}
