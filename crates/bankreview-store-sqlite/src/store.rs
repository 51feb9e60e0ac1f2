//! [`SqliteStore`]: the SQLite implementation of [`ReviewStore`].

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::OptionalExtension as _;

use bankreview_core::{
  bank::{Bank, BankId, NewBank},
  comparison::{BankComparison, TOP_THEMES},
  integrity::{IntegrityReport, TableStructure},
  performance::BankPerformance,
  review::{DEFAULT_SOURCE, Enrichment, NewReview, Review, ReviewId},
  store::{ReviewQuery, ReviewStore},
  trends::SentimentTrend,
};

use crate::{
  Error, Result,
  encode::{
    BANK_COLUMNS, PERFORMANCE_COLUMNS, REVIEW_COLUMNS, RawBank, RawBankSummary,
    RawComparison, RawIntegrity, RawPerformance, RawReview, RawTrend, encode_date,
    encode_keywords, encode_label, group_columns,
  },
  error::{Constraint, classify, violated_constraint},
  schema::SCHEMA,
};

const DEFAULT_LIMIT: usize = 100;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A review store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::info!(path = %path.display(), "opened review store");
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// The schema version recorded in `PRAGMA user_version`.
  pub async fn schema_version(&self) -> Result<i64> {
    let version = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("PRAGMA user_version", [], |r| r.get(0))?)
      })
      .await?;
    Ok(version)
  }
}

// ─── ReviewStore impl ────────────────────────────────────────────────────────

impl ReviewStore for SqliteStore {
  type Error = Error;

  // ── Banks ─────────────────────────────────────────────────────────────────

  async fn add_bank(&self, input: NewBank) -> Result<Bank> {
    let bank_name = input.bank_name.clone();
    let app_name  = input.app_name.clone();

    let raw: RawBank = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO banks (bank_name, app_name) VALUES (?1, ?2)
             RETURNING {BANK_COLUMNS}"
          ),
          rusqlite::params![bank_name, app_name],
          RawBank::from_row,
        )?)
      })
      .await
      .map_err(|e| match violated_constraint(&e) {
        Some((Constraint::Unique, _)) => Error::DuplicateBank {
          bank_name: input.bank_name,
          app_name:  input.app_name,
        },
        _ => classify(e),
      })?;

    let bank = raw.into_bank()?;
    tracing::debug!(bank_id = bank.bank_id, bank_name = %bank.bank_name, "added bank");
    Ok(bank)
  }

  async fn get_bank(&self, id: BankId) -> Result<Option<Bank>> {
    let raw: Option<RawBank> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {BANK_COLUMNS} FROM banks WHERE bank_id = ?1"),
              rusqlite::params![id],
              RawBank::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawBank::into_bank).transpose()
  }

  async fn find_bank(&self, bank_name: &str, app_name: &str) -> Result<Option<Bank>> {
    let bank_name = bank_name.to_owned();
    let app_name  = app_name.to_owned();

    let raw: Option<RawBank> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {BANK_COLUMNS} FROM banks
                 WHERE bank_name = ?1 AND app_name = ?2"
              ),
              rusqlite::params![bank_name, app_name],
              RawBank::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawBank::into_bank).transpose()
  }

  async fn get_or_add_bank(&self, input: NewBank) -> Result<Bank> {
    if let Some(bank) = self.find_bank(&input.bank_name, &input.app_name).await? {
      return Ok(bank);
    }

    // Another writer may have inserted the pair since the lookup.
    match self.add_bank(input).await {
      Err(Error::DuplicateBank { bank_name, app_name }) => {
        let existing = self.find_bank(&bank_name, &app_name).await?;
        existing.ok_or(Error::DuplicateBank { bank_name, app_name })
      }
      other => other,
    }
  }

  async fn list_banks(&self) -> Result<Vec<Bank>> {
    let raws: Vec<RawBank> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {BANK_COLUMNS} FROM banks ORDER BY bank_id"))?;
        let rows = stmt
          .query_map([], RawBank::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBank::into_bank).collect()
  }

  async fn delete_bank(&self, id: BankId) -> Result<usize> {
    let (deleted, reviews): (usize, i64) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let reviews: i64 = tx.query_row(
          "SELECT COUNT(*) FROM reviews WHERE bank_id = ?1",
          rusqlite::params![id],
          |r| r.get(0),
        )?;
        let deleted =
          tx.execute("DELETE FROM banks WHERE bank_id = ?1", rusqlite::params![id])?;
        tx.commit()?;
        Ok((deleted, reviews))
      })
      .await?;

    if deleted == 0 {
      return Err(Error::BankNotFound(id));
    }

    let removed = usize::try_from(reviews).unwrap_or(0);
    tracing::debug!(bank_id = id, removed, "deleted bank and its reviews");
    Ok(removed)
  }

  // ── Reviews ───────────────────────────────────────────────────────────────

  async fn add_review(&self, input: NewReview) -> Result<Review> {
    let bank_id         = input.bank_id;
    let review_text     = input.review_text;
    let rating          = input.rating.map(f64::from);
    let review_date     = input.review_date.map(encode_date);
    let sentiment_label = input.sentiment_label.map(encode_label);
    let sentiment_score = input.sentiment_score.map(f64::from);
    let source          = input.source.unwrap_or_else(|| DEFAULT_SOURCE.to_owned());
    let cleaned_text    = input.cleaned_text;
    let keywords        = input.keywords.as_deref().map(encode_keywords).transpose()?;
    let theme           = input.theme;

    let raw: RawReview = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO reviews (
               bank_id, review_text, rating, review_date,
               sentiment_label, sentiment_score, source,
               cleaned_text, keywords, theme
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             RETURNING {REVIEW_COLUMNS}"
          ),
          rusqlite::params![
            bank_id,
            review_text,
            rating,
            review_date,
            sentiment_label,
            sentiment_score,
            source,
            cleaned_text,
            keywords,
            theme,
          ],
          RawReview::from_row,
        )?)
      })
      .await
      .map_err(|e| match violated_constraint(&e) {
        Some((Constraint::ForeignKey, _)) => Error::BankNotFound(bank_id),
        _ => classify(e),
      })?;

    let review = raw.into_review()?;
    tracing::debug!(review_id = review.review_id, bank_id, "added review");
    Ok(review)
  }

  async fn get_review(&self, id: ReviewId) -> Result<Option<Review>> {
    let raw: Option<RawReview> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE review_id = ?1"),
              rusqlite::params![id],
              RawReview::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawReview::into_review).transpose()
  }

  async fn list_reviews(&self, query: &ReviewQuery) -> Result<Vec<Review>> {
    let bank_id    = query.bank_id;
    let sentiment  = query.sentiment.map(encode_label);
    let min_rating = query.min_rating;
    let from_date  = query.from_date.map(encode_date);
    let until_date = query.until_date.map(encode_date);
    // SQLite reads a negative LIMIT as unbounded and a negative OFFSET as 0,
    // so oversized values saturate instead of wrapping.
    let limit_val  =
      i64::try_from(query.limit.unwrap_or(DEFAULT_LIMIT)).unwrap_or(i64::MAX);
    let offset_val = i64::try_from(query.offset.unwrap_or(0)).unwrap_or(i64::MAX);

    let raws: Vec<RawReview> = self
      .conn
      .call(move |conn| {
        // Each filter is disabled by binding NULL.
        let mut stmt = conn.prepare(&format!(
          "SELECT {REVIEW_COLUMNS} FROM reviews
           WHERE (?1 IS NULL OR bank_id = ?1)
             AND (?2 IS NULL OR sentiment_label = ?2)
             AND (?3 IS NULL OR rating >= ?3)
             AND (?4 IS NULL OR review_date >= ?4)
             AND (?5 IS NULL OR review_date <= ?5)
           ORDER BY review_id
           LIMIT ?6 OFFSET ?7"
        ))?;

        let rows = stmt
          .query_map(
            rusqlite::params![
              bank_id,
              sentiment,
              min_rating,
              from_date,
              until_date,
              limit_val,
              offset_val,
            ],
            RawReview::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReview::into_review).collect()
  }

  async fn enrich_review(&self, id: ReviewId, enrichment: Enrichment) -> Result<Review> {
    let sentiment_label = enrichment.sentiment_label.map(encode_label);
    let sentiment_score = enrichment.sentiment_score.map(f64::from);
    let cleaned_text    = enrichment.cleaned_text;
    let keywords        = enrichment
      .keywords
      .as_deref()
      .map(encode_keywords)
      .transpose()?;
    let theme           = enrichment.theme;

    let raw: Option<RawReview> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "UPDATE reviews SET
                   sentiment_label = COALESCE(?2, sentiment_label),
                   sentiment_score = COALESCE(?3, sentiment_score),
                   cleaned_text    = COALESCE(?4, cleaned_text),
                   keywords        = COALESCE(?5, keywords),
                   theme           = COALESCE(?6, theme)
                 WHERE review_id = ?1
                 RETURNING {REVIEW_COLUMNS}"
              ),
              rusqlite::params![
                id,
                sentiment_label,
                sentiment_score,
                cleaned_text,
                keywords,
                theme,
              ],
              RawReview::from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(classify)?;

    let review = raw.ok_or(Error::ReviewNotFound(id))?.into_review()?;
    tracing::debug!(review_id = id, "enriched review");
    Ok(review)
  }

  // ── Analytics ─────────────────────────────────────────────────────────────

  async fn bank_performance(&self) -> Result<Vec<BankPerformance>> {
    let raws: Vec<RawPerformance> = self
      .conn
      .call(|conn| {
        // The view's ORDER BY is not guaranteed to survive an outer SELECT.
        let mut stmt = conn.prepare(&format!(
          "SELECT {PERFORMANCE_COLUMNS} FROM bank_performance
           ORDER BY avg_rating DESC NULLS LAST, bank_id"
        ))?;
        let rows = stmt
          .query_map([], RawPerformance::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerformance::into_performance).collect()
  }

  async fn integrity_report(&self, today: NaiveDate) -> Result<IntegrityReport> {
    let today_str = encode_date(today);

    let raw: RawIntegrity = self
      .conn
      .call(move |conn| {
        let total_reviews: i64 =
          conn.query_row("SELECT COUNT(*) FROM reviews", [], |r| r.get(0))?;

        let per_bank: Vec<(String, String, i64)> = conn
          .prepare(
            "SELECT b.bank_name, b.app_name, COUNT(r.review_id) AS n
             FROM banks b
             LEFT JOIN reviews r ON r.bank_id = b.bank_id
             GROUP BY b.bank_id
             ORDER BY n DESC, b.bank_id",
          )?
          .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let sentiment: Vec<(String, i64)> = conn
          .prepare(
            "SELECT sentiment_label, COUNT(*) AS n
             FROM reviews
             WHERE sentiment_label IS NOT NULL
             GROUP BY sentiment_label
             ORDER BY n DESC, sentiment_label",
          )?
          .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let (earliest, latest): (Option<String>, Option<String>) = conn.query_row(
          "SELECT MIN(review_date), MAX(review_date) FROM reviews",
          [],
          |r| Ok((r.get(0)?, r.get(1)?)),
        )?;

        let (missing_text, missing_rating, missing_sentiment, future_dates): (i64, i64, i64, i64) =
          conn.query_row(
            "SELECT
               COUNT(CASE WHEN review_text IS NULL OR review_text = '' THEN 1 END),
               COUNT(CASE WHEN rating IS NULL THEN 1 END),
               COUNT(CASE WHEN sentiment_score IS NULL THEN 1 END),
               COUNT(CASE WHEN review_date > ?1 THEN 1 END)
             FROM reviews",
            rusqlite::params![today_str],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
          )?;

        Ok(RawIntegrity {
          total_reviews,
          per_bank,
          sentiment,
          earliest,
          latest,
          missing_text,
          missing_rating,
          missing_sentiment,
          future_dates,
        })
      })
      .await?;

    raw.into_report()
  }

  async fn compare_banks(&self) -> Result<Vec<BankComparison>> {
    let top_themes = i64::try_from(TOP_THEMES).unwrap_or(i64::MAX);

    let raw: RawComparison = self
      .conn
      .call(move |conn| {
        let summaries: Vec<RawBankSummary> = conn
          .prepare(
            "SELECT
               b.bank_id,
               b.bank_name,
               b.app_name,
               COUNT(*),
               ROUND(AVG(r.rating), 2),
               ROUND(AVG(r.sentiment_score), 3),
               COUNT(CASE WHEN r.sentiment_label = 'positive' THEN 1 END),
               COUNT(CASE WHEN r.sentiment_label = 'negative' THEN 1 END)
             FROM reviews r
             JOIN banks b ON b.bank_id = r.bank_id
             GROUP BY b.bank_id
             ORDER BY b.bank_id",
          )?
          .query_map([], RawBankSummary::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let ratings: Vec<(i64, f64, i64)> = conn
          .prepare(
            "SELECT bank_id, rating, COUNT(*)
             FROM reviews
             WHERE rating IS NOT NULL
             GROUP BY bank_id, rating
             ORDER BY bank_id, rating",
          )?
          .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let themes: Vec<(i64, String, i64)> = conn
          .prepare(
            "SELECT bank_id, theme, n FROM (
               SELECT
                 bank_id,
                 theme,
                 COUNT(*) AS n,
                 ROW_NUMBER() OVER (
                   PARTITION BY bank_id ORDER BY COUNT(*) DESC, theme
                 ) AS position
               FROM reviews
               WHERE theme IS NOT NULL
               GROUP BY bank_id, theme
             )
             WHERE position <= ?1
             ORDER BY bank_id, position",
          )?
          .query_map(rusqlite::params![top_themes], |r| {
            Ok((r.get(0)?, r.get(1)?, r.get(2)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(RawComparison { summaries, ratings, themes })
      })
      .await?;

    Ok(raw.into_comparisons())
  }

  async fn sentiment_trends(&self) -> Result<Vec<SentimentTrend>> {
    let raws: Vec<RawTrend> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT
             b.bank_id,
             b.bank_name,
             strftime('%Y-%m-01', r.review_date) AS month,
             COUNT(CASE WHEN r.sentiment_label = 'positive' THEN 1 END),
             COUNT(CASE WHEN r.sentiment_label = 'neutral'  THEN 1 END),
             COUNT(CASE WHEN r.sentiment_label = 'negative' THEN 1 END)
           FROM reviews r
           JOIN banks b ON b.bank_id = r.bank_id
           WHERE r.review_date IS NOT NULL AND r.sentiment_label IS NOT NULL
           GROUP BY b.bank_id, month
           ORDER BY b.bank_id, month",
        )?;
        let rows = stmt
          .query_map([], RawTrend::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTrend::into_trend).collect()
  }

  async fn table_structure(&self) -> Result<Vec<TableStructure>> {
    let rows: Vec<(String, String)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT m.name, c.name
           FROM sqlite_master m
           JOIN pragma_table_info(m.name) c
           WHERE m.type IN ('table', 'view') AND m.name NOT LIKE 'sqlite_%'
           ORDER BY m.name, c.cid",
        )?;
        let rows = stmt
          .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(group_columns(rows))
  }
}
