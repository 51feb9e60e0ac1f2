//! SQL schema for the bank review store.
//!
//! Executed at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
///
/// `foreign_keys` is a per-connection setting in SQLite, so it lives here
/// rather than in a one-off migration.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS banks (
    bank_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    bank_name   TEXT NOT NULL,
    app_name    TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    UNIQUE (bank_name, app_name)
);

-- Enrichment columns (sentiment_*, cleaned_text, keywords, theme) are filled
-- in by the analysis step after the raw review lands.
--
-- Numbers must already be rounded to their precision (one decimal for rating,
-- three for sentiment_score, compared within float noise), dates must be real
-- `YYYY-MM-DD` calendar dates and keywords must be a JSON array.
CREATE TABLE IF NOT EXISTS reviews (
    review_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    bank_id         INTEGER NOT NULL REFERENCES banks(bank_id) ON DELETE CASCADE,
    review_text     TEXT NOT NULL,
    rating          REAL CHECK (
                        rating >= 1 AND rating <= 5
                        AND abs(rating - ROUND(rating, 1)) < 1e-9
                    ),
    review_date     TEXT CHECK (date(review_date) IS review_date),
    sentiment_label TEXT CHECK (sentiment_label IN ('positive', 'neutral', 'negative')),
    sentiment_score REAL CHECK (
                        sentiment_score >= -1 AND sentiment_score <= 1
                        AND abs(sentiment_score - ROUND(sentiment_score, 3)) < 1e-9
                    ),
    source          TEXT DEFAULT 'Google Play Store',
    cleaned_text    TEXT,
    keywords        TEXT CHECK (
                        keywords IS NULL OR CASE WHEN json_valid(keywords)
                                                 THEN json_type(keywords) = 'array'
                                                 ELSE 0
                                            END
                    ),
    theme           TEXT,
    created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_reviews_bank_id         ON reviews(bank_id);
CREATE INDEX IF NOT EXISTS idx_reviews_rating          ON reviews(rating);
CREATE INDEX IF NOT EXISTS idx_reviews_sentiment_score ON reviews(sentiment_score);
CREATE INDEX IF NOT EXISTS idx_reviews_review_date     ON reviews(review_date);

CREATE VIEW IF NOT EXISTS bank_performance AS
SELECT
    b.bank_id,
    b.bank_name,
    b.app_name,
    COUNT(r.review_id)                                         AS total_reviews,
    ROUND(AVG(r.rating), 2)                                    AS avg_rating,
    ROUND(AVG(r.sentiment_score), 3)                           AS avg_sentiment,
    COUNT(CASE WHEN r.sentiment_label = 'positive' THEN 1 END) AS positive_count,
    COUNT(CASE WHEN r.sentiment_label = 'neutral'  THEN 1 END) AS neutral_count,
    COUNT(CASE WHEN r.sentiment_label = 'negative' THEN 1 END) AS negative_count,
    MIN(r.review_date)                                         AS first_review_date,
    MAX(r.review_date)                                         AS last_review_date
FROM banks b
LEFT JOIN reviews r ON r.bank_id = b.bank_id
GROUP BY b.bank_id, b.bank_name, b.app_name
ORDER BY avg_rating DESC NULLS LAST, b.bank_id;

PRAGMA user_version = 1;
";

/// Value written by the final statement of [`SCHEMA`].
pub const SCHEMA_VERSION: i64 = 1;
