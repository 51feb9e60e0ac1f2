//! `bankreview`: create, inspect and verify a bank review store.
//!
//! # Usage
//!
//! ```
//! bankreview init
//! bankreview add-bank "Commercial Bank of Ethiopia" "CBE Mobile"
//! bankreview add-review --bank-id 1 --text "Fast transfers" --rating 5
//! bankreview performance
//! bankreview compare
//! bankreview trends
//! bankreview --config ~/.config/bankreview.toml verify
//! ```

mod report;
mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use bankreview_core::{
  bank::NewBank,
  integrity::Assessment,
  review::{NewReview, Rating, SentimentLabel, SentimentScore},
  store::ReviewStore,
};
use bankreview_store_sqlite::SqliteStore;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Bank app review store")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "bankreview.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Create the schema in the configured store (idempotent).
  Init,

  /// Insert a bank/app pairing.
  AddBank { bank_name: String, app_name: String },

  /// Insert a single review.
  AddReview {
    #[arg(long)]
    bank_id:   i64,
    #[arg(long)]
    text:      String,
    /// Star rating in [1, 5].
    #[arg(long)]
    rating:    Option<f64>,
    /// Review date as YYYY-MM-DD.
    #[arg(long)]
    date:      Option<NaiveDate>,
    /// One of positive, neutral, negative.
    #[arg(long)]
    sentiment: Option<String>,
    /// Sentiment score in [-1, 1].
    #[arg(long, allow_negative_numbers = true)]
    score:     Option<f64>,
    #[arg(long)]
    source:    Option<String>,
    /// May be repeated; order is preserved.
    #[arg(long = "keyword")]
    keywords:  Vec<String>,
    #[arg(long)]
    theme:     Option<String>,
  },

  /// List all banks.
  Banks,

  /// Delete a bank and, by cascade, all of its reviews.
  DeleteBank { bank_id: i64 },

  /// Print the bank_performance view.
  Performance,

  /// Compare banks by rating histogram, sentiment shares and top themes.
  Compare,

  /// Print monthly sentiment counts per bank.
  Trends,

  /// Print verification statistics and an overall assessment.
  Verify,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;

  match cli.command {
    Command::Init => {
      let version = store.schema_version().await?;
      tracing::info!(version, "schema ready");
    }

    Command::AddBank { bank_name, app_name } => {
      let bank = store
        .add_bank(NewBank::new(bank_name, app_name))
        .await
        .context("failed to add bank")?;
      println!("{}", bank.bank_id);
    }

    Command::AddReview {
      bank_id,
      text,
      rating,
      date,
      sentiment,
      score,
      source,
      keywords,
      theme,
    } => {
      let mut input = NewReview::new(bank_id, text);
      input.rating = rating.map(Rating::new).transpose()?;
      input.review_date = date;
      input.sentiment_label =
        sentiment.as_deref().map(SentimentLabel::parse).transpose()?;
      input.sentiment_score = score.map(SentimentScore::new).transpose()?;
      input.source = source;
      input.keywords = (!keywords.is_empty()).then_some(keywords);
      input.theme = theme;

      let review = store
        .add_review(input)
        .await
        .context("failed to add review")?;
      println!("{}", review.review_id);
    }

    Command::Banks => {
      let banks = store.list_banks().await?;
      print!("{}", report::render_banks(&banks));
    }

    Command::DeleteBank { bank_id } => {
      let removed = store
        .delete_bank(bank_id)
        .await
        .with_context(|| format!("failed to delete bank {bank_id}"))?;
      tracing::info!(bank_id, removed, "deleted bank");
    }

    Command::Performance => {
      let rows = store.bank_performance().await?;
      print!("{}", report::render_performance(&rows));
    }

    Command::Compare => {
      let rows = store.compare_banks().await?;
      print!("{}", report::render_comparison(&rows));
    }

    Command::Trends => {
      let rows = store.sentiment_trends().await?;
      print!("{}", report::render_trends(&rows));
    }

    Command::Verify => {
      let today = Utc::now().date_naive();
      let integrity = store
        .integrity_report(today)
        .await
        .context("failed to gather statistics")?;
      let performance = store.bank_performance().await?;
      let tables = store.table_structure().await?;

      print!(
        "{}",
        report::render_verify(&integrity, &performance, &settings.verify)
      );
      print!("{}", report::render_tables(&tables));

      for bank in integrity.underfilled_banks(&settings.verify) {
        tracing::warn!(
          bank = %bank.bank_name,
          reviews = bank.review_count,
          minimum = settings.verify.min_per_bank,
          "bank below per-bank review minimum"
        );
      }
      if !integrity.quality.is_clean() {
        tracing::warn!(quality = ?integrity.quality, "data quality issues found");
      }
      if integrity.assess(&settings.verify) == Assessment::Incomplete {
        tracing::warn!(total = integrity.total_reviews, "store below minimum review count");
      }
    }
  }

  Ok(())
}
