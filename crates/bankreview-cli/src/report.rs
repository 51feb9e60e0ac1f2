//! Plain-text rendering of store statistics for the terminal.
//!
//! Each renderer collects lines and joins them; the result always ends with a
//! newline.

use bankreview_core::{
  bank::Bank,
  comparison::BankComparison,
  integrity::{Assessment, IntegrityReport, TableStructure, VerifyThresholds},
  performance::BankPerformance,
  trends::SentimentTrend,
};

const RULE_WIDTH: usize = 60;

fn opt<T: std::fmt::Display>(v: Option<T>) -> String {
  v.map_or_else(|| "-".to_owned(), |v| v.to_string())
}

fn status(ok: bool) -> &'static str { if ok { "ok  " } else { "warn" } }

fn finish(lines: Vec<String>) -> String {
  let mut out = lines.join("\n");
  out.push('\n');
  out
}

pub fn render_banks(banks: &[Bank]) -> String {
  if banks.is_empty() {
    return String::new();
  }
  let lines = banks
    .iter()
    .map(|b| {
      format!(
        "{:>4}  {:<30} {:<30} {}",
        b.bank_id,
        b.bank_name,
        b.app_name,
        b.created_at.format("%Y-%m-%d %H:%M:%S")
      )
    })
    .collect();
  finish(lines)
}

/// One line per bank, best average rating first (as returned by the view).
pub fn render_performance(rows: &[BankPerformance]) -> String {
  let mut lines = vec![format!(
    "{:<24} {:>7} {:>6} {:>9} {:>5} {:>5} {:>5}  {}",
    "bank", "reviews", "rating", "sentiment", "pos", "neu", "neg", "dates"
  )];
  for r in rows {
    lines.push(format!(
      "{:<24} {:>7} {:>6} {:>9} {:>5} {:>5} {:>5}  {} .. {}",
      r.bank_name,
      r.total_reviews,
      opt(r.avg_rating.map(|v| format!("{v:.2}"))),
      opt(r.avg_sentiment.map(|v| format!("{v:.3}"))),
      r.positive_count,
      r.neutral_count,
      r.negative_count,
      opt(r.first_review_date),
      opt(r.last_review_date),
    ));
  }
  finish(lines)
}

/// Full verification output: counts, per-bank status, sentiment shares,
/// date range, data-quality checks and the overall verdict.
pub fn render_verify(
  report:      &IntegrityReport,
  performance: &[BankPerformance],
  thresholds:  &VerifyThresholds,
) -> String {
  let rule = "=".repeat(RULE_WIDTH);
  let mut lines = vec![
    rule.clone(),
    "DATABASE STATISTICS & VERIFICATION".to_owned(),
    rule.clone(),
    String::new(),
    format!(
      "Total reviews: {} [{}] ({} required, {} minimum)",
      report.total_reviews,
      status(report.total_reviews >= thresholds.target_total),
      thresholds.target_total,
      thresholds.min_total,
    ),
  ];

  lines.push(String::new());
  lines.push("Reviews per bank:".to_owned());
  for b in &report.reviews_per_bank {
    lines.push(format!(
      "  [{}] {} ({}): {} reviews",
      status(b.review_count >= thresholds.min_per_bank),
      b.bank_name,
      b.app_name,
      b.review_count,
    ));
  }

  lines.push(String::new());
  lines.push("Ratings & sentiment:".to_owned());
  for p in performance {
    lines.push(format!(
      "  {}: average rating {}/5, average sentiment {}",
      p.bank_name,
      opt(p.avg_rating.map(|v| format!("{v:.2}"))),
      opt(p.avg_sentiment.map(|v| format!("{v:.3}"))),
    ));
  }

  lines.push(String::new());
  lines.push("Sentiment distribution:".to_owned());
  for s in &report.sentiment_distribution {
    let pct = report.sentiment_percentage(s.label);
    let bar = "#".repeat((pct / 2.0) as usize);
    lines.push(format!(
      "  {:<10}: {:>4} reviews ({pct:5.1}%) {bar}",
      s.label.to_string().to_uppercase(),
      s.count,
    ));
  }

  if let Some(range) = report.date_range {
    lines.push(String::new());
    lines.push(format!("Date range: {} to {}", range.earliest, range.latest));
  }

  lines.push(String::new());
  lines.push("Data quality checks:".to_owned());
  for (name, issues) in report.quality.entries() {
    lines.push(format!(
      "  [{}] {name}: {issues} issues found",
      status(issues == 0)
    ));
  }

  let verdict = match report.assess(thresholds) {
    Assessment::Excellent => "EXCELLENT: all requirements exceeded",
    Assessment::Satisfactory => "SATISFACTORY: minimum requirements met",
    Assessment::Incomplete => "INCOMPLETE: minimum requirements not met",
  };
  lines.push(String::new());
  lines.push(format!("Overall assessment: {verdict}"));
  lines.push(rule);
  finish(lines)
}

/// A block per bank: headline metrics, the rating histogram and top themes.
pub fn render_comparison(rows: &[BankComparison]) -> String {
  let mut lines = Vec::new();
  for (i, b) in rows.iter().enumerate() {
    if i > 0 {
      lines.push(String::new());
    }
    lines.push(format!("{} ({})", b.bank_name, b.app_name));
    lines.push(format!(
      "  reviews {}, rating {}, sentiment {}, positive {:.1}%, negative {:.1}%",
      b.total_reviews,
      opt(b.avg_rating.map(|v| format!("{v:.2}"))),
      opt(b.avg_sentiment.map(|v| format!("{v:.3}"))),
      b.positive_pct(),
      b.negative_pct(),
    ));

    let ratings: Vec<_> = b
      .rating_distribution
      .iter()
      .map(|r| format!("{:.1}: {}", r.rating, r.count))
      .collect();
    let ratings = (!ratings.is_empty()).then(|| ratings.join(", "));
    lines.push(format!("  ratings: {}", opt(ratings)));

    let themes: Vec<_> = b
      .common_themes
      .iter()
      .map(|t| format!("{} ({})", t.theme, t.count))
      .collect();
    let themes = (!themes.is_empty()).then(|| themes.join(", "));
    lines.push(format!("  themes:  {}", opt(themes)));
  }
  if lines.is_empty() {
    return String::new();
  }
  finish(lines)
}

pub fn render_trends(rows: &[SentimentTrend]) -> String {
  let mut lines = vec![format!(
    "{:<24} {:<7} {:>5} {:>5} {:>5} {:>6} {:>6}",
    "bank", "month", "pos", "neu", "neg", "pos%", "neg%"
  )];
  for t in rows {
    lines.push(format!(
      "{:<24} {:<7} {:>5} {:>5} {:>5} {:>6.1} {:>6.1}",
      t.bank_name,
      t.month.format("%Y-%m"),
      t.positive,
      t.neutral,
      t.negative,
      t.positive_rate(),
      t.negative_rate(),
    ));
  }
  finish(lines)
}

/// Column counts per table, as appended to the verification output.
pub fn render_tables(tables: &[TableStructure]) -> String {
  let mut lines = vec!["Table structure:".to_owned()];
  for t in tables {
    lines.push(format!(
      "  {}: {} columns ({})",
      t.table_name,
      t.column_count(),
      t.columns.join(", ")
    ));
  }
  finish(lines)
}
