//! Error types for `bankreview-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("rating {0} is outside the range [1, 5]")]
  InvalidRating(f64),

  #[error("sentiment score {0} is outside the range [-1, 1]")]
  InvalidSentimentScore(f64),

  #[error("unknown sentiment label: {0:?}")]
  UnknownSentimentLabel(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
