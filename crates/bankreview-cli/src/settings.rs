//! Layered configuration: optional TOML file, then `BANKREVIEW_*` environment
//! variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use bankreview_core::integrity::VerifyThresholds;
use serde::Deserialize;

/// Runtime configuration, deserialised from `bankreview.toml` and the
/// environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  #[serde(default)]
  pub verify:     VerifyThresholds,
}

fn default_store_path() -> PathBuf { PathBuf::from("bank_reviews.db") }

impl Settings {
  /// Read `path` (if it exists) and overlay environment variables such as
  /// `BANKREVIEW_STORE_PATH` or `BANKREVIEW_VERIFY__MIN_TOTAL`.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("BANKREVIEW")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;

    let mut settings: Self = settings
      .try_deserialize()
      .context("failed to deserialise Settings")?;
    settings.store_path = expand_tilde(&settings.store_path);
    Ok(settings)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn file_overrides_defaults() {
    let path = std::env::temp_dir()
      .join(format!("bankreview-settings-{}.toml", std::process::id()));
    std::fs::write(
      &path,
      "store_path = \"/var/lib/reviews.db\"\n\n[verify]\nmin_per_bank = 50\n",
    )
    .unwrap();

    let settings = Settings::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(settings.store_path, PathBuf::from("/var/lib/reviews.db"));
    assert_eq!(settings.verify.min_per_bank, 50);
    // Unset keys keep their defaults.
    assert_eq!(settings.verify.target_total, 1000);
    assert_eq!(settings.verify.min_total, 400);
  }

  #[test]
  fn expand_tilde_leaves_plain_paths() {
    assert_eq!(
      expand_tilde(Path::new("data/reviews.db")),
      PathBuf::from("data/reviews.db")
    );
  }
}
