//! Typed view of the merged `config.toml`.

use std::path::PathBuf;

use anyhow::{
  Context,
  Result,
};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
  pub start_directory:     String,
  pub confirm_destructive: bool,
  pub confirm_word:        String,
  pub highlight_matches:   bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      start_directory:     String::new(),
      confirm_destructive: true,
      confirm_word:        "sudo".to_string(),
      highlight_matches:   true,
    }
  }
}

impl Config {
  /// Built-in defaults merged with the user's config file.
  pub fn load() -> Result<Self> {
    let value = the_loader::config::user_config()
      .map_err(|err| anyhow::anyhow!("{err:#}"))
      .context("failed to load config")?;
    Self::from_value(value)
  }

  pub fn from_value(value: toml::Value) -> Result<Self> {
    value.try_into().context("invalid config")
  }

  /// Start directory from the config, with `~` expanded. `None` when unset.
  pub fn start_path(&self) -> Option<PathBuf> {
    let dir = self.start_directory.trim();
    if dir.is_empty() {
      return None;
    }
    Some(the_stdx::path::expand_tilde(std::path::Path::new(dir)).into_owned())
  }
}
