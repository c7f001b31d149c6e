use std::{
  path::Path,
  str::from_utf8,
};

use eyre::{
  Context,
  Result,
};

/// Default built-in config.
pub fn default_config() -> Result<toml::Value> {
  let default_config = include_bytes!("../default-config.toml");
  let config_str =
    from_utf8(default_config).context("built-in default-config.toml contains invalid UTF-8")?;
  toml::from_str(config_str).context("failed to parse built-in default-config.toml")
}

/// The user's config file merged over the defaults.
pub fn user_config() -> Result<toml::Value> {
  config_from(&crate::config_file())
}

/// `file` merged over the defaults. A missing file yields the defaults.
pub fn config_from(file: &Path) -> Result<toml::Value> {
  let default = default_config()?;

  let user = match std::fs::read_to_string(file) {
    Ok(text) => {
      toml::from_str(&text).with_context(|| format!("failed to parse {}", file.display()))?
    },
    Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
      log::debug!("no config at {}, using defaults", file.display());
      return Ok(default);
    },
    Err(err) => return Err(err).with_context(|| format!("failed to read {}", file.display())),
  };

  Ok(crate::merge_toml_values(default, user, 3))
}
