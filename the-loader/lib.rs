pub mod config;

use std::{
  borrow::Cow,
  path::{
    Path,
    PathBuf,
  },
  sync::OnceLock,
};

use etcetera::base_strategy::{
  BaseStrategy,
  choose_base_strategy,
};
use the_stdx::{
  env::path_from_env,
  path,
};

const APP_DIR: &str = "the-explorer";

static CONFIG_FILE: OnceLock<PathBuf> = OnceLock::new();

static LOG_FILE: OnceLock<PathBuf> = OnceLock::new();

pub fn initialize_config_file(specified_file: Option<PathBuf>) {
  let config_file = specified_file.unwrap_or_else(default_config_file);
  ensure_parent_dir(&config_file);
  CONFIG_FILE.set(config_file).ok();
}

pub fn initialize_log_file(specified_file: Option<PathBuf>) {
  let log_file = specified_file.unwrap_or_else(default_log_file);
  ensure_parent_dir(&log_file);
  LOG_FILE.set(log_file).ok();
}

/// User config directory, overridable with `THE_EXPLORER_CONFIG_DIR`.
pub fn config_dir() -> PathBuf {
  if let Some(dir) = path_from_env("THE_EXPLORER_CONFIG_DIR") {
    return path::expand_tilde(Cow::Owned(dir)).into_owned();
  }
  match choose_base_strategy() {
    Ok(strategy) => strategy.config_dir().join(APP_DIR),
    Err(err) => {
      log::warn!("unable to find the config directory: {err}");
      PathBuf::from(APP_DIR)
    },
  }
}

/// User cache directory, overridable with `THE_EXPLORER_CACHE_DIR`.
pub fn cache_dir() -> PathBuf {
  if let Some(dir) = path_from_env("THE_EXPLORER_CACHE_DIR") {
    return path::expand_tilde(Cow::Owned(dir)).into_owned();
  }
  match choose_base_strategy() {
    Ok(strategy) => strategy.cache_dir().join(APP_DIR),
    Err(err) => {
      log::warn!("unable to find the cache directory: {err}");
      PathBuf::from(APP_DIR)
    },
  }
}

pub fn config_file() -> PathBuf {
  CONFIG_FILE
    .get_or_init(|| {
      let path = default_config_file();
      ensure_parent_dir(&path);
      path
    })
    .clone()
}

pub fn log_file() -> PathBuf {
  LOG_FILE
    .get_or_init(|| {
      let path = default_log_file();
      ensure_parent_dir(&path);
      path
    })
    .clone()
}

pub fn default_log_file() -> PathBuf {
  cache_dir().join("the-explorer.log")
}

/// Merge two TOML documents, merging values from `right` onto `left`
///
/// `merge_depth` sets the nesting depth up to which values are merged instead
/// of overridden.
///
/// When a table exists in both `left` and `right`, the merged table consists of
/// all keys in `left`'s table unioned with all keys in `right` with the values
/// of `right` being merged recursively onto values of `left`. Any other value
/// in `right`, arrays included, replaces the one in `left`.
pub fn merge_toml_values(left: toml::Value, right: toml::Value, merge_depth: usize) -> toml::Value {
  use toml::Value;

  match (left, right) {
    (Value::Table(mut left_map), Value::Table(right_map)) => {
      if merge_depth > 0 {
        for (rname, rvalue) in right_map {
          match left_map.remove(&rname) {
            Some(lvalue) => {
              let merged_value = merge_toml_values(lvalue, rvalue, merge_depth - 1);
              left_map.insert(rname, merged_value);
            },
            None => {
              left_map.insert(rname, rvalue);
            },
          }
        }
        Value::Table(left_map)
      } else {
        Value::Table(right_map)
      }
    },
    (_, value) => value,
  }
}

fn default_config_file() -> PathBuf {
  config_dir().join("config.toml")
}

fn ensure_parent_dir(path: &Path) {
  if let Some(parent) = path.parent()
    && !parent.exists()
    && let Err(err) = std::fs::create_dir_all(parent)
  {
    log::warn!("failed to create {}: {}", parent.display(), err);
  }
}

#[cfg(test)]
mod merge_toml_tests {
  use toml::Value;

  use super::merge_toml_values;

  #[test]
  fn user_keys_override_defaults() {
    let base: Value = toml::from_str(
      r#"
        confirm-destructive = true
        confirm-word = "sudo"
        "#,
    )
    .unwrap();
    let user: Value = toml::from_str(r#"confirm-word = "yes""#).unwrap();

    let merged = merge_toml_values(base, user, 3);
    assert_eq!(
      merged.get("confirm-word").unwrap().as_str().unwrap(),
      "yes"
    );
    assert!(
      merged
        .get("confirm-destructive")
        .unwrap()
        .as_bool()
        .unwrap()
    );
  }

  #[test]
  fn user_arrays_replace_default_arrays() {
    let base: Value = toml::from_str("hidden = [\"a\", \"b\"]").unwrap();
    let user: Value = toml::from_str("hidden = [\"c\"]").unwrap();

    let merged = merge_toml_values(base, user, 3);
    let hidden = merged.get("hidden").unwrap().as_array().unwrap();
    assert_eq!(hidden.len(), 1);
    assert_eq!(hidden[0].as_str(), Some("c"));
  }

  #[test]
  fn zero_depth_replaces_tables() {
    let base: Value = toml::from_str("a = 1\nb = 2").unwrap();
    let user: Value = toml::from_str("a = 3").unwrap();

    let merged = merge_toml_values(base, user, 0);
    assert!(merged.get("b").is_none());
    assert_eq!(merged.get("a").unwrap().as_integer(), Some(3));
  }
}
