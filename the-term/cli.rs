use std::path::PathBuf;

use anyhow::Result;
use clap::{
  ArgAction,
  Parser,
};

#[derive(Clone, Debug)]
pub struct CliOptions {
  pub display_version: bool,
  pub verbosity:       u8,
  pub log_file:        Option<PathBuf>,
  pub config_file:     Option<PathBuf>,
  pub start_directory: Option<PathBuf>,
}

impl CliOptions {
  pub fn parse() -> Result<Self> {
    let raw = RawCli::parse();
    Ok(raw.into())
  }
}

#[derive(Parser, Debug)]
#[command(
  name = "the-explorer",
  about = "Browse directories, manage files and edit text from a terminal shell",
  long_about = None,
  version,
  disable_version_flag = true
)]
struct RawCli {
  /// Print version information
  #[arg(short = 'V', long = "version")]
  display_version: bool,

  /// Increase logging verbosity (repeat for more detail)
  #[arg(short = 'v', action = ArgAction::Count)]
  verbosity: u8,

  /// Save logs to a specific file
  #[arg(long = "log", value_name = "FILE", value_parser = parse_pathbuf)]
  log_file: Option<PathBuf>,

  /// Load configuration from a specific file
  #[arg(short = 'c', long = "config", value_name = "FILE", value_parser = parse_pathbuf)]
  config_file: Option<PathBuf>,

  /// Directory to list on startup
  #[arg(value_name = "DIR", value_parser = parse_pathbuf)]
  start_directory: Option<PathBuf>,
}

impl From<RawCli> for CliOptions {
  fn from(raw: RawCli) -> Self {
    Self {
      display_version: raw.display_version,
      verbosity:       raw.verbosity,
      log_file:        raw.log_file,
      config_file:     raw.config_file,
      start_directory: raw.start_directory,
    }
  }
}

fn parse_pathbuf(value: &str) -> std::result::Result<PathBuf, String> {
  let path = the_stdx::path::expand_tilde(std::path::Path::new(value));
  Ok(the_stdx::path::canonicalize(path))
}
