//! Line-oriented terminal shell for the-explorer.
//!
//! Lists the current directory, runs one explorer command per line and prints
//! the outcome. Logs go to a file so they never interleave with the shell.

mod cli;
mod config;
mod ctx;
mod dispatch;
mod render;

use std::io;

use anyhow::{
  Context,
  Result,
};

use crate::{
  cli::CliOptions,
  config::Config,
  ctx::Ctx,
};

fn setup_logging(verbosity: u8) -> Result<()> {
  let mut base_config = fern::Dispatch::new();

  base_config = match verbosity {
    0 => base_config.level(log::LevelFilter::Warn),
    1 => base_config.level(log::LevelFilter::Info),
    2 => base_config.level(log::LevelFilter::Debug),
    _3_or_more => base_config.level(log::LevelFilter::Trace),
  };

  let log_file = the_loader::log_file();
  let file_config = fern::Dispatch::new()
    .format(|out, message, record| {
      out.finish(format_args!(
        "{} {} [{}] {}",
        chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
        record.target(),
        record.level(),
        message
      ))
    })
    .chain(
      fern::log_file(&log_file)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?,
    );

  base_config
    .chain(file_config)
    .apply()
    .context("failed to install logger")?;
  Ok(())
}

fn main() -> Result<()> {
  let cli = CliOptions::parse()?;
  if cli.display_version {
    println!("the-explorer {}", env!("CARGO_PKG_VERSION"));
    return Ok(());
  }

  the_loader::initialize_config_file(cli.config_file.clone());
  the_loader::initialize_log_file(cli.log_file.clone());
  setup_logging(cli.verbosity)?;

  let config = Config::load()?;
  let start_directory = match cli.start_directory.or_else(|| config.start_path()) {
    Some(dir) => Some(dir),
    None => the_stdx::env::current_working_dir()
      .map_err(|err| log::warn!("no working directory: {err}"))
      .ok(),
  };
  log::info!("starting in {:?}", start_directory);

  let mut ctx = Ctx::new(start_directory, config);
  let mut input = io::stdin().lock();
  let mut out = io::stdout().lock();
  ctx.run(&mut input, &mut out)
}
