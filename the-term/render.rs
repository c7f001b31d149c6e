//! Rendering - turns explorer state and outcomes into terminal text.

use std::{
  io::Write,
  ops::Range,
};

use anyhow::Result;
use crossterm::style::Stylize;
use the_lib::{
  command::Actions,
  entry::ListingRow,
  navigator::NavigationState,
};

/// The path bar shown above every listing.
pub fn path_bar(out: &mut impl Write, nav: &NavigationState) -> Result<()> {
  match nav.current_directory() {
    Some(dir) => writeln!(out, "{}", dir.display().to_string().bold())?,
    None => writeln!(out, "{}", "(no folder open)".dim())?,
  }
  Ok(())
}

pub fn listing(out: &mut impl Write, nav: &NavigationState, rows: &[ListingRow]) -> Result<()> {
  path_bar(out, nav)?;
  let selected = nav.selected();

  for row in rows {
    let marker = if Some(row) == selected { '>' } else { ' ' };
    let label = row.label();
    match row {
      ListingRow::Entry(entry) if entry.is_dir() => writeln!(out, "{marker} {}", label.blue())?,
      _ => writeln!(out, "{marker} {label}")?,
    }
  }
  Ok(())
}

/// Print `content`, styling every span in `highlights`.
///
/// Spans are byte ranges on char boundaries, sorted and disjoint.
pub fn text(out: &mut impl Write, content: &str, highlights: &[Range<usize>]) -> Result<()> {
  let mut cursor = 0;
  for span in highlights {
    write!(out, "{}", &content[cursor..span.start])?;
    let matched = &content[span.clone()];
    write!(out, "{}", matched.black().on_yellow())?;
    cursor = span.end;
  }
  write!(out, "{}", &content[cursor..])?;
  if !content.is_empty() && !content.ends_with('\n') {
    writeln!(out)?;
  }
  Ok(())
}

pub fn actions(out: &mut impl Write, actions: Actions) -> Result<()> {
  let names: Vec<_> = actions
    .iter_names()
    .map(|(name, _)| name.to_lowercase().replace('_', "-"))
    .collect();
  writeln!(out, "{}", names.join(" "))?;
  Ok(())
}

pub fn error(out: &mut impl Write, err: &dyn std::fmt::Display) -> Result<()> {
  writeln!(out, "{} {err}", "error:".red().bold())?;
  Ok(())
}
