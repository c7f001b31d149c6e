//! Current-directory tracking and directory listings.
//!
//! Listings are recomputed from the filesystem on every call and never
//! cached. Enumeration problems are logged and degrade to an empty listing;
//! they never reach the caller as errors.

use std::{
  fs,
  io,
  path::{
    Component,
    Path,
    PathBuf,
  },
};

use the_stdx::path::canonicalize;

use crate::{
  ExplorerError,
  Result,
  entry::{
    DIRECTORY_PREFIX,
    DirectoryEntry,
    EntryKind,
    ListingRow,
    PARENT_LABEL,
  },
  file_ops,
  info::is_readable,
};

/// True iff `path` exists, is a directory and can be read.
pub fn is_valid_directory(path: &Path) -> bool {
  path.is_dir() && is_readable(path)
}

/// Direct children of `path`, in enumeration order.
pub fn read_children(path: &Path) -> io::Result<Vec<DirectoryEntry>> {
  let mut entries = Vec::new();

  for entry in fs::read_dir(path)? {
    let entry = entry?;
    let child = entry.path();
    // A child that vanished mid-listing is still shown as it was enumerated.
    let kind = EntryKind::of(&child).unwrap_or(EntryKind::File);
    entries.push(DirectoryEntry::new(child, kind));
  }

  Ok(entries)
}

/// The listing shown for `path`: the parent marker first when `path` has a
/// parent, then one row per direct child.
pub fn list_entries(path: &Path) -> Vec<ListingRow> {
  let path = canonicalize(path);
  if !is_valid_directory(&path) {
    log::debug!("not listing invalid directory {}", path.display());
    return Vec::new();
  }

  let children = match read_children(&path) {
    Ok(children) => children,
    Err(err) => {
      log::warn!("failed to list {}: {}", path.display(), err);
      return Vec::new();
    },
  };

  let mut rows = Vec::with_capacity(children.len() + 1);
  if path.parent().is_some() {
    rows.push(ListingRow::Parent);
  }
  rows.extend(children.into_iter().map(ListingRow::Entry));
  rows
}

/// Turn a listing label back into a row of `current_directory`.
///
/// Anything but `../` must name a direct child: `.`, `..` and names with a
/// separator are rejected before the filesystem is consulted.
pub fn resolve_selection(name: &str, current_directory: &Path) -> Result<ListingRow> {
  if name == PARENT_LABEL {
    return Ok(ListingRow::Parent);
  }

  let name = name.strip_prefix(DIRECTORY_PREFIX).unwrap_or(name);
  file_ops::validate_name(name)?;

  let path = current_directory.join(name);
  let kind = EntryKind::of(&path).ok_or_else(|| ExplorerError::NotFound(path.clone()))?;
  Ok(ListingRow::Entry(DirectoryEntry::new(path, kind)))
}

/// True when `path` is `dir` joined with one normal component.
fn is_child_of(path: &Path, dir: &Path) -> bool {
  matches!(path.components().next_back(), Some(Component::Normal(_)))
    && path.parent() == Some(dir)
}

/// The current directory and the row selected inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
  current_directory: Option<PathBuf>,
  selected:          Option<ListingRow>,
}

impl NavigationState {
  /// State with no directory chosen yet.
  pub fn new() -> Self {
    Self::default()
  }

  /// State seeded with `path`, or empty when `path` is not a valid directory.
  pub fn seeded(path: impl AsRef<Path>) -> Self {
    let mut state = Self::new();
    if let Err(err) = state.navigate(path) {
      log::warn!("could not open start directory: {err}");
    }
    state
  }

  pub fn current_directory(&self) -> Option<&Path> {
    self.current_directory.as_deref()
  }

  pub fn selected(&self) -> Option<&ListingRow> {
    self.selected.as_ref()
  }

  /// The selected entry, skipping the parent marker.
  pub fn selected_entry(&self) -> Option<&DirectoryEntry> {
    self.selected.as_ref().and_then(ListingRow::entry)
  }

  pub fn parent(&self) -> Option<&Path> {
    self.current_directory.as_deref().and_then(Path::parent)
  }

  /// Make `path` the current directory and return its listing.
  ///
  /// On failure the state is left exactly as it was.
  pub fn navigate(&mut self, path: impl AsRef<Path>) -> Result<Vec<ListingRow>> {
    let path = canonicalize(path);
    if !is_valid_directory(&path) {
      return Err(ExplorerError::InvalidDirectory(path));
    }

    log::debug!("navigating to {}", path.display());
    let listing = list_entries(&path);
    self.current_directory = Some(path);
    self.selected = None;
    Ok(listing)
  }

  /// Listing of the current directory, empty when none is set.
  pub fn listing(&self) -> Vec<ListingRow> {
    self
      .current_directory
      .as_deref()
      .map(list_entries)
      .unwrap_or_default()
  }

  /// Select a row of the current listing.
  pub fn select(&mut self, row: ListingRow) -> Result<()> {
    let current = self
      .current_directory
      .as_deref()
      .ok_or(ExplorerError::NoDirectory)?;

    if let ListingRow::Entry(entry) = &row {
      if !is_child_of(&entry.path, current) {
        return Err(ExplorerError::NotFound(entry.path.clone()));
      }
      if EntryKind::of(&entry.path).is_none() {
        return Err(ExplorerError::NotFound(entry.path.clone()));
      }
    }

    self.selected = Some(row);
    Ok(())
  }

  /// Resolve a listing label and select it.
  pub fn select_label(&mut self, label: &str) -> Result<ListingRow> {
    let current = self
      .current_directory
      .as_deref()
      .ok_or(ExplorerError::NoDirectory)?;
    let row = resolve_selection(label, current)?;
    self.select(row.clone())?;
    Ok(row)
  }

  pub fn clear_selection(&mut self) {
    self.selected = None;
  }
}
