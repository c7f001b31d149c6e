//! Rows of a directory listing.

use std::{
  fmt,
  fs,
  path::{
    Path,
    PathBuf,
  },
};

use the_stdx::path::file_name_lossy;

/// Display label of the synthetic "go up" row.
pub const PARENT_LABEL: &str = "../";

/// Display prefix that marks a row as a directory to step into.
pub const DIRECTORY_PREFIX: &str = "./";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
  File,
  Directory,
}

impl EntryKind {
  /// Kind of whatever `path` points to, following symlinks. `None` when
  /// nothing exists there.
  pub fn of(path: &Path) -> Option<Self> {
    let metadata = fs::metadata(path)
      .or_else(|_| fs::symlink_metadata(path))
      .ok()?;
    Some(Self::from_file_type(metadata.file_type()))
  }

  /// Everything that is not a directory is treated as a file.
  pub fn from_file_type(file_type: fs::FileType) -> Self {
    if file_type.is_dir() {
      Self::Directory
    } else {
      Self::File
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectoryEntry {
  pub name: String,
  pub kind: EntryKind,
  pub path: PathBuf,
}

impl DirectoryEntry {
  pub fn new(path: PathBuf, kind: EntryKind) -> Self {
    Self {
      name: file_name_lossy(&path),
      kind,
      path,
    }
  }

  pub fn is_dir(&self) -> bool {
    self.kind == EntryKind::Directory
  }

  pub fn is_file(&self) -> bool {
    self.kind == EntryKind::File
  }
}

/// A row of the listing shown for the current directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListingRow {
  /// Navigate to the parent of the current directory.
  Parent,
  Entry(DirectoryEntry),
}

impl ListingRow {
  pub fn entry(&self) -> Option<&DirectoryEntry> {
    match self {
      Self::Parent => None,
      Self::Entry(entry) => Some(entry),
    }
  }

  /// The legacy text label: `../` for the parent, `./name` for directories
  /// and the bare name for files.
  pub fn label(&self) -> String {
    match self {
      Self::Parent => PARENT_LABEL.to_string(),
      Self::Entry(entry) if entry.is_dir() => format!("{DIRECTORY_PREFIX}{}", entry.name),
      Self::Entry(entry) => entry.name.clone(),
    }
  }
}

impl fmt::Display for ListingRow {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.label())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn labels_follow_marker_convention() {
    let dir = ListingRow::Entry(DirectoryEntry::new(
      PathBuf::from("/tmp/src"),
      EntryKind::Directory,
    ));
    let file = ListingRow::Entry(DirectoryEntry::new(
      PathBuf::from("/tmp/notes.txt"),
      EntryKind::File,
    ));

    assert_eq!(ListingRow::Parent.label(), "../");
    assert_eq!(dir.label(), "./src");
    assert_eq!(file.label(), "notes.txt");
  }

  #[test]
  fn kind_of_missing_path_is_none() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    assert_eq!(EntryKind::of(&tmp.path().join("missing")), None);
    assert_eq!(EntryKind::of(tmp.path()), Some(EntryKind::Directory));
  }
}
