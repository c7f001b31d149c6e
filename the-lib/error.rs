use std::{
  io,
  path::{
    Path,
    PathBuf,
  },
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExplorerError {
  #[error("not a readable directory: {}", .0.display())]
  InvalidDirectory(PathBuf),
  #[error("invalid name: {0:?}")]
  InvalidName(String),
  #[error("already exists: {}", .0.display())]
  AlreadyExists(PathBuf),
  #[error("not found: {}", .0.display())]
  NotFound(PathBuf),
  #[error("{}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("{} could not be removed, {failures} entries left behind", path.display())]
  IncompleteDelete { path: PathBuf, failures: usize },
  #[error("no folder selected")]
  NoDirectory,
  #[error("nothing selected")]
  NoSelection,
  #[error("not a file: {}", .0.display())]
  NotAFile(PathBuf),
  #[error("not a directory: {}", .0.display())]
  NotADirectory(PathBuf),
  #[error("no file loaded")]
  NotLoaded,
  #[error("edit mode is off")]
  NotEditing,
}

pub type Result<T> = std::result::Result<T, ExplorerError>;

impl ExplorerError {
  /// Classify an io error raised while operating on `path`.
  pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
    let path = path.as_ref().to_path_buf();
    match source.kind() {
      io::ErrorKind::NotFound => Self::NotFound(path),
      io::ErrorKind::AlreadyExists => Self::AlreadyExists(path),
      _ => Self::Io { path, source },
    }
  }
}
