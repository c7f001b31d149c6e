//! Metadata summaries shown when a row is selected.

use std::{
  fmt,
  fs,
  path::{
    Path,
    PathBuf,
  },
  time::SystemTime,
};

use chrono::{
  DateTime,
  Local,
};
use the_stdx::path::file_name_lossy;

use crate::{
  ExplorerError,
  Result,
  navigator::read_children,
};

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

#[cfg(unix)]
pub fn is_readable(path: &Path) -> bool {
  rustix::fs::access(path, rustix::fs::Access::READ_OK).is_ok()
}

#[cfg(unix)]
pub fn is_writable(path: &Path) -> bool {
  rustix::fs::access(path, rustix::fs::Access::WRITE_OK).is_ok()
}

#[cfg(not(unix))]
pub fn is_readable(path: &Path) -> bool {
  if path.is_dir() {
    fs::read_dir(path).is_ok()
  } else {
    fs::File::open(path).is_ok()
  }
}

#[cfg(not(unix))]
pub fn is_writable(path: &Path) -> bool {
  fs::metadata(path)
    .map(|metadata| !metadata.permissions().readonly())
    .unwrap_or(false)
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryInfo {
  pub name:     String,
  pub path:     PathBuf,
  pub entries:  usize,
  pub files:    usize,
  pub folders:  usize,
  pub readable: bool,
  pub writable: bool,
  pub modified: Option<DateTime<Local>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileInfo {
  pub name:     String,
  pub path:     PathBuf,
  pub size:     u64,
  pub readable: bool,
  pub writable: bool,
  pub modified: Option<DateTime<Local>>,
}

impl FileInfo {
  /// Size in MiB, rounded to two decimals.
  pub fn size_mib(&self) -> f64 {
    (self.size as f64 / BYTES_PER_MIB * 100.0).round() / 100.0
  }
}

/// Count the children of `path` and read its permissions.
pub fn describe_directory(path: &Path) -> Result<DirectoryInfo> {
  let metadata = fs::metadata(path).map_err(|err| ExplorerError::io(path, err))?;
  if !metadata.is_dir() {
    return Err(ExplorerError::NotADirectory(path.to_path_buf()));
  }

  let children = read_children(path).map_err(|err| ExplorerError::io(path, err))?;
  let folders = children.iter().filter(|entry| entry.is_dir()).count();

  Ok(DirectoryInfo {
    name: file_name_lossy(path),
    path: path.to_path_buf(),
    entries: children.len(),
    files: children.len() - folders,
    folders,
    readable: is_readable(path),
    writable: is_writable(path),
    modified: metadata.modified().ok().map(local_time),
  })
}

pub fn describe_file(path: &Path) -> Result<FileInfo> {
  let metadata = fs::metadata(path).map_err(|err| ExplorerError::io(path, err))?;
  if metadata.is_dir() {
    return Err(ExplorerError::NotAFile(path.to_path_buf()));
  }

  Ok(FileInfo {
    name:     file_name_lossy(path),
    path:     path.to_path_buf(),
    size:     metadata.len(),
    readable: is_readable(path),
    writable: is_writable(path),
    modified: metadata.modified().ok().map(local_time),
  })
}

fn local_time(time: SystemTime) -> DateTime<Local> {
  DateTime::<Local>::from(time)
}

struct Modified<'a>(&'a Option<DateTime<Local>>);

impl fmt::Display for Modified<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.0 {
      Some(time) => write!(f, "{}", time.format("%a %b %d %H:%M:%S %Y")),
      None => f.write_str("unknown"),
    }
  }
}

impl fmt::Display for DirectoryInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "NAME: {}", self.name)?;
    writeln!(f, "PATH: {}", self.path.display())?;
    writeln!(f, "ELEMENTS: {}", self.entries)?;
    writeln!(f, "N. FILES: {}", self.files)?;
    writeln!(f, "N. FOLDERS: {}", self.folders)?;
    writeln!(f, "READABLE: {}", self.readable)?;
    writeln!(f, "WRITABLE: {}", self.writable)?;
    writeln!(f, "LAST MODIFIED: {}", Modified(&self.modified))
  }
}

impl fmt::Display for FileInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "NAME: {}", self.name)?;
    writeln!(f, "PATH: {}", self.path.display())?;
    writeln!(f, "SIZE (bytes): {}", self.size)?;
    writeln!(f, "SIZE (MB): {:.2}", self.size_mib())?;
    writeln!(f, "READABLE: {}", self.readable)?;
    writeln!(f, "WRITABLE: {}", self.writable)?;
    writeln!(f, "LAST MODIFIED: {}", Modified(&self.modified))
  }
}
