//! Filesystem mutations behind the explorer's actions.
//!
//! Every function performs one operation against a parent directory the
//! navigator already validated. Failures come back as [`ExplorerError`]s;
//! nothing panics and nothing retries.

use std::{
  fs::{
    self,
    File,
    OpenOptions,
  },
  io::{
    self,
    BufRead,
    BufReader,
    BufWriter,
    Write,
  },
  path::{
    Path,
    PathBuf,
  },
};

use the_core::line_ending::split_lines;
use the_stdx::path::file_name_lossy;

use crate::{
  ExplorerError,
  Result,
};

/// Suffix appended to the stem of a copied file.
pub const COPY_SUFFIX: &str = "_copia";

/// Reject names that are blank or would not land directly inside the parent.
pub fn validate_name(name: &str) -> Result<&str> {
  let trimmed = name.trim();
  if trimmed.is_empty()
    || trimmed == "."
    || trimmed == ".."
    || name.contains(['/', '\\', '\0'])
  {
    return Err(ExplorerError::InvalidName(name.to_string()));
  }
  Ok(name)
}

/// Create a single directory level named `name` inside `parent`.
pub fn create_directory(name: &str, parent: &Path) -> Result<PathBuf> {
  let target = parent.join(validate_name(name)?);
  fs::create_dir(&target).map_err(|err| ExplorerError::io(&target, err))?;
  log::debug!("created directory {}", target.display());
  Ok(target)
}

/// Create an empty file named `name` inside `parent`.
pub fn create_file(name: &str, parent: &Path) -> Result<PathBuf> {
  let target = parent.join(validate_name(name)?);
  create_new(&target)?;
  log::debug!("created file {}", target.display());
  Ok(target)
}

/// `new_name`, with the extension of `target` appended when `new_name` has
/// none of its own.
pub fn with_preserved_extension(new_name: &str, target: &Path) -> String {
  if new_name.contains('.') {
    return new_name.to_string();
  }

  let old_name = file_name_lossy(target);
  match old_name.rfind('.') {
    Some(idx) => format!("{new_name}{}", &old_name[idx..]),
    None => new_name.to_string(),
  }
}

/// Rename `target` to `new_name` inside `parent`.
///
/// An existing entry at the destination is never replaced.
pub fn rename(new_name: &str, target: &Path, parent: &Path) -> Result<PathBuf> {
  validate_name(new_name)?;
  fs::symlink_metadata(target).map_err(|err| ExplorerError::io(target, err))?;

  let destination = parent.join(with_preserved_extension(new_name, target));
  if destination == target {
    return Ok(destination);
  }
  if fs::symlink_metadata(&destination).is_ok() {
    return Err(ExplorerError::AlreadyExists(destination));
  }

  fs::rename(target, &destination).map_err(|err| ExplorerError::io(target, err))?;
  log::debug!(
    "renamed {} to {}",
    target.display(),
    destination.display()
  );
  Ok(destination)
}

/// Remove exactly one file.
pub fn delete_file(target: &Path) -> Result<()> {
  let metadata = fs::symlink_metadata(target).map_err(|err| ExplorerError::io(target, err))?;
  if metadata.is_dir() {
    return Err(ExplorerError::NotAFile(target.to_path_buf()));
  }

  fs::remove_file(target).map_err(|err| ExplorerError::io(target, err))?;
  log::debug!("deleted file {}", target.display());
  Ok(())
}

/// The primitive removals a recursive delete is made of.
pub trait TreeRemover {
  fn remove_file(&mut self, path: &Path) -> io::Result<()>;
  fn remove_dir(&mut self, path: &Path) -> io::Result<()>;
}

/// Removes straight from the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsRemover;

impl TreeRemover for FsRemover {
  fn remove_file(&mut self, path: &Path) -> io::Result<()> {
    fs::remove_file(path)
  }

  fn remove_dir(&mut self, path: &Path) -> io::Result<()> {
    fs::remove_dir(path)
  }
}

/// Remove `target` and everything below it, depth first.
///
/// Best effort: a failing entry is logged and skipped, earlier removals are
/// not rolled back. Succeeds iff `target` itself is gone at the end.
pub fn delete_directory_recursive<R: TreeRemover>(target: &Path, remover: &mut R) -> Result<()> {
  let metadata = fs::symlink_metadata(target).map_err(|err| ExplorerError::io(target, err))?;
  if !metadata.is_dir() {
    return Err(ExplorerError::NotADirectory(target.to_path_buf()));
  }

  let mut failures = 0;
  remove_children(target, remover, &mut failures);

  match remover.remove_dir(target) {
    Ok(()) => {
      log::debug!("deleted directory {}", target.display());
      Ok(())
    },
    Err(err) if failures == 0 => Err(ExplorerError::io(target, err)),
    Err(err) => {
      log::warn!("failed to remove {}: {}", target.display(), err);
      Err(ExplorerError::IncompleteDelete {
        path: target.to_path_buf(),
        failures,
      })
    },
  }
}

fn remove_children<R: TreeRemover>(dir: &Path, remover: &mut R, failures: &mut usize) {
  let entries = match fs::read_dir(dir) {
    Ok(entries) => entries,
    Err(err) => {
      log::warn!("failed to read {}: {}", dir.display(), err);
      *failures += 1;
      return;
    },
  };

  for entry in entries {
    let entry = match entry {
      Ok(entry) => entry,
      Err(err) => {
        log::warn!("failed to read entry of {}: {}", dir.display(), err);
        *failures += 1;
        continue;
      },
    };

    let path = entry.path();
    // Symlinks are removed, never followed.
    let is_dir = entry.file_type().is_ok_and(|file_type| file_type.is_dir());
    let result = if is_dir {
      remove_children(&path, remover, failures);
      remover.remove_dir(&path)
    } else {
      remover.remove_file(&path)
    };

    if let Err(err) = result {
      log::warn!("failed to remove {}: {}", path.display(), err);
      *failures += 1;
    }
  }
}

/// `<stem>_copia<extension>` for a file name. Leading dots do not start an
/// extension.
pub fn copy_name(file_name: &str) -> String {
  match file_name.rfind('.').filter(|&idx| idx > 0) {
    Some(idx) => format!(
      "{}{COPY_SUFFIX}{}",
      &file_name[..idx],
      &file_name[idx..]
    ),
    None => format!("{file_name}{COPY_SUFFIX}"),
  }
}

/// Copy the text of `target` into `destination_parent` under
/// [`copy_name`].
///
/// The copy is streamed line by line with every line boundary kept as is.
/// An existing copy is never overwritten, and a copy that fails half way is
/// removed again.
pub fn copy_file(target: &Path, destination_parent: &Path) -> Result<PathBuf> {
  let source = File::open(target).map_err(|err| ExplorerError::io(target, err))?;
  let metadata = source
    .metadata()
    .map_err(|err| ExplorerError::io(target, err))?;
  if metadata.is_dir() {
    return Err(ExplorerError::NotAFile(target.to_path_buf()));
  }

  let destination = destination_parent.join(copy_name(&file_name_lossy(target)));
  let sink = create_new(&destination)?;

  if let Err(err) = stream_lines(source, sink) {
    if let Err(cleanup) = fs::remove_file(&destination) {
      log::warn!(
        "failed to remove partial copy {}: {}",
        destination.display(),
        cleanup
      );
    }
    return Err(ExplorerError::io(target, err));
  }

  log::debug!(
    "copied {} to {}",
    target.display(),
    destination.display()
  );
  Ok(destination)
}

fn stream_lines(source: File, sink: File) -> io::Result<()> {
  let mut reader = BufReader::new(source);
  let mut writer = BufWriter::new(sink);
  let mut line = String::new();

  // read_line keeps the terminator, so boundaries survive unchanged.
  while reader.read_line(&mut line)? != 0 {
    writer.write_all(line.as_bytes())?;
    line.clear();
  }

  writer.flush()
}

/// Truncate `target` and write `content` verbatim.
pub fn save_overwrite(content: &str, target: &Path) -> Result<()> {
  let file = OpenOptions::new()
    .write(true)
    .truncate(true)
    .open(target)
    .map_err(|err| ExplorerError::io(target, err))?;

  write_all(file, content).map_err(|err| ExplorerError::io(target, err))?;
  log::debug!("overwrote {}", target.display());
  Ok(())
}

/// Write `content` to a new file `file_name` inside `parent`.
///
/// Never overwrites: a blank name or an existing file is refused.
pub fn save_as_new(content: &str, file_name: &str, parent: &Path) -> Result<PathBuf> {
  let target = parent.join(validate_name(file_name)?);
  let file = create_new(&target)?;

  if let Err(err) = write_all(file, content) {
    if let Err(cleanup) = fs::remove_file(&target) {
      log::warn!(
        "failed to remove partial file {}: {}",
        target.display(),
        cleanup
      );
    }
    return Err(ExplorerError::io(&target, err));
  }

  log::debug!("saved new file {}", target.display());
  Ok(target)
}

/// Read the whole file as text. Files that are not valid UTF-8 are refused.
pub fn read_text(target: &Path) -> Result<String> {
  fs::read_to_string(target).map_err(|err| ExplorerError::io(target, err))
}

/// The lines of a text file, without their terminators.
pub fn read_all_lines(target: &Path) -> Result<Vec<String>> {
  let text = read_text(target)?;
  Ok(split_lines(&text).map(str::to_string).collect())
}

fn create_new(path: &Path) -> Result<File> {
  OpenOptions::new()
    .write(true)
    .create_new(true)
    .open(path)
    .map_err(|err| ExplorerError::io(path, err))
}

fn write_all(file: File, content: &str) -> io::Result<()> {
  let mut writer = BufWriter::new(file);
  writer.write_all(content.as_bytes())?;
  writer.flush()
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  fn tmp() -> tempfile::TempDir {
    tempfile::tempdir().expect("create temp dir")
  }

  #[test]
  fn creates_one_directory_level() {
    let dir = tmp();
    let created = create_directory("assets", dir.path()).unwrap();
    assert!(created.is_dir());

    assert!(matches!(
      create_directory("assets", dir.path()),
      Err(ExplorerError::AlreadyExists(_))
    ));
    assert!(matches!(
      create_directory("a/b", dir.path()),
      Err(ExplorerError::InvalidName(_))
    ));
    assert!(matches!(
      create_directory("  ", dir.path()),
      Err(ExplorerError::InvalidName(_))
    ));
  }

  #[test]
  fn creates_empty_files_once() {
    let dir = tmp();
    let created = create_file("notes.txt", dir.path()).unwrap();
    assert_eq!(fs::read_to_string(&created).unwrap(), "");

    assert!(matches!(
      create_file("notes.txt", dir.path()),
      Err(ExplorerError::AlreadyExists(_))
    ));
    assert!(matches!(
      create_file("", dir.path()),
      Err(ExplorerError::InvalidName(_))
    ));
  }

  #[test]
  fn rename_preserves_extension_when_omitted() {
    let dir = tmp();
    let notes = dir.path().join("notes.txt");
    fs::write(&notes, "x").unwrap();

    let renamed = rename("report", &notes, dir.path()).unwrap();
    assert_eq!(renamed, dir.path().join("report.txt"));
    assert!(renamed.exists());
    assert!(!notes.exists());
  }

  #[test]
  fn rename_keeps_supplied_extension() {
    let dir = tmp();
    let notes = dir.path().join("notes.txt");
    fs::write(&notes, "x").unwrap();

    let renamed = rename("report.md", &notes, dir.path()).unwrap();
    assert_eq!(renamed, dir.path().join("report.md"));
  }

  #[test]
  fn rename_refuses_collisions_and_missing_targets() {
    let dir = tmp();
    let a = dir.path().join("a.txt");
    fs::write(&a, "a").unwrap();
    fs::write(dir.path().join("b.txt"), "b").unwrap();

    assert!(matches!(
      rename("b", &a, dir.path()),
      Err(ExplorerError::AlreadyExists(_))
    ));
    assert_eq!(fs::read_to_string(dir.path().join("b.txt")).unwrap(), "b");
    assert!(matches!(
      rename("c", &dir.path().join("missing.txt"), dir.path()),
      Err(ExplorerError::NotFound(_))
    ));
  }

  #[test]
  fn extension_helper() {
    let target = Path::new("/tmp/archive.tar.gz");
    assert_eq!(with_preserved_extension("backup", target), "backup.gz");
    assert_eq!(
      with_preserved_extension("backup", Path::new("/tmp/Makefile")),
      "backup"
    );
  }

  #[test]
  fn delete_file_removes_only_files() {
    let dir = tmp();
    let file = dir.path().join("gone.txt");
    fs::write(&file, "").unwrap();

    delete_file(&file).unwrap();
    assert!(!file.exists());
    assert!(matches!(delete_file(&file), Err(ExplorerError::NotFound(_))));
    assert!(matches!(
      delete_file(dir.path()),
      Err(ExplorerError::NotAFile(_))
    ));
  }

  #[test]
  fn recursive_delete_removes_the_whole_tree() {
    let dir = tmp();
    let root = dir.path().join("root");
    fs::create_dir_all(root.join("a").join("b")).unwrap();
    fs::write(root.join("top.txt"), "").unwrap();
    fs::write(root.join("a").join("b").join("deep.txt"), "").unwrap();

    delete_directory_recursive(&root, &mut FsRemover).unwrap();
    assert!(!root.exists());
  }

  /// Denies removing any file with one particular name.
  struct DenyingRemover {
    denied: &'static str,
  }

  impl TreeRemover for DenyingRemover {
    fn remove_file(&mut self, path: &Path) -> io::Result<()> {
      if path.file_name().is_some_and(|name| name == self.denied) {
        return Err(io::Error::from(io::ErrorKind::PermissionDenied));
      }
      fs::remove_file(path)
    }

    fn remove_dir(&mut self, path: &Path) -> io::Result<()> {
      fs::remove_dir(path)
    }
  }

  #[test]
  fn recursive_delete_is_best_effort() {
    let dir = tmp();
    let root = dir.path().join("root");
    let locked_dir = root.join("locked");
    fs::create_dir_all(&locked_dir).unwrap();
    fs::create_dir_all(root.join("free")).unwrap();
    fs::write(locked_dir.join("keep.txt"), "").unwrap();
    fs::write(locked_dir.join("sibling.txt"), "").unwrap();
    fs::write(root.join("top.txt"), "").unwrap();
    fs::write(root.join("free").join("x.txt"), "").unwrap();

    let err = delete_directory_recursive(&root, &mut DenyingRemover { denied: "keep.txt" })
      .unwrap_err();
    assert!(matches!(err, ExplorerError::IncompleteDelete { .. }));

    assert!(locked_dir.join("keep.txt").exists());
    assert!(!locked_dir.join("sibling.txt").exists());
    assert!(!root.join("top.txt").exists());
    assert!(!root.join("free").exists());

    let left: HashSet<_> = fs::read_dir(&root)
      .unwrap()
      .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
      .collect();
    assert_eq!(left, HashSet::from(["locked".to_string()]));
  }

  #[test]
  fn recursive_delete_rejects_files() {
    let dir = tmp();
    let file = dir.path().join("plain.txt");
    fs::write(&file, "").unwrap();
    assert!(matches!(
      delete_directory_recursive(&file, &mut FsRemover),
      Err(ExplorerError::NotADirectory(_))
    ));
  }

  #[test]
  fn copy_names() {
    assert_eq!(copy_name("a.txt"), "a_copia.txt");
    assert_eq!(copy_name("archive.tar.gz"), "archive.tar_copia.gz");
    assert_eq!(copy_name("Makefile"), "Makefile_copia");
    assert_eq!(copy_name(".bashrc"), ".bashrc_copia");
  }

  #[test]
  fn copy_keeps_line_content() {
    let dir = tmp();
    let source = dir.path().join("a.txt");
    fs::write(&source, "line1\nline2").unwrap();

    let copy = copy_file(&source, dir.path()).unwrap();
    assert_eq!(copy, dir.path().join("a_copia.txt"));
    assert_eq!(
      read_all_lines(&copy).unwrap(),
      read_all_lines(&source).unwrap()
    );
    assert_eq!(fs::read_to_string(&copy).unwrap(), "line1\nline2");
  }

  #[test]
  fn copy_keeps_crlf_boundaries() {
    let dir = tmp();
    let source = dir.path().join("dos.txt");
    fs::write(&source, "one\r\ntwo\r\n").unwrap();

    let copy = copy_file(&source, dir.path()).unwrap();
    assert_eq!(fs::read_to_string(copy).unwrap(), "one\r\ntwo\r\n");
  }

  #[test]
  fn second_copy_is_refused() {
    let dir = tmp();
    let source = dir.path().join("a.txt");
    fs::write(&source, "first").unwrap();
    let copy = copy_file(&source, dir.path()).unwrap();

    fs::write(&source, "second").unwrap();
    assert!(matches!(
      copy_file(&source, dir.path()),
      Err(ExplorerError::AlreadyExists(_))
    ));
    assert_eq!(fs::read_to_string(copy).unwrap(), "first");
  }

  #[test]
  fn failed_copy_leaves_no_file_behind() {
    let dir = tmp();
    let source = dir.path().join("blob.bin");
    fs::write(&source, [0xffu8, 0xfe, 0x00, b'\n']).unwrap();

    assert!(copy_file(&source, dir.path()).is_err());
    assert!(!dir.path().join("blob_copia.bin").exists());
  }

  #[test]
  fn overwrite_replaces_content() {
    let dir = tmp();
    let target = dir.path().join("t.txt");
    fs::write(&target, "a much longer original text").unwrap();

    save_overwrite("short", &target).unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "short");
    assert!(matches!(
      save_overwrite("x", &dir.path().join("missing.txt")),
      Err(ExplorerError::NotFound(_))
    ));
  }

  #[test]
  fn save_as_new_never_overwrites() {
    let dir = tmp();
    let saved = save_as_new("first", "out.txt", dir.path()).unwrap();
    assert_eq!(fs::read_to_string(&saved).unwrap(), "first");

    assert!(matches!(
      save_as_new("second", "out.txt", dir.path()),
      Err(ExplorerError::AlreadyExists(_))
    ));
    assert_eq!(fs::read_to_string(&saved).unwrap(), "first");
    assert!(matches!(
      save_as_new("x", " ", dir.path()),
      Err(ExplorerError::InvalidName(_))
    ));
  }

  #[test]
  fn read_all_lines_splits_and_refuses_binary() {
    let dir = tmp();
    let text = dir.path().join("t.txt");
    fs::write(&text, "a\r\nb\nc").unwrap();
    assert_eq!(read_all_lines(&text).unwrap(), vec!["a", "b", "c"]);

    let binary = dir.path().join("b.bin");
    fs::write(&binary, [0xc3u8, 0x28]).unwrap();
    assert!(matches!(
      read_all_lines(&binary),
      Err(ExplorerError::Io { .. })
    ));
    assert!(matches!(
      read_all_lines(&dir.path().join("missing")),
      Err(ExplorerError::NotFound(_))
    ));
  }
}
