//! Functions for working with [`Path`].

use std::{
  borrow::Cow,
  ffi::OsString,
  path::{
    Component,
    Path,
    PathBuf,
  },
};

use crate::env::current_working_dir;

/// Replaces the leading `~` of a path with the user's home directory.
pub fn expand_tilde<'a, P>(path: P) -> Cow<'a, Path>
where
  P: Into<Cow<'a, Path>>,
{
  let path = path.into();
  let mut components = path.components();
  if let Some(Component::Normal(c)) = components.next()
    && c == "~"
    && let Ok(mut buf) = etcetera::home_dir()
  {
    buf.push(components);
    return Cow::Owned(buf);
  }

  path
}

/// Normalize a path without resolving symlinks.
///
/// `..` pops the previous normal component, `.` is dropped. A `..` that would
/// climb above the root is discarded.
pub fn normalize(path: impl AsRef<Path>) -> PathBuf {
  let mut components = path.as_ref().components().peekable();
  let mut ret = if let Some(c @ Component::Prefix(..)) = components.peek().cloned() {
    components.next();
    PathBuf::from(c.as_os_str())
  } else {
    PathBuf::new()
  };

  for component in components {
    match component {
      Component::Prefix(..) => unreachable!(),
      Component::RootDir => {
        ret.push(component.as_os_str());
      },
      Component::CurDir => {},
      Component::ParentDir => {
        if ret.ends_with("..") || !ret.pop() && !ret.has_root() {
          ret.push("..");
        }
      },
      Component::Normal(c) => {
        ret.push(c);
      },
    }
  }

  dunce::simplified(&ret).to_path_buf()
}

/// Returns the canonical, absolute form of a path.
///
/// Tilde is expanded and relative paths are joined onto the current working
/// directory. Symlinks are resolved when the path exists; otherwise the path
/// is only normalized.
pub fn canonicalize(path: impl AsRef<Path>) -> PathBuf {
  let path = expand_tilde(path.as_ref());
  let path = match current_working_dir() {
    Ok(cwd) if path.is_relative() => cwd.join(&path),
    _ => path.into_owned(),
  };

  dunce::canonicalize(&path).unwrap_or_else(|_| normalize(path))
}

/// Lossy file name of a path, falling back to the full path for roots.
pub fn file_name_lossy(path: &Path) -> String {
  path
    .file_name()
    .map(OsString::from)
    .unwrap_or_else(|| path.as_os_str().to_owned())
    .to_string_lossy()
    .into_owned()
}
