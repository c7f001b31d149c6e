//! Functions for working with the host environment.

use std::path::PathBuf;

use eyre::{
  Result,
  WrapErr,
};
use parking_lot::RwLock;

// The explorer seeds its first directory from here, so the value is cached:
// std::env::current_dir fails once the cwd has been deleted.
static CWD: RwLock<Option<PathBuf>> = RwLock::new(None);

/// Get the current working directory.
pub fn current_working_dir() -> Result<PathBuf> {
  if let Some(path) = &*CWD.read() {
    return Ok(path.clone());
  }

  // Logical cwd, like `pwd -L`: keep $PWD when it names the same directory.
  let mut cwd = std::env::current_dir().wrap_err("failed to get current working directory")?;

  let pwd = std::env::var_os("PWD");
  #[cfg(windows)]
  let pwd = pwd.or_else(|| std::env::var_os("CD"));

  if let Some(pwd) = pwd.map(PathBuf::from)
    && pwd.canonicalize().ok().as_ref() == Some(&cwd)
  {
    cwd = pwd;
  }

  let mut dst = CWD.write();
  *dst = Some(cwd.clone());

  Ok(cwd)
}

/// Reads a path from the environment, ignoring empty values.
pub fn path_from_env(env_var_name: &str) -> Option<PathBuf> {
  std::env::var_os(env_var_name)
    .filter(|value| !value.is_empty())
    .map(PathBuf::from)
}
