//! User intents and the state they act on.
//!
//! [`Explorer`] owns the navigation state and the text session. Every
//! [`Command`] whose action [`Explorer::actions`] leaves out fails with a
//! misuse error before anything on disk is touched. Mutations and refreshes
//! clear the selection and switch edit mode off.

use std::{
  ops::Range,
  path::{
    Path,
    PathBuf,
  },
};

use bitflags::bitflags;
use the_stdx::path::expand_tilde;

use crate::{
  ExplorerError,
  Result,
  entry::{
    DirectoryEntry,
    ListingRow,
  },
  file_ops::{
    self,
    FsRemover,
    TreeRemover,
  },
  info::{
    DirectoryInfo,
    FileInfo,
    describe_directory,
    describe_file,
  },
  navigator::NavigationState,
  session::TextEditSession,
};

bitflags! {
  /// Actions available in the current state.
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
  pub struct Actions: u16 {
    const OPEN_PATH     = 1 << 0;
    const NEW_FOLDER    = 1 << 1;
    const NEW_FILE      = 1 << 2;
    const REFRESH       = 1 << 3;
    const GO_BACK       = 1 << 4;
    const EXPLORE       = 1 << 5;
    const RENAME_FOLDER = 1 << 6;
    const DELETE_FOLDER = 1 << 7;
    const SHOW_FILE     = 1 << 8;
    const RENAME_FILE   = 1 << 9;
    const COPY_FILE     = 1 << 10;
    const DELETE_FILE   = 1 << 11;
    const EDIT_FILE     = 1 << 12;
    const SEARCH        = 1 << 13;
    const REPLACE       = 1 << 14;
    const SAVE          = 1 << 15;
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  /// Navigate to a path; relative paths resolve against the current
  /// directory.
  Open(PathBuf),
  /// Select a row of the listing. The parent marker navigates up.
  Select(ListingRow),
  /// Enter the selected folder.
  Explore,
  Back,
  Refresh,
  CreateDirectory(String),
  CreateFile(String),
  /// Rename the selected entry.
  Rename(String),
  DeleteFolder,
  DeleteFile,
  CopyFile,
  ShowFile,
  ToggleEdit(bool),
  SetText(String),
  Search(String),
  Replace {
    needle:      String,
    replacement: String,
  },
  SaveOverwrite,
  /// Save the edited text as a new file in the current directory.
  SaveAs(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
  /// The current directory changed or was re-listed.
  Listing(Vec<ListingRow>),
  /// An entry was created, renamed, copied or deleted; `path` is the entry
  /// after the change.
  Changed {
    path:    PathBuf,
    listing: Vec<ListingRow>,
  },
  DirectoryInfo(DirectoryInfo),
  FileInfo(FileInfo),
  Text(String),
  Editing(bool),
  TextSet,
  Matches(Vec<Range<usize>>),
  Replaced(Vec<Range<usize>>),
  Saved {
    path:    PathBuf,
    listing: Vec<ListingRow>,
  },
}

#[derive(Debug, Clone, Default)]
pub struct Explorer<R = FsRemover> {
  nav:     NavigationState,
  session: TextEditSession,
  remover: R,
}

impl Explorer {
  pub fn new() -> Self {
    Self::default()
  }

  /// Explorer opened on `path`, or with no directory when `path` is invalid.
  pub fn with_directory(path: impl AsRef<Path>) -> Self {
    Self::with_remover(path, FsRemover)
  }
}

impl<R: TreeRemover> Explorer<R> {
  /// Like [`Explorer::with_directory`], deleting folders through `remover`.
  pub fn with_remover(path: impl AsRef<Path>, remover: R) -> Self {
    Self {
      nav:     NavigationState::seeded(path),
      session: TextEditSession::new(),
      remover,
    }
  }

  pub fn navigation(&self) -> &NavigationState {
    &self.nav
  }

  pub fn session(&self) -> &TextEditSession {
    &self.session
  }

  pub fn listing(&self) -> Vec<ListingRow> {
    self.nav.listing()
  }

  pub fn actions(&self) -> Actions {
    let mut actions = Actions::OPEN_PATH;

    if self.nav.current_directory().is_some() {
      actions |= Actions::NEW_FOLDER | Actions::NEW_FILE | Actions::REFRESH;
    }
    if self.nav.parent().is_some() {
      actions |= Actions::GO_BACK;
    }

    match self.nav.selected_entry() {
      Some(entry) if entry.is_dir() => {
        actions |= Actions::EXPLORE | Actions::RENAME_FOLDER | Actions::DELETE_FOLDER;
      },
      Some(_) => {
        actions |= Actions::SHOW_FILE
          | Actions::RENAME_FILE
          | Actions::COPY_FILE
          | Actions::DELETE_FILE
          | Actions::EDIT_FILE;
      },
      None => {},
    }

    if self.session.is_editing() {
      actions |= Actions::SEARCH | Actions::REPLACE | Actions::SAVE;
    }

    actions
  }

  pub fn handle(&mut self, command: Command) -> Result<Outcome> {
    log::debug!("handling {command:?}");

    match command {
      Command::Open(path) => {
        let path = expand_tilde(path).into_owned();
        let path = match self.nav.current_directory() {
          Some(current) if path.is_relative() => current.join(path),
          _ => path,
        };
        self.navigate(path)
      },
      Command::Select(ListingRow::Parent) => self.go_back(),
      Command::Select(row) => {
        self.nav.select(row.clone())?;
        match row {
          ListingRow::Entry(entry) if entry.is_dir() => {
            describe_directory(&entry.path).map(Outcome::DirectoryInfo)
          },
          ListingRow::Entry(entry) => describe_file(&entry.path).map(Outcome::FileInfo),
          ListingRow::Parent => Ok(Outcome::Listing(self.nav.listing())),
        }
      },
      Command::Explore => {
        let folder = self.selected_folder()?.path.clone();
        self.navigate(folder)
      },
      Command::Back => self.go_back(),
      Command::Refresh => {
        self.current_directory()?;
        self.nav.clear_selection();
        self.session.leave_edit_mode();
        Ok(Outcome::Listing(self.nav.listing()))
      },
      Command::CreateDirectory(name) => {
        let path = file_ops::create_directory(&name, self.current_directory()?)?;
        Ok(self.changed(path))
      },
      Command::CreateFile(name) => {
        let path = file_ops::create_file(&name, self.current_directory()?)?;
        Ok(self.changed(path))
      },
      Command::Rename(name) => {
        let current = self.current_directory()?.to_path_buf();
        let target = self
          .nav
          .selected_entry()
          .ok_or(ExplorerError::NoSelection)?
          .path
          .clone();
        let path = file_ops::rename(&name, &target, &current)?;
        self.forget_text_under(&target);
        Ok(self.changed(path))
      },
      Command::DeleteFolder => {
        let target = self.selected_folder()?.path.clone();
        let deleted = file_ops::delete_directory_recursive(&target, &mut self.remover);
        // A partial delete may still have removed the loaded file.
        self.forget_text_under(&target);
        deleted?;
        Ok(self.changed(target))
      },
      Command::DeleteFile => {
        let target = self.selected_file()?.path.clone();
        file_ops::delete_file(&target)?;
        self.forget_text_under(&target);
        Ok(self.changed(target))
      },
      Command::CopyFile => {
        let current = self.current_directory()?.to_path_buf();
        let target = self.selected_file()?.path.clone();
        let path = file_ops::copy_file(&target, &current)?;
        Ok(self.changed(path))
      },
      Command::ShowFile => {
        let target = self.selected_file()?.path.clone();
        let buffer = self.session.load(&target)?;
        Ok(Outcome::Text(buffer.content().to_string()))
      },
      Command::ToggleEdit(true) => {
        let target = self.selected_file()?.path.clone();
        let loaded = self
          .session
          .buffer()
          .is_some_and(|buffer| buffer.source_file() == target);
        if !loaded {
          self.session.load(&target)?;
        }
        self.session.set_editing(true)?;
        Ok(Outcome::Editing(true))
      },
      Command::ToggleEdit(false) => {
        self.session.set_editing(false)?;
        Ok(Outcome::Editing(false))
      },
      Command::SetText(text) => {
        self.session.set_text(text)?;
        Ok(Outcome::TextSet)
      },
      Command::Search(needle) => {
        self.require_editing()?;
        self.session.search(&needle).map(Outcome::Matches)
      },
      Command::Replace {
        needle,
        replacement,
      } => {
        self
          .session
          .replace_all(&needle, &replacement)
          .map(Outcome::Replaced)
      },
      Command::SaveOverwrite => {
        let path = self.session.save_overwrite()?;
        Ok(Outcome::Saved {
          path,
          listing: self.nav.listing(),
        })
      },
      Command::SaveAs(name) => {
        let current = self.current_directory()?.to_path_buf();
        let path = self.session.save_as(&name, &current)?;
        let listing = self.nav.listing();
        if let Some(row) = listing
          .iter()
          .find(|row| row.entry().is_some_and(|entry| entry.path == path))
        {
          self.nav.select(row.clone())?;
        }
        Ok(Outcome::Saved { path, listing })
      },
    }
  }

  fn navigate(&mut self, path: PathBuf) -> Result<Outcome> {
    let listing = self.nav.navigate(path)?;
    self.session.unload();
    Ok(Outcome::Listing(listing))
  }

  fn go_back(&mut self) -> Result<Outcome> {
    let parent = self
      .nav
      .parent()
      .ok_or(ExplorerError::NoDirectory)?
      .to_path_buf();
    self.navigate(parent)
  }

  fn current_directory(&self) -> Result<&Path> {
    self.nav.current_directory().ok_or(ExplorerError::NoDirectory)
  }

  fn selected_folder(&self) -> Result<&DirectoryEntry> {
    let entry = self.nav.selected_entry().ok_or(ExplorerError::NoSelection)?;
    if !entry.is_dir() {
      return Err(ExplorerError::NotADirectory(entry.path.clone()));
    }
    Ok(entry)
  }

  fn selected_file(&self) -> Result<&DirectoryEntry> {
    let entry = self.nav.selected_entry().ok_or(ExplorerError::NoSelection)?;
    if !entry.is_file() {
      return Err(ExplorerError::NotAFile(entry.path.clone()));
    }
    Ok(entry)
  }

  fn require_editing(&self) -> Result<()> {
    match (self.session.buffer(), self.session.is_editing()) {
      (None, _) => Err(ExplorerError::NotLoaded),
      (Some(_), false) => Err(ExplorerError::NotEditing),
      (Some(_), true) => Ok(()),
    }
  }

  fn changed(&mut self, path: PathBuf) -> Outcome {
    self.nav.clear_selection();
    self.session.leave_edit_mode();
    Outcome::Changed {
      path,
      listing: self.nav.listing(),
    }
  }

  /// Drop the loaded text when its file lived at or under `target` and is
  /// gone now.
  fn forget_text_under(&mut self, target: &Path) {
    let stale = self.session.buffer().is_some_and(|buffer| {
      let source = buffer.source_file();
      source.starts_with(target) && !source.exists()
    });
    if stale {
      self.session.unload();
    }
  }
}
