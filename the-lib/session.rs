//! The text of the file opened for viewing or editing.
//!
//! A session moves through [`EditState`]s: `Unloaded -> Loaded` when a file is
//! opened, `Loaded -> Editing` when edit mode is switched on, and
//! `Editing -> Saved` on save. Opening another file discards the buffer, with
//! or without unsaved edits.

use std::{
  ops::Range,
  path::{
    Path,
    PathBuf,
  },
};

use the_core::line_ending::{
  LineEnding,
  NATIVE_LINE_ENDING,
  auto_detect_line_ending,
  join_lines,
  split_lines,
};

use crate::{
  ExplorerError,
  Result,
  file_ops,
  search,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
  source_file: PathBuf,
  content:     String,
  line_ending: LineEnding,
}

impl TextBuffer {
  /// Read `path` line by line. Every line, the last one included, ends with
  /// the file's own line ending.
  pub fn load(path: &Path) -> Result<Self> {
    let text = file_ops::read_text(path)?;
    let line_ending = auto_detect_line_ending(&text).unwrap_or(NATIVE_LINE_ENDING);
    Ok(Self {
      source_file: path.to_path_buf(),
      content: join_lines(split_lines(&text), line_ending),
      line_ending,
    })
  }

  pub fn source_file(&self) -> &Path {
    &self.source_file
  }

  pub fn content(&self) -> &str {
    &self.content
  }

  pub fn line_ending(&self) -> LineEnding {
    self.line_ending
  }

  pub fn lines(&self) -> impl Iterator<Item = &str> {
    split_lines(&self.content)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditState {
  #[default]
  Unloaded,
  Loaded,
  Editing,
  Saved,
}

#[derive(Debug, Clone, Default)]
pub struct TextEditSession {
  buffer:   Option<TextBuffer>,
  state:    EditState,
  modified: bool,
}

impl TextEditSession {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn state(&self) -> EditState {
    self.state
  }

  pub fn buffer(&self) -> Option<&TextBuffer> {
    self.buffer.as_ref()
  }

  pub fn is_editing(&self) -> bool {
    self.state == EditState::Editing
  }

  /// True when the buffer holds edits that were never saved.
  pub fn is_modified(&self) -> bool {
    self.modified
  }

  /// Open `path`, replacing whatever was loaded. On failure the session is
  /// left as it was.
  pub fn load(&mut self, path: &Path) -> Result<&TextBuffer> {
    let buffer = TextBuffer::load(path)?;
    Ok(self.replace_buffer(buffer))
  }

  fn replace_buffer(&mut self, buffer: TextBuffer) -> &TextBuffer {
    if self.modified {
      log::debug!("discarding unsaved edits");
    }
    self.state = EditState::Loaded;
    self.modified = false;
    self.buffer.insert(buffer)
  }

  pub fn unload(&mut self) {
    self.buffer = None;
    self.state = EditState::Unloaded;
    self.modified = false;
  }

  /// Switch edit mode on or off.
  pub fn set_editing(&mut self, editing: bool) -> Result<()> {
    if self.buffer.is_none() {
      return Err(ExplorerError::NotLoaded);
    }

    self.state = match (editing, self.state) {
      (true, _) => EditState::Editing,
      (false, EditState::Editing) => EditState::Loaded,
      (false, state) => state,
    };
    Ok(())
  }

  /// Drop out of edit mode if it is on; the buffer stays loaded.
  pub fn leave_edit_mode(&mut self) {
    if self.state == EditState::Editing {
      self.state = EditState::Loaded;
    }
  }

  /// Replace the whole content with what the user typed.
  pub fn set_text(&mut self, text: impl Into<String>) -> Result<()> {
    let buffer = self.editable_buffer()?;
    let text = text.into();
    if buffer.content != text {
      buffer.content = text;
      self.modified = true;
    }
    Ok(())
  }

  /// Spans of `needle` in the loaded content.
  pub fn search(&self, needle: &str) -> Result<Vec<Range<usize>>> {
    let buffer = self.buffer.as_ref().ok_or(ExplorerError::NotLoaded)?;
    Ok(search::search(&buffer.content, needle))
  }

  /// Replace every occurrence of `needle` and return the spans of the
  /// inserted `replacement`, empty when `needle` does not occur.
  pub fn replace_all(&mut self, needle: &str, replacement: &str) -> Result<Vec<Range<usize>>> {
    let buffer = self.editable_buffer()?;
    let (replaced, spans) = search::replace_all(&buffer.content, needle, replacement);
    if !spans.is_empty() {
      buffer.content = replaced;
      self.modified = true;
    }
    Ok(spans)
  }

  /// Write the content back over the file it was loaded from.
  pub fn save_overwrite(&mut self) -> Result<PathBuf> {
    let buffer = self.editable_buffer()?;
    let target = buffer.source_file.clone();
    file_ops::save_overwrite(&buffer.content, &target)?;
    self.mark_saved();
    Ok(target)
  }

  /// Write the content to a new file inside `parent`; the buffer then belongs
  /// to that file.
  pub fn save_as(&mut self, file_name: &str, parent: &Path) -> Result<PathBuf> {
    let buffer = self.editable_buffer()?;
    let target = file_ops::save_as_new(&buffer.content, file_name, parent)?;
    buffer.source_file = target.clone();
    self.mark_saved();
    Ok(target)
  }

  fn mark_saved(&mut self) {
    self.state = EditState::Saved;
    self.modified = false;
  }

  fn editable_buffer(&mut self) -> Result<&mut TextBuffer> {
    let buffer = self.buffer.as_mut().ok_or(ExplorerError::NotLoaded)?;
    if self.state != EditState::Editing {
      return Err(ExplorerError::NotEditing);
    }
    Ok(buffer)
  }
}
