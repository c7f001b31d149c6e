//! Application context (state) and the read-eval-print loop.

use std::{
  io::{
    BufRead,
    Write,
  },
  ops::Range,
  path::PathBuf,
};

use anyhow::Result;
use the_lib::{
  ExplorerError,
  command::{
    Actions,
    Command,
    Explorer,
    Outcome,
  },
  navigator::resolve_selection,
};

use crate::{
  config::Config,
  dispatch::{
    self,
    HELP,
    Input,
    ParseError,
  },
  render,
};

/// Line that ends multi-line text input.
const END_OF_TEXT: &str = ".";

pub struct Ctx {
  pub explorer:    Explorer,
  pub config:      Config,
  pub should_quit: bool,
}

impl Ctx {
  pub fn new(start_directory: Option<PathBuf>, config: Config) -> Self {
    let explorer = match start_directory {
      Some(dir) => Explorer::with_directory(dir),
      None => Explorer::new(),
    };
    Self {
      explorer,
      config,
      should_quit: false,
    }
  }

  /// Read commands from `input` until `quit` or end of input.
  pub fn run(&mut self, input: &mut impl BufRead, out: &mut impl Write) -> Result<()> {
    render::listing(out, self.explorer.navigation(), &self.explorer.listing())?;

    while !self.should_quit {
      write!(out, "> ")?;
      out.flush()?;

      let mut line = String::new();
      if input.read_line(&mut line)? == 0 {
        break;
      }
      self.handle_line(&line, input, out)?;
    }

    out.flush()?;
    Ok(())
  }

  pub fn handle_line(
    &mut self,
    line: &str,
    input: &mut impl BufRead,
    out: &mut impl Write,
  ) -> Result<()> {
    let parsed = match dispatch::parse(line) {
      Ok(parsed) => parsed,
      Err(err) => return render::error(out, &err),
    };

    match parsed {
      Input::Empty => Ok(()),
      Input::Quit => {
        self.should_quit = true;
        Ok(())
      },
      Input::Help => {
        writeln!(out, "{HELP}")?;
        Ok(())
      },
      Input::Actions => render::actions(out, self.explorer.actions()),
      Input::List => render::listing(out, self.explorer.navigation(), &self.explorer.listing()),
      Input::Select(label) => {
        let Some(current) = self.explorer.navigation().current_directory() else {
          return render::error(out, &ExplorerError::NoDirectory);
        };
        match resolve_selection(&label, current) {
          Ok(row) => self.execute(Command::Select(row), out),
          Err(err) => render::error(out, &err),
        }
      },
      Input::Remove => {
        let command = match self.explorer.navigation().selected_entry() {
          Some(entry) if entry.is_dir() => Command::DeleteFolder,
          _ => Command::DeleteFile,
        };
        self.confirmed(command, input, out)
      },
      Input::Text => {
        if let Err(err) = self.require_editing() {
          return render::error(out, &err);
        }
        let lines = read_text_block(input)?;
        self.execute(Command::SetText(self.join(&lines)), out)
      },
      Input::Line(number, text) => self.set_line(number, text, out),
      Input::Explorer(command @ (Command::Rename(_) | Command::SaveOverwrite)) => {
        self.confirmed(command, input, out)
      },
      Input::Explorer(command) => self.execute(command, out),
    }
  }

  fn confirmed(
    &mut self,
    command: Command,
    input: &mut impl BufRead,
    out: &mut impl Write,
  ) -> Result<()> {
    // Nothing to confirm when the command is refused anyway.
    if !self.explorer.actions().intersects(guarding_action(&command)) {
      return self.execute(command, out);
    }

    if self.confirm(input, out)? {
      self.execute(command, out)
    } else {
      writeln!(out, "cancelled")?;
      Ok(())
    }
  }

  fn confirm(&self, input: &mut impl BufRead, out: &mut impl Write) -> Result<bool> {
    if !self.config.confirm_destructive {
      return Ok(true);
    }

    write!(out, "type \"{}\" to confirm: ", self.config.confirm_word)?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim() == self.config.confirm_word)
  }

  fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<()> {
    let outcome = match self.explorer.handle(command) {
      Ok(outcome) => outcome,
      Err(err) => {
        log::debug!("command failed: {err}");
        return render::error(out, &err);
      },
    };

    match outcome {
      Outcome::Listing(rows) => render::listing(out, self.explorer.navigation(), &rows)?,
      Outcome::Changed { path, listing } => {
        writeln!(out, "{}", path.display())?;
        render::listing(out, self.explorer.navigation(), &listing)?;
      },
      Outcome::DirectoryInfo(info) => write!(out, "{info}")?,
      Outcome::FileInfo(info) => write!(out, "{info}")?,
      Outcome::Text(content) => render::text(out, &content, &[])?,
      Outcome::Editing(on) => writeln!(out, "edit mode {}", if on { "on" } else { "off" })?,
      Outcome::TextSet => self.print_text(&[], out)?,
      Outcome::Matches(spans) => {
        writeln!(out, "{} matches", spans.len())?;
        self.print_text(&spans, out)?;
      },
      Outcome::Replaced(spans) if spans.is_empty() => writeln!(out, "no matches")?,
      Outcome::Replaced(spans) => {
        writeln!(out, "{} replaced", spans.len())?;
        self.print_text(&spans, out)?;
      },
      Outcome::Saved { path, .. } => writeln!(out, "saved {}", path.display())?,
    }
    Ok(())
  }

  fn print_text(&self, spans: &[Range<usize>], out: &mut impl Write) -> Result<()> {
    let Some(buffer) = self.explorer.session().buffer() else {
      return Ok(());
    };
    let spans = if self.config.highlight_matches { spans } else { &[] };
    render::text(out, buffer.content(), spans)
  }

  fn set_line(&mut self, number: usize, text: String, out: &mut impl Write) -> Result<()> {
    if let Err(err) = self.require_editing() {
      return render::error(out, &err);
    }
    let mut lines: Vec<String> = self
      .explorer
      .session()
      .buffer()
      .map(|buffer| buffer.lines().map(str::to_string).collect())
      .unwrap_or_default();

    // One past the end appends.
    if number > lines.len() + 1 {
      return render::error(out, &ParseError::BadArgument(number.to_string()));
    }
    if number == lines.len() + 1 {
      lines.push(text);
    } else {
      lines[number - 1] = text;
    }
    self.execute(Command::SetText(self.join(&lines)), out)
  }

  fn require_editing(&self) -> Result<(), ExplorerError> {
    let session = self.explorer.session();
    match session.buffer() {
      None => Err(ExplorerError::NotLoaded),
      Some(_) if !session.is_editing() => Err(ExplorerError::NotEditing),
      Some(_) => Ok(()),
    }
  }

  /// Join lines with the loaded file's line ending, terminating each.
  fn join(&self, lines: &[String]) -> String {
    let ending = self
      .explorer
      .session()
      .buffer()
      .map_or("\n", |buffer| buffer.line_ending().as_str());
    lines.iter().fold(String::new(), |mut text, line| {
      text.push_str(line);
      text.push_str(ending);
      text
    })
  }
}

/// The actions that must be enabled for a confirmed command to run.
fn guarding_action(command: &Command) -> Actions {
  match command {
    Command::Rename(_) => Actions::RENAME_FILE | Actions::RENAME_FOLDER,
    Command::DeleteFolder => Actions::DELETE_FOLDER,
    Command::DeleteFile => Actions::DELETE_FILE,
    Command::SaveOverwrite => Actions::SAVE,
    _ => Actions::all(),
  }
}

fn read_text_block(input: &mut impl BufRead) -> Result<Vec<String>> {
  let mut lines = Vec::new();
  loop {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
      break;
    }
    let line = line.trim_end_matches(['\r', '\n']);
    if line == END_OF_TEXT {
      break;
    }
    lines.push(line.to_string());
  }
  Ok(lines)
}
