//! Parsing of shell lines into explorer commands.

use std::path::PathBuf;

use the_lib::command::Command;
use thiserror::Error;

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
  /// Forwarded to the explorer as is.
  Explorer(Command),
  /// Print the current listing.
  List,
  /// Select the row with this label.
  Select(String),
  /// Delete the selection, folder or file.
  Remove,
  /// Read the replacement text from the following lines.
  Text,
  /// Replace line `n` (1-based) of the edited text.
  Line(usize, String),
  Actions,
  Help,
  Quit,
  Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
  #[error("unknown command {0:?}, try `help`")]
  Unknown(String),
  #[error("missing {0}")]
  MissingArgument(&'static str),
  #[error("bad argument {0:?}")]
  BadArgument(String),
}

pub const HELP: &str = "\
ls                      list the current directory
cd <path> | open <path> go to a directory
sel <label>             select a row (../ goes up)
up                      go to the parent directory
enter                   go into the selected folder
mkdir <name>            create a folder
touch <name>            create an empty file
mv <name>               rename the selection
cp                      copy the selected file
rm                      delete the selection
show                    print the selected file
edit on|off             toggle edit mode
text                    replace the text; end with a line holding only '.'
line <n> <text>         replace one line of the text
find <needle>           highlight occurrences
replace <needle> <with> replace every occurrence
save                    overwrite the edited file
saveas <name>           save the text as a new file
actions                 list what can be done right now
help                    this text
quit                    leave";

pub fn parse(line: &str) -> Result<Input, ParseError> {
  let line = line.trim_end_matches(['\r', '\n']);
  let trimmed = line.trim_start();
  if trimmed.trim().is_empty() {
    return Ok(Input::Empty);
  }

  let (cmd, rest) = match trimmed.split_once(char::is_whitespace) {
    Some((cmd, rest)) => (cmd, rest),
    None => (trimmed, ""),
  };
  let arg = rest.trim();
  let required = |what| {
    if arg.is_empty() {
      Err(ParseError::MissingArgument(what))
    } else {
      Ok(arg.to_string())
    }
  };

  let input = match cmd {
    "ls" => Input::List,
    "cd" | "open" => Input::Explorer(Command::Open(PathBuf::from(required("path")?))),
    "sel" => Input::Select(required("label")?),
    "up" => Input::Explorer(Command::Back),
    "enter" => Input::Explorer(Command::Explore),
    "mkdir" => Input::Explorer(Command::CreateDirectory(required("folder name")?)),
    "touch" => Input::Explorer(Command::CreateFile(required("file name")?)),
    "mv" => Input::Explorer(Command::Rename(required("new name")?)),
    "cp" => Input::Explorer(Command::CopyFile),
    "rm" => Input::Remove,
    "show" => Input::Explorer(Command::ShowFile),
    "edit" => match arg {
      "on" => Input::Explorer(Command::ToggleEdit(true)),
      "off" => Input::Explorer(Command::ToggleEdit(false)),
      "" => return Err(ParseError::MissingArgument("on or off")),
      other => return Err(ParseError::BadArgument(other.to_string())),
    },
    "text" => Input::Text,
    "line" => {
      let (number, text) = rest
        .trim_start()
        .split_once(' ')
        .unwrap_or((rest.trim(), ""));
      if number.is_empty() {
        return Err(ParseError::MissingArgument("line number"));
      }
      match number.parse::<usize>() {
        Ok(n) if n > 0 => Input::Line(n, text.to_string()),
        _ => return Err(ParseError::BadArgument(number.to_string())),
      }
    },
    "find" => Input::Explorer(Command::Search(required("needle")?)),
    "replace" => {
      let (needle, replacement) = arg
        .split_once(' ')
        .ok_or(ParseError::MissingArgument("replacement"))?;
      Input::Explorer(Command::Replace {
        needle:      needle.to_string(),
        replacement: replacement.to_string(),
      })
    },
    "save" => Input::Explorer(Command::SaveOverwrite),
    "saveas" => Input::Explorer(Command::SaveAs(required("file name")?)),
    "refresh" => Input::Explorer(Command::Refresh),
    "actions" => Input::Actions,
    "help" | "?" => Input::Help,
    "quit" | "exit" | "q" => Input::Quit,
    other => return Err(ParseError::Unknown(other.to_string())),
  };

  Ok(input)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_lines_are_empty() {
    assert_eq!(parse("   \n"), Ok(Input::Empty));
  }

  #[test]
  fn navigation_commands() {
    assert_eq!(
      parse("cd /tmp"),
      Ok(Input::Explorer(Command::Open(PathBuf::from("/tmp"))))
    );
    assert_eq!(parse("up"), Ok(Input::Explorer(Command::Back)));
    assert_eq!(parse("sel ./src"), Ok(Input::Select("./src".into())));
    assert_eq!(parse("cd"), Err(ParseError::MissingArgument("path")));
  }

  #[test]
  fn names_keep_inner_spaces() {
    assert_eq!(
      parse("mkdir my folder"),
      Ok(Input::Explorer(Command::CreateDirectory("my folder".into())))
    );
  }

  #[test]
  fn edit_toggle_needs_on_or_off() {
    assert_eq!(
      parse("edit on"),
      Ok(Input::Explorer(Command::ToggleEdit(true)))
    );
    assert_eq!(
      parse("edit maybe"),
      Err(ParseError::BadArgument("maybe".into()))
    );
  }

  #[test]
  fn replace_splits_on_first_space() {
    assert_eq!(
      parse("replace foo bar baz"),
      Ok(Input::Explorer(Command::Replace {
        needle:      "foo".into(),
        replacement: "bar baz".into(),
      }))
    );
    assert_eq!(
      parse("replace foo"),
      Err(ParseError::MissingArgument("replacement"))
    );
  }

  #[test]
  fn line_takes_a_positive_number() {
    assert_eq!(parse("line 2 hello"), Ok(Input::Line(2, "hello".into())));
    assert_eq!(parse("line 3"), Ok(Input::Line(3, String::new())));
    assert_eq!(parse("line 0 x"), Err(ParseError::BadArgument("0".into())));
  }

  #[test]
  fn unknown_commands_are_reported() {
    assert_eq!(parse("frobnicate"), Err(ParseError::Unknown("frobnicate".into())));
  }
}
