//! Line ending detection and line splitting for plain text files.
//!
//! Lines are terminated by LF, CRLF or a lone CR, the same set of boundaries
//! a buffered line reader honours. The terminator is never part of the line.

#[cfg(target_os = "windows")]
pub const NATIVE_LINE_ENDING: LineEnding = LineEnding::Crlf;

#[cfg(not(target_os = "windows"))]
pub const NATIVE_LINE_ENDING: LineEnding = LineEnding::LF;

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum LineEnding {
  /// CarriageReturn followed by LineFeed.
  Crlf,

  /// U+000A -- LineFeed
  LF,

  /// U+000D -- CarriageReturn
  CR,
}

impl LineEnding {
  #[inline]
  pub const fn len(&self) -> usize {
    match self {
      Self::Crlf => 2,
      _ => 1,
    }
  }

  #[inline]
  pub const fn as_str(&self) -> &'static str {
    match self {
      Self::Crlf => "\u{000D}\u{000A}",
      Self::LF => "\u{000A}",
      Self::CR => "\u{000D}",
    }
  }
}

/// Attempts to detect what line ending the passed text uses.
///
/// Only the first hundred lines are inspected.
pub fn auto_detect_line_ending(text: &str) -> Option<LineEnding> {
  LineIter::new(text)
    .take(100)
    .find_map(|(_, ending)| ending)
}

/// Iterator over `(line, terminator)` pairs of a text.
///
/// A trailing terminator does not produce an extra empty line, so `"a\n"` and
/// `"a"` both yield exactly one line.
#[derive(Debug, Clone)]
pub struct LineIter<'a> {
  rest: &'a str,
}

impl<'a> LineIter<'a> {
  pub fn new(text: &'a str) -> Self {
    Self { rest: text }
  }
}

impl<'a> Iterator for LineIter<'a> {
  type Item = (&'a str, Option<LineEnding>);

  fn next(&mut self) -> Option<Self::Item> {
    if self.rest.is_empty() {
      return None;
    }

    let Some(idx) = self.rest.find(['\n', '\r']) else {
      let line = self.rest;
      self.rest = "";
      return Some((line, None));
    };

    let line = &self.rest[..idx];
    let ending = if self.rest[idx..].starts_with("\r\n") {
      LineEnding::Crlf
    } else if self.rest.as_bytes()[idx] == b'\r' {
      LineEnding::CR
    } else {
      LineEnding::LF
    };
    self.rest = &self.rest[idx + ending.len()..];
    Some((line, Some(ending)))
  }
}

/// Split a text into its lines, dropping the terminators.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> + '_ {
  LineIter::new(text).map(|(line, _)| line)
}

/// Join lines back into a single text, terminating every line with `ending`.
pub fn join_lines<I, S>(lines: I, ending: LineEnding) -> String
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let mut text = String::new();
  for line in lines {
    text.push_str(line.as_ref());
    text.push_str(ending.as_str());
  }
  text
}
