//! Literal substring search and replace over a text buffer.
//!
//! # Overview
//!
//! [`search`] returns every occurrence of a needle as a half-open byte range,
//! scanning left to right and never reporting overlapping matches.
//! [`replace_all`] rewrites the same occurrences and reports where each
//! replacement landed in the new text. Matching is literal and
//! case-sensitive: no regex, no normalisation.
//!
//! # Examples
//!
//! ```
//! use the_lib::search::{
//!   replace_all,
//!   search,
//! };
//!
//! assert_eq!(search("abcabc", "abc"), vec![0..3, 3..6]);
//!
//! let (text, spans) = replace_all("aXaXa", "X", "YY");
//! assert_eq!(text, "aYYaYYa");
//! assert_eq!(spans, vec![1..3, 4..6]);
//! ```
//!
//! # Design Notes
//!
//! - **Byte offsets**: ranges index the UTF-8 content directly, so they can
//!   be used to slice it.
//! - **Empty needle**: matches nothing, and replacing it is a no-op rather
//!   than an error.
//! - **Replacement spans**: only text that was inserted is reported; copies of
//!   the replacement already present in the content are not.

use std::ops::Range;

/// Every non-overlapping occurrence of `needle` in `content`, left to right.
pub fn search(content: &str, needle: &str) -> Vec<Range<usize>> {
  if needle.is_empty() {
    return Vec::new();
  }

  content
    .match_indices(needle)
    .map(|(start, matched)| start..start + matched.len())
    .collect()
}

/// Replace every non-overlapping occurrence of `needle` with `replacement`.
///
/// Returns the new text and the span of each inserted `replacement` in it,
/// empty when nothing was replaced.
pub fn replace_all(content: &str, needle: &str, replacement: &str) -> (String, Vec<Range<usize>>) {
  let matches = search(content, needle);
  let mut text = String::with_capacity(content.len());
  let mut spans = Vec::with_capacity(matches.len());
  let mut copied = 0;

  for matched in matches {
    text.push_str(&content[copied..matched.start]);
    let start = text.len();
    text.push_str(replacement);
    spans.push(start..text.len());
    copied = matched.end;
  }
  text.push_str(&content[copied..]);

  (text, spans)
}
