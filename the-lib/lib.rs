//! Directory navigation and file-content editing model for the explorer.
//!
//! The crate is split the same way the explorer thinks about a request:
//! [`navigator`] owns the current directory and its listing, [`file_ops`]
//! performs one filesystem mutation per call, [`session`] holds the text of
//! the opened file, and [`command`] routes user intents to exactly one of
//! them.

pub mod command;
pub mod entry;
pub mod error;
pub mod file_ops;
pub mod info;
pub mod navigator;
pub mod search;
pub mod session;

pub use error::{
  ExplorerError,
  Result,
};
