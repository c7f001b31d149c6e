//! Small host helpers shared by the explorer crates.

pub mod env;
pub mod path;
