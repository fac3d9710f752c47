//! Command implementations for the mirror CLI

mod mirror;

pub use mirror::{resolve_options, run_mirror};
