//! Shared test utilities for the mirror workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`tree`]: [`TestTree`] builder for source and replica directory trees

pub mod tree;

pub use tree::{MirrorFixture, TestTree};
