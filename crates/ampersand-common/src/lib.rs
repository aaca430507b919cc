//! Common utilities for the ampersand workspace.
//!
//! This crate provides shared infrastructure used by every other crate:
//! - **Warning System** - deduplicated, colored diagnostics on stderr

pub mod warning;
