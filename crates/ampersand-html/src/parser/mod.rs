//! HTML parser module for tree construction.

/// Table-aware tree builder.
pub mod core;

pub use self::core::{HTMLParser, ParseIssue};
