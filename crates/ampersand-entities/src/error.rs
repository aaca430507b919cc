//! Error types for extraction.
//!
//! Every failure aborts the whole run; there is no partial output.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The document does not have the shape the locator expects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureDefect {
    /// No element carries the marker id.
    #[error("no element with id \"{0}\"")]
    MarkerNotFound(String),
    /// More than one element carries the marker id.
    #[error("marker id is carried by {0} elements")]
    AmbiguousMarker(usize),
    /// The marker element holds no table.
    #[error("no table inside the marker element")]
    TableNotFound,
    /// The table produced no entities.
    #[error("no entities found in the table")]
    NoEntities,
}

/// A data row that could not be read as an entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowDefect {
    /// The name cell is missing or blank.
    #[error("missing entity name")]
    MissingName,
    /// The character(s) cell is missing or blank.
    #[error("missing code points")]
    MissingCodepoints,
    /// A code point token is malformed or not a Unicode scalar value.
    #[error("invalid code point \"{0}\"")]
    InvalidCodepoint(String),
}

/// Errors produced while converting a document.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The entity table could not be located.
    #[error("{}: structure error: {}", .path.display(), .defect)]
    Structure {
        /// Source document.
        path: PathBuf,
        /// What was wrong.
        defect: StructureDefect,
    },

    /// A data row could not be parsed.
    #[error("{}: row parse error at row {}: {}", .path.display(), .row, .defect)]
    RowParse {
        /// Source document.
        path: PathBuf,
        /// 1-based row index within the table.
        row: usize,
        /// What was wrong.
        defect: RowDefect,
    },

    /// Reading, decoding, or writing a file failed.
    #[error("{}: I/O error", .path.display())]
    Io {
        /// The file being read or written.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// The serializer refused the document.
    #[error("render error: {0}")]
    Render(String),
}
