//! Extracts the WHATWG named character references table into an espanso
//! match package.
//!
//! # Pipeline
//!
//! 1. Parse the page with `ampersand-html`.
//! 2. Locate the table ([`TableLocator`], by default [`MarkerLocator`]).
//! 3. Read each row into an [`EntityRecord`] ([`extract_row`]).
//! 4. Apply the legacy policy and drop duplicate triggers ([`PackageDocument::build`]).
//! 5. Render YAML or JSON ([`render`]) and write it atomically ([`write_atomic`]).
//!
//! Any structural or row defect aborts the run before anything is written.

/// Error types.
pub mod error;
/// Table location.
pub mod locator;
/// The match package.
pub mod package;
/// Entity records.
pub mod record;
/// Row reading and code point parsing.
pub mod row;
/// Rendering and atomic writes.
pub mod serializer;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ampersand_common::warning::{clear_warnings, note};
use ampersand_html::parse_html;

pub use error::{ExtractError, RowDefect, StructureDefect};
pub use locator::{DEFAULT_MARKER_ID, MarkerLocator, TableLocator, table_rows};
pub use package::{LegacyPolicy, Match, PackageDocument};
pub use record::EntityRecord;
pub use row::{RowOutcome, SkipReason, extract_row, parse_codepoint};
pub use serializer::{OutputFormat, render, write_atomic};

/// espanso's own packages start triggers with a colon.
pub const DEFAULT_PREFIX: &str = ":";

/// Conversion settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Prepended to every entity name to form its trigger.
    pub prefix: String,
    /// Whether legacy (no `;`) references become matches.
    pub legacy: LegacyPolicy,
    /// Output document format.
    pub format: OutputFormat,
    /// Id of the element that marks the table.
    pub marker_id: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            legacy: LegacyPolicy::default(),
            format: OutputFormat::default(),
            marker_id: DEFAULT_MARKER_ID.to_string(),
        }
    }
}

/// A finished conversion, not yet written anywhere.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The package that was built.
    pub document: PackageDocument,
    /// The document rendered in the requested format.
    pub rendered: String,
}

/// Extract every entity record from `html`, in table order.
///
/// `source` only labels errors.
///
/// # Errors
///
/// [`ExtractError::Structure`] when the table cannot be located,
/// [`ExtractError::RowParse`] for the first malformed data row.
pub fn extract(
    html: &str,
    source: &Path,
    locator: &dyn TableLocator,
) -> Result<Vec<EntityRecord>, ExtractError> {
    let (tree, _issues) = parse_html(html);
    let table = locator
        .locate(&tree)
        .map_err(|defect| structure_error(source, defect))?;

    let mut records = Vec::new();
    for (i, row) in table_rows(&tree, table).into_iter().enumerate() {
        let index = i + 1;
        match extract_row(&tree, row, index) {
            Ok(RowOutcome::Record(record)) => records.push(record),
            Ok(RowOutcome::Skip(_)) => {}
            Err(defect) => {
                return Err(ExtractError::RowParse {
                    path: source.to_path_buf(),
                    row: index,
                    defect,
                });
            }
        }
    }
    Ok(records)
}

/// Convert an HTML page to a rendered package.
///
/// # Errors
///
/// Everything [`extract`] reports, [`StructureDefect::NoEntities`] when the
/// package would be empty, and [`ExtractError::Render`].
pub fn convert(html: &str, source: &Path, options: &Options) -> Result<Conversion, ExtractError> {
    let locator = MarkerLocator::new(options.marker_id.as_str());
    let records = extract(html, source, &locator)?;
    let document = PackageDocument::build(&records, &options.prefix, options.legacy);
    if document.is_empty() {
        return Err(structure_error(source, StructureDefect::NoEntities));
    }
    let rendered = render(&document, options.format)?;
    Ok(Conversion { document, rendered })
}

/// Read `input` and convert it.
///
/// # Errors
///
/// [`ExtractError::Io`] when the file cannot be read or is not UTF-8, plus
/// everything [`convert`] reports.
pub fn convert_file(input: &Path, options: &Options) -> Result<Conversion, ExtractError> {
    let bytes = fs::read(input).map_err(|source| io_error(input, source))?;
    let html = String::from_utf8(bytes)
        .map_err(|e| io_error(input, io::Error::new(io::ErrorKind::InvalidData, e)))?;

    // Each document reports its own warnings.
    clear_warnings();
    let conversion = convert(&html, input, options)?;
    note(
        "Entities",
        &format!(
            "Parsed {} HTML entities from {}",
            conversion.document.len(),
            input.display()
        ),
    );
    Ok(conversion)
}

fn structure_error(source: &Path, defect: StructureDefect) -> ExtractError {
    ExtractError::Structure {
        path: source.to_path_buf(),
        defect,
    }
}

fn io_error(path: &Path, source: io::Error) -> ExtractError {
    ExtractError::Io {
        path: PathBuf::from(path),
        source,
    }
}
