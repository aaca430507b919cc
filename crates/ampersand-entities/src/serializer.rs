//! Rendering and writing the package document.
//!
//! Rendering happens entirely in memory; the destination is only touched by
//! an atomic rename once the whole document exists.

use std::io::Write;
use std::path::Path;

use serde::ser::{Serialize, SerializeMap, Serializer};
use strum_macros::{Display, EnumString};
use tempfile::Builder;

use crate::error::ExtractError;
use crate::package::{Match, PackageDocument};

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// espanso match file: `matches: [{trigger, replace}, ...]`.
    #[default]
    Yaml,
    /// A single object mapping each trigger to its expansion, in table order.
    Json,
}

/// Serializes matches as a JSON object whose keys keep table order.
struct TriggerMap<'a>(&'a [Match]);

impl Serialize for TriggerMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for m in self.0 {
            map.serialize_entry(&m.trigger, &m.replace)?;
        }
        map.end()
    }
}

/// Render `document` in `format`. The result always ends with a newline.
///
/// # Errors
///
/// [`ExtractError::Render`] if the serializer fails.
pub fn render(document: &PackageDocument, format: OutputFormat) -> Result<String, ExtractError> {
    match format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(document).map_err(|e| ExtractError::Render(e.to_string()))
        }
        OutputFormat::Json => {
            let mut text = serde_json::to_string_pretty(&TriggerMap(&document.matches))
                .map_err(|e| ExtractError::Render(e.to_string()))?;
            text.push('\n');
            Ok(text)
        }
    }
}

/// Write `contents` to `path` atomically.
///
/// The text goes to a temporary file beside `path`, which then replaces
/// `path` in one rename. On failure `path` is untouched and the temporary
/// file is removed. The parent directory must exist.
///
/// A replaced file keeps its permissions; a new one is created readable by
/// everyone (mode 0644 before the umask), as a plain create would.
///
/// # Errors
///
/// [`ExtractError::Io`] naming `path` if any step fails.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), ExtractError> {
    let io_error = |source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        let _ = builder.permissions(output_permissions(path));
    }
    let mut file = builder.tempfile_in(parent).map_err(io_error)?;
    file.write_all(contents.as_bytes()).map_err(io_error)?;
    file.as_file().sync_all().map_err(io_error)?;
    let _ = file.persist(path).map_err(|e| io_error(e.error))?;
    Ok(())
}

/// Permissions for the file written at `path`: those of the file being
/// replaced, or 0644.
#[cfg(unix)]
fn output_permissions(path: &Path) -> std::fs::Permissions {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path).map_or_else(
        |_| fs::Permissions::from_mode(0o644),
        |metadata| metadata.permissions(),
    )
}
