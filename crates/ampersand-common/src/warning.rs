//! Diagnostics with colored terminal output.
//!
//! Warnings are deduplicated so a repeated parse error in a large document
//! prints once. Notes are plain progress lines and can be silenced.
//! Everything goes to stderr; stdout is reserved for rendered documents.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// When set, [`note`] prints nothing. Warnings are never silenced.
static QUIET: AtomicBool = AtomicBool::new(false);

/// Warn about something recoverable (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("Entities", "row 12: glyph disagrees with code points");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{}", format!("[ampersand {component}] ⚠ {message}").yellow());
    }
}

/// Print a progress line, unless notes are silenced.
pub fn note(component: &str, message: &str) {
    if !QUIET.load(Ordering::Relaxed) {
        eprintln!("{} {message}", format!("[ampersand {component}]").dimmed());
    }
}

/// Silence (or re-enable) [`note`] output.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

/// Number of distinct warnings printed since the last [`clear_warnings`].
pub fn warning_count() -> usize {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map_or(0, HashSet::len)
}

/// Clear all recorded warnings (call before processing a new document)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_deduplicates() {
        // Nothing else in this module warns, so the count is exact.
        let before = warning_count();
        warn_once("Test", "dedup message");
        assert_eq!(warning_count(), before + 1);
        warn_once("Test", "dedup message");
        assert_eq!(warning_count(), before + 1);
        warn_once("Other", "dedup message");
        assert_eq!(warning_count(), before + 2);
    }

    #[test]
    fn test_quiet_flag_round_trips() {
        set_quiet(true);
        assert!(QUIET.load(Ordering::Relaxed));
        note("Test", "not printed");
        set_quiet(false);
        assert!(!QUIET.load(Ordering::Relaxed));
    }
}
