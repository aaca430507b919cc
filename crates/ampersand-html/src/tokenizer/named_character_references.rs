//! Named character reference lookup table.
//!
//! [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
//!
//! The full table has 2,231 entries and is exactly what this workspace
//! extracts. Decoding the source page only needs the handful of escapes
//! authors write to keep markup valid, so that is all we carry here.

/// Maps entity names (without the leading '&') to their replacement strings.
///
/// Legacy forms (no trailing semicolon) are listed separately, as in the
/// WHATWG table itself.
const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("amp;", "&"),
    ("amp", "&"),
    ("lt;", "<"),
    ("lt", "<"),
    ("gt;", ">"),
    ("gt", ">"),
    ("quot;", "\""),
    ("quot", "\""),
    ("apos;", "'"),
    ("nbsp;", "\u{00A0}"),
    ("nbsp", "\u{00A0}"),
];

/// Look up a named character reference.
///
/// The `name` should NOT include the leading '&'.
///
/// # Example
/// ```ignore
/// lookup_entity("amp;")  // Some("&")
/// lookup_entity("amp")   // Some("&") - legacy form
/// lookup_entity("apos")  // None - no legacy form exists
/// ```
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES
        .iter()
        .find(|(entity, _)| *entity == name)
        .map(|(_, replacement)| *replacement)
}

/// Find the longest entity name that `candidate` starts with.
///
/// "Consume the maximum number of characters possible, where the consumed
/// characters are one of the identifiers in the first column of the named
/// character references table."
///
/// Returns the matched name length (in bytes, names are ASCII) and the
/// replacement text.
#[must_use]
pub fn longest_entity_prefix(candidate: &str) -> Option<(usize, &'static str)> {
    (1..=candidate.len())
        .rev()
        .find_map(|len| candidate.get(..len).and_then(lookup_entity).map(|r| (len, r)))
}
