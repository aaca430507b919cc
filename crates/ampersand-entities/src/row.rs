//! Reading one table row as an entity.
//!
//! Columns are name, character(s), glyph. The WHATWG page writes rows like
//!
//! ```text
//! <tr id="entity-nvlt"><td> <code>nvlt;</code> <td> U+0003C U+020D2 <td> <span class="glyph compound">&lt;⃒</span>
//! ```
//!
//! The code points are authoritative; the glyph is only cross-checked.

use ampersand_common::warning::warn_once;
use ampersand_dom::{DomTree, NodeId};

use crate::error::RowDefect;
use crate::record::EntityRecord;

/// The page draws combining marks on a dotted circle, which is not part of
/// the expansion.
const DOTTED_CIRCLE: char = '\u{25CC}';

/// Why a row produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A row with no cells.
    Separator,
    /// A heading row: only `th` cells, or inside `thead`.
    Header,
}

/// The result of reading one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// A data row.
    Record(EntityRecord),
    /// A row that carries no entity.
    Skip(SkipReason),
}

/// Read the row `row` (1-based index `index` among the table's rows).
///
/// # Errors
///
/// Returns a [`RowDefect`] when a data row lacks a name or code points, or
/// when a code point token cannot be parsed.
pub fn extract_row(tree: &DomTree, row: NodeId, index: usize) -> Result<RowOutcome, RowDefect> {
    let cells: Vec<NodeId> = tree
        .children(row)
        .iter()
        .copied()
        .filter(|&c| tree.is_element_named(c, "td") || tree.is_element_named(c, "th"))
        .collect();

    if cells.is_empty() {
        return Ok(RowOutcome::Skip(SkipReason::Separator));
    }
    let in_thead = tree.ancestors(row).any(|a| tree.is_element_named(a, "thead"));
    if in_thead || tree.child_elements_named(row, "th").len() == cells.len() {
        return Ok(RowOutcome::Skip(SkipReason::Header));
    }

    let name = entity_name(tree, cells[0]);
    if name.is_empty() {
        return Err(RowDefect::MissingName);
    }

    let codepoint_text = cells
        .get(1)
        .map(|&cell| tree.text_content(cell))
        .unwrap_or_default();
    let codepoints = codepoint_text
        .split_whitespace()
        .map(parse_codepoint)
        .collect::<Result<Vec<char>, RowDefect>>()?;
    if codepoints.is_empty() {
        return Err(RowDefect::MissingCodepoints);
    }

    let record = EntityRecord::new(name, codepoints, index);
    if let Some(&glyph_cell) = cells.get(2) {
        check_glyph(tree, glyph_cell, &record);
    }
    Ok(RowOutcome::Record(record))
}

/// The text of the first `<code>` in the cell, or the cell text itself.
fn entity_name(tree: &DomTree, cell: NodeId) -> String {
    let source = tree.first_descendant_element(cell, "code").unwrap_or(cell);
    tree.text_content(source).trim().to_string()
}

/// Warn when the rendered glyph disagrees with the code points.
fn check_glyph(tree: &DomTree, cell: NodeId, record: &EntityRecord) {
    // Whitespace glyphs (Tab, NewLine, nbsp) are only trustworthy inside
    // the glyph span; bare cell text is trimmed.
    let glyph_span = tree
        .descendants(cell)
        .find(|&d| tree.as_element(d).is_some_and(|e| e.has_class("glyph")));
    let glyph: String = match glyph_span {
        Some(span) => tree.text_content(span),
        None => tree.text_content(cell).trim().to_string(),
    };
    let glyph: String = glyph.chars().filter(|&c| c != DOTTED_CIRCLE).collect();

    if !glyph.is_empty() && glyph != record.replacement {
        warn_once(
            "Entities",
            &format!(
                "row {} ({}): glyph {:?} disagrees with code points {:?}; using the code points",
                record.row, record.name, glyph, record.replacement
            ),
        );
    }
}

/// Parse one code point token.
///
/// Accepted forms: `U+0026` (as the WHATWG table writes them), `0x26`,
/// `&#x26;`, `&#38;`, `#38`, and bare hexadecimal `0026`. Prefixes are
/// case-insensitive.
///
/// # Errors
///
/// [`RowDefect::InvalidCodepoint`] when the token matches none of the forms
/// or names a value that is not a Unicode scalar value.
pub fn parse_codepoint(token: &str) -> Result<char, RowDefect> {
    let invalid = || RowDefect::InvalidCodepoint(token.to_string());

    let (digits, radix) = if let Some(hex) = strip_prefix_ignore_case(token, "U+") {
        (hex, 16)
    } else if let Some(hex) = strip_prefix_ignore_case(token, "0x") {
        (hex, 16)
    } else if let Some(rest) = strip_prefix_ignore_case(token, "&#x") {
        (rest.strip_suffix(';').ok_or_else(invalid)?, 16)
    } else if let Some(rest) = token.strip_prefix("&#") {
        (rest.strip_suffix(';').ok_or_else(invalid)?, 10)
    } else if let Some(rest) = token.strip_prefix('#') {
        (rest, 10)
    } else {
        (token, 16)
    };

    // from_str_radix tolerates a sign; the table never writes one.
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(invalid());
    }
    let value = u32::from_str_radix(digits, radix).map_err(|_| invalid())?;
    char::from_u32(value).ok_or_else(invalid)
}

fn strip_prefix_ignore_case<'a>(token: &'a str, prefix: &str) -> Option<&'a str> {
    token
        .get(..prefix.len())
        .filter(|head| head.eq_ignore_ascii_case(prefix))
        .map(|_| &token[prefix.len()..])
}
