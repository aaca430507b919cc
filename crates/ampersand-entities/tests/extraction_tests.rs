//! Integration tests for table location and row extraction.

use std::fs;
use std::path::{Path, PathBuf};

use ampersand_entities::{
    EntityRecord, ExtractError, MarkerLocator, RowDefect, StructureDefect, extract,
    parse_codepoint,
};

/// Path of the trimmed copy of the WHATWG page.
fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/named-characters.html")
}

/// Wrap table rows in the marker div the WHATWG page uses.
fn page(rows: &str) -> String {
    format!(
        "<!DOCTYPE html><p>intro</p>\
         <div id=\"named-character-references-table\"><table>\
         <thead><tr><th>Name<th>Character(s)<th>Glyph\
         <tbody>{rows}</table></div>"
    )
}

fn extract_default(html: &str) -> Result<Vec<EntityRecord>, ExtractError> {
    extract(html, Path::new("test.html"), &MarkerLocator::default())
}

fn structure_defect(html: &str) -> StructureDefect {
    match extract_default(html) {
        Err(ExtractError::Structure { defect, .. }) => defect,
        other => panic!("expected a structure error, got {other:?}"),
    }
}

fn row_defect(html: &str) -> (usize, RowDefect) {
    match extract_default(html) {
        Err(ExtractError::RowParse { row, defect, .. }) => (row, defect),
        other => panic!("expected a row error, got {other:?}"),
    }
}

#[test]
fn test_fixture_records_in_table_order() {
    let html = fs::read_to_string(fixture_path()).expect("fixture is readable");
    let records = extract_default(&html).expect("fixture extracts");

    // 21 data rows; the heading row is row 1.
    assert_eq!(records.len(), 21);
    assert_eq!(records[0].name, "AElig;");
    assert_eq!(records[0].row, 2);
    assert_eq!(records[0].replacement, "Æ");
    assert!(records[1].is_legacy());
    assert_eq!(records[1].name, "AElig");
    assert_eq!(records.last().map(|r| r.name.as_str()), Some("quot"));

    let rows: Vec<usize> = records.iter().map(|r| r.row).collect();
    assert!(rows.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_fixture_special_expansions() {
    let html = fs::read_to_string(fixture_path()).expect("fixture is readable");
    let records = extract_default(&html).expect("fixture extracts");
    let find = |name: &str| {
        records
            .iter()
            .find(|r| r.name == name)
            .unwrap_or_else(|| panic!("{name} missing"))
    };

    assert_eq!(find("amp;").replacement, "&");
    assert_eq!(find("NewLine;").replacement, "\n");
    assert_eq!(find("Tab;").replacement, "\t");
    assert_eq!(find("nbsp;").replacement, "\u{A0}");
    assert_eq!(find("Aopf;").replacement, "\u{1D538}");
    assert_eq!(find("nvlt;").codepoints, vec!['<', '\u{20D2}']);
    assert_eq!(find("fjlig;").replacement, "fj");
    assert_eq!(find("DownBreve;").replacement, "\u{311}");
}

#[test]
fn test_name_falls_back_to_cell_text() {
    let records = extract_default(&page("<tr><td> hearts; <td> U+02665 <td> ♥")).expect("extracts");
    assert_eq!(records[0].name, "hearts;");
    assert_eq!(records[0].replacement, "\u{2665}");
}

#[test]
fn test_glyph_column_is_optional_and_not_authoritative() {
    let records = extract_default(&page(
        "<tr><td><code>a;</code><td>U+00061\
         <tr><td><code>b;</code><td>U+00062<td><span class=glyph>x</span>",
    ))
    .expect("extracts");
    assert_eq!(records[0].replacement, "a");
    assert_eq!(records[1].replacement, "b");
}

#[test]
fn test_separator_and_header_rows_are_skipped() {
    let records = extract_default(&page(
        "<tr></tr><tr><th>More<th>Headings</tr><tr><td><code>gt;</code><td>U+0003E",
    ))
    .expect("extracts");
    assert_eq!(records.len(), 1);
    // heading(1), separator(2), heading(3), data(4)
    assert_eq!(records[0].row, 4);
}

#[test]
fn test_marker_may_be_the_table_itself() {
    let html = "<table id=\"named-character-references-table\">\
                <tr><td><code>lt;</code><td>U+0003C</table>";
    let records = extract_default(html).expect("extracts");
    assert_eq!(records[0].replacement, "<");
}

#[test]
fn test_custom_marker_id() {
    let html = "<section id=entities><table><tr><td><code>gt;</code><td>U+0003E</table></section>";
    let locator = MarkerLocator::new("entities");
    assert_eq!(locator.marker_id(), "entities");
    let records = extract(html, Path::new("x.html"), &locator).expect("extracts");
    assert_eq!(records.len(), 1);
}

#[test]
fn test_rows_of_nested_tables_are_ignored() {
    let records = extract_default(&page(
        "<tr><td><code>a;</code><td>U+00061<td><table><tr><td>not<td>a row</table>\
         <tr><td><code>b;</code><td>U+00062",
    ))
    .expect("extracts");
    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["a;", "b;"]);
}

#[test]
fn test_missing_marker() {
    assert_eq!(
        structure_defect("<table><tr><td><code>a;</code><td>U+00061</table>"),
        StructureDefect::MarkerNotFound(String::from("named-character-references-table"))
    );
}

#[test]
fn test_ambiguous_marker() {
    let html = format!("{}{}", page(""), page(""));
    assert_eq!(structure_defect(&html), StructureDefect::AmbiguousMarker(2));
}

#[test]
fn test_marker_without_table() {
    assert_eq!(
        structure_defect("<div id=named-character-references-table><p>gone</p></div>"),
        StructureDefect::TableNotFound
    );
}

#[test]
fn test_row_missing_name() {
    let (row, defect) = row_defect(&page(
        "<tr><td><code>a;</code><td>U+00061<tr><td><code> </code><td>U+00062",
    ));
    assert_eq!(row, 3);
    assert_eq!(defect, RowDefect::MissingName);
}

#[test]
fn test_row_missing_codepoints() {
    assert_eq!(
        row_defect(&page("<tr><td><code>a;</code>")),
        (2, RowDefect::MissingCodepoints)
    );
    assert_eq!(
        row_defect(&page("<tr><td><code>a;</code><td>  <td>a")),
        (2, RowDefect::MissingCodepoints)
    );
}

#[test]
fn test_row_invalid_codepoint() {
    assert_eq!(
        row_defect(&page("<tr><td><code>a;</code><td>U+00061 U+ZZZZ")),
        (2, RowDefect::InvalidCodepoint(String::from("U+ZZZZ")))
    );
    // Surrogates are not Unicode scalar values.
    assert_eq!(
        row_defect(&page("<tr><td><code>a;</code><td>U+0D800")),
        (2, RowDefect::InvalidCodepoint(String::from("U+0D800")))
    );
}

#[test]
fn test_codepoint_token_forms() {
    assert_eq!(parse_codepoint("U+00026"), Ok('&'));
    assert_eq!(parse_codepoint("u+1d538"), Ok('\u{1D538}'));
    assert_eq!(parse_codepoint("0x26"), Ok('&'));
    assert_eq!(parse_codepoint("&#x26;"), Ok('&'));
    assert_eq!(parse_codepoint("&#X26;"), Ok('&'));
    assert_eq!(parse_codepoint("&#38;"), Ok('&'));
    assert_eq!(parse_codepoint("#38"), Ok('&'));
    assert_eq!(parse_codepoint("0026"), Ok('&'));
}

#[test]
fn test_codepoint_token_rejections() {
    for token in ["U+", "U+110000", "&#x26", "&#38", "#x26", "+26", "U+-1", "zz", "&#;"] {
        assert_eq!(
            parse_codepoint(token),
            Err(RowDefect::InvalidCodepoint(token.to_string())),
            "{token} should be rejected"
        );
    }
}

#[test]
fn test_row_with_heading_name_cell_is_data() {
    let records = extract_default(&page("<tr><th><code>lt;</code><td>U+0003C")).expect("extracts");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].replacement, "<");
}
