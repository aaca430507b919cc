//! Integration tests for whole-file conversion and atomic writes.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use ampersand_entities::{
    ExtractError, LegacyPolicy, Options, OutputFormat, PackageDocument, StructureDefect,
    convert, convert_file, write_atomic,
};
use tempfile::tempdir;

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/named-characters.html")
}

/// The CLI flow: convert, then write only on success.
fn convert_to(input: &Path, output: &Path, options: &Options) -> Result<usize, ExtractError> {
    let conversion = convert_file(input, options)?;
    write_atomic(output, &conversion.rendered)?;
    Ok(conversion.document.len())
}

#[test]
fn test_fixture_to_yaml_file() {
    let dir = tempdir().expect("tempdir");
    let output = dir.path().join("package.yml");
    let count = convert_to(&fixture_path(), &output, &Options::default()).expect("converts");

    // 21 data rows, 6 of them legacy.
    assert_eq!(count, 15);
    let text = fs::read_to_string(&output).expect("output written");
    let document: PackageDocument = serde_yaml::from_str(&text).expect("valid yaml");
    assert_eq!(document.len(), 15);
    assert_eq!(document.matches[0].trigger, ":AElig;");
    assert_eq!(document.get(":AMP;"), Some("&"));
    assert_eq!(document.get(":nvlt;"), Some("<\u{20D2}"));
    assert!(document.matches.iter().all(|m| m.trigger.ends_with(';')));
}

#[test]
fn test_fixture_completeness_with_legacy_kept() {
    let options = Options {
        legacy: LegacyPolicy::Keep,
        ..Options::default()
    };
    let conversion = convert_file(&fixture_path(), &options).expect("converts");
    assert_eq!(conversion.document.len(), 21);
    assert_eq!(conversion.document.get(":amp"), Some("&"));
    assert_eq!(conversion.document.get(":amp;"), Some("&"));
}

#[test]
fn test_fixture_to_json_file() {
    let dir = tempdir().expect("tempdir");
    let output = dir.path().join("entities.json");
    let options = Options {
        format: OutputFormat::Json,
        prefix: String::from("&"),
        ..Options::default()
    };
    let _ = convert_to(&fixture_path(), &output, &options).expect("converts");
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).expect("written")).expect("valid json");
    assert_eq!(value["&Tab;"], "\t");
    assert_eq!(value["&quot;"], "\"");
}

#[test]
fn test_conversion_is_idempotent() {
    let dir = tempdir().expect("tempdir");
    let first = dir.path().join("first.yml");
    let second = dir.path().join("second.yml");
    let _ = convert_to(&fixture_path(), &first, &Options::default()).expect("converts");
    let _ = convert_to(&fixture_path(), &second, &Options::default()).expect("converts");
    assert_eq!(
        fs::read(&first).expect("first"),
        fs::read(&second).expect("second")
    );
}

#[test]
fn test_malformed_row_writes_nothing() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("broken.html");
    let output = dir.path().join("package.yml");
    fs::write(
        &input,
        "<div id=named-character-references-table><table>\
         <tr><td><code>a;</code><td>U+00061\
         <tr><td><code>b;</code><td>bogus</table></div>",
    )
    .expect("write input");

    match convert_to(&input, &output, &Options::default()) {
        Err(ExtractError::RowParse { row, path, .. }) => {
            assert_eq!(row, 2);
            assert_eq!(path, input);
        }
        other => panic!("expected a row error, got {other:?}"),
    }
    assert!(!output.exists());
}

#[test]
fn test_malformed_input_keeps_previous_output() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("empty.html");
    let output = dir.path().join("package.yml");
    fs::write(&input, "<p>no table here</p>").expect("write input");
    fs::write(&output, "previous").expect("write output");

    let err = convert_to(&input, &output, &Options::default()).expect_err("fails");
    assert!(matches!(
        err,
        ExtractError::Structure {
            defect: StructureDefect::MarkerNotFound(_),
            ..
        }
    ));
    assert_eq!(fs::read_to_string(&output).expect("still there"), "previous");
}

#[test]
fn test_only_legacy_rows_is_an_empty_package() {
    let html = "<div id=named-character-references-table><table>\
                <tr><td><code>amp</code><td>U+00026</table></div>";
    let err = convert(html, Path::new("legacy.html"), &Options::default()).expect_err("fails");
    assert!(matches!(
        err,
        ExtractError::Structure {
            defect: StructureDefect::NoEntities,
            ..
        }
    ));
}

#[test]
fn test_missing_input_file() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("absent.html");
    match convert_file(&input, &Options::default()) {
        Err(ExtractError::Io { path, source }) => {
            assert_eq!(path, input);
            assert_eq!(source.kind(), ErrorKind::NotFound);
        }
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

#[test]
fn test_invalid_utf8_input() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("latin1.html");
    fs::write(&input, b"<p>caf\xe9</p>").expect("write input");
    match convert_file(&input, &Options::default()) {
        Err(ExtractError::Io { source, .. }) => {
            assert_eq!(source.kind(), ErrorKind::InvalidData);
        }
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

#[test]
fn test_write_atomic_replaces_and_reports_missing_directory() {
    let dir = tempdir().expect("tempdir");
    let output = dir.path().join("out.yml");
    write_atomic(&output, "one\n").expect("first write");
    write_atomic(&output, "two\n").expect("second write");
    assert_eq!(fs::read_to_string(&output).expect("read"), "two\n");
    // Only the destination remains; the temporary file was renamed over it.
    assert_eq!(fs::read_dir(dir.path()).expect("list").count(), 1);

    let nowhere = dir.path().join("missing").join("out.yml");
    let err = write_atomic(&nowhere, "x").expect_err("parent does not exist");
    assert!(matches!(err, ExtractError::Io { path, .. } if path == nowhere));
    assert!(!nowhere.exists());
}

#[cfg(unix)]
#[test]
fn test_write_atomic_creates_world_readable_file() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().expect("tempdir");
    // A plain create in the same directory shows what the umask allows.
    let reference = dir.path().join("reference");
    fs::write(&reference, "x\n").expect("write reference");
    let umask_mode = fs::metadata(&reference).expect("stat").permissions().mode() & 0o777;

    let output = dir.path().join("out.yml");
    write_atomic(&output, "x\n").expect("writes");
    let mode = fs::metadata(&output).expect("stat").permissions().mode() & 0o777;
    assert_eq!(mode, 0o644 & umask_mode, "output mode {mode:o}");
}

#[cfg(unix)]
#[test]
fn test_write_atomic_keeps_permissions_of_replaced_file() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().expect("tempdir");
    let output = dir.path().join("out.yml");
    fs::write(&output, "old\n").expect("write output");
    fs::set_permissions(&output, fs::Permissions::from_mode(0o600)).expect("chmod");

    write_atomic(&output, "new\n").expect("writes");
    assert_eq!(fs::read_to_string(&output).expect("read"), "new\n");
    let mode = fs::metadata(&output).expect("stat").permissions().mode() & 0o777;
    assert_eq!(mode, 0o600, "output mode {mode:o}");
}

#[test]
fn test_error_messages_name_the_failure_kind() {
    use std::error::Error;

    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("absent.html");
    let err = convert_file(&missing, &Options::default()).expect_err("fails");
    assert_eq!(err.to_string(), format!("{}: I/O error", missing.display()));
    // The OS error is only reported as the cause, not repeated in the message.
    let cause = err.source().expect("has a cause").to_string();
    assert!(!err.to_string().contains(&cause));

    let html = "<div id=named-character-references-table><table>\
                <tr><td><code>a;</code></table></div>";
    let err = convert(html, Path::new("bad.html"), &Options::default()).expect_err("fails");
    assert_eq!(
        err.to_string(),
        "bad.html: row parse error at row 1: missing code points"
    );
}
