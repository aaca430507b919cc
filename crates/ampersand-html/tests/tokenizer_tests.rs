//! Integration tests for the HTML tokenizer.

use ampersand_html::tokenizer::named_character_references::{lookup_entity, longest_entity_prefix};
use ampersand_html::{HTMLTokenizer, Token};

/// Helper to tokenize a string and return the tokens
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = HTMLTokenizer::new(input);
    tokenizer.run();
    tokenizer.into_tokens()
}

/// Helper to collect the character tokens as a string
fn text_of(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|t| match t {
            Token::Character { data } => Some(*data),
            _ => None,
        })
        .collect()
}

/// Helper to get the value of an attribute on the first start tag
fn first_attribute(tokens: &[Token], name: &str) -> Option<String> {
    tokens.iter().find_map(|t| match t {
        Token::StartTag { attributes, .. } => attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.clone()),
        _ => None,
    })
}

#[test]
fn test_plain_text() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens.len(), 6); // 5 chars + EOF
    assert!(matches!(tokens[0], Token::Character { data: 'H' }));
    assert!(matches!(tokens[4], Token::Character { data: 'o' }));
    assert!(tokens[5].is_eof());
}

#[test]
fn test_empty_input_is_just_eof() {
    let tokens = tokenize("");
    assert_eq!(tokens, vec![Token::EndOfFile]);
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 2);
    assert_eq!(
        tokens[0],
        Token::Doctype {
            name: Some(String::from("html"))
        }
    );
}

#[test]
fn test_doctype_with_identifiers_is_skipped() {
    let tokens = tokenize(
        r#"<!doctype HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">x"#,
    );
    assert_eq!(
        tokens[0],
        Token::Doctype {
            name: Some(String::from("html"))
        }
    );
    assert_eq!(text_of(&tokens), "x");
}

#[test]
fn test_start_tag_with_attributes() {
    let tokens = tokenize(r#"<TR class="impl" id='entity-amp' data-x=1>"#);
    match &tokens[0] {
        Token::StartTag {
            name,
            self_closing,
            attributes,
        } => {
            assert_eq!(name, "tr");
            assert!(!self_closing);
            assert_eq!(attributes.len(), 3);
            assert_eq!(attributes[0].name, "class");
            assert_eq!(attributes[0].value, "impl");
            assert_eq!(attributes[1].value, "entity-amp");
            assert_eq!(attributes[2].name, "data-x");
            assert_eq!(attributes[2].value, "1");
        }
        other => panic!("Expected StartTag token, got {other}"),
    }
}

#[test]
fn test_duplicate_attribute_keeps_first() {
    let tokens = tokenize(r#"<div id="a" id="b">"#);
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes.len(), 1);
            assert_eq!(attributes[0].value, "a");
        }
        other => panic!("Expected StartTag token, got {other}"),
    }
}

#[test]
fn test_self_closing_and_end_tag() {
    let tokens = tokenize("<br/></Code>");
    assert!(matches!(
        &tokens[0],
        Token::StartTag { name, self_closing: true, .. } if name == "br"
    ));
    assert!(matches!(&tokens[1], Token::EndTag { name, .. } if name == "code"));
}

#[test]
fn test_comments() {
    let tokens = tokenize("<!-- a - b -->x<!---->y<?php?>");
    assert_eq!(tokens[0], Token::new_comment(String::from(" a - b ")));
    assert_eq!(tokens[2], Token::new_comment(String::new()));
    assert_eq!(tokens[4], Token::new_comment(String::from("?php?")));
    assert_eq!(text_of(&tokens), "xy");
}

#[test]
fn test_named_character_references_in_text() {
    let tokens = tokenize("&amp; &lt;&gt; &quot;&apos;&nbsp;");
    assert_eq!(text_of(&tokens), "& <> \"'\u{A0}");
}

#[test]
fn test_legacy_named_reference_without_semicolon() {
    let tokens = tokenize("a&ampb &lt c");
    assert_eq!(text_of(&tokens), "a&b < c");
}

#[test]
fn test_unknown_named_reference_is_left_literally() {
    let tokens = tokenize("&Aacute; &notanentity; &");
    assert_eq!(text_of(&tokens), "&Aacute; &notanentity; &");
}

#[test]
fn test_numeric_character_references() {
    let tokens = tokenize("&#38;&#x3C;&#X2033;&#65");
    assert_eq!(text_of(&tokens), "&<\u{2033}A");
}

#[test]
fn test_numeric_reference_replacements() {
    // NUL, surrogate, out of range, and a C1 control from windows-1252.
    let tokens = tokenize("&#0;&#xD800;&#x110000;&#x80;");
    assert_eq!(text_of(&tokens), "\u{FFFD}\u{FFFD}\u{FFFD}\u{20AC}");
}

#[test]
fn test_numeric_reference_without_digits() {
    let tokens = tokenize("&#; &#x;");
    assert_eq!(text_of(&tokens), "&#; &#x;");
}

#[test]
fn test_character_reference_in_attribute() {
    let tokens = tokenize(r#"<a title="&lt;&#x41;&amp;">"#);
    assert_eq!(first_attribute(&tokens, "title").as_deref(), Some("<A&"));
}

#[test]
fn test_attribute_historical_exception() {
    // A legacy reference followed by '=' or an alphanumeric stays literal in attributes.
    let tokens = tokenize(r#"<a href="?x=1&amp=2&ampy">"#);
    assert_eq!(
        first_attribute(&tokens, "href").as_deref(),
        Some("?x=1&amp=2&ampy")
    );
}

#[test]
fn test_rawtext_script_and_style() {
    let tokens = tokenize("<script>if (a<b && c</d) {}</script><p>");
    assert_eq!(text_of(&tokens), "if (a<b && c</d) {}");
    assert!(matches!(&tokens.last(), Some(Token::EndOfFile)));
    assert!(
        tokens
            .iter()
            .any(|t| matches!(t, Token::StartTag { name, .. } if name == "p"))
    );
}

#[test]
fn test_rcdata_title_decodes_references() {
    let tokens = tokenize("<title>A &amp; <b></title>");
    assert_eq!(text_of(&tokens), "A & <b>");
}

#[test]
fn test_crlf_is_normalized() {
    let tokens = tokenize("a\r\nb\rc");
    assert_eq!(text_of(&tokens), "a\nb\nc");
}

#[test]
fn test_unterminated_tag_at_eof() {
    let tokens = tokenize("text<div class=");
    assert_eq!(text_of(&tokens), "text");
    assert_eq!(tokens.iter().filter(|t| t.is_eof()).count(), 1);
}

#[test]
fn test_named_reference_table_lookups() {
    assert_eq!(lookup_entity("amp;"), Some("&"));
    assert_eq!(lookup_entity("amp"), Some("&"));
    assert_eq!(lookup_entity("apos"), None);
    assert_eq!(longest_entity_prefix("amp;x"), Some((4, "&")));
    assert_eq!(longest_entity_prefix("ampx"), Some((3, "&")));
    assert_eq!(longest_entity_prefix("hearts;"), None);
}
