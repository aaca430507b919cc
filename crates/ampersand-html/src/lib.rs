//! HTML tokenizer and tree builder for the ampersand entity extractor.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, RCDATA, RAWTEXT, and tag states
//!   - DOCTYPE, comment, and character reference handling
//!   - Attribute parsing
//!
//! - **Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - Stack of open elements with the scope checks of § 13.2.4.2
//!   - Implied end tags for cells, rows, table sections, list items and paragraphs
//!
//! # Not Implemented
//!
//! - Insertion modes and `html`/`head`/`body` synthesis
//! - Script data escape states
//! - Foster parenting
//! - Adoption agency algorithm
//! - The full named character reference table

/// HTML parser and tree construction.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

use ampersand_dom::DomTree;

pub use parser::{HTMLParser, ParseIssue};
pub use tokenizer::{Attribute, HTMLTokenizer, Token};

/// Tokenize and tree-build `html` in one step.
///
/// Parse errors never fail; they are returned alongside the tree.
#[must_use]
pub fn parse_html(html: &str) -> (DomTree, Vec<ParseIssue>) {
    let mut tokenizer = HTMLTokenizer::new(html);
    tokenizer.run();
    HTMLParser::new(tokenizer.into_tokens()).run_with_issues()
}
