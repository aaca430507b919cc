//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! This module contains utility functions used throughout the tokenizer:
//! - State transitions ("Switch to", "Reconsume in")
//! - Input/character handling ("Consume the next input character")
//! - Token emission ("Emit the current token")
//! - Attribute helpers for duplicate detection

use ampersand_common::warning::warn_once;

use super::core::{HTMLTokenizer, TokenizerState};
use super::token::Token;

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Switch to the X state"
    ///
    /// The next character will be consumed on the next iteration of the main loop.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    ///
    /// The same character will be processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }

    /// "Switch to the return state." The return state is cleared once taken.
    pub(super) fn take_return_state(&mut self) -> TokenizerState {
        self.return_state.take().unwrap_or(TokenizerState::Data)
    }
}

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Consume the next input character"
    ///
    /// Returns None at the end of input.
    pub(super) fn consume(&mut self) -> Option<char> {
        let c = self.input[self.current_pos..].chars().next()?;
        self.current_pos += c.len_utf8();
        Some(c)
    }

    /// Peek at a codepoint at the given offset from the current position without
    /// consuming it.
    #[must_use]
    pub fn peek_codepoint(&self, offset: usize) -> Option<char> {
        self.input[self.current_pos..].chars().nth(offset)
    }

    /// "If the next few characters are..."
    #[must_use]
    pub fn next_few_characters_are(&self, target: &str) -> bool {
        self.input[self.current_pos..].starts_with(target)
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// "ASCII case-insensitive match for the word 'DOCTYPE'"
    #[must_use]
    pub fn next_few_characters_are_case_insensitive(&self, target: &str) -> bool {
        self.input
            .get(self.current_pos..self.current_pos + target.len())
            .is_some_and(|slice| slice.eq_ignore_ascii_case(target))
    }

    /// Consume the given string from the input.
    /// Caller must have already verified the characters are present.
    pub(super) const fn consume_string(&mut self, target: &str) {
        // Only ever called with ASCII lookahead strings ("-", "octype", "CDATA[").
        self.current_pos += target.len();
    }

    /// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    ///
    /// "U+0009 CHARACTER TABULATION (tab), U+000A LINE FEED (LF), U+000C FORM
    /// FEED (FF), U+0020 SPACE". CR never reaches the tokenizer.
    pub(super) const fn is_whitespace_char(input_char: char) -> bool {
        matches!(input_char, ' ' | '\t' | '\n' | '\x0C')
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Emit the current token"
    ///
    /// The parser runs after the tokenizer, so the switch into RCDATA or
    /// RAWTEXT that tree construction would request happens here instead.
    pub(super) fn emit_token(&mut self) {
        let Some(mut token) = self.current_token.take() else {
            return;
        };
        token.drop_duplicate_attributes();
        if let Token::StartTag { ref name, .. } = token {
            self.last_start_tag_name = Some(name.clone());
            match name.as_str() {
                // [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#generic-rcdata-element-parsing-algorithm)
                // "Switch the tokenizer to the RCDATA state."
                "title" | "textarea" => self.switch_to(TokenizerState::RCDATA),
                // [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
                // "Switch the tokenizer to the RAWTEXT state."
                "style" | "script" | "xmp" | "iframe" | "noembed" | "noframes" => {
                    self.switch_to(TokenizerState::RAWTEXT);
                }
                _ => {}
            }
        }
        self.token_stream.push(token);
    }

    /// "Emit the current input character as a character token."
    pub(super) fn emit_character_token(&mut self, c: char) {
        self.token_stream.push(Token::new_character(c));
    }

    /// "Emit an end-of-file token." Stops the main loop.
    pub(super) fn emit_eof_token(&mut self) {
        self.token_stream.push(Token::EndOfFile);
        self.at_eof = true;
    }

    /// Append to the data of the current comment token.
    pub(super) fn append_to_comment(&mut self, c: char) {
        if let Some(ref mut token) = self.current_token {
            token.append_to_comment(c);
        }
    }

    /// "Append the current input character to the current attribute's value."
    pub(super) fn append_to_attribute_value(&mut self, c: char) {
        if let Some(ref mut token) = self.current_token {
            token.append_to_current_attribute_value(c);
        }
    }
}

// =============================================================================
// RCDATA/RAWTEXT Helpers
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    ///
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any."
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        match (&self.last_start_tag_name, &self.current_token) {
            (Some(last_start_tag), Some(Token::EndTag { name, .. })) => name == last_start_tag,
            _ => false,
        }
    }

    /// "Anything else":
    /// "Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS character
    /// token, and a character token for each of the characters in the temporary
    /// buffer... Reconsume in the RCDATA state."
    pub(super) fn emit_text_end_tag_name_anything_else(&mut self) {
        self.emit_character_token('<');
        self.emit_character_token('/');
        let buffer = std::mem::take(&mut self.temporary_buffer);
        for c in buffer.chars() {
            self.emit_character_token(c);
        }
        self.current_token = None;
        self.reconsume_in(self.text_state);
    }
}

// =============================================================================
// Attribute Helpers
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "When the user agent leaves the attribute name state... if there is
    /// already an attribute on the token with the exact same name, then this
    /// is a duplicate-attribute parse error and the new attribute must be
    /// removed from the token."
    pub(super) fn check_duplicate_attribute(&mut self) {
        let is_duplicate = self
            .current_token
            .as_ref()
            .is_some_and(Token::current_attribute_name_is_duplicate);

        if is_duplicate {
            self.log_parse_error("duplicate-attribute");
        }
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Parse errors in HTML are not fatal - the tokenizer recovers and continues.
    pub(super) fn log_parse_error(&self, code: &str) {
        let pos = self.current_pos;
        warn_once("HTML Tokenizer", &format!("{code} parse error at byte {pos}"));
    }
}
