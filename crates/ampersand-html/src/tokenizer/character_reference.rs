//! Character reference states for the HTML tokenizer.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! The entity table page escapes its own glyphs (`&amp;`, `&lt;`, `&#x2033;`),
//! so decoding these correctly decides whether a glyph cell matches its
//! code points.

use super::core::{HTMLTokenizer, TokenizerState};
use super::named_character_references::longest_entity_prefix;

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// "If the number is one of the numbers in the first column of the following
/// table, then find the row with that number in the first column, and set the
/// character reference code to the number in the second column of that row."
const C1_REPLACEMENTS: &[(u32, u32)] = &[
    (0x80, 0x20AC),
    (0x82, 0x201A),
    (0x83, 0x0192),
    (0x84, 0x201E),
    (0x85, 0x2026),
    (0x86, 0x2020),
    (0x87, 0x2021),
    (0x88, 0x02C6),
    (0x89, 0x2030),
    (0x8A, 0x0160),
    (0x8B, 0x2039),
    (0x8C, 0x0152),
    (0x8E, 0x017D),
    (0x91, 0x2018),
    (0x92, 0x2019),
    (0x93, 0x201C),
    (0x94, 0x201D),
    (0x95, 0x2022),
    (0x96, 0x2013),
    (0x97, 0x2014),
    (0x98, 0x02DC),
    (0x99, 0x2122),
    (0x9A, 0x0161),
    (0x9B, 0x203A),
    (0x9C, 0x0153),
    (0x9E, 0x017E),
    (0x9F, 0x0178),
];

/// Past this the code is already out of range; stop growing it.
const CODE_CEILING: u32 = 0x0011_0000;

impl HTMLTokenizer {
    /// Returns true if the return state is an attribute value state.
    /// Per spec: "consumed as part of an attribute"
    pub(super) const fn is_consumed_as_part_of_attribute(&self) -> bool {
        matches!(
            self.return_state,
            Some(
                TokenizerState::AttributeValueDoubleQuoted
                    | TokenizerState::AttributeValueSingleQuoted
                    | TokenizerState::AttributeValueUnquoted
            )
        )
    }

    /// "Flush code points consumed as a character reference"
    ///
    /// "If the character reference was consumed as part of an attribute,
    /// then append each character to the current attribute's value. Otherwise,
    /// emit each character as a character token."
    pub(super) fn flush_code_points_consumed_as_character_reference(&mut self) {
        let buffer = std::mem::take(&mut self.temporary_buffer);
        if self.is_consumed_as_part_of_attribute() {
            for c in buffer.chars() {
                self.append_to_attribute_value(c);
            }
        } else {
            for c in buffer.chars() {
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    pub(super) fn handle_character_reference_state(&mut self) {
        // "Set the temporary buffer to the empty string. Append a U+0026
        // AMPERSAND (&) character to the temporary buffer."
        self.temporary_buffer.clear();
        self.temporary_buffer.push('&');

        match self.current_input_character {
            // "ASCII alphanumeric - Reconsume in the named character reference state."
            Some(c) if c.is_ascii_alphanumeric() => {
                self.reconsume_in(TokenizerState::NamedCharacterReference);
            }
            // "U+0023 NUMBER SIGN (#) - Append the current input character to the
            // temporary buffer. Switch to the numeric character reference state."
            Some('#') => {
                self.temporary_buffer.push('#');
                self.switch_to(TokenizerState::NumericCharacterReference);
            }
            // "Anything else - Flush code points consumed as a character reference.
            // Reconsume in the return state."
            _ => {
                self.flush_code_points_consumed_as_character_reference();
                let return_state = self.take_return_state();
                self.reconsume_in(return_state);
            }
        }
    }

    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    ///
    /// "Consume the maximum number of characters possible, where the consumed
    /// characters are one of the identifiers in the first column of the named
    /// character references table."
    ///
    /// Entered by reconsume, so the current input character is the first
    /// alphanumeric of the candidate name and has already been consumed.
    pub(super) fn handle_named_character_reference_state(&mut self) {
        let start = self.current_pos - self.current_input_character.map_or(0, char::len_utf8);
        let rest = &self.input[start..];
        let run = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        let candidate_len = if rest[run..].starts_with(';') { run + 1 } else { run };
        let candidate = &rest[..candidate_len];

        let Some((match_len, replacement)) = longest_entity_prefix(candidate) else {
            // "Otherwise - Flush code points consumed as a character reference.
            // Switch to the ambiguous ampersand state."
            self.flush_code_points_consumed_as_character_reference();
            self.reconsume_in(TokenizerState::AmbiguousAmpersand);
            return;
        };

        let matched = candidate[..match_len].to_string();
        // Entity names are ASCII, so bytes and characters agree.
        self.current_pos = start + match_len;
        self.temporary_buffer.push_str(&matched);
        let last_is_semicolon = matched.ends_with(';');

        // "If the character reference was consumed as part of an attribute, and
        // the last character matched is not a U+003B SEMICOLON character (;), and
        // the next input character is either a U+003D EQUALS SIGN character (=) or
        // an ASCII alphanumeric, then, for historical reasons, flush code points
        // consumed as a character reference and switch to the return state."
        if self.is_consumed_as_part_of_attribute()
            && !last_is_semicolon
            && self
                .peek_codepoint(0)
                .is_some_and(|c| c == '=' || c.is_ascii_alphanumeric())
        {
            self.flush_code_points_consumed_as_character_reference();
            let return_state = self.take_return_state();
            self.switch_to(return_state);
            return;
        }

        // "If the last character matched is not a U+003B SEMICOLON character (;),
        // then this is a missing-semicolon-after-character-reference parse error."
        if !last_is_semicolon {
            self.log_parse_error("missing-semicolon-after-character-reference");
        }

        // "Set the temporary buffer to the empty string. Append one or two
        // characters corresponding to the character reference name to the
        // temporary buffer. Flush code points consumed as a character reference.
        // Switch to the return state."
        self.temporary_buffer.clear();
        self.temporary_buffer.push_str(replacement);
        self.flush_code_points_consumed_as_character_reference();
        let return_state = self.take_return_state();
        self.switch_to(return_state);
    }

    /// [§ 13.2.5.74 Ambiguous ampersand state](https://html.spec.whatwg.org/multipage/parsing.html#ambiguous-ampersand-state)
    pub(super) fn handle_ambiguous_ampersand_state(&mut self) {
        match self.current_input_character {
            // "ASCII alphanumeric - If the character reference was consumed as part
            // of an attribute, then append the current input character to the current
            // attribute's value. Otherwise, emit the current input character as a
            // character token."
            Some(c) if c.is_ascii_alphanumeric() => {
                if self.is_consumed_as_part_of_attribute() {
                    self.append_to_attribute_value(c);
                } else {
                    self.emit_character_token(c);
                }
            }
            // "U+003B SEMICOLON (;) - This is an unknown-named-character-reference
            // parse error. Reconsume in the return state."
            Some(';') => {
                self.log_parse_error("unknown-named-character-reference");
                let return_state = self.take_return_state();
                self.reconsume_in(return_state);
            }
            _ => {
                let return_state = self.take_return_state();
                self.reconsume_in(return_state);
            }
        }
    }

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    pub(super) fn handle_numeric_character_reference_state(&mut self) {
        // "Set the character reference code to zero (0)."
        self.character_reference_code = 0;
        match self.current_input_character {
            // "U+0078 LATIN SMALL LETTER X, U+0058 LATIN CAPITAL LETTER X - Append the
            // current input character to the temporary buffer. Switch to the
            // hexadecimal character reference start state."
            Some(c @ ('x' | 'X')) => {
                self.temporary_buffer.push(c);
                self.switch_to(TokenizerState::HexadecimalCharacterReferenceStart);
            }
            _ => self.reconsume_in(TokenizerState::DecimalCharacterReferenceStart),
        }
    }

    /// [§ 13.2.5.76 Hexadecimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-start-state)
    pub(super) fn handle_hexadecimal_character_reference_start_state(&mut self) {
        if self.current_input_character.is_some_and(|c| c.is_ascii_hexdigit()) {
            self.reconsume_in(TokenizerState::HexadecimalCharacterReference);
        } else {
            self.absence_of_digits();
        }
    }

    /// [§ 13.2.5.77 Decimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-start-state)
    pub(super) fn handle_decimal_character_reference_start_state(&mut self) {
        if self.current_input_character.is_some_and(|c| c.is_ascii_digit()) {
            self.reconsume_in(TokenizerState::DecimalCharacterReference);
        } else {
            self.absence_of_digits();
        }
    }

    /// "This is an absence-of-digits-in-numeric-character-reference parse error.
    /// Flush code points consumed as a character reference. Reconsume in the
    /// return state."
    fn absence_of_digits(&mut self) {
        self.log_parse_error("absence-of-digits-in-numeric-character-reference");
        self.flush_code_points_consumed_as_character_reference();
        let return_state = self.take_return_state();
        self.reconsume_in(return_state);
    }

    /// [§ 13.2.5.78 Hexadecimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-state)
    pub(super) fn handle_hexadecimal_character_reference_state(&mut self) {
        self.numeric_character_reference_digit(16);
    }

    /// [§ 13.2.5.79 Decimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-state)
    pub(super) fn handle_decimal_character_reference_state(&mut self) {
        self.numeric_character_reference_digit(10);
    }

    /// Shared body of the hexadecimal and decimal character reference states.
    fn numeric_character_reference_digit(&mut self, radix: u32) {
        match self.current_input_character {
            // "Multiply the character reference code by 16 (or 10). Add a numeric
            // version of the current input character to the character reference code."
            Some(c) if c.is_digit(radix) => {
                if self.character_reference_code < CODE_CEILING {
                    let digit = c.to_digit(radix).unwrap_or(0);
                    self.character_reference_code = self.character_reference_code * radix + digit;
                }
            }
            // "U+003B SEMICOLON - Switch to the numeric character reference end state."
            Some(';') => {
                self.finish_numeric_character_reference();
                let return_state = self.take_return_state();
                self.switch_to(return_state);
            }
            // "Anything else - This is a missing-semicolon-after-character-reference
            // parse error. Reconsume in the numeric character reference end state."
            _ => {
                self.log_parse_error("missing-semicolon-after-character-reference");
                self.finish_numeric_character_reference();
                let return_state = self.take_return_state();
                self.reconsume_in(return_state);
            }
        }
    }

    /// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    ///
    /// The end state never consumes, so it runs inline and the caller picks
    /// whether the return state switches or reconsumes.
    fn finish_numeric_character_reference(&mut self) {
        let code = self.character_reference_code;
        let code = match code {
            // "If the number is 0x00, then this is a null-character-reference parse
            // error. Set the character reference code to 0xFFFD."
            0 => {
                self.log_parse_error("null-character-reference");
                0xFFFD
            }
            // "If the number is greater than 0x10FFFF, then this is a
            // character-reference-outside-unicode-range parse error."
            c if c > 0x0010_FFFF => {
                self.log_parse_error("character-reference-outside-unicode-range");
                0xFFFD
            }
            // "If the number is a surrogate, then this is a surrogate-character-reference
            // parse error."
            0xD800..=0xDFFF => {
                self.log_parse_error("surrogate-character-reference");
                0xFFFD
            }
            // "If the number is a control that is not ASCII whitespace ... this is a
            // control-character-reference parse error."
            0x80..=0x9F => {
                self.log_parse_error("control-character-reference");
                C1_REPLACEMENTS
                    .iter()
                    .find(|(from, _)| *from == code)
                    .map_or(code, |(_, to)| *to)
            }
            c => c,
        };

        self.temporary_buffer.clear();
        self.temporary_buffer
            .push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
        self.flush_code_points_consumed_as_character_reference();
    }
}
