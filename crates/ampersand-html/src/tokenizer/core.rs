use strum_macros::Display;

use super::token::Token;

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The tokenizer state machine. Each state corresponds to a section in § 13.2.5.
/// The RCDATA and RAWTEXT end-tag states are shared: [`HTMLTokenizer`]
/// remembers which text state to return to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    RCDATA,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    ///
    /// Script data is tokenized as RAWTEXT; script escapes never hide a
    /// `</script>` on the pages we read.
    RAWTEXT,
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    TagOpen,
    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    EndTagOpen,
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    TagName,
    /// [§ 13.2.5.9](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state)
    /// and [§ 13.2.5.12](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    TextLessThanSign,
    /// [§ 13.2.5.10](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-open-state)
    /// and [§ 13.2.5.13](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-open-state)
    TextEndTagOpen,
    /// [§ 13.2.5.11](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    /// and [§ 13.2.5.14](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    TextEndTagName,
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    AfterAttributeName,
    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    BeforeAttributeValue,
    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    AttributeValueDoubleQuoted,
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    AttributeValueSingleQuoted,
    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    AttributeValueUnquoted,
    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    AfterAttributeValueQuoted,
    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    SelfClosingStartTag,
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    BogusComment,
    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    MarkupDeclarationOpen,
    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    CommentStart,
    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    Comment,
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    DOCTYPE,
    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    DOCTYPEName,
    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    ///
    /// Public and system identifiers are skipped here as well.
    BogusDOCTYPE,
    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    CharacterReference,
    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    NamedCharacterReference,
    /// [§ 13.2.5.74 Ambiguous ampersand state](https://html.spec.whatwg.org/multipage/parsing.html#ambiguous-ampersand-state)
    AmbiguousAmpersand,
    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    NumericCharacterReference,
    /// [§ 13.2.5.76 Hexadecimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-start-state)
    HexadecimalCharacterReferenceStart,
    /// [§ 13.2.5.77 Decimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-start-state)
    DecimalCharacterReferenceStart,
    /// [§ 13.2.5.78 Hexadecimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-state)
    HexadecimalCharacterReference,
    /// [§ 13.2.5.79 Decimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-state)
    DecimalCharacterReference,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "Implementations must act as if they used the following state machine to tokenize HTML."
///
/// This struct maintains the state machine for tokenizing HTML input into tokens.
pub struct HTMLTokenizer {
    pub(super) state: TokenizerState,
    pub(super) return_state: Option<TokenizerState>,
    /// RCDATA or RAWTEXT: where the shared end-tag states fall back to.
    pub(super) text_state: TokenizerState,
    pub(super) input: String,
    pub(super) current_pos: usize,
    pub(super) current_input_character: Option<char>,
    pub(super) current_token: Option<Token>,
    pub(super) at_eof: bool,
    pub(super) token_stream: Vec<Token>,
    // When true, the next iteration of the main loop will not consume a new character.
    // "Reconsume in the X state" sets this flag.
    pub(super) reconsume: bool,

    /// "The last start tag token emitted is used as part of the tree construction stage
    /// and in the RCDATA, RAWTEXT, and script data states."
    pub(super) last_start_tag_name: Option<String>,

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#temporary-buffer)
    pub(super) temporary_buffer: String,

    /// [§ 13.2.5.75](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    /// "Set the character reference code to zero (0)."
    pub(super) character_reference_code: u32,
}

impl HTMLTokenizer {
    /// Create a new tokenizer for the given input.
    ///
    /// [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
    /// "Before the tokenization stage, the input stream must be preprocessed by
    /// normalizing newlines." CRLF and lone CR both become LF.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            state: TokenizerState::Data,
            return_state: None,
            text_state: TokenizerState::RAWTEXT,
            input: input.replace("\r\n", "\n").replace('\r', "\n"),
            current_pos: 0,
            current_input_character: None,
            current_token: None,
            at_eof: false,
            token_stream: Vec::new(),
            reconsume: false,
            last_start_tag_name: None,
            temporary_buffer: String::new(),
            character_reference_code: 0,
        }
    }

    /// Consume the tokenizer and return the token stream.
    /// Call this after [`run`](Self::run) to get the tokens for the parser.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.token_stream
    }

    /// Run the tokenizer to completion.
    ///
    /// Processes the input and populates the token stream. The stream always
    /// ends with exactly one [`Token::EndOfFile`].
    pub fn run(&mut self) {
        while !self.at_eof {
            // Each state begins by consuming the next input character,
            // unless we're reconsuming from a previous state transition.
            if self.reconsume {
                self.reconsume = false;
            } else {
                self.current_input_character = self.consume();
            }

            match self.state {
                TokenizerState::Data => self.handle_data_state(),
                TokenizerState::RCDATA => self.handle_rcdata_state(),
                TokenizerState::RAWTEXT => self.handle_rawtext_state(),
                TokenizerState::TagOpen => self.handle_tag_open_state(),
                TokenizerState::EndTagOpen => self.handle_end_tag_open_state(),
                TokenizerState::TagName => self.handle_tag_name_state(),
                TokenizerState::TextLessThanSign => self.handle_text_less_than_sign_state(),
                TokenizerState::TextEndTagOpen => self.handle_text_end_tag_open_state(),
                TokenizerState::TextEndTagName => self.handle_text_end_tag_name_state(),
                TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(),
                TokenizerState::AttributeName => self.handle_attribute_name_state(),
                TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(),
                TokenizerState::BeforeAttributeValue => {
                    self.handle_before_attribute_value_state();
                }
                TokenizerState::AttributeValueDoubleQuoted => {
                    self.handle_attribute_value_quoted_state('"');
                }
                TokenizerState::AttributeValueSingleQuoted => {
                    self.handle_attribute_value_quoted_state('\'');
                }
                TokenizerState::AttributeValueUnquoted => {
                    self.handle_attribute_value_unquoted_state();
                }
                TokenizerState::AfterAttributeValueQuoted => {
                    self.handle_after_attribute_value_quoted_state();
                }
                TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(),
                TokenizerState::BogusComment => self.handle_bogus_comment_state(),
                TokenizerState::MarkupDeclarationOpen => {
                    self.handle_markup_declaration_open_state();
                }
                TokenizerState::CommentStart => self.handle_comment_start_state(),
                TokenizerState::Comment => self.handle_comment_state(),
                TokenizerState::DOCTYPE => self.handle_doctype_state(),
                TokenizerState::DOCTYPEName => self.handle_doctype_name_state(),
                TokenizerState::BogusDOCTYPE => self.handle_bogus_doctype_state(),
                TokenizerState::CharacterReference => self.handle_character_reference_state(),
                TokenizerState::NamedCharacterReference => {
                    self.handle_named_character_reference_state();
                }
                TokenizerState::AmbiguousAmpersand => self.handle_ambiguous_ampersand_state(),
                TokenizerState::NumericCharacterReference => {
                    self.handle_numeric_character_reference_state();
                }
                TokenizerState::HexadecimalCharacterReferenceStart => {
                    self.handle_hexadecimal_character_reference_start_state();
                }
                TokenizerState::DecimalCharacterReferenceStart => {
                    self.handle_decimal_character_reference_start_state();
                }
                TokenizerState::HexadecimalCharacterReference => {
                    self.handle_hexadecimal_character_reference_state();
                }
                TokenizerState::DecimalCharacterReference => {
                    self.handle_decimal_character_reference_state();
                }
            }
        }
    }

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn handle_data_state(&mut self) {
        match self.current_input_character {
            // "U+0026 AMPERSAND (&) - Set the return state to the data state.
            // Switch to the character reference state."
            Some('&') => {
                self.return_state = Some(TokenizerState::Data);
                self.switch_to(TokenizerState::CharacterReference);
            }
            // "U+003C LESS-THAN SIGN (<) - Switch to the tag open state."
            Some('<') => self.switch_to(TokenizerState::TagOpen),
            // "U+0000 NULL - This is an unexpected-null-character parse error.
            // Emit the current input character as a character token."
            Some('\0') => {
                self.log_parse_error("unexpected-null-character");
                self.emit_character_token('\0');
            }
            // "EOF - Emit an end-of-file token."
            None => self.emit_eof_token(),
            // "Anything else - Emit the current input character as a character token."
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    fn handle_rcdata_state(&mut self) {
        match self.current_input_character {
            // "Set the return state to the RCDATA state. Switch to the character reference state."
            Some('&') => {
                self.return_state = Some(TokenizerState::RCDATA);
                self.switch_to(TokenizerState::CharacterReference);
            }
            // "Switch to the RCDATA less-than sign state."
            Some('<') => {
                self.text_state = TokenizerState::RCDATA;
                self.switch_to(TokenizerState::TextLessThanSign);
            }
            Some('\0') => {
                self.log_parse_error("unexpected-null-character");
                self.emit_character_token('\u{FFFD}');
            }
            None => self.emit_eof_token(),
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    fn handle_rawtext_state(&mut self) {
        match self.current_input_character {
            // "Switch to the RAWTEXT less-than sign state."
            Some('<') => {
                self.text_state = TokenizerState::RAWTEXT;
                self.switch_to(TokenizerState::TextLessThanSign);
            }
            Some('\0') => {
                self.log_parse_error("unexpected-null-character");
                self.emit_character_token('\u{FFFD}');
            }
            None => self.emit_eof_token(),
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    fn handle_tag_open_state(&mut self) {
        match self.current_input_character {
            // "U+0021 EXCLAMATION MARK (!) - Switch to the markup declaration open state."
            Some('!') => self.switch_to(TokenizerState::MarkupDeclarationOpen),
            // "U+002F SOLIDUS (/) - Switch to the end tag open state."
            Some('/') => self.switch_to(TokenizerState::EndTagOpen),
            // "ASCII alpha - Create a new start tag token, set its tag name to the
            // empty string. Reconsume in the tag name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_start_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003F QUESTION MARK (?) - This is an
            // unexpected-question-mark-instead-of-tag-name parse error. Create a
            // comment token whose data is the empty string. Reconsume in the bogus
            // comment state."
            Some('?') => {
                self.log_parse_error("unexpected-question-mark-instead-of-tag-name");
                self.current_token = Some(Token::new_comment(String::new()));
                self.reconsume_in(TokenizerState::BogusComment);
            }
            // "EOF - This is an eof-before-tag-name parse error. Emit a U+003C
            // LESS-THAN SIGN character token and an end-of-file token."
            None => {
                self.log_parse_error("eof-before-tag-name");
                self.emit_character_token('<');
                self.emit_eof_token();
            }
            // "Anything else - This is an invalid-first-character-of-tag-name parse
            // error. Emit a U+003C LESS-THAN SIGN character token. Reconsume in the
            // data state."
            Some(_) => {
                self.log_parse_error("invalid-first-character-of-tag-name");
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn handle_end_tag_open_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-end-tag-name parse
            // error. Switch to the data state."
            Some('>') => {
                self.log_parse_error("missing-end-tag-name");
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.log_parse_error("eof-before-tag-name");
                self.emit_character_token('<');
                self.emit_character_token('/');
                self.emit_eof_token();
            }
            // "Anything else - This is an invalid-first-character-of-tag-name parse
            // error. Create a comment token whose data is the empty string.
            // Reconsume in the bogus comment state."
            Some(_) => {
                self.log_parse_error("invalid-first-character-of-tag-name");
                self.current_token = Some(Token::new_comment(String::new()));
                self.reconsume_in(TokenizerState::BogusComment);
            }
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn handle_tag_name_state(&mut self) {
        match self.current_input_character {
            // "Switch to the before attribute name state."
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            // "Switch to the self-closing start tag state."
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            // "Switch to the data state. Emit the current tag token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            // "ASCII upper alpha - Append the lowercase version of the current input
            // character to the current tag token's tag name."
            Some(c) => {
                let c = match c {
                    '\0' => {
                        self.log_parse_error("unexpected-null-character");
                        '\u{FFFD}'
                    }
                    c => c.to_ascii_lowercase(),
                };
                if let Some(ref mut token) = self.current_token {
                    token.append_to_tag_name(c);
                }
            }
            // "EOF - This is an eof-in-tag parse error. Emit an end-of-file token."
            None => {
                self.log_parse_error("eof-in-tag");
                self.emit_eof_token();
            }
        }
    }

    /// [§ 13.2.5.9](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state)
    fn handle_text_less_than_sign_state(&mut self) {
        if self.current_input_character == Some('/') {
            // "Set the temporary buffer to the empty string. Switch to the ... end tag open state."
            self.temporary_buffer.clear();
            self.switch_to(TokenizerState::TextEndTagOpen);
        } else {
            // "Emit a U+003C LESS-THAN SIGN character token. Reconsume in the ... state."
            self.emit_character_token('<');
            self.reconsume_in(self.text_state);
        }
    }

    /// [§ 13.2.5.10](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-open-state)
    fn handle_text_end_tag_open_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(TokenizerState::TextEndTagName);
            }
            _ => {
                self.emit_character_token('<');
                self.emit_character_token('/');
                self.reconsume_in(self.text_state);
            }
        }
    }

    /// [§ 13.2.5.11](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    fn handle_text_end_tag_name_state(&mut self) {
        match self.current_input_character {
            // "If the current end tag token is an appropriate end tag token, then switch to the
            // before attribute name state. Otherwise, treat it as per the "anything else" entry below."
            Some(c) if Self::is_whitespace_char(c) && self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            Some('>') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            // "ASCII alpha - Append the lowercase version of the current input character
            // to the current tag token's tag name. Append the current input character to
            // the temporary buffer."
            Some(c) if c.is_ascii_alphabetic() => {
                if let Some(ref mut token) = self.current_token {
                    token.append_to_tag_name(c.to_ascii_lowercase());
                }
                self.temporary_buffer.push(c);
            }
            _ => self.emit_text_end_tag_name_anything_else(),
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    fn handle_before_attribute_name_state(&mut self) {
        match self.current_input_character {
            // "Ignore the character."
            Some(c) if Self::is_whitespace_char(c) => {}
            // "U+002F SOLIDUS (/), U+003E GREATER-THAN SIGN (>), EOF -
            // Reconsume in the after attribute name state."
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            // "U+003D EQUALS SIGN (=) - This is an unexpected-equals-sign-before-attribute-name
            // parse error. Start a new attribute in the current tag token. Set that attribute's
            // name to the current input character."
            Some('=') => {
                self.log_parse_error("unexpected-equals-sign-before-attribute-name");
                if let Some(ref mut token) = self.current_token {
                    token.start_new_attribute();
                    token.append_to_current_attribute_name('=');
                }
                self.switch_to(TokenizerState::AttributeName);
            }
            // "Anything else - Start a new attribute in the current tag token.
            // Reconsume in the attribute name state."
            Some(_) => {
                if let Some(ref mut token) = self.current_token {
                    token.start_new_attribute();
                }
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn handle_attribute_name_state(&mut self) {
        match self.current_input_character {
            // "Reconsume in the after attribute name state."
            Some(c) if Self::is_whitespace_char(c) => {
                self.check_duplicate_attribute();
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            Some('/' | '>') | None => {
                self.check_duplicate_attribute();
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            // "U+003D EQUALS SIGN (=) - Switch to the before attribute value state."
            Some('=') => {
                self.check_duplicate_attribute();
                self.switch_to(TokenizerState::BeforeAttributeValue);
            }
            Some(c) => {
                let c = match c {
                    '\0' => {
                        self.log_parse_error("unexpected-null-character");
                        '\u{FFFD}'
                    }
                    '"' | '\'' | '<' => {
                        self.log_parse_error("unexpected-character-in-attribute-name");
                        c
                    }
                    c => c.to_ascii_lowercase(),
                };
                if let Some(ref mut token) = self.current_token {
                    token.append_to_current_attribute_name(c);
                }
            }
        }
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    fn handle_after_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => {
                self.log_parse_error("eof-in-tag");
                self.emit_eof_token();
            }
            Some(_) => {
                if let Some(ref mut token) = self.current_token {
                    token.start_new_attribute();
                }
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    fn handle_before_attribute_value_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('"') => self.switch_to(TokenizerState::AttributeValueDoubleQuoted),
            Some('\'') => self.switch_to(TokenizerState::AttributeValueSingleQuoted),
            // "This is a missing-attribute-value parse error. Switch to the data state.
            // Emit the current tag token."
            Some('>') => {
                self.log_parse_error("missing-attribute-value");
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
        }
    }

    /// [§ 13.2.5.36](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    /// and [§ 13.2.5.37](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    ///
    /// The two quoted states differ only in their closing quote.
    fn handle_attribute_value_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            // "Switch to the after attribute value (quoted) state."
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterAttributeValueQuoted),
            // "Set the return state to the attribute value (...-quoted) state.
            // Switch to the character reference state."
            Some('&') => {
                self.return_state = Some(self.state);
                self.switch_to(TokenizerState::CharacterReference);
            }
            Some('\0') => {
                self.log_parse_error("unexpected-null-character");
                self.append_to_attribute_value('\u{FFFD}');
            }
            None => {
                self.log_parse_error("eof-in-tag");
                self.emit_eof_token();
            }
            Some(c) => self.append_to_attribute_value(c),
        }
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    fn handle_attribute_value_unquoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('&') => {
                self.return_state = Some(TokenizerState::AttributeValueUnquoted);
                self.switch_to(TokenizerState::CharacterReference);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some('\0') => {
                self.log_parse_error("unexpected-null-character");
                self.append_to_attribute_value('\u{FFFD}');
            }
            None => {
                self.log_parse_error("eof-in-tag");
                self.emit_eof_token();
            }
            Some(c) => {
                if matches!(c, '"' | '\'' | '<' | '=' | '`') {
                    self.log_parse_error("unexpected-character-in-unquoted-attribute-value");
                }
                self.append_to_attribute_value(c);
            }
        }
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    fn handle_after_attribute_value_quoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => {
                self.log_parse_error("eof-in-tag");
                self.emit_eof_token();
            }
            // "This is a missing-whitespace-between-attributes parse error.
            // Reconsume in the before attribute name state."
            Some(_) => {
                self.log_parse_error("missing-whitespace-between-attributes");
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    fn handle_self_closing_start_tag_state(&mut self) {
        match self.current_input_character {
            // "Set the self-closing flag of the current tag token. Switch to the data
            // state. Emit the current tag token."
            Some('>') => {
                if let Some(ref mut token) = self.current_token {
                    token.set_self_closing();
                }
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => {
                self.log_parse_error("eof-in-tag");
                self.emit_eof_token();
            }
            Some(_) => {
                self.log_parse_error("unexpected-solidus-in-tag");
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    fn handle_bogus_comment_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            // "Emit the comment. Emit an end-of-file token."
            None => {
                self.emit_token();
                self.emit_eof_token();
            }
            Some(c) => self.append_to_comment(if c == '\0' { '\u{FFFD}' } else { c }),
        }
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// The main loop has already consumed the first character after `<!`, so
    /// the lookahead starts at the current input character.
    fn handle_markup_declaration_open_state(&mut self) {
        // "Two U+002D HYPHEN-MINUS characters (-) - Consume those two characters,
        // create a comment token whose data is the empty string, and switch to the
        // comment start state."
        if self.current_input_character == Some('-') && self.next_few_characters_are("-") {
            self.consume_string("-");
            self.current_token = Some(Token::new_comment(String::new()));
            self.switch_to(TokenizerState::CommentStart);
        }
        // "ASCII case-insensitive match for the word "DOCTYPE" - Consume those
        // characters and switch to the DOCTYPE state."
        else if self
            .current_input_character
            .is_some_and(|c| c.eq_ignore_ascii_case(&'d'))
            && self.next_few_characters_are_case_insensitive("octype")
        {
            self.consume_string("octype");
            self.switch_to(TokenizerState::DOCTYPE);
        }
        // "The string "[CDATA[" ... Otherwise, this is a cdata-in-html-content parse
        // error. Create a comment token whose data is the "[CDATA[" string. Switch
        // to the bogus comment state."
        else if self.current_input_character == Some('[') && self.next_few_characters_are("CDATA[")
        {
            self.log_parse_error("cdata-in-html-content");
            self.consume_string("CDATA[");
            self.current_token = Some(Token::new_comment(String::from("[CDATA[")));
            self.switch_to(TokenizerState::BogusComment);
        }
        // "Anything else - This is an incorrectly-opened-comment parse error. Create
        // a comment token whose data is the empty string. Switch to the bogus comment
        // state (don't consume anything in the current state)."
        else {
            self.log_parse_error("incorrectly-opened-comment");
            self.current_token = Some(Token::new_comment(String::new()));
            self.reconsume_in(TokenizerState::BogusComment);
        }
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    fn handle_comment_start_state(&mut self) {
        match self.current_input_character {
            // "U+003E GREATER-THAN SIGN (>) - This is an abrupt-closing-of-empty-comment
            // parse error. Switch to the data state. Emit the current comment token."
            Some('>') => {
                self.log_parse_error("abrupt-closing-of-empty-comment");
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            // `<!--->` is the same error with one more dash.
            Some('-') if self.next_few_characters_are(">") => {
                self.log_parse_error("abrupt-closing-of-empty-comment");
                self.consume_string(">");
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    ///
    /// The comment end states (§ 13.2.5.50 - § 13.2.5.52) are folded into a
    /// lookahead for `-->`.
    fn handle_comment_state(&mut self) {
        match self.current_input_character {
            Some('-') if self.next_few_characters_are("->") => {
                self.consume_string("->");
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some('\0') => {
                self.log_parse_error("unexpected-null-character");
                self.append_to_comment('\u{FFFD}');
            }
            // "EOF - This is an eof-in-comment parse error. Emit the current comment
            // token. Emit an end-of-file token."
            None => {
                self.log_parse_error("eof-in-comment");
                self.emit_token();
                self.emit_eof_token();
            }
            Some(c) => self.append_to_comment(c),
        }
    }

    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    ///
    /// Folds in [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state).
    fn handle_doctype_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            // "This is a missing-doctype-name parse error. Create a new DOCTYPE token.
            // Set its force-quirks flag to on. Switch to the data state. Emit the
            // current token."
            Some('>') => {
                self.log_parse_error("missing-doctype-name");
                self.current_token = Some(Token::new_doctype());
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => {
                self.log_parse_error("eof-in-doctype");
                self.current_token = Some(Token::new_doctype());
                self.emit_token();
                self.emit_eof_token();
            }
            Some(_) => {
                self.current_token = Some(Token::new_doctype());
                self.reconsume_in(TokenizerState::DOCTYPEName);
            }
        }
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    fn handle_doctype_name_state(&mut self) {
        match self.current_input_character {
            // "Switch to the after DOCTYPE name state." Identifiers that follow are
            // skipped in the bogus DOCTYPE state.
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BogusDOCTYPE);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => {
                self.log_parse_error("eof-in-doctype");
                self.emit_token();
                self.emit_eof_token();
            }
            Some(c) => {
                let c = if c == '\0' { '\u{FFFD}' } else { c.to_ascii_lowercase() };
                if let Some(ref mut token) = self.current_token {
                    token.append_to_doctype_name(c);
                }
            }
        }
    }

    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    fn handle_bogus_doctype_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => {
                self.emit_token();
                self.emit_eof_token();
            }
            Some(_) => {}
        }
    }
}
