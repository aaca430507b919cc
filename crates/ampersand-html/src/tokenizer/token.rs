use core::fmt;

/// An attribute on a start or end tag token.
///
/// Per [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
/// "a list of attributes, each of which has a name and a value"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// "each of which has a name"
    pub name: String,
    /// "and a value"
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub const fn new(name: String, value: String) -> Self {
        Self { name, value }
    }
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "The output of the tokenization step is a series of zero or more of the following
/// tokens: DOCTYPE, start tag, end tag, comment, character, end-of-file."
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// DOCTYPE token. Public and system identifiers are skipped, not
    /// recorded; nothing downstream looks at them.
    Doctype {
        /// "a name", missing until one is seen.
        name: Option<String>,
    },

    /// "Start and end tag tokens have a tag name, a self-closing flag, and a
    /// list of attributes, each of which has a name and a value."
    StartTag {
        /// "a tag name"
        name: String,
        /// "a self-closing flag"
        self_closing: bool,
        /// "a list of attributes"
        attributes: Vec<Attribute>,
    },

    /// End tag token. Same structure as start tag per spec.
    EndTag {
        /// "a tag name"
        name: String,
        /// "a list of attributes"
        attributes: Vec<Attribute>,
    },

    /// "Comment and character tokens have data."
    Comment {
        /// "data"
        data: String,
    },

    /// "Comment and character tokens have data."
    Character {
        /// "data"
        data: char,
    },

    /// End-of-file token signals the end of input.
    EndOfFile,
}

impl Token {
    /// "When a DOCTYPE token is created, its name ... must be marked as missing"
    #[must_use]
    pub const fn new_doctype() -> Self {
        Self::Doctype { name: None }
    }

    /// "When a start or end tag token is created, its self-closing flag must be
    /// unset (its other state is that it be set), and its attributes list must
    /// be empty."
    #[must_use]
    pub const fn new_start_tag() -> Self {
        Self::StartTag {
            name: String::new(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    /// Create a new end tag token per spec.
    #[must_use]
    pub const fn new_end_tag() -> Self {
        Self::EndTag {
            name: String::new(),
            attributes: Vec::new(),
        }
    }

    /// Create a new comment token with the given data.
    #[must_use]
    pub const fn new_comment(data: String) -> Self {
        Self::Comment { data }
    }

    /// Create a character token with the given character.
    #[must_use]
    pub const fn new_character(c: char) -> Self {
        Self::Character { data: c }
    }

    /// Returns true if this is an end-of-file token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EndOfFile)
    }

    /// Mutation helpers for use during tokenization.
    /// These panic if called on the wrong token variant, which indicates a bug
    /// in the tokenizer state machine.
    ///
    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    ///
    /// "Append the current input character to the current DOCTYPE token's name."
    ///
    /// # Panics
    ///
    /// Panics if called on a non-DOCTYPE token, indicating a tokenizer bug.
    pub fn append_to_doctype_name(&mut self, c: char) {
        match self {
            Self::Doctype { name } => name.get_or_insert_with(String::new).push(c),
            _ => panic!("append_to_doctype_name called on non-DOCTYPE token"),
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    ///
    /// "Append the current input character to the current tag token's tag name."
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    pub fn append_to_tag_name(&mut self, c: char) {
        match self {
            Self::StartTag { name, .. } | Self::EndTag { name, .. } => name.push(c),
            _ => panic!("append_to_tag_name called on non-tag token"),
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    ///
    /// "Set the self-closing flag of the current tag token."
    /// The flag is meaningless on end tags and is dropped there.
    pub fn set_self_closing(&mut self) {
        if let Self::StartTag { self_closing, .. } = self {
            *self_closing = true;
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    ///
    /// "Append the current input character to the comment token's data."
    ///
    /// # Panics
    ///
    /// Panics if called on a non-comment token, indicating a tokenizer bug.
    pub fn append_to_comment(&mut self, c: char) {
        match self {
            Self::Comment { data } => data.push(c),
            _ => panic!("append_to_comment called on non-comment token"),
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    ///
    /// "Start a new attribute in the current tag token."
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    pub fn start_new_attribute(&mut self) {
        match self {
            Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } => {
                attributes.push(Attribute::new(String::new(), String::new()));
            }
            _ => panic!("start_new_attribute called on non-tag token"),
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "Append the current input character to the current attribute's name."
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    pub fn append_to_current_attribute_name(&mut self, c: char) {
        match self {
            Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } => {
                if let Some(attr) = attributes.last_mut() {
                    attr.name.push(c);
                }
            }
            _ => panic!("append_to_current_attribute_name called on non-tag token"),
        }
    }

    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    ///
    /// "Append the current input character to the current attribute's value."
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    pub fn append_to_current_attribute_value(&mut self, c: char) {
        match self {
            Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } => {
                if let Some(attr) = attributes.last_mut() {
                    attr.value.push(c);
                }
            }
            _ => panic!("append_to_current_attribute_value called on non-tag token"),
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "if there is already an attribute on the token with the exact same name,
    /// then this is a duplicate-attribute parse error and the new attribute must
    /// be removed from the token."
    #[must_use]
    pub fn current_attribute_name_is_duplicate(&self) -> bool {
        match self {
            Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } => {
                attributes.split_last().is_some_and(|(current, earlier)| {
                    earlier.iter().any(|attr| attr.name == current.name)
                })
            }
            _ => false,
        }
    }

    /// "the new attribute must be removed from the token"
    ///
    /// The duplicate still collects its value while the tag is open, so it is
    /// dropped when the tag is emitted. The first occurrence of each name wins.
    pub fn drop_duplicate_attributes(&mut self) {
        if let Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } = self {
            let mut seen: Vec<String> = Vec::with_capacity(attributes.len());
            attributes.retain(|attr| {
                if seen.contains(&attr.name) {
                    false
                } else {
                    seen.push(attr.name.clone());
                    true
                }
            });
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doctype { name } => {
                write!(f, "DOCTYPE")?;
                if let Some(n) = name {
                    write!(f, " {n}")?;
                }
                Ok(())
            }
            Self::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                write!(f, "<{name}")?;
                for attr in attributes {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
                if *self_closing {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::EndTag { name, .. } => write!(f, "</{name}>"),
            Self::Comment { data } => write!(f, "<!--{data}-->"),
            Self::Character { data } => match data {
                '\n' => write!(f, "Character(\\n)"),
                '\t' => write!(f, "Character(\\t)"),
                ' ' => write!(f, "Character(SPACE)"),
                c => write!(f, "Character({c})"),
            },
            Self::EndOfFile => write!(f, "EOF"),
        }
    }
}
