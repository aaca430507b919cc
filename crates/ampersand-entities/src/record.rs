//! One row of the named character references table.

/// A named character reference and its expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRecord {
    /// The name exactly as the table writes it, including the trailing
    /// `;` when present.
    pub name: String,
    /// The code points, in table order. Never empty.
    pub codepoints: Vec<char>,
    /// The code points concatenated.
    pub replacement: String,
    /// 1-based index of the source row within the table.
    pub row: usize,
}

impl EntityRecord {
    /// Build a record; the replacement is derived from `codepoints`.
    #[must_use]
    pub fn new(name: String, codepoints: Vec<char>, row: usize) -> Self {
        let replacement = codepoints.iter().collect();
        Self {
            name,
            codepoints,
            replacement,
            row,
        }
    }

    /// Legacy references are the forms HTML still accepts without the `;`
    /// terminator. The table lists each one on its own row.
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        !self.name.ends_with(';')
    }
}
