use serde::{Deserialize, Serialize};

/// Input text supplied by the caller. `name` is only a label (file path or `<stdin>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub text: String,
}

impl Document {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Length in characters (Unicode scalar values).
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// A bounded substring of a document with position and size metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    /// 0-based index within the document.
    pub index: usize,
    pub text: String,
    /// Length of `text` in characters.
    pub character_count: usize,
    pub estimated_tokens: usize,
    /// Character offset of the first character in the source document.
    pub char_offset: usize,
}

impl Chunk {
    /// Character offset one past the last character of this chunk, or `None`
    /// if it does not fit in `usize`.
    pub fn end_offset(&self) -> Option<usize> {
        self.char_offset.checked_add(self.character_count)
    }
}
