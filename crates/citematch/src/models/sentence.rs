//! Sentence units produced by document segmentation.

use serde::{Deserialize, Serialize};

/// A single sentence extracted from the source document.
///
/// Immutable once created; indices are 1-based to match the positions a
/// reviewer sees in their document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceUnit {
    /// Sentence text, trimmed.
    pub text: String,

    /// 1-based index of the source paragraph.
    pub paragraph_index: usize,

    /// 1-based index of the sentence within its paragraph.
    pub sentence_index: usize,
}

impl SentenceUnit {
    /// Create a sentence unit.
    #[must_use]
    pub fn new(text: impl Into<String>, paragraph_index: usize, sentence_index: usize) -> Self {
        Self { text: text.into(), paragraph_index, sentence_index }
    }

    /// Page-style location hint in `paragraph(sentence)` form.
    #[must_use]
    pub fn page_label(&self) -> String {
        format!("{}({})", self.paragraph_index, self.sentence_index)
    }
}
