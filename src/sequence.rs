//! The list of strings an animation cycles through.

use crate::error::AnimationError;

/// An ordered, non-empty list of entries.
///
/// Lengths and prefixes are measured in `char`s so multi-byte text (emoji,
/// box-drawing characters) is never split mid-codepoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationSequence {
    entries: Vec<String>,
}

impl AnimationSequence {
    /// Build a sequence, rejecting an empty list.
    pub fn new<I, T>(entries: I) -> Result<Self, AnimationError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        if entries.is_empty() {
            return Err(AnimationError::invalid(
                "sequence must contain at least one entry",
            ));
        }
        Ok(Self { entries })
    }

    /// A single-entry sequence. Infallible since one entry is always present.
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            entries: vec![text.into()],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entry at `index`, wrapping modulo the sequence length.
    pub fn entry(&self, index: usize) -> &str {
        &self.entries[index % self.entries.len()]
    }

    /// Length of the entry at `index` in chars.
    pub fn char_len(&self, index: usize) -> usize {
        self.entry(index).chars().count()
    }

    /// The first `chars` chars of the entry at `index`, clamped to its length.
    pub fn prefix(&self, index: usize, chars: usize) -> &str {
        let entry = self.entry(index);
        match entry.char_indices().nth(chars) {
            Some((byte_end, _)) => &entry[..byte_end],
            None => entry,
        }
    }

    /// Index following `index`, wrapping to 0 after the last entry.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}
