//! The Chunk type: a run of sentences with position metadata.

/// A chunk of text ready to be embedded.
///
/// A chunk is one or more whole sentences from a single section, joined with
/// a single space. The merger may later fold neighbouring chunks together, in
/// which case the span and token count cover everything that was folded in.
///
/// ## Byte Offsets
///
/// `start` and `end` are byte offsets into the **normalized** document (the
/// output of [`crate::normalize`] with the same options), not into the raw
/// input. Because sentences are re-joined with single spaces, `text` is not
/// always byte-identical to that slice, but it contains the same words:
///
/// ```rust
/// use quire::Chunk;
///
/// let normalized = "Alpha beta.  Gamma delta.";
/// let chunk = Chunk::new("Alpha beta. Gamma delta.", 4, 0, 0, normalized.len(), 0);
///
/// assert_eq!(chunk.span(), 0..normalized.len());
/// assert_eq!(chunk.tokens, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The chunk text.
    pub text: String,
    /// Token count of `text` as measured by the chunker's token counter.
    pub tokens: usize,
    /// Index of the section this chunk was packed from.
    pub section: usize,
    /// Byte offset where this chunk starts in the normalized document.
    pub start: usize,
    /// Byte offset where this chunk ends (exclusive) in the normalized document.
    pub end: usize,
    /// Zero-based index of this chunk in the final sequence.
    pub index: usize,
}

impl Chunk {
    /// Create a new chunk.
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        tokens: usize,
        section: usize,
        start: usize,
        end: usize,
        index: usize,
    ) -> Self {
        Self {
            text: text.into(),
            tokens,
            section,
            start,
            end,
            index,
        }
    }

    /// The length of this chunk in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether this chunk is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The byte span of this chunk in the normalized document.
    #[must_use]
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// The exact-dedupe identity of this chunk.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&self.text)
    }
}

impl AsRef<str> for Chunk {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl From<Chunk> for String {
    fn from(chunk: Chunk) -> Self {
        chunk.text
    }
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunk {{ index: {}, section: {}, span: {}..{}, tokens: {} }}",
            self.index, self.section, self.start, self.end, self.tokens
        )
    }
}

/// Whitespace-collapsed, lower-cased form of a chunk's text.
///
/// Two chunks with the same fingerprint are exact duplicates:
///
/// ```rust
/// use quire::Fingerprint;
///
/// assert_eq!(
///     Fingerprint::of("Trees are data structures."),
///     Fingerprint::of("trees  are\tdata structures."),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of `text`.
    #[must_use]
    pub fn of(text: &str) -> Self {
        let mut normalized = String::with_capacity(text.len());
        for word in text.split_whitespace() {
            if !normalized.is_empty() {
                normalized.push(' ');
            }
            normalized.extend(word.chars().flat_map(char::to_lowercase));
        }
        Self(normalized)
    }

    /// The normalized text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_collapses_whitespace_and_case() {
        let fp = Fingerprint::of("  Hello\n\nWORLD  again ");
        assert_eq!(fp.as_str(), "hello world again");
    }

    #[test]
    fn test_fingerprint_of_blank_is_empty() {
        assert_eq!(Fingerprint::of(" \t\n").as_str(), "");
    }

    #[test]
    fn test_chunk_accessors() {
        let chunk = Chunk::new("abc def", 2, 1, 10, 17, 3);
        assert_eq!(chunk.len(), 7);
        assert!(!chunk.is_empty());
        assert_eq!(chunk.span(), 10..17);
        assert_eq!(chunk.as_ref(), "abc def");
        assert_eq!(String::from(chunk), "abc def");
    }
}
