//! Token counting.
//!
//! Budgets are expressed in tokens, but what a "token" is depends on the
//! embedding model downstream. Without a real tokenizer we count
//! whitespace-delimited words. BPE tokenizers typically produce 1.3-1.5
//! tokens per English word, so size budgets in words should be set lower
//! than the model's token limit.

use std::ops::Range;

/// Counts tokens in a piece of text.
///
/// Implementations must be cheap to call repeatedly and safe to share
/// across threads; load any model once and keep it read-only.
pub trait TokenCounter: Send + Sync {
    /// Number of tokens in `text`.
    fn count(&self, text: &str) -> usize;
}

/// Counts whitespace-delimited words.
///
/// ```rust
/// use quire::{TokenCounter, WhitespaceTokens};
///
/// assert_eq!(WhitespaceTokens.count("The quick  brown\nfox."), 4);
/// assert_eq!(WhitespaceTokens.count("   "), 0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokens;

impl TokenCounter for WhitespaceTokens {
    fn count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}

impl<F> TokenCounter for F
where
    F: Fn(&str) -> usize + Send + Sync,
{
    fn count(&self, text: &str) -> usize {
        self(text)
    }
}

/// Byte spans of whitespace-delimited words in `text`.
pub(crate) fn word_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start = None;

    for (i, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                spans.push(s..i);
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push(s..text.len());
    }

    spans
}

/// Span of `text[span]` with surrounding whitespace removed, or `None` if
/// nothing but whitespace remains.
pub(crate) fn trim_span(text: &str, span: Range<usize>) -> Option<Range<usize>> {
    let slice = &text[span.clone()];
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return None;
    }
    let leading = slice.len() - slice.trim_start().len();
    let start = span.start + leading;
    Some(start..start + trimmed.len())
}
