//! Separator-cascade splitting (LangChain-style).
//!
//! A sentence splitter that needs no segmentation tables: it tries
//! progressively finer separators until every unit fits the token budget.
//!
//! ## The Algorithm
//!
//! Given separators `[". ", "\n\n", "\n", " "]` and a budget of 100 tokens:
//!
//! ```text
//! 1. Split on ". " (sentences)
//! 2. For each unit > 100 tokens:
//!    - Split that unit on "\n\n" (paragraphs)
//! 3. For each unit still > 100 tokens:
//!    - Split that unit on "\n" (lines)
//! 4. For each unit still > 100 tokens:
//!    - Split that unit on " " (words)
//! 5. Anything left is emitted whole; the packer gives it a chunk of its own.
//! ```
//!
//! Units that already fit are never split further, so most of the text stays
//! at the coarsest separator level. Separators stay attached to the unit
//! they end, so "One. Two." splits into "One." and "Two.".

use std::ops::Range;

use crate::config::DEFAULT_CHUNK_SIZE_TOKENS;
use crate::tokens::{trim_span, TokenCounter, WhitespaceTokens};
use crate::{Error, Result, SentenceSplitter};

/// Default cascade, most meaningful separator first.
pub const DEFAULT_SEPARATORS: [&str; 4] = [". ", "\n\n", "\n", " "];

/// Separator-cascade sentence splitter.
///
/// ## Example
///
/// ```rust
/// use quire::{SentenceSplitter, SeparatorCascade};
///
/// let splitter = SeparatorCascade::new(4);
/// let units = splitter.split_sentences("Short one. This second unit has too many words in it");
///
/// assert_eq!(units[0], "Short one.");
/// assert!(units[1..].iter().all(|u| u.split_whitespace().count() <= 4));
/// ```
#[derive(Debug, Clone)]
pub struct SeparatorCascade {
    max_tokens: usize,
    separators: Vec<String>,
}

impl SeparatorCascade {
    /// A cascade over [`DEFAULT_SEPARATORS`] for units of at most `max_tokens`
    /// whitespace tokens. A zero budget is raised to 1.
    #[must_use]
    pub fn new(max_tokens: usize) -> Self {
        Self {
            max_tokens: max_tokens.max(1),
            separators: DEFAULT_SEPARATORS.iter().map(|&s| s.to_string()).collect(),
        }
    }

    /// A cascade with custom separators, coarsest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySeparators`] if `separators` is empty or holds
    /// only empty strings.
    pub fn with_separators(max_tokens: usize, separators: &[&str]) -> Result<Self> {
        let separators: Vec<String> = separators
            .iter()
            .filter(|s| !s.is_empty())
            .map(|&s| s.to_string())
            .collect();
        if separators.is_empty() {
            return Err(Error::EmptySeparators);
        }
        Ok(Self {
            max_tokens: max_tokens.max(1),
            separators,
        })
    }

    /// Recursively split `text[span]` using the separators from `sep_index`.
    fn split_recursive(&self, text: &str, span: Range<usize>, sep_index: usize, out: &mut Vec<Range<usize>>) {
        let unit = &text[span.clone()];
        if WhitespaceTokens.count(unit) <= self.max_tokens || sep_index >= self.separators.len() {
            out.extend(trim_span(text, span));
            return;
        }

        let sep = self.separators[sep_index].as_str();
        let mut pieces = Vec::new();
        let mut start = 0;
        for (pos, matched) in unit.match_indices(sep) {
            let end = pos + matched.len();
            pieces.push(span.start + start..span.start + end);
            start = end;
        }
        if start < unit.len() {
            pieces.push(span.start + start..span.end);
        }

        if pieces.len() <= 1 {
            // Separator not found, try next one
            self.split_recursive(text, span, sep_index + 1, out);
            return;
        }

        for piece in pieces {
            self.split_recursive(text, piece, sep_index + 1, out);
        }
    }
}

impl Default for SeparatorCascade {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE_TOKENS)
    }
}

impl SentenceSplitter for SeparatorCascade {
    fn split(&self, text: &str) -> Vec<Range<usize>> {
        let mut out = Vec::new();
        if text.trim().is_empty() {
            return out;
        }

        let sep = self.separators[0].as_str();
        let mut start = 0;
        for (pos, matched) in text.match_indices(sep) {
            let end = pos + matched.len();
            self.split_recursive(text, start..end, 1, &mut out);
            start = end;
        }
        if start < text.len() {
            self.split_recursive(text, start..text.len(), 1, &mut out);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_level_first() {
        let splitter = SeparatorCascade::new(100);
        let units = splitter.split_sentences("One two. Three four. Five");
        assert_eq!(units, vec!["One two.", "Three four.", "Five"]);
    }

    #[test]
    fn test_oversize_units_split_finer() {
        let splitter = SeparatorCascade::new(3);
        let text = "alpha beta gamma\ndelta epsilon zeta eta";
        let units = splitter.split_sentences(text);

        assert_eq!(units[0], "alpha beta gamma");
        for unit in &units {
            assert!(unit.split_whitespace().count() <= 3, "unit too large: {unit:?}");
        }
    }

    #[test]
    fn test_fitting_units_not_split() {
        let splitter = SeparatorCascade::new(10);
        let text = "a b c\nd e f";
        assert_eq!(splitter.split_sentences(text), vec![text]);
    }

    #[test]
    fn test_unsplittable_unit_emitted_whole() {
        let splitter = SeparatorCascade::with_separators(1, &["\n"]).unwrap();
        let units = splitter.split_sentences("two words");
        assert_eq!(units, vec!["two words"]);
    }

    #[test]
    fn test_spans_in_order() {
        let splitter = SeparatorCascade::new(2);
        let text = "a b c d. e f g\n\nh i j";
        let spans = splitter.split(text);
        for pair in spans.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        let joined: Vec<&str> = spans.into_iter().map(|r| &text[r]).collect();
        assert_eq!(joined.join(" ").split_whitespace().count(), 10);
    }

    #[test]
    fn test_empty_text() {
        assert!(SeparatorCascade::new(5).split("  ").is_empty());
    }

    #[test]
    fn test_empty_separators_rejected() {
        assert_eq!(
            SeparatorCascade::with_separators(5, &[]).unwrap_err(),
            Error::EmptySeparators
        );
        assert!(SeparatorCascade::with_separators(5, &[""]).is_err());
    }
}
