//! Sentence splitting.
//!
//! Splits a section into the units the packer groups into chunks.
//!
//! ## The Hard Part: Finding Sentences
//!
//! Sentence detection seems simple until you encounter:
//!
//! ```text
//! "Dr. Smith went to Washington D.C. on Jan. 15th."
//!     ^                          ^       ^
//!     Not a sentence end (abbreviation)
//! ```
//!
//! The default splitter uses Unicode Standard Annex #29 (UAX #29) sentence
//! boundaries, which handle decimal numbers, ellipses and most
//! abbreviations.
//!
//! ## Hard-Wrapped Lines
//!
//! UAX #29 ends a sentence at every line break, but extracted PDF text wraps
//! sentences across lines:
//!
//! ```text
//! "The committee reviewed every submitted proposal\ncarefully before the deadline."
//!   UAX #29 alone:  ["The committee reviewed every submitted proposal",
//!                    "carefully before the deadline."]
//!   unwrapped:      ["The committee reviewed every submitted proposal\ncarefully before the deadline."]
//! ```
//!
//! [`UnicodeSentences`] segments a copy in which each soft line break is a
//! space. A break stays hard when it borders a blank line or a heading line,
//! so paragraphs and "Chapter 1\nThe quick brown fox." still split. Both
//! characters are one byte, so spans into the copy are spans into the input.
//!
//! ## Fallbacks
//!
//! The splitter is a capability, not a hard dependency. Two built-in
//! alternatives need nothing beyond the standard library:
//!
//! | Splitter | Unit | Use when |
//! |----------|------|----------|
//! | [`UnicodeSentences`] | UAX #29 sentence | Prose (default) |
//! | [`crate::SeparatorCascade`] | `". "` → `"\n\n"` → `"\n"` → `" "` | Noisy text, run-on lines |
//! | [`crate::WordRuns`] | N whitespace tokens | No usable punctuation at all |

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

use crate::heading::is_heading;
use crate::tokens::trim_span;

/// Splits text into ordered sentence-like units.
///
/// Implementations return byte spans into the input, trimmed of surrounding
/// whitespace, non-empty and in order. Any input containing non-whitespace
/// must produce at least one span.
///
/// ```rust
/// use quire::{SentenceSplitter, UnicodeSentences};
///
/// let sentences = UnicodeSentences.split_sentences("One. Two? Three!");
/// assert_eq!(sentences, vec!["One.", "Two?", "Three!"]);
/// ```
pub trait SentenceSplitter: Send + Sync {
    /// Byte spans of each unit in `text`.
    fn split(&self, text: &str) -> Vec<Range<usize>>;

    /// The units as string slices.
    fn split_sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.split(text).into_iter().map(|r| &text[r]).collect()
    }
}

/// UAX #29 sentence boundaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSentences;

impl SentenceSplitter for UnicodeSentences {
    fn split(&self, text: &str) -> Vec<Range<usize>> {
        if text.is_empty() {
            return vec![];
        }

        let unwrapped = unwrap_soft_breaks(text);
        let spans: Vec<Range<usize>> = unwrapped
            .split_sentence_bound_indices()
            .filter_map(|(start, s)| trim_span(text, start..start + s.len()))
            .collect();

        if spans.is_empty() {
            // UAX #29 always yields something for non-empty text; this keeps
            // the at-least-one guarantee independent of that.
            return trim_span(text, 0..text.len()).into_iter().collect();
        }

        spans
    }
}

/// Copy of `text` with every soft line break replaced by a space.
///
/// A break is hard when the line it ends or the line it starts is blank or
/// a heading.
fn unwrap_soft_breaks(text: &str) -> String {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let mut out = String::with_capacity(text.len());

    for (i, line) in lines.iter().enumerate() {
        let Some(body) = line.strip_suffix('\n') else {
            out.push_str(line);
            continue;
        };
        out.push_str(body);

        let next = lines.get(i + 1).map_or("", |l| l.trim());
        let current = body.trim();
        let hard = current.is_empty() || next.is_empty() || is_heading(current) || is_heading(next);
        out.push(if hard { '\n' } else { ' ' });
    }

    out
}

/// Split `text` into sentences with the default splitter.
pub fn split_sentences(text: &str) -> Vec<&str> {
    UnicodeSentences.split_sentences(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_sentences() {
        let text = "Hello world. How are you? I am fine.";
        let sentences = split_sentences(text);

        assert_eq!(sentences.len(), 3);
        assert!(sentences[0].contains("Hello"));
        assert!(sentences[1].contains("How"));
        assert!(sentences[2].contains("fine"));
    }

    #[test]
    fn test_spans_match_text() {
        let text = "  First one.   Second one.  ";
        for span in UnicodeSentences.split(text) {
            let s = &text[span];
            assert_eq!(s, s.trim());
            assert!(!s.is_empty());
        }
    }

    #[test]
    fn test_line_break_ends_heading() {
        let sentences = split_sentences("Chapter 1\nThe quick brown fox. The lazy dog sleeps.");
        assert_eq!(sentences, vec!["Chapter 1", "The quick brown fox.", "The lazy dog sleeps."]);
    }

    #[test]
    fn test_wrapped_lines_join() {
        let text = "The committee reviewed every submitted proposal\ncarefully before the deadline. Funding was then\nallocated to the winning teams.";
        assert_eq!(
            split_sentences(text),
            vec![
                "The committee reviewed every submitted proposal\ncarefully before the deadline.",
                "Funding was then\nallocated to the winning teams.",
            ]
        );
    }

    #[test]
    fn test_blank_line_and_heading_breaks_stay_hard() {
        let text = "First paragraph ends here\n\nsecond paragraph\nRESULTS\nthe body";
        assert_eq!(
            split_sentences(text),
            vec!["First paragraph ends here", "second paragraph", "RESULTS", "the body"]
        );
    }

    #[test]
    fn test_unwrap_keeps_byte_length() {
        let text = "a\nb\n\nc\r\nd";
        assert_eq!(unwrap_soft_breaks(text).len(), text.len());
    }

    #[test]
    fn test_abbreviations() {
        let text = "Dr. Smith went to Washington D.C. on Tuesday.";
        let sentences = split_sentences(text);

        // UAX #29 handles "Dr." but may split on "D.C."
        assert!(sentences.len() <= 2, "Too many splits: {sentences:?}");
    }

    #[test]
    fn test_no_terminal_punctuation() {
        assert_eq!(split_sentences("no sentence ending here"), vec!["no sentence ending here"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(split_sentences("").is_empty());
    }

    #[test]
    fn test_whitespace_only() {
        assert!(split_sentences("   \n\t  ").is_empty());
    }
}
