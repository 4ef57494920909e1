//! Fixed-size word runs.
//!
//! The simplest fallback unit: every N whitespace-delimited tokens form a
//! pseudo-sentence.
//!
//! ```text
//! words_per_run = 4
//!
//! Text: "one two three four five six seven eight nine ten"
//!
//! Run 0: "one two three four"
//! Run 1: "five six seven eight"
//! Run 2: "nine ten"                <- final run may be shorter
//! ```
//!
//! Runs ignore punctuation entirely, so they suit text where punctuation is
//! missing or meaningless (tables, OCR output, token dumps). The packer
//! still applies its own overlap on top of the runs.

use std::ops::Range;

use crate::tokens::word_spans;
use crate::SentenceSplitter;

/// Default run length, in words.
pub const DEFAULT_WORDS_PER_RUN: usize = 25;

/// Fixed-size word-run splitter.
///
/// ## Example
///
/// ```rust
/// use quire::{SentenceSplitter, WordRuns};
///
/// let runs = WordRuns::new(2).split_sentences("a b  c\nd e");
/// assert_eq!(runs, vec!["a b", "c\nd", "e"]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct WordRuns {
    words_per_run: usize,
}

impl WordRuns {
    /// Create a splitter emitting runs of `words_per_run` words.
    ///
    /// A zero run length is raised to 1.
    #[must_use]
    pub fn new(words_per_run: usize) -> Self {
        Self {
            words_per_run: words_per_run.max(1),
        }
    }

    /// Run length in words.
    #[must_use]
    pub const fn words_per_run(&self) -> usize {
        self.words_per_run
    }
}

impl Default for WordRuns {
    fn default() -> Self {
        Self::new(DEFAULT_WORDS_PER_RUN)
    }
}

impl SentenceSplitter for WordRuns {
    fn split(&self, text: &str) -> Vec<Range<usize>> {
        word_spans(text)
            .chunks(self.words_per_run)
            .filter_map(|run| Some(run.first()?.start..run.last()?.end))
            .collect()
    }
}
