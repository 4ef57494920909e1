//! Heading-aware sectioning.
//!
//! Sections are the unit within which sentences are packed: a chunk never
//! straddles two sections, so a topic change at a heading always starts a
//! fresh chunk.
//!
//! ## Undersized Sections
//!
//! Heading heuristics fire on numbered list items and stray all-caps lines,
//! which would otherwise produce a swarm of one-line sections. Sections with
//! fewer than `min_tokens` words are buffered and merged forward:
//!
//! ```text
//! min_tokens = 150
//!
//! [INTRO: 20 words] [1. Scope: 30 words] [2. Method: 400 words] [NOTES: 10 words]
//!  \_____________________ merged ____________________________/  \_ trailing _/
//!
//! Sections: [INTRO + 1. Scope + 2. Method]  [NOTES]
//! ```
//!
//! A trailing undersized buffer stays a section of its own rather than being
//! dropped.

use tracing::debug;

use crate::config::DEFAULT_MIN_SECTION_TOKENS;
use crate::heading::is_heading;

/// A contiguous region of the normalized document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    /// Zero-based position of this section in the document.
    pub index: usize,
    /// Byte offset of `text` in the normalized document.
    pub start: usize,
    /// The section text, trimmed.
    pub text: &'a str,
    /// Whitespace-delimited word count of `text`.
    pub words: usize,
}

impl Section<'_> {
    /// Byte offset where this section ends (exclusive).
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// Splits normalized text into sections at heading lines.
///
/// ```rust
/// use quire::Sectionizer;
///
/// let text = "Preface words here.\nCHAPTER ONE\nBody of the first chapter.";
/// let sections = Sectionizer::new(0).split(text);
///
/// assert_eq!(sections.len(), 2);
/// assert_eq!(sections[0].text, "Preface words here.");
/// assert!(sections[1].text.starts_with("CHAPTER ONE"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sectionizer {
    min_tokens: usize,
}

impl Sectionizer {
    /// Create a sectionizer that merges sections under `min_tokens` words.
    #[must_use]
    pub const fn new(min_tokens: usize) -> Self {
        Self { min_tokens }
    }

    /// Split `text` into ordered, non-empty sections.
    pub fn split<'a>(&self, text: &'a str) -> Vec<Section<'a>> {
        let raw = heading_spans(text);

        let mut sections = Vec::with_capacity(raw.len());
        let mut pending: Option<(usize, usize)> = None;

        for (start, end) in raw {
            let merged_start = pending.map_or(start, |(s, _)| s);
            let words = text[start..end].split_whitespace().count();

            if words < self.min_tokens {
                pending = Some((merged_start, end));
            } else {
                push_section(&mut sections, text, merged_start, end);
                pending = None;
            }
        }

        if let Some((start, end)) = pending {
            push_section(&mut sections, text, start, end);
        }

        debug!(count = sections.len(), min_tokens = self.min_tokens, "split sections");
        sections
    }
}

impl Default for Sectionizer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SECTION_TOKENS)
    }
}

/// Split `text` into sections, merging those under `min_section_tokens` words.
pub fn split_sections(text: &str, min_section_tokens: usize) -> Vec<Section<'_>> {
    Sectionizer::new(min_section_tokens).split(text)
}

/// Raw `(start, end)` byte ranges between heading lines, blank ranges skipped.
fn heading_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut current = 0;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        if offset > current && is_heading(line) {
            if !text[current..offset].trim().is_empty() {
                spans.push((current, offset));
            }
            current = offset;
        }
        offset += line.len();
    }

    if current < text.len() && !text[current..].trim().is_empty() {
        spans.push((current, text.len()));
    }

    spans
}

fn push_section<'a>(sections: &mut Vec<Section<'a>>, text: &'a str, start: usize, end: usize) {
    let slice = &text[start..end];
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return;
    }
    let leading = slice.len() - slice.trim_start().len();
    sections.push(Section {
        index: sections.len(),
        start: start + leading,
        text: trimmed,
        words: trimmed.split_whitespace().count(),
    });
}
