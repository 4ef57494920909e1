//! Cleanup of extracted document text.
//!
//! Text pulled out of PDFs carries layout debris that hurts retrieval:
//!
//! ```text
//! ACME Corp. Annual Report 2023        <- running header, every page
//! The board met twice this year...
//!
//! 12                                   <- page number
//! Confidential                         <- running footer, every page
//! ```
//!
//! The normalizer removes page-number lines and short lines that repeat
//! across the document, collapses blank-line runs, and unifies line
//! endings. It never fails: any input, including the empty string,
//! produces a (possibly empty) string.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::config::{
    DEFAULT_HEADER_FOOTER_MAX_LINE_LENGTH, DEFAULT_HEADER_FOOTER_MIN_REPEATS, MIN_HEADER_FOOTER_REPEATS,
};

const FORM_FEED: char = '\u{c}';

/// Configurable text normalizer.
///
/// ```rust
/// use quire::Normalizer;
///
/// let raw = "Report\r\nIntro text.\r\n7\r\nReport\r\nMore text.\r\nReport";
/// let clean = Normalizer::new().with_min_repeats(3).normalize(raw);
///
/// assert_eq!(clean, "Intro text.\n\nMore text.");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Normalizer {
    min_repeats: usize,
    max_line_length: usize,
    page_ratio: Option<f32>,
}

impl Normalizer {
    /// A normalizer with default header/footer thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_repeats: DEFAULT_HEADER_FOOTER_MIN_REPEATS,
            max_line_length: DEFAULT_HEADER_FOOTER_MAX_LINE_LENGTH,
            page_ratio: None,
        }
    }

    /// Minimum number of occurrences before a line counts as a header/footer.
    ///
    /// Values below 2 would strip every short line and are raised to 2
    /// with a warning. [`crate::ChunkerConfig::validate`] rejects them.
    #[must_use]
    pub fn with_min_repeats(mut self, min_repeats: usize) -> Self {
        if min_repeats < MIN_HEADER_FOOTER_REPEATS {
            warn!(
                min_repeats,
                clamped = MIN_HEADER_FOOTER_REPEATS,
                "clamped header/footer repeat count"
            );
        }
        self.min_repeats = min_repeats.max(MIN_HEADER_FOOTER_REPEATS);
        self
    }

    /// The effective header/footer repeat count.
    #[must_use]
    pub const fn min_repeats(&self) -> usize {
        self.min_repeats
    }

    /// Lines at least this many characters long are never stripped.
    #[must_use]
    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    /// Also strip short lines appearing on more than `ratio` of the pages.
    ///
    /// Pages are delimited by form feeds. Only applies to documents with at
    /// least two pages, and a line must still appear on two or more pages.
    #[must_use]
    pub fn with_page_ratio(mut self, ratio: Option<f32>) -> Self {
        self.page_ratio = ratio.filter(|r| r.is_finite() && *r >= 0.0);
        self
    }

    /// Clean `text`.
    pub fn normalize(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }

        let unified = text.replace("\r\n", "\n").replace('\r', "\n");
        let page_lines = self.page_repeated_lines(&unified);
        let unified = unified.replace(FORM_FEED, "\n");

        let lines: Vec<&str> = unified
            .split('\n')
            .map(|line| if is_page_number(line) { "" } else { line })
            .collect();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for line in &lines {
            let norm = line.trim();
            if !norm.is_empty() {
                *counts.entry(norm).or_insert(0) += 1;
            }
        }

        let mut cleaned = String::with_capacity(unified.len());
        let mut blank_run = 0usize;
        let mut stripped = 0usize;

        for line in lines {
            let norm = line.trim();
            if !norm.is_empty() && self.is_short(norm) {
                let repeated = counts.get(norm).copied().unwrap_or(0) >= self.min_repeats;
                if repeated || page_lines.contains(norm) {
                    stripped += 1;
                    continue;
                }
            }

            if norm.is_empty() {
                blank_run += 1;
                if blank_run == 1 {
                    cleaned.push('\n');
                }
                continue;
            }

            blank_run = 0;
            cleaned.push_str(line);
            cleaned.push('\n');
        }

        let cleaned = cleaned.trim().to_string();
        debug!(
            before = text.len(),
            after = cleaned.len(),
            stripped_lines = stripped,
            "normalized document text"
        );
        cleaned
    }

    fn is_short(&self, line: &str) -> bool {
        line.chars().count() < self.max_line_length
    }

    /// Short lines that appear on more than `page_ratio` of form-feed pages.
    fn page_repeated_lines(&self, text: &str) -> HashSet<String> {
        let Some(ratio) = self.page_ratio else {
            return HashSet::new();
        };
        let pages: Vec<&str> = text.split(FORM_FEED).collect();
        if pages.len() < 2 {
            return HashSet::new();
        }

        let mut page_counts: HashMap<&str, usize> = HashMap::new();
        for page in &pages {
            let distinct: HashSet<&str> = page
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && self.is_short(l))
                .collect();
            for line in distinct {
                *page_counts.entry(line).or_insert(0) += 1;
            }
        }

        let cutoff = ratio * pages.len() as f32;
        page_counts
            .into_iter()
            .filter(|&(_, n)| n >= 2 && n as f32 > cutoff)
            .map(|(line, _)| line.to_string())
            .collect()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Clean `text` with default thresholds.
///
/// Equivalent to `Normalizer::new().normalize(text)`.
///
/// ```rust
/// assert_eq!(quire::normalize("  \r\n 12 \r\n"), "");
/// assert_eq!(quire::normalize("a\n\n\n\nb"), "a\n\nb");
/// ```
pub fn normalize(text: &str) -> String {
    Normalizer::new().normalize(text)
}

/// A line holding only a page number.
fn is_page_number(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit())
}

/// Strip leading list bullets, dashes, dots and whitespace from a chunk.
pub(crate) fn strip_leading_bullets(text: &str) -> &str {
    text[leading_bullets_len(text)..].trim_end()
}

/// Byte length of the bullet, dash, dot and whitespace prefix of `text`.
pub(crate) fn leading_bullets_len(text: &str) -> usize {
    let rest = text.trim_start_matches(|c: char| matches!(c, '.' | '-' | '•') || c.is_whitespace());
    text.len() - rest.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t\r\n "), "");
    }

    #[test]
    fn test_line_endings_unified() {
        assert_eq!(normalize("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_page_numbers_removed() {
        let text = "First page text.\n  3  \nSecond page text.";
        assert_eq!(normalize(text), "First page text.\n\nSecond page text.");
    }

    #[test]
    fn test_blank_runs_collapsed() {
        let text = "a\n\n\n\n\nb\n \n\t\nc";
        assert_eq!(normalize(text), "a\n\nb\n\nc");
    }

    #[test]
    fn test_repeated_page_header_stripped() {
        let mut text = String::new();
        for page in 1..=10 {
            if page % 2 == 0 {
                text.push_str("Page 3\n");
            }
            text.push_str(&format!("Body of page number {page} goes here.\n"));
        }

        let clean = normalize(&text);
        assert!(!clean.contains("Page 3"));
        assert!(clean.contains("Body of page number 7 goes here."));
    }

    #[test]
    fn test_below_threshold_kept() {
        let text = "Note\nbody one\nNote\nbody two";
        assert_eq!(normalize(text), text);
    }

    #[test]
    fn test_long_repeated_lines_kept() {
        let long = "x".repeat(100);
        let text = format!("{long}\n{long}\n{long}");
        assert_eq!(normalize(&text), text);

        let strict = Normalizer::new().with_max_line_length(200);
        assert_eq!(strict.normalize(&text), "");
    }

    #[test]
    fn test_page_ratio_strips_per_page_footer() {
        let text = "Body A one.\nACME Confidential\u{c}Body B two.\nACME Confidential\u{c}Body C three.";
        let plain = Normalizer::new();
        assert!(plain.normalize(text).contains("ACME Confidential"));

        let paged = Normalizer::new().with_page_ratio(Some(0.5));
        let clean = paged.normalize(text);
        assert!(!clean.contains("ACME Confidential"));
        assert!(clean.contains("Body B two."));
        assert!(!clean.contains('\u{c}'));
    }

    #[test]
    fn test_input_not_mutated() {
        let text = String::from("x\r\ny");
        let _ = normalize(&text);
        assert_eq!(text, "x\r\ny");
    }

    #[test]
    fn test_min_repeats_clamped() {
        assert_eq!(Normalizer::new().with_min_repeats(0).min_repeats(), 2);
        assert_eq!(Normalizer::new().with_min_repeats(1).min_repeats(), 2);
        assert_eq!(Normalizer::new().with_min_repeats(4).min_repeats(), 4);

        // A clamped normalizer still keeps lines seen once
        let clean = Normalizer::new().with_min_repeats(1).normalize("Once\nTwice\nTwice");
        assert_eq!(clean, "Once");
    }

    #[test]
    fn test_strip_leading_bullets() {
        assert_eq!(strip_leading_bullets("• - . Item one "), "Item one");
        assert_eq!(strip_leading_bullets("Plain"), "Plain");
        assert_eq!(leading_bullets_len("• Item"), "• ".len());
        assert_eq!(leading_bullets_len("Item"), 0);
    }
}
