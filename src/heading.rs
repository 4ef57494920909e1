//! Heading heuristics.
//!
//! Extracted text has lost its typography, so headings must be guessed from
//! the shape of a line alone:
//!
//! ```text
//! # Overview                 <- markdown marker
//! 2.3.1 Results              <- numbered (also "1.", "2)", "4 - ")
//! METHODS AND MATERIALS      <- short all-caps line
//! Chapter 7: The Storm       <- keyword prefix
//! ```
//!
//! These are heuristics: "3.14 is close to pi" looks like a numbered heading
//! and an all-caps acronym line looks like a title. Sectioning tolerates
//! false positives because undersized sections are merged back together.

use std::sync::LazyLock;

use regex::Regex;

/// Numbered headings: "1.", "2)", "1 - ", "1.2.3 Title", "4 – Results".
static NUMBERED_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(?:\.\d+)*\s*[.\-)\u{2013}]").expect("valid numbered heading regex")
});

/// A numbered heading that is nothing but its marker: "2.", "3)", "1.4.".
static NUMBER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)*[.)]$").expect("valid number marker regex"));

/// Keyword-prefixed headings: "Chapter 3", "SECTION 2.1".
static KEYWORD_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:chapter|section)\b").expect("valid keyword heading regex"));

/// All-caps lines must be strictly longer than this (in chars)...
const MIN_CAPS_HEADING_CHARS: usize = 2;
/// ...and strictly shorter than this.
const MAX_CAPS_HEADING_CHARS: usize = 120;

/// Whether `line` looks like a heading.
///
/// ```rust
/// use quire::is_heading;
///
/// assert!(is_heading("## Installation"));
/// assert!(is_heading("1.2.3 Scope"));
/// assert!(is_heading("2) Methods"));
/// assert!(is_heading("INTRODUCTION"));
/// assert!(is_heading("chapter 4"));
///
/// assert!(!is_heading("The fox jumped."));
/// assert!(!is_heading("OK"));
/// assert!(!is_heading(""));
/// ```
pub fn is_heading(line: &str) -> bool {
    let s = line.trim();
    if s.is_empty() {
        return false;
    }

    s.starts_with('#')
        || NUMBERED_HEADING.is_match(s)
        || is_caps_line(s)
        || KEYWORD_HEADING.is_match(s)
}

/// Whether a whole chunk is just a heading that should lead into the next one.
///
/// Stricter than [`is_heading`]: the chunk must be a single line, and a
/// keyword or all-caps match must not end like a sentence, so
/// "Chapter 1 The fox ran." is body text even though it starts with a
/// keyword. Markdown headings and bare number markers ("2.") always qualify.
pub(crate) fn is_heading_chunk(text: &str) -> bool {
    let s = text.trim();
    if s.contains('\n') || s.chars().count() >= MAX_CAPS_HEADING_CHARS {
        return false;
    }
    if s.starts_with('#') || NUMBER_MARKER.is_match(s) {
        return true;
    }
    !s.ends_with(['.', '!', '?', ';']) && is_heading(s)
}

/// Short line with at least one cased letter and no lower-case letters.
fn is_caps_line(s: &str) -> bool {
    let len = s.chars().count();
    if len <= MIN_CAPS_HEADING_CHARS || len >= MAX_CAPS_HEADING_CHARS {
        return false;
    }
    let mut has_upper = false;
    for c in s.chars() {
        if c.is_lowercase() {
            return false;
        }
        has_upper |= c.is_uppercase();
    }
    has_upper
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_marker() {
        assert!(is_heading("# Title"));
        assert!(is_heading("   ### Deep"));
    }

    #[test]
    fn test_numbered_patterns() {
        for line in ["1.", "2) Methods", "1 - Intro", "1.2.3 Scope", "4 \u{2013} Results", "10. Ten"] {
            assert!(is_heading(line), "expected heading: {line:?}");
        }
        assert!(!is_heading("1984 was a year"));
    }

    #[test]
    fn test_caps_length_bounds() {
        assert!(!is_heading("AB"));
        assert!(is_heading("ABC"));
        assert!(is_heading("RESULTS AND DISCUSSION"));
        assert!(!is_heading(&"A".repeat(120)));
        assert!(is_heading(&"A".repeat(119)));
    }

    #[test]
    fn test_caps_requires_a_letter() {
        assert!(!is_heading("--- ***"));
        assert!(!is_heading("Mostly Upper But Not All"));
    }

    #[test]
    fn test_keyword_prefix() {
        assert!(is_heading("Chapter 1"));
        assert!(is_heading("SECTION 4.2 Data"));
        assert!(is_heading("section: overview"));
        assert!(!is_heading("Sectional sofas are comfy"));
        assert!(!is_heading("Chapters are long"));
    }

    #[test]
    fn test_heading_chunk() {
        assert!(is_heading_chunk("Chapter 1"));
        assert!(is_heading_chunk("## Setup"));
        assert!(!is_heading_chunk("Chapter 1 The quick brown fox."));
        assert!(!is_heading_chunk("INTRO\nbody"));
        assert!(!is_heading_chunk("plain text"));
    }

    #[test]
    fn test_number_marker_heading_chunk() {
        for marker in ["2.", "3)", "1.4.", "## What is this?"] {
            assert!(is_heading_chunk(marker), "expected heading chunk: {marker:?}");
        }
        assert!(!is_heading_chunk("2. Results were positive."));
    }
}
