//! Post-pack chunk merging.
//!
//! Packing can leave two kinds of fragments behind:
//!
//! - A chunk that is nothing but a heading ("2.3 Results"), which embeds
//!   poorly and retrieves nothing useful on its own.
//! - Runs of tiny chunks, e.g. from short sections or list items.
//!
//! ```text
//! Headings policy:
//!   ["2.3 Results", "Accuracy rose to 91%."]  ->  ["2.3 Results Accuracy rose to 91%."]
//!
//! Size policy (max 40 chars):
//!   ["Step one.", "Step two.", "A much longer closing paragraph here."]
//!       -> ["Step one.\n\nStep two.", "A much longer closing paragraph here."]
//! ```
//!
//! Merging never splits a chunk and never reorders. Unless
//! [`Merger::with_cross_section`] is enabled, chunks from different sections
//! are never joined, so a heading boundary found by the sectionizer survives
//! to the output. Size merging joins chunks verbatim, so overlap text shared
//! by two merged neighbours appears twice in the result.

use tracing::debug;

use crate::config::DEFAULT_MAX_MERGE_CHARS;
use crate::heading::is_heading_chunk;
use crate::Chunk;

/// Separator used when size-merging chunks.
const PARAGRAPH_BREAK: &str = "\n\n";

/// Which merge passes run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MergePolicy {
    /// Leave chunks as packed.
    Disabled,
    /// Fold heading-only chunks into the chunk that follows.
    #[default]
    Headings,
    /// Accumulate consecutive chunks up to a character cap.
    Size,
    /// Heading folding, then size accumulation.
    HeadingsThenSize,
}

/// Merges chunks according to a [`MergePolicy`].
///
/// ## Example
///
/// ```rust
/// use quire::{Chunk, MergePolicy, Merger};
///
/// let chunks = vec![
///     Chunk::new("## Setup", 2, 0, 0, 8, 0),
///     Chunk::new("Install the toolchain first.", 4, 0, 9, 37, 1),
/// ];
/// let merged = Merger::new(MergePolicy::Headings).merge(chunks);
///
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged[0].text, "## Setup Install the toolchain first.");
/// assert_eq!(merged[0].span(), 0..37);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Merger {
    policy: MergePolicy,
    max_chars: usize,
    across_sections: bool,
}

impl Merger {
    /// A merger with the default size cap, confined to sections.
    #[must_use]
    pub const fn new(policy: MergePolicy) -> Self {
        Self {
            policy,
            max_chars: DEFAULT_MAX_MERGE_CHARS,
            across_sections: false,
        }
    }

    /// Set the character cap for size merging.
    #[must_use]
    pub const fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Allow merges that join chunks from different sections.
    #[must_use]
    pub const fn with_cross_section(mut self, enabled: bool) -> Self {
        self.across_sections = enabled;
        self
    }

    /// Merge `chunks`, renumbering the result.
    pub fn merge(&self, chunks: Vec<Chunk>) -> Vec<Chunk> {
        let before = chunks.len();
        let mut merged = match self.policy {
            MergePolicy::Disabled => chunks,
            MergePolicy::Headings => self.merge_headings(chunks),
            MergePolicy::Size => self.merge_by_size(chunks),
            MergePolicy::HeadingsThenSize => self.merge_by_size(self.merge_headings(chunks)),
        };

        for (index, chunk) in merged.iter_mut().enumerate() {
            chunk.index = index;
        }

        debug!(before, after = merged.len(), policy = ?self.policy, "merged chunks");
        merged
    }

    fn may_join(&self, a: &Chunk, b: &Chunk) -> bool {
        self.across_sections || a.section == b.section
    }

    fn merge_headings(&self, chunks: Vec<Chunk>) -> Vec<Chunk> {
        let mut out = Vec::with_capacity(chunks.len());
        let mut iter = chunks.into_iter().peekable();

        while let Some(mut chunk) = iter.next() {
            if is_heading_chunk(&chunk.text) {
                if let Some(next) = iter.next_if(|next| self.may_join(&chunk, next)) {
                    absorb(&mut chunk, next, " ");
                }
            }
            out.push(chunk);
        }

        out
    }

    fn merge_by_size(&self, chunks: Vec<Chunk>) -> Vec<Chunk> {
        let mut out: Vec<Chunk> = Vec::with_capacity(chunks.len());
        let mut current_chars = 0usize;

        for chunk in chunks {
            let chars = chunk.text.chars().count();
            if let Some(current) = out.last_mut() {
                let combined = current_chars + PARAGRAPH_BREAK.len() + chars;
                if self.may_join(current, &chunk) && combined <= self.max_chars {
                    absorb(current, chunk, PARAGRAPH_BREAK);
                    current_chars = combined;
                    continue;
                }
            }
            current_chars = chars;
            out.push(chunk);
        }

        out
    }
}

impl Default for Merger {
    fn default() -> Self {
        Self::new(MergePolicy::default())
    }
}

/// Append `next` to `into`, widening the span.
fn absorb(into: &mut Chunk, next: Chunk, separator: &str) {
    into.text.push_str(separator);
    into.text.push_str(&next.text);
    into.tokens += next.tokens;
    into.start = into.start.min(next.start);
    into.end = into.end.max(next.end);
}
