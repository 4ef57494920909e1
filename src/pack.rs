//! Token-budgeted sentence packing with sliding overlap.
//!
//! ## How It Works
//!
//! ```text
//! size = 10, overlap = 3
//!
//! Sentences: [S0: 4] [S1: 5] [S2: 3] [S3: 6] [S4: 2]
//!
//! Chunk 0: S0 S1        (9 tokens; adding S2 would make 12)
//! Chunk 1: S1 S2        <- S1 (5 >= 3) carried as overlap
//! Chunk 2: S2 S3        <- S2 (3 >= 3) carried
//! Chunk 3: S3 S4        <- S3 carried, last chunk
//! ```
//!
//! Overlap is always made of whole trailing sentences; a chunk boundary never
//! cuts a sentence in half.
//!
//! ## Overlap Accounting
//!
//! Sentences rarely line up with the overlap budget, so there are two ways
//! to round:
//!
//! | Policy | Walk back until... | Overlap size |
//! |--------|--------------------|--------------|
//! | [`OverlapPolicy::AtLeast`] | the budget is reached | ≥ budget (or the whole chunk) |
//! | [`OverlapPolicy::AtMost`] | the next sentence would exceed it | ≤ budget, possibly zero |
//!
//! ## Termination
//!
//! Each chunk starts at least one sentence after the previous chunk's start,
//! whatever the overlap. A chunk whose first sentence alone exceeds the size
//! is emitted on its own instead of being dropped, so every sentence lands
//! in some chunk.

use std::ops::Range;

use crate::tokens::TokenCounter;
use crate::TokenBudget;

/// How trailing sentences are counted against the overlap budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OverlapPolicy {
    /// Carry trailing sentences until their tokens reach the overlap budget.
    #[default]
    AtLeast,
    /// Carry trailing sentences only while their tokens stay within the budget.
    AtMost,
}

/// Greedy packer over per-sentence token counts.
///
/// ## Example
///
/// ```rust
/// use quire::{SentencePacker, TokenBudget};
///
/// let packer = SentencePacker::new(TokenBudget::new(6, 2).unwrap());
/// let groups = packer.pack(&[2, 4, 4, 4]);
///
/// assert_eq!(groups[0], 0..2);
/// assert_eq!(groups[1].start, 1); // overlap carried
/// assert_eq!(groups.last().unwrap().end, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SentencePacker {
    budget: TokenBudget,
    policy: OverlapPolicy,
}

impl SentencePacker {
    /// Create a packer with [`OverlapPolicy::AtLeast`].
    #[must_use]
    pub fn new(budget: TokenBudget) -> Self {
        Self {
            budget,
            policy: OverlapPolicy::AtLeast,
        }
    }

    /// Set the overlap policy.
    #[must_use]
    pub fn with_policy(mut self, policy: OverlapPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The packer's budget.
    #[must_use]
    pub const fn budget(&self) -> TokenBudget {
        self.budget
    }

    /// Group sentences into chunks, returning index ranges into `tokens`.
    ///
    /// `tokens[i]` is the token count of sentence `i`. Ranges are non-empty,
    /// ordered by start, and together cover every sentence.
    pub fn pack(&self, tokens: &[usize]) -> Vec<Range<usize>> {
        let n = tokens.len();
        let mut groups = Vec::new();
        let mut start = 0;

        while start < n {
            let mut end = start;
            let mut sum = 0usize;
            while end < n && !self.budget.would_overflow(sum, tokens[end]) {
                sum += tokens[end];
                end += 1;
            }
            if end == start {
                // A single sentence over budget becomes its own chunk.
                end = start + 1;
            }

            groups.push(start..end);
            if end >= n {
                break;
            }

            start = self.overlap_start(tokens, start..end).max(start + 1);
        }

        groups
    }

    /// Pack sentence strings into chunk strings joined with single spaces.
    pub fn pack_sentences<S: AsRef<str>>(&self, sentences: &[S], counter: &dyn TokenCounter) -> Vec<String> {
        let tokens: Vec<usize> = sentences.iter().map(|s| counter.count(s.as_ref())).collect();
        self.pack(&tokens)
            .into_iter()
            .map(|group| join_sentences(&sentences[group]))
            .collect()
    }

    /// First sentence index of the overlap region at the tail of `group`.
    fn overlap_start(&self, tokens: &[usize], group: Range<usize>) -> usize {
        let overlap = self.budget.overlap();
        if overlap == 0 {
            return group.end;
        }

        let mut acc = 0usize;
        match self.policy {
            OverlapPolicy::AtLeast => {
                for i in group.clone().rev() {
                    acc += tokens[i];
                    if acc >= overlap {
                        return i;
                    }
                }
                group.start
            }
            OverlapPolicy::AtMost => {
                let mut first = group.end;
                for i in group.rev() {
                    if acc + tokens[i] > overlap {
                        break;
                    }
                    acc += tokens[i];
                    first = i;
                }
                first
            }
        }
    }
}

/// Pack `sentences` with the given size and overlap, clamping invalid values.
///
/// ```rust
/// use quire::{pack, WhitespaceTokens};
///
/// let sentences = ["Chapter 1", "The quick brown fox.", "The lazy dog sleeps."];
/// let chunks = pack(&sentences, 6, 2, &WhitespaceTokens);
///
/// assert_eq!(chunks[0], "Chapter 1 The quick brown fox.");
/// assert!(chunks[1].starts_with("The quick brown fox."));
/// ```
pub fn pack<S: AsRef<str>>(
    sentences: &[S],
    chunk_size_tokens: usize,
    chunk_overlap_tokens: usize,
    counter: &dyn TokenCounter,
) -> Vec<String> {
    SentencePacker::new(TokenBudget::clamped(chunk_size_tokens, chunk_overlap_tokens))
        .pack_sentences(sentences, counter)
}

fn join_sentences<S: AsRef<str>>(sentences: &[S]) -> String {
    let mut out = String::new();
    for s in sentences {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(s.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WhitespaceTokens;

    fn packer(size: usize, overlap: usize) -> SentencePacker {
        SentencePacker::new(TokenBudget::new(size, overlap).unwrap())
    }

    #[test]
    fn test_no_overlap_partitions() {
        let groups = packer(10, 0).pack(&[4, 5, 3, 6, 2]);
        assert_eq!(groups, vec![0..2, 2..4, 4..5]);
    }

    #[test]
    fn test_at_least_overlap() {
        let groups = packer(10, 3).pack(&[4, 5, 3, 6, 2]);
        assert_eq!(groups, vec![0..2, 1..3, 2..4, 3..5]);
    }

    #[test]
    fn test_at_most_overlap() {
        let groups = packer(10, 3)
            .with_policy(OverlapPolicy::AtMost)
            .pack(&[4, 5, 3, 6, 2]);
        // S1 (5) and S3 (6) exceed the overlap, so no sentence is carried.
        assert_eq!(groups, vec![0..2, 2..4, 4..5]);

        let groups = packer(10, 5)
            .with_policy(OverlapPolicy::AtMost)
            .pack(&[4, 5, 3, 6, 2]);
        assert_eq!(groups, vec![0..2, 1..3, 2..4, 4..5]);
    }

    #[test]
    fn test_oversize_sentence_alone() {
        let groups = packer(5, 1).pack(&[2, 9, 2]);
        assert_eq!(groups[1], 1..2);
        assert!(groups.iter().any(|g| g.contains(&2)));
    }

    #[test]
    fn test_progress_when_overlap_covers_chunk() {
        // Overlap (4) exceeds every sentence; each group must still advance.
        let groups = packer(5, 4).pack(&[2, 2, 2, 2, 2]);
        for pair in groups.windows(2) {
            assert!(pair[1].start > pair[0].start);
        }
        assert_eq!(groups.last().unwrap().end, 5);
    }

    #[test]
    fn test_empty_input() {
        assert!(packer(5, 1).pack(&[]).is_empty());
    }

    #[test]
    fn test_zero_size_clamped_terminates() {
        let sentences = ["a b", "c", "d e f"];
        let chunks = pack(&sentences, 0, 0, &WhitespaceTokens);
        assert_eq!(chunks, vec!["a b", "c", "d e f"]);
    }

    #[test]
    fn test_pack_sentences_joins_with_space() {
        let chunks = packer(100, 0).pack_sentences(&["One.", "Two."], &WhitespaceTokens);
        assert_eq!(chunks, vec!["One. Two."]);
    }
}
