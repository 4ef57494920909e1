//! Token budget for sentence packing.
//!
//! ## The Problem
//!
//! A chunk budget has two knobs that interact:
//!
//! - `size`: the most tokens a packed chunk may hold.
//! - `overlap`: how many trailing tokens of one chunk are repeated at the
//!   start of the next.
//!
//! Nonsense combinations are easy to write: a zero size can never hold a
//! sentence, and an overlap as large as the size means a chunk could be all
//! overlap, so the packer would never move forward.
//!
//! ```text
//! size = 6, overlap = 2
//!
//! Sentences:  [Chapter 1] [The quick brown fox.] [The lazy dog sleeps.]
//! Tokens:          2               4                      4
//!
//! Chunk 0:    [Chapter 1] [The quick brown fox.]          <- 6 tokens
//! Chunk 1:                [The quick brown fox.] ...      <- overlap carried
//! ```
//!
//! ## Strict vs Clamped
//!
//! [`TokenBudget::new`] rejects invalid combinations. The pipeline instead
//! uses [`TokenBudget::clamped`], which coerces them to the nearest safe value
//! and logs a warning.

use crate::{Error, Result};

/// Chunk size and overlap, both in tokens.
///
/// # Examples
///
/// ```rust
/// use quire::TokenBudget;
///
/// let budget = TokenBudget::new(500, 50).unwrap();
/// assert_eq!(budget.size(), 500);
/// assert_eq!(budget.overlap(), 50);
///
/// // Zero size is rejected by the strict constructor...
/// assert!(TokenBudget::new(0, 0).is_err());
///
/// // ...and clamped by the lenient one.
/// let budget = TokenBudget::clamped(0, 10);
/// assert_eq!(budget.size(), 1);
/// assert_eq!(budget.overlap(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBudget {
    size: usize,
    overlap: usize,
}

impl TokenBudget {
    /// Create a budget, rejecting a zero size or an overlap that is not
    /// smaller than the size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChunkSize`] if `size == 0` and
    /// [`Error::OverlapExceedsSize`] if `overlap >= size`.
    pub fn new(size: usize, overlap: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidChunkSize(size));
        }
        if overlap >= size {
            return Err(Error::OverlapExceedsSize { size, overlap });
        }
        Ok(Self { size, overlap })
    }

    /// Create a budget, coercing invalid values to the nearest safe ones.
    ///
    /// Size is raised to at least 1; overlap is lowered to `size - 1`.
    #[must_use]
    pub fn clamped(size: usize, overlap: usize) -> Self {
        let safe_size = size.max(1);
        let safe_overlap = overlap.min(safe_size - 1);
        if safe_size != size || safe_overlap != overlap {
            tracing::warn!(
                size,
                overlap,
                clamped_size = safe_size,
                clamped_overlap = safe_overlap,
                "clamped invalid token budget"
            );
        }
        Self {
            size: safe_size,
            overlap: safe_overlap,
        }
    }

    /// A budget with no overlap.
    #[must_use]
    pub fn no_overlap(size: usize) -> Self {
        Self::clamped(size, 0)
    }

    /// Maximum tokens per packed chunk.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Tokens of trailing overlap carried to the next chunk.
    #[must_use]
    pub const fn overlap(&self) -> usize {
        self.overlap
    }

    /// Check if adding `additional` tokens to `current` would exceed the size.
    #[must_use]
    pub fn would_overflow(&self, current: usize, additional: usize) -> bool {
        current.saturating_add(additional) > self.size
    }
}

impl Default for TokenBudget {
    fn default() -> Self {
        Self {
            size: crate::config::DEFAULT_CHUNK_SIZE_TOKENS,
            overlap: crate::config::DEFAULT_CHUNK_OVERLAP_TOKENS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_budget() {
        let budget = TokenBudget::new(100, 10).unwrap();
        assert_eq!(budget.size(), 100);
        assert_eq!(budget.overlap(), 10);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert_eq!(TokenBudget::new(0, 0), Err(Error::InvalidChunkSize(0)));
    }

    #[test]
    fn test_overlap_equal_to_size_rejected() {
        assert_eq!(
            TokenBudget::new(10, 10),
            Err(Error::OverlapExceedsSize {
                size: 10,
                overlap: 10
            })
        );
    }

    #[test]
    fn test_clamped_budget() {
        let budget = TokenBudget::clamped(10, 25);
        assert_eq!(budget.size(), 10);
        assert_eq!(budget.overlap(), 9);

        let budget = TokenBudget::clamped(0, 0);
        assert_eq!(budget.size(), 1);
        assert_eq!(budget.overlap(), 0);
    }

    #[test]
    fn test_would_overflow() {
        let budget = TokenBudget::no_overlap(100);
        assert!(!budget.would_overflow(50, 49));
        assert!(!budget.would_overflow(50, 50));
        assert!(budget.would_overflow(50, 51));
        assert!(budget.would_overflow(usize::MAX, 1));
    }

    #[test]
    fn test_default_budget() {
        let budget = TokenBudget::default();
        assert_eq!(budget.size(), 500);
        assert_eq!(budget.overlap(), 50);
    }
}
