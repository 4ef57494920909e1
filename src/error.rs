//! Error types for quire.
//!
//! Chunking itself never fails: odd text, empty text and unavailable
//! backends all degrade to a defined result. Errors only surface from the
//! strict constructors ([`crate::TokenBudget::new`],
//! [`crate::ChunkerConfig::validate`], [`crate::DocumentChunker::try_new`])
//! and from loading optional backends.

/// Errors raised when configuring a chunker.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Invalid chunk size (must be > 0).
    #[error("invalid chunk size: {0} (must be > 0)")]
    InvalidChunkSize(usize),

    /// Overlap is not smaller than the chunk size.
    #[error("overlap {overlap} must be smaller than chunk size {size}")]
    OverlapExceedsSize {
        /// The chunk size.
        size: usize,
        /// The overlap that reached or exceeded the size.
        overlap: usize,
    },

    /// Similarity threshold outside `0.0..=1.0`.
    #[error("invalid similarity threshold: {0} (must be within 0.0..=1.0)")]
    InvalidThreshold(f32),

    /// Size-based merging needs a positive character cap.
    #[error("invalid merge size: {0} (must be > 0)")]
    InvalidMergeSize(usize),

    /// Header/footer repeat count below 2.
    #[error("invalid header/footer repeat count: {0} (must be >= 2)")]
    InvalidRepeatCount(usize),

    /// The separator cascade needs at least one separator.
    #[error("separator cascade must have at least one separator")]
    EmptySeparators,

    /// Embedding model error.
    #[error("embedding error: {0}")]
    Embedding(String),
}

/// Result type for quire operations.
pub type Result<T> = std::result::Result<T, Error>;
