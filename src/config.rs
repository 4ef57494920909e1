//! Chunker configuration.
//!
//! Every knob has a default tuned for embedding PDF text with a 512-token
//! model. Builder methods cover the common adjustments:
//!
//! ```rust
//! use quire::{ChunkerConfig, MergePolicy, SplitterKind};
//!
//! let config = ChunkerConfig::default()
//!     .with_chunk_size(300)
//!     .with_overlap(30)
//!     .with_splitter(SplitterKind::SeparatorCascade)
//!     .with_merge_policy(MergePolicy::HeadingsThenSize)
//!     .with_semantic_dedupe(true);
//!
//! assert!(config.validate().is_ok());
//! ```
//!
//! With the `serde` feature the config deserializes from partial documents;
//! missing fields take their defaults.

use crate::{Error, MergePolicy, OverlapPolicy, Result};

/// Default maximum tokens per packed chunk.
pub const DEFAULT_CHUNK_SIZE_TOKENS: usize = 500;
/// Default trailing overlap in tokens.
pub const DEFAULT_CHUNK_OVERLAP_TOKENS: usize = 50;
/// Default repeat count for header/footer stripping.
pub const DEFAULT_HEADER_FOOTER_MIN_REPEATS: usize = 3;
/// Smallest accepted header/footer repeat count.
pub const MIN_HEADER_FOOTER_REPEATS: usize = 2;
/// Default exclusive length cap (chars) for header/footer candidates.
pub const DEFAULT_HEADER_FOOTER_MAX_LINE_LENGTH: usize = 80;
/// Default minimum section size in words.
pub const DEFAULT_MIN_SECTION_TOKENS: usize = 150;
/// Default near-duplicate similarity cutoff.
pub const DEFAULT_SEMANTIC_SIMILARITY_THRESHOLD: f32 = 0.85;
/// Default character cap for size-based merging.
pub const DEFAULT_MAX_MERGE_CHARS: usize = 800;

/// Which sentence splitter the pipeline builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SplitterKind {
    /// UAX #29 sentence boundaries.
    #[default]
    Unicode,
    /// `". "` → `"\n\n"` → `"\n"` → `" "`, bounded by the chunk size.
    SeparatorCascade,
    /// Fixed runs of this many whitespace tokens.
    WordRuns(usize),
}

/// Which similarity scorer backs semantic dedupe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SimilarityBackend {
    /// Pairwise TF-IDF cosine.
    #[default]
    TfIdf,
    /// Token-set Jaccard index.
    Jaccard,
    /// Sentence-embedding cosine (requires the `semantic` feature; without
    /// it, or if the model fails to load, semantic dedupe is skipped).
    Embedding,
    /// No scorer: semantic dedupe is skipped.
    Disabled,
}

/// Options for [`crate::DocumentChunker`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChunkerConfig {
    /// Max tokens per packed chunk.
    pub chunk_size_tokens: usize,
    /// Tokens of trailing-sentence overlap carried to the next chunk.
    pub chunk_overlap_tokens: usize,
    /// How overlap sentences are counted against `chunk_overlap_tokens`.
    pub overlap_policy: OverlapPolicy,
    /// Minimum repeats before a short line is stripped as header/footer.
    pub header_footer_min_repeats: usize,
    /// Lines at least this long (chars) are never stripped as header/footer.
    pub header_footer_max_line_length: usize,
    /// Also strip short lines found on more than this share of form-feed pages.
    pub header_footer_page_ratio: Option<f32>,
    /// Sections under this many words merge into the next section.
    pub min_section_tokens: usize,
    /// Sentence splitter.
    pub splitter: SplitterKind,
    /// Run the near-duplicate pass.
    pub use_semantic_dedupe: bool,
    /// Scorer for the near-duplicate pass.
    pub similarity_backend: SimilarityBackend,
    /// Similarity at or above which a chunk is a near duplicate.
    pub semantic_similarity_threshold: f32,
    /// Merge passes to run after dedupe.
    pub merge_policy: MergePolicy,
    /// Character cap for size-based merging.
    pub max_merge_chars: usize,
    /// Allow merges across section boundaries.
    pub merge_across_sections: bool,
    /// Strip leading bullets, dashes and dots from each chunk.
    pub strip_leading_bullets: bool,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size_tokens: DEFAULT_CHUNK_SIZE_TOKENS,
            chunk_overlap_tokens: DEFAULT_CHUNK_OVERLAP_TOKENS,
            overlap_policy: OverlapPolicy::default(),
            header_footer_min_repeats: DEFAULT_HEADER_FOOTER_MIN_REPEATS,
            header_footer_max_line_length: DEFAULT_HEADER_FOOTER_MAX_LINE_LENGTH,
            header_footer_page_ratio: None,
            min_section_tokens: DEFAULT_MIN_SECTION_TOKENS,
            splitter: SplitterKind::default(),
            use_semantic_dedupe: false,
            similarity_backend: SimilarityBackend::default(),
            semantic_similarity_threshold: DEFAULT_SEMANTIC_SIMILARITY_THRESHOLD,
            merge_policy: MergePolicy::default(),
            max_merge_chars: DEFAULT_MAX_MERGE_CHARS,
            merge_across_sections: false,
            strip_leading_bullets: false,
        }
    }
}

impl ChunkerConfig {
    /// Set the chunk size in tokens.
    #[must_use]
    pub fn with_chunk_size(mut self, tokens: usize) -> Self {
        self.chunk_size_tokens = tokens;
        self
    }

    /// Set the overlap in tokens.
    #[must_use]
    pub fn with_overlap(mut self, tokens: usize) -> Self {
        self.chunk_overlap_tokens = tokens;
        self
    }

    /// Set the overlap policy.
    #[must_use]
    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap_policy = policy;
        self
    }

    /// Set the minimum section size in words.
    #[must_use]
    pub fn with_min_section_tokens(mut self, words: usize) -> Self {
        self.min_section_tokens = words;
        self
    }

    /// Set the sentence splitter.
    #[must_use]
    pub fn with_splitter(mut self, splitter: SplitterKind) -> Self {
        self.splitter = splitter;
        self
    }

    /// Enable or disable the near-duplicate pass.
    #[must_use]
    pub fn with_semantic_dedupe(mut self, enabled: bool) -> Self {
        self.use_semantic_dedupe = enabled;
        self
    }

    /// Set the similarity backend.
    #[must_use]
    pub fn with_similarity_backend(mut self, backend: SimilarityBackend) -> Self {
        self.similarity_backend = backend;
        self
    }

    /// Set the near-duplicate threshold.
    #[must_use]
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.semantic_similarity_threshold = threshold;
        self
    }

    /// Set the merge policy.
    #[must_use]
    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    /// Set the size-merge cap in characters.
    #[must_use]
    pub fn with_max_merge_chars(mut self, chars: usize) -> Self {
        self.max_merge_chars = chars;
        self
    }

    /// Allow merges across section boundaries.
    #[must_use]
    pub fn with_cross_section_merge(mut self, enabled: bool) -> Self {
        self.merge_across_sections = enabled;
        self
    }

    /// Set header/footer detection thresholds.
    #[must_use]
    pub fn with_header_footer(mut self, min_repeats: usize, max_line_length: usize) -> Self {
        self.header_footer_min_repeats = min_repeats;
        self.header_footer_max_line_length = max_line_length;
        self
    }

    /// Set the page-ratio header/footer criterion.
    #[must_use]
    pub fn with_page_ratio(mut self, ratio: Option<f32>) -> Self {
        self.header_footer_page_ratio = ratio;
        self
    }

    /// Strip leading bullets from chunks.
    #[must_use]
    pub fn with_strip_leading_bullets(mut self, enabled: bool) -> Self {
        self.strip_leading_bullets = enabled;
        self
    }

    /// Check the options a strict caller would reject.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidChunkSize`] for a zero chunk size.
    /// - [`Error::OverlapExceedsSize`] if the overlap is not below the size.
    /// - [`Error::InvalidThreshold`] for a threshold outside `0.0..=1.0`.
    /// - [`Error::InvalidMergeSize`] for a zero merge cap when size merging.
    /// - [`Error::InvalidRepeatCount`] for a header/footer repeat count below 2.
    pub fn validate(&self) -> Result<()> {
        crate::TokenBudget::new(self.chunk_size_tokens, self.chunk_overlap_tokens)?;

        if self.header_footer_min_repeats < MIN_HEADER_FOOTER_REPEATS {
            return Err(Error::InvalidRepeatCount(self.header_footer_min_repeats));
        }

        let threshold = self.semantic_similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::InvalidThreshold(threshold));
        }

        let size_merge = matches!(self.merge_policy, MergePolicy::Size | MergePolicy::HeadingsThenSize);
        if size_merge && self.max_merge_chars == 0 {
            return Err(Error::InvalidMergeSize(self.max_merge_chars));
        }

        Ok(())
    }
}
