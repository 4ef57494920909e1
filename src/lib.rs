//! # quire
//!
//! Document chunking for retrieval-augmented generation (RAG) pipelines.
//!
//! ## The Problem
//!
//! Text extracted from PDFs and scans is noisy. Every page repeats the same
//! running header, page numbers sit on their own lines, and line endings come
//! in three flavours. Split that text naively and the noise lands in every
//! chunk, the same boilerplate is embedded a hundred times, and a heading
//! ends up alone in a chunk of its own, far from the paragraph it introduces.
//!
//! quire turns raw document text into an ordered list of clean,
//! token-bounded, overlapping chunks.
//!
//! ## Pipeline
//!
//! ```text
//! raw text
//!   │ 1. Normalizer       CRLF → LF, drop page numbers and repeated
//!   │                     headers/footers, collapse blank runs
//!   │ 2. Sectionizer      split at heading lines; tiny sections merge forward
//!   │ 3. SentenceSplitter UAX #29 sentences (or a separator cascade, or word runs)
//!   │ 4. SentencePacker   greedy packing up to N tokens, trailing overlap
//!   │ 5. dedupe           exact (normalized fingerprint), then optionally
//!   │                     near-duplicate (TF-IDF cosine by default)
//!   │ 6. Merger           fold heading-only chunks into their successor
//!   ▼
//! chunks
//! ```
//!
//! ### Packing With Overlap
//!
//! Sentences are appended to the current chunk until the next one would
//! exceed the budget. The next chunk starts with enough trailing sentences of
//! the previous chunk to cover the overlap:
//!
//! ```text
//! Sentences (tokens):  [S0:2] [S1:4] [S2:4] [S3:4]
//! Budget: 6, overlap: 2
//!
//! Chunk 0: S0 S1        6 tokens
//! Chunk 1: S1           carries S1 forward, S2 would overflow
//! Chunk 2: S2
//! Chunk 3: S3
//! ```
//!
//! A single sentence larger than the budget becomes its own oversized chunk;
//! text is never cut mid-sentence. See [`OverlapPolicy`] for the two ways of
//! counting overlap.
//!
//! ## Quick Start
//!
//! ```rust
//! let text = "Chapter 1\nThe quick brown fox. The lazy dog sleeps. Foxes are quick animals.";
//! let chunks = quire::chunk(text, 6, 2, false);
//!
//! assert_eq!(chunks[0], "Chapter 1 The quick brown fox.");
//! ```
//!
//! For control over every stage, build a [`DocumentChunker`]:
//!
//! ```rust
//! use quire::{ChunkerConfig, DocumentChunker, MergePolicy, OverlapPolicy};
//!
//! let config = ChunkerConfig::default()
//!     .with_chunk_size(200)
//!     .with_overlap(20)
//!     .with_overlap_policy(OverlapPolicy::AtMost)
//!     .with_merge_policy(MergePolicy::HeadingsThenSize)
//!     .with_semantic_dedupe(true);
//! let chunker = DocumentChunker::try_new(config)?;
//!
//! for chunk in chunker.chunk_document("# Notes\nSome text. More text.") {
//!     println!("[{}] section {} {:?}: {}", chunk.index, chunk.section, chunk.span(), chunk.text);
//! }
//! # Ok::<(), quire::Error>(())
//! ```
//!
//! ## Stages As Building Blocks
//!
//! Each stage is usable on its own:
//!
//! ```rust
//! use quire::{dedupe_exact, normalize, split_sentences};
//!
//! let clean = normalize("Intro.\r\n\r\n\r\n12\r\nBody.");
//! assert_eq!(clean, "Intro.\n\nBody.");
//!
//! assert_eq!(split_sentences("One here. Two here."), vec!["One here.", "Two here."]);
//! assert_eq!(dedupe_exact(vec!["A b.", "a  B."]), vec!["A b."]);
//! ```
//!
//! ## Near-Duplicate Scorers
//!
//! | Scorer | Needs | Catches |
//! |--------|-------|---------|
//! | [`TfIdfCosine`] | nothing | reworded boilerplate sharing most terms |
//! | [`Jaccard`] | nothing | near-identical token sets |
//! | `EmbeddingScorer` | `semantic` feature | paraphrases |
//!
//! Any `Fn(&str, &str) -> f32` also works as a [`SimilarityScorer`].
//!
//! ## Features
//!
//! - `semantic`: embedding similarity via fastembed.
//! - `serde`: `Serialize`/`Deserialize` for [`ChunkerConfig`] and its enums.

mod budget;
mod cascade;
mod chunk;
mod config;
mod dedupe;
mod error;
mod heading;
mod merge;
mod normalize;
mod pack;
mod pipeline;
mod runs;
mod section;
mod sentence;
mod similarity;
mod tokens;

#[cfg(feature = "semantic")]
mod semantic;

pub use budget::TokenBudget;
pub use cascade::{SeparatorCascade, DEFAULT_SEPARATORS};
pub use chunk::{Chunk, Fingerprint};
pub use config::{
    ChunkerConfig, SimilarityBackend, SplitterKind, DEFAULT_CHUNK_OVERLAP_TOKENS, DEFAULT_CHUNK_SIZE_TOKENS,
    DEFAULT_HEADER_FOOTER_MAX_LINE_LENGTH, DEFAULT_HEADER_FOOTER_MIN_REPEATS, DEFAULT_MAX_MERGE_CHARS,
    DEFAULT_MIN_SECTION_TOKENS, DEFAULT_SEMANTIC_SIMILARITY_THRESHOLD, MIN_HEADER_FOOTER_REPEATS,
};
pub use dedupe::{dedupe_exact, dedupe_semantic};
pub use error::{Error, Result};
pub use heading::is_heading;
pub use merge::{MergePolicy, Merger};
pub use normalize::{normalize, Normalizer};
pub use pack::{pack, OverlapPolicy, SentencePacker};
pub use pipeline::DocumentChunker;
pub use runs::{WordRuns, DEFAULT_WORDS_PER_RUN};
pub use section::{split_sections, Section, Sectionizer};
pub use sentence::{split_sentences, SentenceSplitter, UnicodeSentences};
pub use similarity::{Jaccard, SimilarityScorer, TfIdfCosine};
pub use tokens::{TokenCounter, WhitespaceTokens};

#[cfg(feature = "semantic")]
pub use semantic::EmbeddingScorer;

/// A document chunking strategy.
///
/// ```rust
/// use quire::{Chunk, Chunker, ChunkerConfig, DocumentChunker};
///
/// fn chunk_all(chunker: &dyn Chunker, docs: &[&str]) -> Vec<Vec<Chunk>> {
///     docs.iter().map(|doc| chunker.chunk(doc)).collect()
/// }
///
/// let chunker = DocumentChunker::new(ChunkerConfig::default());
/// let out = chunk_all(&chunker, &["First document.", "Second document."]);
/// assert_eq!(out.len(), 2);
/// ```
pub trait Chunker: Send + Sync {
    /// Split text into chunks.
    ///
    /// Each [`Chunk`] carries its text, token count, section and byte span
    /// in the normalized document.
    fn chunk(&self, text: &str) -> Vec<Chunk>;

    /// Estimate the number of chunks for a given text length.
    ///
    /// Useful for pre-allocation. May be approximate.
    fn estimate_chunks(&self, text_len: usize) -> usize {
        // Conservative default
        (text_len / 500).max(1)
    }
}

/// Chunk `raw_text` with default settings for everything but the given knobs.
///
/// Invalid sizes are clamped rather than rejected: a zero chunk size becomes
/// one token, and an overlap at or above the size becomes `size - 1`. Use
/// [`DocumentChunker::try_new`] to reject them instead.
///
/// ```rust
/// let chunks = quire::chunk("Trees are data structures. trees  are data structures.", 4, 0, false);
/// assert_eq!(chunks, vec!["Trees are data structures."]);
///
/// assert!(quire::chunk("", 500, 50, false).is_empty());
/// ```
pub fn chunk(
    raw_text: &str,
    chunk_size_tokens: usize,
    chunk_overlap_tokens: usize,
    use_semantic_dedupe: bool,
) -> Vec<String> {
    let config = ChunkerConfig::default()
        .with_chunk_size(chunk_size_tokens)
        .with_overlap(chunk_overlap_tokens)
        .with_semantic_dedupe(use_semantic_dedupe);
    DocumentChunker::new(config).chunk_strings(raw_text)
}
