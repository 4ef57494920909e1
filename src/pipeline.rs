//! The document chunking pipeline.
//!
//! ```text
//! raw text
//!   │ Normalizer        line endings, page numbers, headers/footers, blank runs
//!   ▼
//! normalized text
//!   │ Sectionizer       split at headings, merge undersized sections forward
//!   ▼
//! sections ──► SentenceSplitter ──► SentencePacker   (per section)
//!   ▼
//! chunks tagged with their section
//!   │ dedupe_exact, dedupe_semantic (optional)
//!   │ Merger
//!   ▼
//! final chunks
//! ```
//!
//! [`DocumentChunker`] owns the configuration and the pluggable backends.
//! It holds no per-call state, so one instance can be shared across threads
//! and used for many documents concurrently.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::normalize::{leading_bullets_len, strip_leading_bullets};
use crate::{
    dedupe_exact, dedupe_semantic, Chunk, Chunker, ChunkerConfig, Jaccard, Merger, Normalizer, Result,
    Section, Sectionizer, SentencePacker, SentenceSplitter, SeparatorCascade, SimilarityBackend,
    SimilarityScorer, SplitterKind, TfIdfCosine, TokenBudget, TokenCounter, UnicodeSentences, WhitespaceTokens,
    WordRuns,
};

/// Turns raw document text into deduplicated, merged chunks.
///
/// ## Example
///
/// ```rust
/// use quire::{ChunkerConfig, DocumentChunker};
///
/// let chunker = DocumentChunker::new(ChunkerConfig::default().with_chunk_size(6).with_overlap(2));
/// let chunks = chunker.chunk_strings(
///     "Chapter 1\nThe quick brown fox. The lazy dog sleeps. Foxes are quick animals.",
/// );
///
/// assert!(chunks.len() >= 2);
/// assert_eq!(chunks[0], "Chapter 1 The quick brown fox.");
/// assert!(chunks[1].starts_with("The quick brown fox."));
/// ```
#[derive(Clone)]
pub struct DocumentChunker {
    config: ChunkerConfig,
    normalizer: Normalizer,
    sectionizer: Sectionizer,
    packer: SentencePacker,
    merger: Merger,
    splitter: Arc<dyn SentenceSplitter>,
    counter: Arc<dyn TokenCounter>,
    scorer: Option<Arc<dyn SimilarityScorer>>,
}

impl DocumentChunker {
    /// Build a chunker, clamping invalid sizes instead of failing.
    #[must_use]
    pub fn new(config: ChunkerConfig) -> Self {
        let budget = TokenBudget::clamped(config.chunk_size_tokens, config.chunk_overlap_tokens);
        Self::build(config, budget)
    }

    /// Build a chunker, rejecting invalid configuration.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by [`ChunkerConfig::validate`].
    pub fn try_new(config: ChunkerConfig) -> Result<Self> {
        config.validate()?;
        let budget = TokenBudget::new(config.chunk_size_tokens, config.chunk_overlap_tokens)?;
        Ok(Self::build(config, budget))
    }

    fn build(config: ChunkerConfig, budget: TokenBudget) -> Self {
        let normalizer = Normalizer::new()
            .with_min_repeats(config.header_footer_min_repeats)
            .with_max_line_length(config.header_footer_max_line_length)
            .with_page_ratio(config.header_footer_page_ratio);
        let sectionizer = Sectionizer::new(config.min_section_tokens);
        let packer = SentencePacker::new(budget).with_policy(config.overlap_policy);
        let merger = Merger::new(config.merge_policy)
            .with_max_chars(config.max_merge_chars)
            .with_cross_section(config.merge_across_sections);

        let splitter = splitter_for(config.splitter, budget);
        let scorer = scorer_for(config.similarity_backend);

        Self {
            config,
            normalizer,
            sectionizer,
            packer,
            merger,
            splitter,
            counter: Arc::new(WhitespaceTokens),
            scorer,
        }
    }

    /// Replace the sentence splitter.
    #[must_use]
    pub fn with_splitter(mut self, splitter: Arc<dyn SentenceSplitter>) -> Self {
        self.splitter = splitter;
        self
    }

    /// Replace the token counter used for packing.
    #[must_use]
    pub fn with_token_counter(mut self, counter: Arc<dyn TokenCounter>) -> Self {
        self.counter = counter;
        self
    }

    /// Replace the similarity scorer used for semantic dedupe.
    ///
    /// `None` turns semantic dedupe into a no-op even when enabled.
    #[must_use]
    pub fn with_scorer(mut self, scorer: Option<Arc<dyn SimilarityScorer>>) -> Self {
        self.scorer = scorer;
        self
    }

    /// The configuration this chunker was built from.
    #[must_use]
    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Normalize `text` the way this chunker does before sectioning.
    ///
    /// Chunk spans are byte offsets into this string.
    pub fn normalize(&self, text: &str) -> String {
        self.normalizer.normalize(text)
    }

    /// Run the full pipeline over `raw`.
    #[instrument(skip_all, fields(len = raw.len()))]
    pub fn chunk_document(&self, raw: &str) -> Vec<Chunk> {
        if raw.trim().is_empty() {
            return vec![];
        }

        let text = self.normalizer.normalize(raw);
        let sections = self.sectionizer.split(&text);

        let mut chunks = Vec::new();
        for section in &sections {
            self.pack_section(section, &mut chunks);
        }
        debug!(sections = sections.len(), packed = chunks.len(), "packed sections");

        let mut chunks = dedupe_exact(chunks);
        if self.config.use_semantic_dedupe {
            chunks = dedupe_semantic(
                chunks,
                self.scorer.as_deref(),
                self.config.semantic_similarity_threshold,
            );
        }

        let chunks = self.merger.merge(chunks);
        debug!(chunks = chunks.len(), "chunked document");
        chunks
    }

    /// Run the full pipeline and return only the chunk texts.
    pub fn chunk_strings(&self, raw: &str) -> Vec<String> {
        self.chunk_document(raw).into_iter().map(String::from).collect()
    }

    fn pack_section(&self, section: &Section<'_>, out: &mut Vec<Chunk>) {
        let spans = self.splitter.split(section.text);
        if spans.is_empty() {
            return;
        }

        let tokens: Vec<usize> = spans
            .iter()
            .map(|span| self.counter.count(&section.text[span.clone()]))
            .collect();

        for group in self.packer.pack(&tokens) {
            let members = &spans[group.clone()];
            let mut text = String::new();
            for span in members {
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(&section.text[span.clone()]);
            }

            let (Some(first), Some(last)) = (members.first(), members.last()) else {
                continue;
            };
            let mut start = first.start;

            let text = if self.config.strip_leading_bullets {
                // Stripping eats only bullets and whitespace, so the same
                // prefix measured on the source gives the new span start.
                start += leading_bullets_len(&section.text[first.start..last.end]);
                strip_leading_bullets(&text).to_string()
            } else {
                text
            };
            if text.trim().is_empty() {
                continue;
            }

            out.push(Chunk::new(
                text,
                tokens[group].iter().sum(),
                section.index,
                section.start + start,
                section.start + last.end,
                out.len(),
            ));
        }
    }
}

impl Default for DocumentChunker {
    fn default() -> Self {
        Self::new(ChunkerConfig::default())
    }
}

impl Chunker for DocumentChunker {
    fn chunk(&self, text: &str) -> Vec<Chunk> {
        self.chunk_document(text)
    }

    fn estimate_chunks(&self, text_len: usize) -> usize {
        // ~6 bytes per word of English prose
        let words = text_len / 6;
        let step = self.packer.budget().size() - self.packer.budget().overlap();
        (words / step.max(1)).max(1)
    }
}

impl std::fmt::Debug for DocumentChunker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentChunker")
            .field("config", &self.config)
            .field("budget", &self.packer.budget())
            .field("has_scorer", &self.scorer.is_some())
            .finish_non_exhaustive()
    }
}

fn splitter_for(kind: SplitterKind, budget: TokenBudget) -> Arc<dyn SentenceSplitter> {
    match kind {
        SplitterKind::Unicode => Arc::new(UnicodeSentences),
        SplitterKind::SeparatorCascade => Arc::new(SeparatorCascade::new(budget.size())),
        SplitterKind::WordRuns(words) => Arc::new(WordRuns::new(words)),
    }
}

fn scorer_for(backend: SimilarityBackend) -> Option<Arc<dyn SimilarityScorer>> {
    match backend {
        SimilarityBackend::TfIdf => Some(Arc::new(TfIdfCosine)),
        SimilarityBackend::Jaccard => Some(Arc::new(Jaccard)),
        SimilarityBackend::Embedding => embedding_scorer(),
        SimilarityBackend::Disabled => None,
    }
}

#[cfg(feature = "semantic")]
fn embedding_scorer() -> Option<Arc<dyn SimilarityScorer>> {
    match crate::EmbeddingScorer::shared() {
        Ok(scorer) => Some(scorer),
        Err(e) => {
            tracing::warn!(error = %e, "embedding model unavailable, semantic dedupe disabled");
            None
        }
    }
}

#[cfg(not(feature = "semantic"))]
fn embedding_scorer() -> Option<Arc<dyn SimilarityScorer>> {
    tracing::warn!("embedding backend requires the 'semantic' feature, semantic dedupe disabled");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MergePolicy;

    fn small(size: usize, overlap: usize) -> DocumentChunker {
        DocumentChunker::new(ChunkerConfig::default().with_chunk_size(size).with_overlap(overlap))
    }

    #[test]
    fn test_empty_input() {
        let chunker = DocumentChunker::default();
        assert!(chunker.chunk_document("").is_empty());
        assert!(chunker.chunk_document(" \n\t ").is_empty());
    }

    #[test]
    fn test_spans_point_into_normalized_text() {
        let chunker = small(5, 0);
        let raw = "Alpha beta gamma.\r\nDelta epsilon zeta. Eta theta.";
        let normalized = chunker.normalize(raw);
        for chunk in chunker.chunk_document(raw) {
            let slice = &normalized[chunk.span()];
            assert_eq!(
                slice.split_whitespace().collect::<Vec<_>>(),
                chunk.text.split_whitespace().collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn test_indices_are_sequential() {
        let chunker = small(4, 1);
        let chunks = chunker.chunk_document("One two. Three four. Five six. Seven eight. Nine ten.");
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
    }

    #[test]
    fn test_strip_leading_bullets() {
        let config = ChunkerConfig::default()
            .with_strip_leading_bullets(true)
            .with_merge_policy(MergePolicy::Disabled);
        let chunker = DocumentChunker::new(config);
        let raw = "• First point here.";
        let chunks = chunker.chunk_document(raw);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "First point here.");

        let normalized = chunker.normalize(raw);
        assert_eq!(&normalized[chunks[0].span()], "First point here.");
    }

    #[test]
    fn test_custom_splitter_and_counter() {
        let chunker = small(3, 0)
            .with_splitter(Arc::new(WordRuns::new(1)))
            .with_token_counter(Arc::new(|s: &str| s.chars().count()));
        let chunks = chunker.chunk_strings("ab cd ef");
        assert_eq!(chunks, vec!["ab", "cd", "ef"]);
    }

    #[test]
    fn test_try_new_rejects_zero_size() {
        let config = ChunkerConfig::default().with_chunk_size(0).with_overlap(0);
        assert!(DocumentChunker::try_new(config.clone()).is_err());
        assert_eq!(DocumentChunker::new(config).packer.budget().size(), 1);
    }

    #[test]
    fn test_disabled_backend_has_no_scorer() {
        let config = ChunkerConfig::default()
            .with_semantic_dedupe(true)
            .with_similarity_backend(SimilarityBackend::Disabled);
        let chunker = DocumentChunker::new(config);
        assert!(chunker.scorer.is_none());
        let text = "Alpha beta gamma delta.";
        assert_eq!(chunker.chunk_strings(text), vec![text]);
    }

    #[test]
    fn test_estimate_chunks_positive() {
        let chunker = DocumentChunker::default();
        assert_eq!(chunker.estimate_chunks(0), 1);
        assert!(chunker.estimate_chunks(100_000) > 1);
    }
}
