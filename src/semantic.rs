//! Embedding-based similarity (requires the `semantic` feature).
//!
//! TF-IDF only sees shared words. Two chunks that say the same thing in
//! different words ("the contract was terminated" / "the agreement ended")
//! score near zero. Sentence embeddings place paraphrases close together:
//!
//! ```text
//! embed("the contract was terminated")  ─┐
//!                                        ├─ cosine ≈ 0.8
//! embed("the agreement ended")          ─┘
//! ```
//!
//! ## Cost
//!
//! Each comparison embeds both texts in one batch. With n chunks and the
//! accepted list growing to k, dedupe makes O(n × k) embedding calls, so the
//! embedding scorer is for documents producing tens of chunks, not thousands.
//!
//! ## Model Lifetime
//!
//! Loading the model reads and initialises an ONNX graph, which is far more
//! expensive than any single comparison. [`EmbeddingScorer::shared`] loads it
//! once per process and hands out the same read-only instance afterwards.

use std::sync::{Arc, OnceLock};

use crate::{Error, Result, SimilarityScorer};

static SHARED: OnceLock<std::result::Result<Arc<EmbeddingScorer>, String>> = OnceLock::new();

/// Sentence-embedding cosine similarity.
///
/// ## Example
///
/// ```rust,ignore
/// use quire::{EmbeddingScorer, SimilarityScorer};
///
/// // Uses fastembed's default model (BGE-small-en)
/// let scorer = EmbeddingScorer::shared()?;
/// let sim = scorer.similarity("the contract was terminated", "the agreement ended");
/// assert!(sim > 0.5);
/// ```
pub struct EmbeddingScorer {
    model: fastembed::TextEmbedding,
}

impl EmbeddingScorer {
    /// Load a new scorer with fastembed's default model.
    ///
    /// Prefer [`EmbeddingScorer::shared`] unless you need a private instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedding model fails to load.
    pub fn new() -> Result<Self> {
        let model = fastembed::TextEmbedding::try_new(Default::default())
            .map_err(|e| Error::Embedding(e.to_string()))?;
        Ok(Self { model })
    }

    /// The process-wide scorer, loaded on first use.
    ///
    /// A load failure is remembered; later calls return the same error
    /// without retrying.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedding model failed to load.
    pub fn shared() -> Result<Arc<Self>> {
        SHARED
            .get_or_init(|| {
                tracing::debug!("loading shared embedding model");
                Self::new().map(Arc::new).map_err(|e| e.to_string())
            })
            .clone()
            .map_err(Error::Embedding)
    }

    /// Compute cosine similarity between two embeddings.
    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        #[cfg(feature = "innr")]
        {
            innr::cosine(a, b)
        }

        #[cfg(not(feature = "innr"))]
        {
            let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
            let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
            let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm_a > 0.0 && norm_b > 0.0 {
                dot / (norm_a * norm_b)
            } else {
                0.0
            }
        }
    }
}

impl SimilarityScorer for EmbeddingScorer {
    fn similarity(&self, a: &str, b: &str) -> f32 {
        if a.trim().is_empty() || b.trim().is_empty() {
            return 0.0;
        }
        match self.model.embed(vec![a, b], None) {
            Ok(embeddings) if embeddings.len() == 2 => {
                Self::cosine_similarity(&embeddings[0], &embeddings[1]).clamp(0.0, 1.0)
            }
            Ok(_) => 0.0,
            Err(e) => {
                // Scoring 0.0 keeps the candidate: a failed comparison must
                // never drop content.
                tracing::warn!(error = %e, "embedding failed, treating pair as distinct");
                0.0
            }
        }
    }
}

impl std::fmt::Debug for EmbeddingScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingScorer").finish_non_exhaustive()
    }
}
