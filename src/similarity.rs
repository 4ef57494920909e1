//! Pairwise text similarity for near-duplicate detection.
//!
//! Two built-in scorers, both pure Rust:
//!
//! - [`TfIdfCosine`]: vector-space similarity. Each pair is vectorised with
//!   term frequencies weighted by a smoothed inverse document frequency
//!   fitted on the pair itself, L2-normalised, then compared by cosine.
//!   Terms shared by both texts are down-weighted, so two chunks that share
//!   only boilerplate words score low.
//! - [`Jaccard`]: token-set overlap, `|A ∩ B| / |A ∪ B|` over lower-cased
//!   whitespace tokens. Cheaper and blunter.
//!
//! The `semantic` feature adds an embedding-model scorer.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

/// Words of two or more word characters.
static TERM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid term regex"));

/// Scores how similar two texts are.
///
/// Scores lie in `0.0..=1.0`; identical texts score 1.0 (unless they carry
/// no scorable terms), disjoint texts 0.0. Implementations must be safe to
/// share read-only across threads.
pub trait SimilarityScorer: Send + Sync {
    /// Similarity between `a` and `b`.
    fn similarity(&self, a: &str, b: &str) -> f32;
}

/// Pairwise TF-IDF cosine similarity.
///
/// ```rust
/// use quire::{SimilarityScorer, TfIdfCosine};
///
/// let a = "binary trees store keys in sorted order";
/// let b = "binary trees store keys in sorted order too";
/// let c = "the weather is warm and sunny";
///
/// assert!(TfIdfCosine.similarity(a, b) > 0.8);
/// assert!(TfIdfCosine.similarity(a, c) < 0.1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdfCosine;

impl TfIdfCosine {
    fn term_counts(text: &str) -> HashMap<String, f32> {
        let lower = text.to_lowercase();
        let mut counts = HashMap::new();
        for m in TERM.find_iter(&lower) {
            *counts.entry(m.as_str().to_string()).or_insert(0.0) += 1.0;
        }
        counts
    }

    /// Weight raw counts by `ln((1 + n) / (1 + df)) + 1` with `n = 2`, then
    /// L2-normalise.
    fn weigh(counts: &HashMap<String, f32>, other: &HashMap<String, f32>) -> HashMap<String, f32> {
        let shared_idf = (3.0f32 / 3.0).ln() + 1.0;
        let single_idf = (3.0f32 / 2.0).ln() + 1.0;

        let mut weights: HashMap<String, f32> = counts
            .iter()
            .map(|(term, &tf)| {
                let idf = if other.contains_key(term) { shared_idf } else { single_idf };
                (term.clone(), tf * idf)
            })
            .collect();

        let norm = weights.values().map(|w| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for w in weights.values_mut() {
                *w /= norm;
            }
        }
        weights
    }
}

impl SimilarityScorer for TfIdfCosine {
    fn similarity(&self, a: &str, b: &str) -> f32 {
        let counts_a = Self::term_counts(a);
        let counts_b = Self::term_counts(b);
        if counts_a.is_empty() || counts_b.is_empty() {
            return 0.0;
        }

        let va = Self::weigh(&counts_a, &counts_b);
        let vb = Self::weigh(&counts_b, &counts_a);

        let dot: f32 = va
            .iter()
            .filter_map(|(term, wa)| vb.get(term).map(|wb| wa * wb))
            .sum();
        dot.clamp(0.0, 1.0)
    }
}

/// Jaccard index over lower-cased whitespace token sets.
///
/// ```rust
/// use quire::{Jaccard, SimilarityScorer};
///
/// assert_eq!(Jaccard.similarity("a b c", "A B C"), 1.0);
/// assert_eq!(Jaccard.similarity("a b", "b c"), 1.0 / 3.0);
/// assert_eq!(Jaccard.similarity("", "a"), 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Jaccard;

impl SimilarityScorer for Jaccard {
    fn similarity(&self, a: &str, b: &str) -> f32 {
        let a_set: HashSet<String> = a.split_whitespace().map(str::to_lowercase).collect();
        let b_set: HashSet<String> = b.split_whitespace().map(str::to_lowercase).collect();
        if a_set.is_empty() || b_set.is_empty() {
            return 0.0;
        }

        let inter = a_set.intersection(&b_set).count();
        let union = a_set.union(&b_set).count();
        inter as f32 / union as f32
    }
}

impl<F> SimilarityScorer for F
where
    F: Fn(&str, &str) -> f32 + Send + Sync,
{
    fn similarity(&self, a: &str, b: &str) -> f32 {
        self(a, b)
    }
}
