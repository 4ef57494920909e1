//! Duplicate chunk removal.
//!
//! Extracted documents repeat themselves: boilerplate disclaimers, figure
//! captions echoed in the text, a table of contents that restates every
//! heading. Duplicate chunks waste embedding calls and crowd retrieval
//! results with the same passage.
//!
//! Both passes only ever remove chunks. The first occurrence is kept, with
//! its original text, and order is preserved.

use std::collections::HashSet;

use tracing::debug;

use crate::{Fingerprint, SimilarityScorer};

/// Drop chunks whose [`Fingerprint`] was already seen.
///
/// ```rust
/// use quire::dedupe_exact;
///
/// let chunks = vec!["Trees are data structures.", "trees  are data structures.", "Graphs too."];
/// assert_eq!(dedupe_exact(chunks), vec!["Trees are data structures.", "Graphs too."]);
/// ```
pub fn dedupe_exact<T: AsRef<str>>(chunks: Vec<T>) -> Vec<T> {
    let before = chunks.len();
    let mut seen = HashSet::with_capacity(before);
    let kept: Vec<T> = chunks
        .into_iter()
        .filter(|chunk| seen.insert(Fingerprint::of(chunk.as_ref())))
        .collect();

    debug!(before, after = kept.len(), "exact dedupe");
    kept
}

/// Drop chunks too similar to an already-kept chunk.
///
/// A candidate is rejected when its similarity to any accepted chunk is at
/// least `threshold`. Comparisons are pairwise against the accepted list, so
/// cost grows quadratically with the number of chunks; fine for the tens to
/// hundreds of chunks a single document produces.
///
/// With no scorer, or a threshold that is not a finite number, the input is
/// returned unchanged.
///
/// ```rust
/// use quire::{dedupe_semantic, Jaccard};
///
/// let chunks = vec!["red green blue", "red green blue yellow", "cats and dogs"];
/// let kept = dedupe_semantic(chunks, Some(&Jaccard), 0.7);
/// assert_eq!(kept, vec!["red green blue", "cats and dogs"]);
/// ```
pub fn dedupe_semantic<T: AsRef<str>>(
    chunks: Vec<T>,
    scorer: Option<&dyn SimilarityScorer>,
    threshold: f32,
) -> Vec<T> {
    let Some(scorer) = scorer else {
        debug!("no similarity backend, skipping semantic dedupe");
        return chunks;
    };
    if !threshold.is_finite() {
        debug!(threshold, "non-finite similarity threshold, skipping semantic dedupe");
        return chunks;
    }

    let before = chunks.len();
    let mut accepted: Vec<T> = Vec::with_capacity(before);
    for candidate in chunks {
        let duplicate = accepted
            .iter()
            .any(|kept| scorer.similarity(candidate.as_ref(), kept.as_ref()) >= threshold);
        if !duplicate {
            accepted.push(candidate);
        }
    }

    debug!(before, after = accepted.len(), threshold, "semantic dedupe");
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Jaccard, TfIdfCosine};

    #[test]
    fn test_exact_keeps_first_original_text() {
        let chunks = vec!["Trees are data structures.", "trees  are data structures."];
        assert_eq!(dedupe_exact(chunks), vec!["Trees are data structures."]);
    }

    #[test]
    fn test_exact_preserves_order() {
        let chunks = vec!["b", "a", "B", "c", "A"];
        assert_eq!(dedupe_exact(chunks), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_exact_idempotent() {
        let chunks = vec!["x y", "X  Y", "z", "x y", "w"];
        let once = dedupe_exact(chunks);
        let twice = dedupe_exact(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_exact_owned_strings() {
        let chunks = vec![String::from("One"), String::from("one"), String::from("Two")];
        assert_eq!(dedupe_exact(chunks), vec!["One".to_string(), "Two".to_string()]);
    }

    #[test]
    fn test_semantic_without_scorer_is_noop() {
        let chunks = vec!["same", "same"];
        assert_eq!(dedupe_semantic(chunks.clone(), None, 0.5), chunks);
    }

    #[test]
    fn test_semantic_nan_threshold_is_noop() {
        let chunks = vec!["same words", "same words"];
        assert_eq!(dedupe_semantic(chunks.clone(), Some(&Jaccard), f32::NAN), chunks);
    }

    #[test]
    fn test_semantic_threshold_inclusive() {
        let chunks = vec!["a b", "b c"];
        let third = 1.0 / 3.0;
        assert_eq!(dedupe_semantic(chunks.clone(), Some(&Jaccard), third).len(), 1);
        assert_eq!(dedupe_semantic(chunks, Some(&Jaccard), third + 0.01).len(), 2);
    }

    #[test]
    fn test_semantic_tfidf_near_duplicates() {
        let chunks = vec![
            "Binary search trees keep keys in sorted order for fast lookup.",
            "binary search trees keep keys in sorted order for fast lookup today",
            "Hash tables trade ordering for constant time access.",
        ];
        let kept = dedupe_semantic(chunks, Some(&TfIdfCosine), 0.85);
        assert_eq!(kept.len(), 2);
        assert!(kept[1].starts_with("Hash tables"));
    }
}
