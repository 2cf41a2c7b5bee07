use crate::catalog::Catalog;
use crate::vectorize::{TermVector, TfidfVectorizer};
use rayon::prelude::*;
use tracing::info;

/// Pairwise cosine similarity over the catalog's drug profiles.
///
/// Row `i` corresponds to catalog record `i`; the catalog order is frozen
/// after load, so the correspondence holds for the life of the index.
/// Built once at startup, read-only afterwards - sharing it across threads
/// needs no locking.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    matrix: Vec<f32>,
    n: usize,
}

impl SimilarityIndex {
    /// Build the index from a catalog.
    ///
    /// Vectorizes `uses_features + " " + side_effect_features` per record
    /// with unigram+bigram TF-IDF, then fills the dense symmetric cosine
    /// matrix, rows in parallel. Deterministic for a fixed catalog order.
    #[must_use]
    pub fn build(catalog: &Catalog) -> Self {
        let documents: Vec<String> = catalog
            .records()
            .iter()
            .map(|record| record.profile_text())
            .collect();

        let vectorizer = TfidfVectorizer::fit(&documents);
        let vectors: Vec<TermVector> = documents
            .iter()
            .map(|doc| vectorizer.transform(doc))
            .collect();

        let n = vectors.len();
        let matrix: Vec<f32> = (0..n)
            .into_par_iter()
            .flat_map_iter(|i| {
                let vectors = &vectors;
                (0..n).map(move |j| {
                    if i == j {
                        1.0
                    } else {
                        vectors[i].dot(&vectors[j]).clamp(0.0, 1.0)
                    }
                })
            })
            .collect();

        info!(
            drugs = n,
            vocabulary = vectorizer.vocabulary_size(),
            "similarity index built"
        );
        Self { matrix, n }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Cosine similarity between two catalog positions, in `[0, 1]`.
    ///
    /// Symmetric; `similarity(i, i) == 1.0`. The index deals purely in
    /// positions: name resolution and the unknown-drug error live at the
    /// [`Recommender`](crate::engine::Recommender) boundary, so an
    /// out-of-range position answers `0.0` rather than failing.
    #[must_use]
    pub fn similarity(&self, a: usize, b: usize) -> f32 {
        if a >= self.n || b >= self.n {
            return 0.0;
        }
        self.matrix[a * self.n + b]
    }

    /// Nearest neighbors of a catalog position, best first.
    ///
    /// The query row itself is excluded. Ordering is descending score with
    /// ties broken by ascending catalog index, so repeated calls return
    /// identical sequences. An out-of-range position yields an empty list;
    /// as with [`similarity`](Self::similarity), turning a missing drug
    /// into an error is the engine's job.
    #[must_use]
    pub fn neighbors(&self, idx: usize, limit: usize) -> Vec<(usize, f32)> {
        if idx >= self.n {
            return Vec::new();
        }

        let row = &self.matrix[idx * self.n..(idx + 1) * self.n];
        let mut candidates: Vec<(usize, f32)> = row
            .iter()
            .copied()
            .enumerate()
            .filter(|&(j, _)| j != idx)
            .collect();

        candidates.sort_unstable_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        candidates.truncate(limit);
        candidates
    }
}
