// TF-IDF term weighting over indication/side-effect text
use ahash::{AHashMap, AHashSet};

/// Common English words removed before weighting.
///
/// Indication text in the source datasets is prose ("used in the treatment
/// of..."), so corpus-wide filler would otherwise dominate the vocabulary.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "can",
    "do", "for", "from", "had", "has", "have", "in", "into", "is", "it",
    "its", "may", "more", "most", "not", "of", "on", "or", "other", "some",
    "such", "than", "that", "the", "their", "then", "there", "these",
    "this", "to", "was", "were", "which", "while", "who", "will", "with",
    "your",
];

/// Tokenize text for weighting.
///
/// Lowercase, split on whitespace/punctuation, drop single-char fragments.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .map(|s| s.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|s| !s.is_empty() && s.len() > 1)
        .collect()
}

/// Sparse L2-normalized term vector.
///
/// Term ids are ascending, so the dot product is a single merge pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    terms: Vec<(u32, f32)>,
}

impl TermVector {
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Dot product of two sorted sparse vectors.
    ///
    /// Both sides are unit-length, so this is also their cosine similarity.
    #[must_use]
    pub fn dot(&self, other: &TermVector) -> f32 {
        let mut sum = 0.0f32;
        let (mut i, mut j) = (0, 0);
        while i < self.terms.len() && j < other.terms.len() {
            let (term_a, weight_a) = self.terms[i];
            let (term_b, weight_b) = other.terms[j];
            match term_a.cmp(&term_b) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += weight_a * weight_b;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Unigram+bigram TF-IDF vectorizer with English stop-word removal.
///
/// `fit` learns the vocabulary and document frequencies from the corpus;
/// `transform` turns a document into an L2-normalized [`TermVector`].
/// Term ids are assigned in first-seen corpus order, so a fixed input
/// order yields an identical vectorizer every time.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: AHashMap<String, u32>,
    idf: Vec<f32>,
    stop_words: AHashSet<&'static str>,
}

impl TfidfVectorizer {
    /// Learn vocabulary and IDF weights from a corpus.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let stop_words: AHashSet<&'static str> = STOP_WORDS.iter().copied().collect();

        let mut vocabulary: AHashMap<String, u32> = AHashMap::new();
        let mut doc_freq: Vec<u32> = Vec::new();

        for doc in documents {
            let mut seen: AHashSet<u32> = AHashSet::new();
            for term in Self::terms(doc.as_ref(), &stop_words) {
                let next_id = vocabulary.len() as u32;
                let id = *vocabulary.entry(term).or_insert(next_id);
                if id as usize == doc_freq.len() {
                    doc_freq.push(0);
                }
                seen.insert(id);
            }
            for id in seen {
                doc_freq[id as usize] += 1;
            }
        }

        // Smoothed IDF: ln((1 + n) / (1 + df)) + 1. Downweights terms
        // common across the corpus without ever zeroing them out.
        let n_docs = documents.len() as f32;
        let idf = doc_freq
            .iter()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f32)).ln() + 1.0)
            .collect();

        Self {
            vocabulary,
            idf,
            stop_words,
        }
    }

    #[inline]
    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Transform a document into an L2-normalized sparse vector.
    ///
    /// Terms outside the fitted vocabulary are ignored; a document with
    /// no known terms yields the empty vector.
    #[must_use]
    pub fn transform(&self, document: &str) -> TermVector {
        let mut counts: AHashMap<u32, f32> = AHashMap::new();
        for term in Self::terms(document, &self.stop_words) {
            if let Some(&id) = self.vocabulary.get(&term) {
                *counts.entry(id).or_insert(0.0) += 1.0;
            }
        }

        let mut terms: Vec<(u32, f32)> = counts
            .into_iter()
            .map(|(id, tf)| (id, tf * self.idf[id as usize]))
            .collect();
        terms.sort_unstable_by_key(|&(id, _)| id);

        let norm = terms
            .iter()
            .map(|&(_, w)| w * w)
            .sum::<f32>()
            .sqrt();
        if norm > f32::EPSILON {
            for (_, weight) in &mut terms {
                *weight /= norm;
            }
        }

        TermVector { terms }
    }

    /// Stop-filtered unigrams plus bigrams of adjacent surviving tokens.
    fn terms(text: &str, stop_words: &AHashSet<&'static str>) -> Vec<String> {
        let tokens: Vec<String> = tokenize(text)
            .into_iter()
            .filter(|t| !stop_words.contains(t.as_str()))
            .collect();

        let mut terms = Vec::with_capacity(tokens.len().saturating_mul(2));
        for window in tokens.windows(2) {
            terms.push(format!("{} {}", window[0], window[1]));
        }
        terms.extend(tokens);
        terms
    }
}
