use crate::catalog::Catalog;
use crate::criteria::Criteria;
use crate::index::SimilarityIndex;
use crate::record::DrugRecord;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Nearest-neighbor candidates pulled from the index before filtering.
///
/// Smaller than a full corpus scan, large enough that post-hoc filters
/// rarely starve the result.
pub const CANDIDATE_POOL: usize = 50;

/// One ranked recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub score: f32,
}

/// Read-only recommendation engine over a frozen catalog + index pair.
///
/// Every query is a pure read; an engine behind an `Arc` can serve any
/// number of threads concurrently. Swapping in a fresh dataset means
/// building a new `Recommender` and replacing the reference, never
/// mutating a live one.
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    index: Arc<SimilarityIndex>,
}

impl Recommender {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, index: Arc<SimilarityIndex>) -> Self {
        Self { catalog, index }
    }

    /// Build the similarity index and wrap both into an engine.
    #[must_use]
    pub fn build(catalog: Catalog) -> Self {
        let index = SimilarityIndex::build(&catalog);
        Self::new(Arc::new(catalog), Arc::new(index))
    }

    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[inline]
    #[must_use]
    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }

    /// Rank alternatives for a drug, best first.
    ///
    /// Takes the top [`CANDIDATE_POOL`] neighbors, applies the criteria's
    /// filters and returns the first `result_count` survivors. If the
    /// filters eliminate every candidate the filters are discarded and the
    /// unfiltered top `result_count` come back instead, so a known drug
    /// never yields an empty result. The fallback is only entered on an
    /// empty result, never to pad a short one.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCriteria`] for unsupported filter configurations,
    /// [`Error::DrugNotFound`] when the query drug is not in the catalog.
    pub fn recommend(&self, name: &str, criteria: &Criteria) -> Result<Vec<Recommendation>> {
        criteria.validate()?;

        let query_idx = self
            .catalog
            .index_of(name)
            .ok_or_else(|| Error::DrugNotFound(name.trim().to_string()))?;

        // Under DuplicatePolicy::FirstWins a duplicate row of the query
        // drug sits in the index under the same name with similarity 1.0;
        // drop every same-name candidate, not just the query's own row.
        let query_name = &self.catalog.records()[query_idx].name;
        let pool: Vec<(usize, f32)> = self
            .index
            .neighbors(query_idx, CANDIDATE_POOL)
            .into_iter()
            .filter(|&(idx, _)| self.catalog.records()[idx].name != *query_name)
            .collect();
        debug!(drug = %query_name, pool = pool.len(), "ranking candidates");

        let mut picked: Vec<&(usize, f32)> = pool
            .iter()
            .filter(|(idx, _)| criteria.matches(&self.catalog.records()[*idx]))
            .take(criteria.result_count)
            .collect();

        if picked.is_empty() {
            debug!("filters eliminated every candidate, returning unfiltered fallback");
            picked = pool.iter().take(criteria.result_count).collect();
        }

        Ok(picked
            .into_iter()
            .map(|&(idx, score)| Recommendation {
                name: self.catalog.records()[idx].name.clone(),
                score,
            })
            .collect())
    }

    /// Full attribute record for a drug, `None` when unknown.
    #[must_use]
    pub fn details(&self, name: &str) -> Option<&DrugRecord> {
        self.catalog.find_exact(name)
    }

    /// Known-price range of the catalog, for callers building filter UIs.
    #[must_use]
    pub fn price_range(&self) -> (f64, f64) {
        self.catalog.price_range()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Recommender {
        let catalog = Catalog::from_records(vec![
            DrugRecord::new("a")
                .with_uses("pain relief")
                .with_side_effects("nausea")
                .with_price(100.0),
            DrugRecord::new("b")
                .with_uses("pain relief fever")
                .with_side_effects("dizziness")
                .with_price(150.0),
            DrugRecord::new("c")
                .with_uses("allergy")
                .with_side_effects("drowsiness")
                .with_price(50.0),
        ])
        .unwrap();
        Recommender::build(catalog)
    }

    #[test]
    fn test_ranks_textual_overlap_first() {
        let engine = engine();
        let results = engine.recommend("a", &Criteria::default()).unwrap();
        assert_eq!(results[0].name, "b");
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_query_drug_never_recommended() {
        let engine = engine();
        for drug in ["a", "b", "c"] {
            let results = engine.recommend(drug, &Criteria::default()).unwrap();
            assert!(results.iter().all(|r| r.name != drug));
        }
    }

    #[test]
    fn test_recommend_is_idempotent() {
        let engine = engine();
        let criteria = Criteria::default().with_price_range(0.0, 500.0);
        let first = engine.recommend("a", &criteria).unwrap();
        let second = engine.recommend("a", &criteria).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_drug_is_typed_error() {
        let engine = engine();
        let err = engine.recommend("warfarin", &Criteria::default()).unwrap_err();
        assert!(matches!(err, Error::DrugNotFound(n) if n == "warfarin"));
    }

    #[test]
    fn test_name_normalized_before_lookup() {
        let engine = engine();
        let results = engine.recommend("  A ", &Criteria::default()).unwrap();
        assert_eq!(results[0].name, "b");
    }

    #[test]
    fn test_price_filter_keeps_matches() {
        let engine = engine();
        // Only c (50) fits; b (150) is filtered but survivors are non-empty,
        // so no fallback.
        let criteria = Criteria::default().with_price_range(0.0, 120.0);
        let results = engine.recommend("b", &criteria).unwrap();
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_price_filter_starvation_triggers_fallback() {
        let engine = engine();
        // No candidate for "a" fits (b=150, c=50 -> range 200..300 empty):
        // the unfiltered top list comes back instead of nothing.
        let criteria = Criteria::default().with_price_range(200.0, 300.0);
        let results = engine.recommend("a", &criteria).unwrap();
        let unfiltered = engine.recommend("a", &Criteria::default()).unwrap();
        assert_eq!(results, unfiltered);
        assert!(!results.is_empty());
    }

    #[test]
    fn test_fallback_not_used_to_pad_short_results() {
        let engine = engine();
        // Excluding "dizziness" drops b but keeps c: exactly one survivor,
        // not topped up from the unfiltered pool.
        let criteria = Criteria::default()
            .with_excluded_effect("dizziness")
            .with_result_count(3);
        let results = engine.recommend("a", &criteria).unwrap();
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["c"]);
    }

    #[test]
    fn test_excluding_all_effects_triggers_fallback() {
        let engine = engine();
        let criteria = Criteria::default()
            .with_excluded_effect("dizziness")
            .with_excluded_effect("drowsiness");
        let results = engine.recommend("a", &criteria).unwrap();
        let unfiltered = engine.recommend("a", &Criteria::default()).unwrap();
        assert_eq!(results, unfiltered);
    }

    #[test]
    fn test_unknown_priced_drug_not_recommendable_under_price_filter() {
        let catalog = Catalog::from_records(vec![
            DrugRecord::new("q").with_uses("pain").with_price(10.0),
            DrugRecord::new("known").with_uses("pain").with_price(20.0),
            DrugRecord::new("mystery").with_uses("pain"),
        ])
        .unwrap();
        let engine = Recommender::build(catalog);

        let criteria = Criteria::default().with_price_range(0.0, 100.0);
        let results = engine.recommend("q", &criteria).unwrap();
        assert!(results.iter().all(|r| r.name != "mystery"));
    }

    #[test]
    fn test_result_count_caps_output() {
        let engine = engine();
        let criteria = Criteria::default().with_result_count(1);
        let results = engine.recommend("a", &criteria).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_invalid_criteria_rejected() {
        let engine = engine();
        let criteria = Criteria::default().with_price_range(300.0, 200.0);
        assert!(matches!(
            engine.recommend("a", &criteria),
            Err(Error::InvalidCriteria(_))
        ));
    }

    #[test]
    fn test_duplicate_rows_never_surface_query_drug() {
        use crate::catalog::{CatalogConfig, DuplicatePolicy};

        // Two "aspirin" rows with identical profiles: the duplicate scores
        // 1.0 against the query and must still never be recommended.
        let csv = "\
name,Therapeutic Class,Chemical Class,Action Class,uses_features,side_effect_features,Price
Aspirin,analgesic,salicylate,NSAID,pain relief fever,nausea,100
Aspirin,analgesic,salicylate,NSAID,pain relief fever,nausea,110
Ibuprofen,analgesic,propionic acid,NSAID,pain relief fever,dizziness,150
Cetirizine,antihistamine,,,allergy rhinitis,drowsiness,50
";
        let config = CatalogConfig {
            duplicates: DuplicatePolicy::FirstWins,
            ..CatalogConfig::default()
        };
        let catalog = Catalog::load(csv.as_bytes(), &config).unwrap();
        let engine = Recommender::build(catalog);

        let results = engine.recommend("aspirin", &Criteria::default()).unwrap();
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.name != "aspirin"));
        assert_eq!(results[0].name, "ibuprofen");

        // The fallback path must not resurface the duplicate either.
        let starved = Criteria::default().with_price_range(10_000.0, 20_000.0);
        let fallback = engine.recommend("aspirin", &starved).unwrap();
        assert!(fallback.iter().all(|r| r.name != "aspirin"));
    }

    #[test]
    fn test_details_delegates_to_catalog() {
        let engine = engine();
        assert_eq!(engine.details(" A ").unwrap().price, 100.0);
        assert!(engine.details("warfarin").is_none());
    }

    #[test]
    fn test_price_range_delegates_to_catalog() {
        let engine = engine();
        assert_eq!(engine.price_range(), (50.0, 150.0));
    }
}
