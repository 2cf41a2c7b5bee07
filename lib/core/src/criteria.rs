use crate::record::DrugRecord;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default number of recommendations returned.
pub const DEFAULT_RESULT_COUNT: usize = 3;

/// Post-hoc filters applied to the similarity candidate pool.
///
/// Filters never affect ranking, only membership: candidates keep their
/// similarity-descending order and failing ones drop out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    /// Inclusive `(min, max)` price bounds. Drugs with an unknown price
    /// never pass an active price filter.
    pub price_range: Option<(f64, f64)>,
    /// Case-insensitive substring terms; a candidate whose side-effect
    /// text contains any of them is dropped.
    pub excluded_effects: Vec<String>,
    /// How many recommendations to return.
    pub result_count: usize,
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            price_range: None,
            excluded_effects: Vec::new(),
            result_count: DEFAULT_RESULT_COUNT,
        }
    }
}

impl Criteria {
    #[inline]
    #[must_use]
    pub fn with_price_range(mut self, min: f64, max: f64) -> Self {
        self.price_range = Some((min, max));
        self
    }

    #[inline]
    #[must_use]
    pub fn with_excluded_effect(mut self, effect: impl Into<String>) -> Self {
        self.excluded_effects.push(effect.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_result_count(mut self, count: usize) -> Self {
        self.result_count = count;
        self
    }

    #[inline]
    #[must_use]
    pub fn has_filters(&self) -> bool {
        self.price_range.is_some() || !self.excluded_effects.is_empty()
    }

    /// Reject unsupported filter configurations up front.
    pub fn validate(&self) -> Result<()> {
        if let Some((min, max)) = self.price_range {
            if min > max {
                return Err(Error::InvalidCriteria(format!(
                    "price range min {min} exceeds max {max}"
                )));
            }
            if min.is_nan() || max.is_nan() {
                return Err(Error::InvalidCriteria(
                    "price range bounds must be numbers".to_string(),
                ));
            }
        }
        if self.excluded_effects.iter().any(|e| e.trim().is_empty()) {
            return Err(Error::InvalidCriteria(
                "excluded side effect must not be blank".to_string(),
            ));
        }
        if self.result_count == 0 {
            return Err(Error::InvalidCriteria(
                "result count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a candidate survives every active filter.
    #[must_use]
    pub fn matches(&self, record: &DrugRecord) -> bool {
        if let Some((min, max)) = self.price_range {
            if !record.has_price() || record.price < min || record.price > max {
                return false;
            }
        }

        if !self.excluded_effects.is_empty() {
            let effects = record.side_effect_features.to_lowercase();
            for excluded in &self.excluded_effects {
                if effects.contains(&excluded.trim().to_lowercase()) {
                    return false;
                }
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_result_count() {
        assert_eq!(Criteria::default().result_count, DEFAULT_RESULT_COUNT);
        assert!(!Criteria::default().has_filters());
    }

    #[test]
    fn test_price_filter_excludes_unknown_price() {
        let criteria = Criteria::default().with_price_range(0.0, 500.0);
        let unknown = DrugRecord::new("a");
        let known = DrugRecord::new("b").with_price(100.0);
        assert!(!criteria.matches(&unknown));
        assert!(criteria.matches(&known));
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let criteria = Criteria::default().with_price_range(100.0, 150.0);
        assert!(criteria.matches(&DrugRecord::new("a").with_price(100.0)));
        assert!(criteria.matches(&DrugRecord::new("b").with_price(150.0)));
        assert!(!criteria.matches(&DrugRecord::new("c").with_price(150.01)));
    }

    #[test]
    fn test_excluded_effect_substring_case_insensitive() {
        let criteria = Criteria::default().with_excluded_effect("Nausea");
        let record = DrugRecord::new("a").with_side_effects("NAUSEA vomiting");
        assert!(!criteria.matches(&record));

        let clean = DrugRecord::new("b").with_side_effects("dizziness");
        assert!(criteria.matches(&clean));
    }

    #[test]
    fn test_any_excluded_term_drops_candidate() {
        let criteria = Criteria::default()
            .with_excluded_effect("rash")
            .with_excluded_effect("nausea");
        let record = DrugRecord::new("a").with_side_effects("mild nausea");
        assert!(!criteria.matches(&record));
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let criteria = Criteria::default().with_price_range(200.0, 100.0);
        assert!(matches!(
            criteria.validate(),
            Err(Error::InvalidCriteria(_))
        ));
    }

    #[test]
    fn test_validate_rejects_blank_effect_and_zero_count() {
        let blank = Criteria::default().with_excluded_effect("  ");
        assert!(matches!(blank.validate(), Err(Error::InvalidCriteria(_))));

        let zero = Criteria::default().with_result_count(0);
        assert!(matches!(zero.validate(), Err(Error::InvalidCriteria(_))));
    }

    #[test]
    fn test_validate_accepts_default() {
        assert!(Criteria::default().validate().is_ok());
    }
}
