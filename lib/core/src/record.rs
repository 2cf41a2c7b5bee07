use serde::{Deserialize, Serialize};

/// Sentinel price meaning "price unknown".
///
/// A record carrying this value is valid; it is simply excluded from
/// price-range statistics and never survives an active price filter.
pub const PRICE_UNKNOWN: f64 = -1.0;

/// A single drug with its classification, free-text profile and price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugRecord {
    /// Normalized (lowercased, trimmed) drug name - the primary lookup key.
    pub name: String,
    pub therapeutic_class: Option<String>,
    pub chemical_class: Option<String>,
    pub action_class: Option<String>,
    /// Free-text indication profile, empty string if absent.
    pub uses_features: String,
    /// Free-text side-effect profile, empty string if absent.
    pub side_effect_features: String,
    /// Price, or [`PRICE_UNKNOWN`].
    pub price: f64,
}

impl DrugRecord {
    #[inline]
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: normalize_name(name.as_ref()),
            therapeutic_class: None,
            chemical_class: None,
            action_class: None,
            uses_features: String::new(),
            side_effect_features: String::new(),
            price: PRICE_UNKNOWN,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_therapeutic_class(mut self, class: impl Into<String>) -> Self {
        self.therapeutic_class = Some(class.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_chemical_class(mut self, class: impl Into<String>) -> Self {
        self.chemical_class = Some(class.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_action_class(mut self, class: impl Into<String>) -> Self {
        self.action_class = Some(class.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_uses(mut self, text: impl Into<String>) -> Self {
        self.uses_features = text.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_side_effects(mut self, text: impl Into<String>) -> Self {
        self.side_effect_features = text.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Whether this record carries a known price.
    #[inline]
    #[must_use]
    pub fn has_price(&self) -> bool {
        self.price != PRICE_UNKNOWN
    }

    /// Combined indication + side-effect text the similarity index is built from.
    #[must_use]
    pub fn profile_text(&self) -> String {
        let mut text = String::with_capacity(
            self.uses_features.len() + self.side_effect_features.len() + 1,
        );
        text.push_str(&self.uses_features);
        text.push(' ');
        text.push_str(&self.side_effect_features);
        text
    }
}

/// Normalize a drug name for lookups: trimmed, lowercased.
///
/// Every lookup surface in the crate goes through this, so a catalog
/// loaded once answers queries regardless of the caller's casing.
#[inline]
#[must_use]
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Aspirin "), "aspirin");
        assert_eq!(normalize_name("IBUPROFEN"), "ibuprofen");
        assert_eq!(normalize_name("paracetamol"), "paracetamol");
    }

    #[test]
    fn test_builder_normalizes_name() {
        let record = DrugRecord::new(" Aspirin ").with_price(12.5);
        assert_eq!(record.name, "aspirin");
        assert!(record.has_price());
    }

    #[test]
    fn test_unknown_price_sentinel() {
        let record = DrugRecord::new("aspirin");
        assert_eq!(record.price, PRICE_UNKNOWN);
        assert!(!record.has_price());
    }

    #[test]
    fn test_profile_text_joins_both_fields() {
        let record = DrugRecord::new("a")
            .with_uses("pain relief")
            .with_side_effects("nausea");
        assert_eq!(record.profile_text(), "pain relief nausea");
    }
}
