use crate::record::{normalize_name, DrugRecord, PRICE_UNKNOWN};
use crate::{Error, Result};
use ahash::AHashMap;
use csv::StringRecord;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Range reported by [`Catalog::price_range`] when no record has a known price.
pub const DEFAULT_PRICE_RANGE: (f64, f64) = (0.0, 2000.0);

/// Maps logical fields to physical CSV header names.
///
/// Dataset revisions disagree on header spelling, so the loader is told
/// which column carries which field instead of hard-coding the headers.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    pub name: String,
    pub therapeutic_class: String,
    pub chemical_class: String,
    pub action_class: String,
    pub uses: String,
    pub side_effects: String,
    pub price: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            name: "name".to_string(),
            therapeutic_class: "Therapeutic Class".to_string(),
            chemical_class: "Chemical Class".to_string(),
            action_class: "Action Class".to_string(),
            uses: "uses_features".to_string(),
            side_effects: "side_effect_features".to_string(),
            price: "Price".to_string(),
        }
    }
}

/// What to do when two rows normalize to the same drug name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail the load with [`Error::DuplicateName`].
    #[default]
    Reject,
    /// Keep every row; lookups resolve to the first occurrence.
    FirstWins,
}

/// Configuration for [`Catalog::load`].
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub columns: ColumnMap,
    pub duplicates: DuplicatePolicy,
}

/// Immutable, ordered collection of [`DrugRecord`]s.
///
/// Built once from a tabular source and frozen; the similarity index
/// addresses records by their position here, so the order never changes
/// after load. All lookups are case-insensitive via name normalization.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<DrugRecord>,
    by_name: AHashMap<String, usize>,
}

impl Catalog {
    /// Parse CSV from any reader into a catalog.
    ///
    /// Fails fast on a missing column, malformed row or (under
    /// [`DuplicatePolicy::Reject`]) a duplicate name - no partial catalog
    /// is ever produced.
    pub fn load<R: Read>(reader: R, config: &CatalogConfig) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns = ColumnIndices::resolve(&headers, &config.columns)?;

        let mut records = Vec::new();
        for (row_idx, result) in csv_reader.records().enumerate() {
            let row = result?;
            // Header occupies line 1.
            let line = row_idx as u64 + 2;
            records.push(columns.parse_row(&row, line)?);
        }

        let catalog = Self::from_records_with_policy(records, config.duplicates)?;
        info!(drugs = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Load a catalog from a CSV file on disk.
    pub fn load_path(path: impl AsRef<Path>, config: &CatalogConfig) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::load(file, config)
    }

    /// Build a catalog from already-constructed records.
    ///
    /// Names are re-normalized; duplicates are rejected. Intended for
    /// synthetic datasets in tests and for callers that do not speak CSV.
    pub fn from_records(records: Vec<DrugRecord>) -> Result<Self> {
        Self::from_records_with_policy(records, DuplicatePolicy::Reject)
    }

    fn from_records_with_policy(
        mut records: Vec<DrugRecord>,
        policy: DuplicatePolicy,
    ) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::EmptyCatalog);
        }

        let mut by_name = AHashMap::with_capacity(records.len());
        for (idx, record) in records.iter_mut().enumerate() {
            record.name = normalize_name(&record.name);
            match policy {
                DuplicatePolicy::Reject => {
                    if by_name.insert(record.name.clone(), idx).is_some() {
                        return Err(Error::DuplicateName(record.name.clone()));
                    }
                }
                DuplicatePolicy::FirstWins => {
                    by_name.entry(record.name.clone()).or_insert(idx);
                }
            }
        }

        Ok(Self { records, by_name })
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn records(&self) -> &[DrugRecord] {
        &self.records
    }

    #[inline]
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&DrugRecord> {
        self.records.get(idx)
    }

    /// Catalog position of a drug, resolved through name normalization.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(&normalize_name(name)).copied()
    }

    /// Case-insensitive, whitespace-trimmed exact lookup.
    ///
    /// Under [`DuplicatePolicy::FirstWins`] this resolves to the first
    /// occurrence in source order.
    #[must_use]
    pub fn find_exact(&self, name: &str) -> Option<&DrugRecord> {
        self.index_of(name).map(|idx| &self.records[idx])
    }

    /// (min, max) price over records with a known price.
    ///
    /// Returns [`DEFAULT_PRICE_RANGE`] when every price is the unknown
    /// sentinel.
    #[must_use]
    pub fn price_range(&self) -> (f64, f64) {
        let mut range: Option<(f64, f64)> = None;
        for record in &self.records {
            if !record.has_price() {
                continue;
            }
            range = Some(match range {
                Some((lo, hi)) => (lo.min(record.price), hi.max(record.price)),
                None => (record.price, record.price),
            });
        }
        range.unwrap_or(DEFAULT_PRICE_RANGE)
    }
}

/// Resolved physical column positions for one dataset revision.
struct ColumnIndices {
    name: usize,
    therapeutic_class: usize,
    chemical_class: usize,
    action_class: usize,
    uses: usize,
    side_effects: usize,
    price: usize,
}

impl ColumnIndices {
    fn resolve(headers: &StringRecord, columns: &ColumnMap) -> Result<Self> {
        let find = |wanted: &str| -> Result<usize> {
            headers
                .iter()
                .position(|header| header.trim() == wanted)
                .ok_or_else(|| Error::MissingColumn(wanted.to_string()))
        };

        Ok(Self {
            name: find(&columns.name)?,
            therapeutic_class: find(&columns.therapeutic_class)?,
            chemical_class: find(&columns.chemical_class)?,
            action_class: find(&columns.action_class)?,
            uses: find(&columns.uses)?,
            side_effects: find(&columns.side_effects)?,
            price: find(&columns.price)?,
        })
    }

    fn parse_row(&self, row: &StringRecord, line: u64) -> Result<DrugRecord> {
        let field = |idx: usize| row.get(idx).unwrap_or("").trim();

        let name = normalize_name(field(self.name));
        if name.is_empty() {
            return Err(Error::InvalidRow {
                line,
                reason: "empty drug name".to_string(),
            });
        }

        let optional = |idx: usize| {
            let value = field(idx);
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        };

        // An empty price cell means "unknown", same as the -1 sentinel
        // some dataset revisions write out explicitly.
        let raw_price = field(self.price);
        let price = if raw_price.is_empty() {
            PRICE_UNKNOWN
        } else {
            raw_price.parse::<f64>().map_err(|_| Error::InvalidRow {
                line,
                reason: format!("unparsable price '{raw_price}'"),
            })?
        };

        Ok(DrugRecord {
            name,
            therapeutic_class: optional(self.therapeutic_class),
            chemical_class: optional(self.chemical_class),
            action_class: optional(self.action_class),
            uses_features: field(self.uses).to_string(),
            side_effect_features: field(self.side_effects).to_string(),
            price,
        })
    }
}
