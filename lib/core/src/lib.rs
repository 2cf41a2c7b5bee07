//! # remedix Core
//!
//! Core library for the remedix drug recommendation engine.
//!
//! This crate provides the fundamental data structures and algorithms:
//!
//! - [`DrugRecord`] - one drug with its classes, text profile and price
//! - [`Catalog`] - immutable, ordered record collection with lookups
//! - [`TfidfVectorizer`] - unigram+bigram TF-IDF term weighting
//! - [`SimilarityIndex`] - dense pairwise cosine similarity matrix
//! - [`Recommender`] - ranked alternatives with filters and fallback
//!
//! ## Example
//!
//! ```rust
//! use remedix_core::{Catalog, Criteria, DrugRecord, Recommender};
//!
//! let catalog = Catalog::from_records(vec![
//!     DrugRecord::new("aspirin").with_uses("pain relief fever").with_price(100.0),
//!     DrugRecord::new("ibuprofen").with_uses("pain relief inflammation").with_price(150.0),
//!     DrugRecord::new("cetirizine").with_uses("allergy rhinitis").with_price(50.0),
//! ]).unwrap();
//!
//! let engine = Recommender::build(catalog);
//!
//! let results = engine.recommend("aspirin", &Criteria::default()).unwrap();
//! assert_eq!(results[0].name, "ibuprofen");
//! ```
//!
//! The catalog and index are built once at startup and never mutated;
//! every query is a pure read, safe to serve from any number of threads.

pub mod catalog;
pub mod criteria;
pub mod engine;
pub mod error;
pub mod index;
pub mod record;
pub mod vectorize;

pub use catalog::{Catalog, CatalogConfig, ColumnMap, DuplicatePolicy, DEFAULT_PRICE_RANGE};
pub use criteria::{Criteria, DEFAULT_RESULT_COUNT};
pub use engine::{Recommendation, Recommender, CANDIDATE_POOL};
pub use error::{Error, Result};
pub use index::SimilarityIndex;
pub use record::{normalize_name, DrugRecord, PRICE_UNKNOWN};
pub use vectorize::{TermVector, TfidfVectorizer};
