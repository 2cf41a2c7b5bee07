//! # remedix
//!
//! A content-based drug recommendation engine.
//!
//! Given a drug name, remedix returns similar drugs ranked by textual
//! similarity of their indication/side-effect profiles, with optional
//! filtering by price range and excluded side effects, and a guaranteed
//! non-empty fallback for any known drug.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! remedix --data data/drugs.csv aspirin --price-min 0 --price-max 200
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use remedix::prelude::*;
//!
//! // Load the catalog once at startup
//! let catalog = Catalog::load_path("data/drugs.csv", &CatalogConfig::default()).unwrap();
//!
//! // Build the similarity index and engine
//! let engine = Recommender::build(catalog);
//!
//! // Query
//! let criteria = Criteria::default()
//!     .with_price_range(0.0, 200.0)
//!     .with_excluded_effect("nausea");
//! let results = engine.recommend("aspirin", &criteria).unwrap();
//! for rec in results {
//!     println!("{} ({:.2})", rec.name, rec.score);
//! }
//! ```
//!
//! ## Architecture
//!
//! All algorithmic content lives in
//! [`remedix-core`](https://docs.rs/remedix-core):
//!
//! - **Catalog**: immutable in-memory drug table, loaded once from CSV
//!   with a configurable column mapping
//! - **Similarity Index**: unigram+bigram TF-IDF vectors and a dense
//!   symmetric pairwise cosine matrix, built once after load
//! - **Recommendation Engine**: fixed 50-candidate pool, post-hoc price
//!   and side-effect filters, unfiltered fallback on starvation
//!
//! Everything is build-then-freeze: queries are pure reads and need no
//! locking from any number of threads.

// Re-export core types
pub use remedix_core::{
    Catalog, CatalogConfig, ColumnMap, DuplicatePolicy,
    Criteria, DrugRecord, Recommendation, Recommender,
    SimilarityIndex, TermVector, TfidfVectorizer,
    Error, Result,
    CANDIDATE_POOL, DEFAULT_PRICE_RANGE, DEFAULT_RESULT_COUNT, PRICE_UNKNOWN,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Catalog, CatalogConfig, ColumnMap, DuplicatePolicy,
        Criteria, DrugRecord, Recommendation, Recommender,
        SimilarityIndex, TermVector, TfidfVectorizer,
        Error, Result,
        CANDIDATE_POOL, DEFAULT_PRICE_RANGE, DEFAULT_RESULT_COUNT, PRICE_UNKNOWN,
    };
}
