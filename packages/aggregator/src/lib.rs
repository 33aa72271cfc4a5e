//! Job Listing Aggregation Engine
//!
//! Runs one free-text query against several job listing sites at once,
//! normalizes whatever each site returns into a common record, tags it with
//! skill keywords, and keeps the batch in a TTL-bounded cache.
//!
//! # Design Philosophy
//!
//! - Sources are isolated: a failing site contributes nothing, never an error
//! - Selectors are data: each site is a [`SiteProfile`] with fallback chains
//! - The store is append-only; staleness is handled by eviction, not updates
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use job_aggregator::{Aggregator, AggregatorConfig, HttpFetcher, MemoryStore};
//!
//! let fetcher = Arc::new(HttpFetcher::new()?);
//! let aggregator =
//!     Aggregator::with_default_sources(MemoryStore::new(), fetcher, AggregatorConfig::default());
//!
//! let summary = aggregator.aggregate("data analyst").await?;
//! println!("{}", summary.message());
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (Fetcher, ListingStore)
//! - [`types`] - Listing records and configuration
//! - [`selector`] - Ordered CSS selector chains
//! - [`sources`] - Site profiles and source adapters
//! - [`pipeline`] - Normalization, keyword tagging, aggregation
//! - [`stores`] - Storage implementations (MemoryStore, PostgresStore)
//! - [`fetchers`] - Fetcher implementations (HttpFetcher)
//! - [`testing`] - Mock implementations and fixtures for testing

pub mod error;
pub mod fetchers;
pub mod pipeline;
pub mod selector;
pub mod sources;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{AggregatorError, FetchError};
pub use traits::{
    fetcher::{FetchRequest, FetchedPage, Fetcher},
    store::ListingStore,
};
pub use types::{
    config::{AggregatorConfig, ListingFilter},
    listing::{ListingRecord, RawListing, SourceKind},
};

pub use pipeline::{AggregateSummary, Aggregator};
pub use selector::{Accessor, SelectorChain};
pub use sources::{SiteAdapter, SiteProfile};

pub use fetchers::HttpFetcher;
pub use stores::MemoryStore;

#[cfg(feature = "postgres")]
pub use stores::PostgresStore;

pub use testing::MockFetcher;
