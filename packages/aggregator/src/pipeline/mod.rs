//! Aggregation pipeline.
//!
//! - Normalization (raw tuples into canonical records)
//! - Keyword tagging
//! - Fan-out coordination and caching

pub mod aggregate;
pub mod keywords;
pub mod normalize;

pub use aggregate::{AggregateSummary, Aggregator};
pub use keywords::{tag, MAX_KEYWORDS, VOCABULARY};
pub use normalize::{normalize, normalize_at, resolve_link, DEFAULT_SALARY};
