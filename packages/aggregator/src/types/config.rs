//! Configuration types for aggregation runs and store reads.

use chrono::Duration;
use std::time::Duration as StdDuration;

use crate::error::{AggregatorError, Result};
use crate::types::listing::{ListingRecord, SourceKind};

/// Browser-like user agent sent with every listing page request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Longest accepted cache TTL.
pub const MAX_CACHE_TTL_DAYS: i64 = 365;

fn max_cache_ttl() -> Duration {
    Duration::days(MAX_CACHE_TTL_DAYS)
}

/// Configuration for the aggregation pipeline.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Records older than this are evicted at the start of every run.
    ///
    /// Default: 1 hour.
    pub cache_ttl: Duration,

    /// Cap on the merged result set of one run. Default: 200.
    pub max_results: usize,

    /// Cap on general listing reads. Default: 200.
    pub list_limit: usize,

    /// Cap on id-set lookups (favorites resolution). Default: 1000.
    pub lookup_limit: usize,

    /// Per-source fetch timeout. Default: 30 seconds.
    pub fetch_timeout: StdDuration,

    /// Listing containers processed per source and run. Default: 50.
    pub max_items_per_source: usize,

    /// User agent for outgoing requests.
    pub user_agent: String,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::hours(1),
            max_results: 200,
            list_limit: 200,
            lookup_limit: 1000,
            fetch_timeout: StdDuration::from_secs(30),
            max_items_per_source: 50,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl AggregatorConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set the merged result cap.
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Set the per-source fetch timeout.
    pub fn with_fetch_timeout(mut self, timeout: StdDuration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Set the per-source container cap.
    pub fn with_max_items_per_source(mut self, max: usize) -> Self {
        self.max_items_per_source = max;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Reject settings that would make every run a no-op or never expire.
    pub fn validate(&self) -> Result<()> {
        if self.cache_ttl <= Duration::zero() {
            return Err(AggregatorError::Config("cache_ttl must be positive".into()));
        }
        if self.cache_ttl > max_cache_ttl() {
            return Err(AggregatorError::Config(format!(
                "cache_ttl must be at most {} days",
                MAX_CACHE_TTL_DAYS
            )));
        }
        if self.max_results == 0 || self.list_limit == 0 || self.lookup_limit == 0 {
            return Err(AggregatorError::Config("result caps must be > 0".into()));
        }
        if self.max_items_per_source == 0 {
            return Err(AggregatorError::Config(
                "max_items_per_source must be > 0".into(),
            ));
        }
        if self.fetch_timeout.is_zero() {
            return Err(AggregatorError::Config("fetch_timeout must be > 0".into()));
        }
        Ok(())
    }
}

/// Filter for listing reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    /// Case-insensitive substring of the employer name.
    pub employer: Option<String>,

    /// Exact source tag.
    pub source: Option<SourceKind>,
}

impl ListingFilter {
    /// Create a new empty filter (matches all).
    pub fn new() -> Self {
        Self::default()
    }

    /// Only employers containing this text.
    pub fn with_employer(mut self, employer: impl Into<String>) -> Self {
        self.employer = Some(employer.into());
        self
    }

    /// Only listings from this source.
    pub fn with_source(mut self, source: SourceKind) -> Self {
        self.source = Some(source);
        self
    }

    /// Employer needle, ignoring blank input.
    pub fn employer_needle(&self) -> Option<String> {
        self.employer
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_lowercase)
    }

    /// Check if a record matches this filter.
    pub fn matches(&self, record: &ListingRecord) -> bool {
        if let Some(source) = self.source {
            if record.source != source {
                return false;
            }
        }
        if let Some(needle) = self.employer_needle() {
            if !record.employer.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }
}
