//! Fetcher trait: the network collaborator behind every source adapter.
//!
//! A fetcher issues exactly one request per call, honours the request's
//! timeout, and reports non-success statuses as errors. It never retries;
//! a failed attempt is final for that aggregation run.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::error::FetchResult;

/// A single page request.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Absolute URL to fetch
    pub url: String,

    /// Extra request headers (on top of the fetcher's defaults)
    pub headers: Vec<(String, String)>,

    /// Upper bound for the whole request, body included
    pub timeout: Duration,
}

impl FetchRequest {
    /// Create a request with a 30 second timeout and no extra headers.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was requested
    pub url: String,

    /// HTTP status (always a success status)
    pub status: u16,

    /// Response body as text
    pub body: String,

    /// When the response completed
    pub fetched_at: DateTime<Utc>,
}

impl FetchedPage {
    /// Create a 200 page.
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: 200,
            body: body.into(),
            fetched_at: Utc::now(),
        }
    }
}

/// Fetch-with-timeout primitive.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch one page.
    ///
    /// Transport failures, timeouts and non-2xx statuses are all errors.
    async fn fetch(&self, request: &FetchRequest) -> FetchResult<FetchedPage>;

    /// Short name for logs.
    fn name(&self) -> &str;
}
