//! Fetcher implementations.
//!
//! - `HttpFetcher` - reqwest with browser-like headers
//! - `MockFetcher` - canned responses for tests (see [`crate::testing`])

mod http;

pub use http::HttpFetcher;

// Re-export from traits for convenience
pub use crate::traits::fetcher::{FetchRequest, FetchedPage, Fetcher};
