//! Core trait abstractions.
//!
//! - [`fetcher::Fetcher`] - fetch-with-timeout network collaborator
//! - [`store::ListingStore`] - cache/store gateway for listing records

pub mod fetcher;
pub mod store;
