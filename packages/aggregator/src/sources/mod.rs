//! Source adapters for external listing sites.
//!
//! A [`SiteProfile`] describes a site; a [`SiteAdapter`] pairs a profile with
//! a fetcher and turns search pages into normalized records.

pub mod profile;
pub mod site;

pub use profile::{QueryStyle, SiteProfile};
pub use site::SiteAdapter;
