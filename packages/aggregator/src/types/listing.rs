//! Listing records and the raw tuples adapters produce.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The external site a listing was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    MyCareersFuture,
    JobStreet,
}

impl SourceKind {
    /// All known sources, in default registration order.
    pub const ALL: [SourceKind; 2] = [SourceKind::MyCareersFuture, SourceKind::JobStreet];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::MyCareersFuture => "MyCareersFuture",
            SourceKind::JobStreet => "JobStreet",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown source: {}", s))
    }
}

/// Fields pulled out of one listing container, before normalization.
///
/// Adapters only emit a tuple when both `title` and `employer` resolved
/// to non-empty text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawListing {
    pub title: String,
    pub employer: String,
    pub salary: Option<String>,
    /// Detail link as found in the markup (may be relative)
    pub link: Option<String>,
    pub description: Option<String>,
}

impl RawListing {
    /// Create a raw listing with just title and employer.
    pub fn new(title: impl Into<String>, employer: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            employer: employer.into(),
            ..Default::default()
        }
    }

    /// Set the salary text.
    pub fn with_salary(mut self, salary: impl Into<String>) -> Self {
        self.salary = Some(salary.into());
        self
    }

    /// Set the detail link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A normalized, tagged job listing.
///
/// Records are created once by an aggregation run and never updated in
/// place; a refresh deletes and reinserts. Serialized field names match the
/// document shape the API layer already emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub id: Uuid,

    #[serde(rename = "job_title")]
    pub title: String,

    pub employer: String,

    #[serde(rename = "job_description")]
    pub description: String,

    pub date_posted: NaiveDate,

    pub salary_range: String,

    /// Absolute URL of the listing (or of the search page it came from)
    #[serde(rename = "employer_website")]
    pub source_url: String,

    /// Matched vocabulary terms, at most [`MAX_KEYWORDS`](crate::pipeline::keywords::MAX_KEYWORDS)
    #[serde(rename = "ats_keywords")]
    pub keywords: BTreeSet<String>,

    pub source: SourceKind,

    /// TTL clock, set at normalization time
    #[serde(rename = "created_at")]
    pub retrieved_at: DateTime<Utc>,
}
