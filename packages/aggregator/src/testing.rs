//! Testing utilities: a scriptable fetcher and listing fixtures.
//!
//! These let applications exercise the aggregation pipeline without making
//! network calls.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use uuid::Uuid;

use crate::error::{FetchError, FetchResult};
use crate::sources::SiteProfile;
use crate::traits::fetcher::{FetchRequest, FetchedPage, Fetcher};
use crate::types::listing::{ListingRecord, SourceKind};

#[derive(Debug, Clone)]
enum Behavior {
    Respond { status: u16, body: String },
    Fail(String),
}

/// A fetcher that returns one canned response for every request.
///
/// Clones share call history, so a clone handed to an adapter can be
/// inspected afterwards.
///
/// # Example
///
/// ```rust
/// use job_aggregator::testing::MockFetcher;
///
/// let fetcher = MockFetcher::new().with_body("<html></html>");
/// assert_eq!(fetcher.call_count(), 0);
/// ```
#[derive(Clone)]
pub struct MockFetcher {
    behavior: Behavior,
    delay: Option<Duration>,
    calls: Arc<RwLock<Vec<FetchRequest>>>,
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFetcher {
    /// A fetcher that answers 200 with an empty document.
    pub fn new() -> Self {
        Self {
            behavior: Behavior::Respond {
                status: 200,
                body: "<html><body></body></html>".to_string(),
            },
            delay: None,
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// A fetcher whose every request fails at the transport level.
    pub fn failing() -> Self {
        Self {
            behavior: Behavior::Fail("connection refused".to_string()),
            ..Self::new()
        }
    }

    /// Answer 200 with this body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.behavior = Behavior::Respond {
            status: 200,
            body: body.into(),
        };
        self
    }

    /// Answer with this status. Non-2xx statuses surface as errors.
    pub fn with_status(mut self, status: u16) -> Self {
        if let Behavior::Respond { status: s, .. } = &mut self.behavior {
            *s = status;
        }
        self
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of requests received.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// URLs requested, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .read()
            .unwrap()
            .iter()
            .map(|r| r.url.clone())
            .collect()
    }

    /// Headers of the most recent request.
    pub fn last_headers(&self) -> Vec<(String, String)> {
        self.calls
            .read()
            .unwrap()
            .last()
            .map(|r| r.headers.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, request: &FetchRequest) -> FetchResult<FetchedPage> {
        self.calls.write().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behavior {
            Behavior::Fail(reason) => Err(FetchError::Http(reason.clone().into())),
            Behavior::Respond { status, .. } if !(200..300).contains(status) => {
                Err(FetchError::Status {
                    url: request.url.clone(),
                    status: *status,
                })
            }
            Behavior::Respond { status, body } => Ok(FetchedPage {
                status: *status,
                ..FetchedPage::new(&request.url, body.clone())
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A built-in profile pointed at a different host.
///
/// Selectors, headers and the description template stay those of the real
/// site; only the URLs change.
pub fn test_profile(kind: SourceKind, base_url: &str) -> SiteProfile {
    let mut profile = match kind {
        SourceKind::MyCareersFuture => SiteProfile::my_careers_future(),
        SourceKind::JobStreet => SiteProfile::jobstreet(),
    };
    let base_url = base_url.trim_end_matches('/');
    profile.base_url = base_url.to_string();
    profile.search_url = format!("{}/{}/search?q={{query}}", base_url, kind.as_str());
    profile
}

/// A stored record with sensible defaults.
pub fn record(title: &str, employer: &str, source: SourceKind) -> ListingRecord {
    let now = Utc::now();
    ListingRecord {
        id: Uuid::new_v4(),
        title: title.to_string(),
        employer: employer.to_string(),
        description: format!("Position at {}", employer),
        date_posted: now.date_naive(),
        salary_range: "Competitive".to_string(),
        source_url: "https://x.example".to_string(),
        keywords: Default::default(),
        source,
        retrieved_at: now,
    }
}

/// A record retrieved `age` ago.
pub fn aged_record(title: &str, employer: &str, age: chrono::Duration) -> ListingRecord {
    let mut r = record(title, employer, SourceKind::MyCareersFuture);
    r.retrieved_at = Utc::now() - age;
    r.date_posted = r.retrieved_at.date_naive();
    r
}

/// A MyCareersFuture-style listing card.
pub fn mcf_card(title: &str, employer: &str, salary: Option<&str>, href: Option<&str>) -> String {
    let mut card = format!(
        r#"<div id="job-card-{}"><h3>{}</h3><p class="company-name">{}</p>"#,
        Uuid::new_v4().simple(),
        title,
        employer
    );
    if let Some(salary) = salary {
        card.push_str(&format!(r#"<span class="salary-range">{}</span>"#, salary));
    }
    if let Some(href) = href {
        card.push_str(&format!(r#"<a href="{}">View</a>"#, href));
    }
    card.push_str("</div>");
    card
}

/// A JobStreet-style listing card.
pub fn jobstreet_card(
    title: &str,
    employer: &str,
    description: Option<&str>,
    href: Option<&str>,
) -> String {
    let mut card = String::from(r#"<article data-automation="normalJob">"#);
    match href {
        Some(href) => card.push_str(&format!(
            r#"<h3><a data-automation="jobTitle" href="{}">{}</a></h3>"#,
            href, title
        )),
        None => card.push_str(&format!("<h3>{}</h3>", title)),
    }
    card.push_str(&format!(
        r#"<span data-automation="job-company">{}</span>"#,
        employer
    ));
    if let Some(description) = description {
        card.push_str(&format!(
            r#"<span data-automation="jobShortDescription">{}</span>"#,
            description
        ));
    }
    card.push_str("</article>");
    card
}

/// Wrap cards in a search results document.
pub fn results_page(cards: &[String]) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>Search</title></head><body><main>{}</main></body></html>",
        cards.concat()
    )
}
