//! Source adapter: one listing site turned into normalized records.

use std::sync::Arc;
use std::time::Duration;

use scraper::Html;
use tracing::{debug, info, warn};

use crate::error::{FetchError, FetchResult};
use crate::pipeline::normalize::{normalize, resolve_link};
use crate::selector::{Accessor, SelectorChain};
use crate::sources::profile::SiteProfile;
use crate::traits::fetcher::{FetchRequest, FetchedPage, Fetcher};
use crate::types::listing::{ListingRecord, RawListing, SourceKind};

/// Compiled selector chains for one profile.
#[derive(Debug, Clone)]
struct Chains {
    containers: SelectorChain,
    title: SelectorChain,
    employer: SelectorChain,
    salary: SelectorChain,
    link: SelectorChain,
    description: SelectorChain,
}

impl Chains {
    fn compile(profile: &SiteProfile) -> Self {
        Self {
            containers: SelectorChain::new(&profile.containers),
            title: SelectorChain::new(&profile.title),
            employer: SelectorChain::new(&profile.employer),
            salary: SelectorChain::new(&profile.salary),
            link: SelectorChain::new(&profile.link),
            description: SelectorChain::new(&profile.description),
        }
    }
}

/// Adapter for one external listing site.
///
/// Fetches the search page for a query, locates listing containers through
/// the profile's selector chains and hands each raw tuple to the normalizer.
/// Every failure is contained here: [`SiteAdapter::collect`] never errors,
/// it just returns nothing.
pub struct SiteAdapter {
    profile: SiteProfile,
    chains: Chains,
    fetcher: Arc<dyn Fetcher>,
    timeout: Duration,
}

impl SiteAdapter {
    /// Create an adapter with a 30 second fetch timeout.
    pub fn new(profile: SiteProfile, fetcher: Arc<dyn Fetcher>) -> Self {
        let chains = Chains::compile(&profile);
        Self {
            profile,
            chains,
            fetcher,
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the fetch timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    pub fn kind(&self) -> SourceKind {
        self.profile.kind
    }

    /// Search URL for a query.
    pub fn search_url(&self, query: &str) -> String {
        self.profile.build_search_url(query)
    }

    /// Fetch the search page for a query, bounded by the adapter timeout.
    pub async fn fetch(&self, query: &str) -> FetchResult<FetchedPage> {
        let url = self.search_url(query);
        let request = self
            .profile
            .headers
            .iter()
            .fold(FetchRequest::new(&url), |req, (name, value)| {
                req.with_header(name, value)
            })
            .with_timeout(self.timeout);

        match tokio::time::timeout(self.timeout, self.fetcher.fetch(&request)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout { url }),
        }
    }

    /// Extract raw tuples from a fetched search page.
    ///
    /// At most `max_items` containers are visited. Containers without a
    /// title or employer are skipped. A container without a usable detail
    /// link points at the search page itself.
    pub fn extract(&self, page: &FetchedPage) -> Vec<RawListing> {
        let document = Html::parse_document(&page.body);

        let Some((matched, containers)) = self
            .chains
            .containers
            .select_all(&document, self.profile.max_items)
        else {
            debug!(source = %self.profile.kind, url = %page.url, "No listing containers matched");
            return Vec::new();
        };

        debug!(
            source = %self.profile.kind,
            selector = matched,
            containers = containers.len(),
            "Listing containers matched"
        );

        let href = Accessor::attr("href");
        let mut listings = Vec::with_capacity(containers.len());

        for (index, container) in containers.into_iter().enumerate() {
            let title = self.chains.title.resolve(container, &Accessor::Text);
            let employer = self.chains.employer.resolve(container, &Accessor::Text);

            let (Some(title), Some(employer)) = (title, employer) else {
                debug!(source = %self.profile.kind, index, "Skipping container without title or employer");
                continue;
            };

            let link = self
                .chains
                .link
                .resolve_where(container, &href, |value| {
                    resolve_link(&self.profile.base_url, value).is_some()
                })
                .unwrap_or_else(|| page.url.clone());

            let mut raw = RawListing::new(title, employer).with_link(link);
            raw.salary = self.chains.salary.resolve(container, &Accessor::Text);
            raw.description = self.chains.description.resolve(container, &Accessor::Text);
            listings.push(raw);
        }

        listings
    }

    /// Fetch, extract and normalize listings for a query.
    ///
    /// Network failures, timeouts and markup misses all yield an empty vec.
    pub async fn collect(&self, query: &str) -> Vec<ListingRecord> {
        let page = match self.fetch(query).await {
            Ok(page) => page,
            Err(e) => {
                warn!(source = %self.profile.kind, error = %e, "Source fetch failed");
                return Vec::new();
            }
        };

        let records: Vec<ListingRecord> = self
            .extract(&page)
            .into_iter()
            .filter_map(|raw| normalize(raw, &self.profile))
            .collect();

        info!(source = %self.profile.kind, count = records.len(), "Source collected");
        records
    }
}

impl std::fmt::Debug for SiteAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteAdapter")
            .field("kind", &self.profile.kind)
            .field("fetcher", &self.fetcher.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}
