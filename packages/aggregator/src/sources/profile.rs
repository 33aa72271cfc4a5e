//! Per-site configuration records.
//!
//! Every supported listing site is described by one [`SiteProfile`]: how to
//! build its search URL, which headers to send, and the selector chains used
//! to find listing containers and their fields. Update the chains here when a
//! site changes its markup.

use crate::types::listing::SourceKind;

/// How the free-text query is embedded into the search URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStyle {
    /// Percent-encoded, e.g. `?search=data%20analyst`
    Percent,
    /// Lowercase hyphenated path slug, e.g. `/data-analyst-jobs`
    Slug,
}

/// Configuration for one external listing site.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    pub kind: SourceKind,

    /// Base URL relative links are resolved against
    pub base_url: String,

    /// Search URL with a `{query}` placeholder
    pub search_url: String,

    pub query_style: QueryStyle,

    /// Headers sent on top of the fetcher's defaults
    pub headers: Vec<(String, String)>,

    /// Listing container selectors: primary first, then fallbacks
    pub containers: Vec<String>,
    pub title: Vec<String>,
    pub employer: Vec<String>,
    pub salary: Vec<String>,
    /// Selectors for the detail link (`href` attribute)
    pub link: Vec<String>,
    pub description: Vec<String>,

    /// Description used when the card carries none; `{employer}` is substituted
    pub description_template: String,

    /// Containers processed per run
    pub max_items: usize,
}

impl SiteProfile {
    /// MyCareersFuture (Singapore government job portal).
    pub fn my_careers_future() -> Self {
        Self {
            kind: SourceKind::MyCareersFuture,
            base_url: "https://www.mycareersfuture.gov.sg".to_string(),
            search_url: "https://www.mycareersfuture.gov.sg/search?search={query}".to_string(),
            query_style: QueryStyle::Percent,
            headers: vec![(
                "Referer".to_string(),
                "https://www.mycareersfuture.gov.sg/".to_string(),
            )],
            containers: strings(&[
                r#"div[id^="job-card"]"#,
                r#"[data-testid="job-card"]"#,
                r#"div[class*="JobCard"]"#,
            ]),
            title: strings(&["h3", "a"]),
            employer: strings(&[
                r#"[class*="company"]"#,
                r#"[data-testid="company-hire-info"]"#,
            ]),
            salary: strings(&[r#"[class*="salary"]"#]),
            link: strings(&[r#"a[href*="/job/"]"#, "a[href]"]),
            description: Vec::new(),
            description_template: "Position at {employer}".to_string(),
            max_items: 50,
        }
    }

    /// JobStreet Singapore.
    pub fn jobstreet() -> Self {
        Self {
            kind: SourceKind::JobStreet,
            base_url: "https://www.jobstreet.com.sg".to_string(),
            search_url: "https://www.jobstreet.com.sg/{query}-jobs".to_string(),
            query_style: QueryStyle::Slug,
            headers: vec![(
                "Referer".to_string(),
                "https://www.jobstreet.com.sg/".to_string(),
            )],
            containers: strings(&[
                r#"article[data-testid="job-card"]"#,
                r#"article[data-automation="normalJob"]"#,
                r#"[data-card-type="JobCard"]"#,
            ]),
            title: strings(&["h1", "h2", "h3", "a"]),
            employer: strings(&[
                r#"[data-automation*="company"]"#,
                r#"[class*="company"]"#,
            ]),
            salary: strings(&[
                r#"[data-automation*="salary"]"#,
                r#"[class*="salary"]"#,
            ]),
            link: strings(&[r#"a[data-automation="jobTitle"]"#, "a[href]"]),
            description: strings(&[r#"[data-automation="jobShortDescription"]"#]),
            description_template: "Opportunity at {employer}".to_string(),
            max_items: 50,
        }
    }

    /// All built-in profiles, in registration order.
    pub fn defaults() -> Vec<SiteProfile> {
        vec![Self::my_careers_future(), Self::jobstreet()]
    }

    /// Cap the containers processed per run.
    pub fn with_max_items(mut self, max: usize) -> Self {
        self.max_items = max;
        self
    }

    /// Build the search URL for a free-text query.
    pub fn build_search_url(&self, query: &str) -> String {
        let encoded = match self.query_style {
            QueryStyle::Percent => urlencoding::encode(query.trim()).into_owned(),
            QueryStyle::Slug => query
                .split_whitespace()
                .map(|word| urlencoding::encode(&word.to_lowercase()).into_owned())
                .collect::<Vec<_>>()
                .join("-"),
        };
        self.search_url.replace("{query}", &encoded)
    }

    /// Fallback description for an employer.
    pub fn describe(&self, employer: &str) -> String {
        self.description_template.replace("{employer}", employer)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
