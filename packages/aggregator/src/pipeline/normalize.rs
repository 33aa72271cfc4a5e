//! Field normalization: raw tuples into canonical listing records.

use chrono::{DateTime, Utc};
use url::Url;
use uuid::Uuid;

use crate::pipeline::keywords;
use crate::sources::SiteProfile;
use crate::types::listing::{ListingRecord, RawListing};

/// Salary label used when a listing shows none.
pub const DEFAULT_SALARY: &str = "Competitive";

/// Normalize a raw tuple, stamped with the current time.
///
/// Returns `None` when title or employer is blank after trimming.
pub fn normalize(raw: RawListing, profile: &SiteProfile) -> Option<ListingRecord> {
    normalize_at(raw, profile, Utc::now())
}

/// Normalize a raw tuple with an explicit timestamp.
pub fn normalize_at(
    raw: RawListing,
    profile: &SiteProfile,
    now: DateTime<Utc>,
) -> Option<ListingRecord> {
    let title = raw.title.trim();
    let employer = raw.employer.trim();
    if title.is_empty() || employer.is_empty() {
        return None;
    }

    let salary_range = non_blank(raw.salary.as_deref())
        .unwrap_or(DEFAULT_SALARY)
        .to_string();

    let description = match non_blank(raw.description.as_deref()) {
        Some(d) => d.to_string(),
        None => profile.describe(employer),
    };

    let source_url = non_blank(raw.link.as_deref())
        .and_then(|href| resolve_link(&profile.base_url, href))
        .unwrap_or_else(|| profile.base_url.clone());

    let keywords = keywords::tag(&format!("{} {} {}", title, employer, description));

    Some(ListingRecord {
        id: Uuid::new_v4(),
        title: title.to_string(),
        employer: employer.to_string(),
        description,
        date_posted: now.date_naive(),
        salary_range,
        source_url,
        keywords,
        source: profile.kind,
        retrieved_at: now,
    })
}

/// Resolve a link found in listing markup against the site's base URL.
///
/// Absolute http(s) links pass through unchanged. Relative links are joined
/// onto `base`. Returns `None` for other schemes (`javascript:`, `mailto:`)
/// and for links that cannot be resolved.
pub fn resolve_link(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    if let Ok(absolute) = Url::parse(href) {
        return matches!(absolute.scheme(), "http" | "https").then(|| href.to_string());
    }
    Url::parse(base)
        .ok()?
        .join(href)
        .ok()
        .map(|u| u.to_string())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
