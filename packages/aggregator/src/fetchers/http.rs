//! HTTP fetcher backed by reqwest.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::{FetchRequest, FetchedPage, Fetcher};
use crate::types::config::DEFAULT_USER_AGENT;

/// Fetcher that issues plain HTTP GETs with a browser-like header set.
///
/// No JavaScript rendering: sites that build their listings client-side
/// will simply yield no containers.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default user agent.
    pub fn new() -> FetchResult<Self> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    /// Create a fetcher with a custom user agent.
    pub fn with_user_agent(user_agent: &str) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(browser_headers())
            .redirect(reqwest::redirect::Policy::limited(5))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        Ok(Self { client })
    }

    /// Use an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

/// Headers a desktop browser sends with a navigation request.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        reqwest::header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.5"),
    );
    headers.insert(reqwest::header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(
        reqwest::header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    headers
}

/// Convert request headers, skipping any that are not valid HTTP.
fn extra_headers(pairs: &[(String, String)]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!(header = %name, "Skipping invalid request header"),
        }
    }
    headers
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> FetchResult<FetchedPage> {
        debug!(url = %request.url, timeout_ms = request.timeout.as_millis() as u64, "HTTP fetch starting");

        let url = reqwest::Url::parse(&request.url).map_err(|_| FetchError::InvalidUrl {
            url: request.url.clone(),
        })?;

        let response = self
            .client
            .get(url)
            .headers(extra_headers(&request.headers))
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| classify(&request.url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: request.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: request.url.clone(),
                }
            } else {
                FetchError::Body {
                    url: request.url.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        debug!(url = %request.url, status = status.as_u16(), bytes = body.len(), "HTTP fetch completed");

        Ok(FetchedPage {
            url: request.url.clone(),
            status: status.as_u16(),
            body,
            fetched_at: Utc::now(),
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}

fn classify(url: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_headers_look_like_a_browser() {
        let headers = browser_headers();
        assert!(headers
            .get(reqwest::header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/html")));
        assert!(headers.contains_key(reqwest::header::ACCEPT_LANGUAGE));
    }

    #[test]
    fn test_invalid_extra_headers_are_skipped() {
        let headers = extra_headers(&[
            ("Referer".to_string(), "https://x.example/".to_string()),
            ("bad header".to_string(), "value".to_string()),
            ("X-Ok".to_string(), "line\nbreak".to_string()),
        ]);

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("referer").unwrap(), "https://x.example/");
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected_before_sending() {
        let fetcher = HttpFetcher::new().unwrap();
        let err = fetcher
            .fetch(&FetchRequest::new("not a url"))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }
}
