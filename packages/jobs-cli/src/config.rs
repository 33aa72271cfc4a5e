use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use job_aggregator::AggregatorConfig;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub cache_ttl_minutes: i64,
    pub fetch_timeout_secs: u64,
    pub max_results: usize,
    pub user_agent: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()),
            cache_ttl_minutes: lookup("CACHE_TTL_MINUTES")
                .unwrap_or_else(|| "60".to_string())
                .parse()
                .context("CACHE_TTL_MINUTES must be a valid number")?,
            fetch_timeout_secs: lookup("FETCH_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse()
                .context("FETCH_TIMEOUT_SECS must be a valid number")?,
            max_results: lookup("MAX_RESULTS")
                .unwrap_or_else(|| "200".to_string())
                .parse()
                .context("MAX_RESULTS must be a valid number")?,
            user_agent: lookup("SCRAPER_USER_AGENT").filter(|v| !v.trim().is_empty()),
        })
    }

    /// Library configuration for these settings, validated.
    pub fn aggregator_config(&self) -> Result<AggregatorConfig> {
        let cache_ttl = chrono::Duration::try_minutes(self.cache_ttl_minutes)
            .context("CACHE_TTL_MINUTES is out of range")?;

        let mut config = AggregatorConfig::new()
            .with_cache_ttl(cache_ttl)
            .with_fetch_timeout(Duration::from_secs(self.fetch_timeout_secs))
            .with_max_results(self.max_results);

        if let Some(user_agent) = &self.user_agent {
            config = config.with_user_agent(user_agent);
        }

        config.validate().context("invalid aggregator configuration")?;
        Ok(config)
    }
}
