//! The Aggregator - entry point for search-and-cache runs.
//!
//! One run evicts stale records, fans the query out to every source adapter
//! concurrently, merges whatever came back, caps it, and appends the batch to
//! the store. Sources never fail a run; only the store can.

use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{AggregatorError, Result};
use crate::sources::{SiteAdapter, SiteProfile};
use crate::traits::{fetcher::Fetcher, store::ListingStore};
use crate::types::{
    config::{AggregatorConfig, ListingFilter},
    listing::ListingRecord,
};

/// Outcome of one aggregation run.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateSummary {
    /// Number of records produced (after the cap)
    pub count: usize,

    /// The records, sources concatenated in registration order
    pub records: Vec<ListingRecord>,
}

impl AggregateSummary {
    /// Human-readable result line.
    pub fn message(&self) -> String {
        format!("Found {} jobs", self.count)
    }
}

/// Coordinates source adapters and the listing store.
///
/// # Example
///
/// ```rust,ignore
/// let fetcher = Arc::new(HttpFetcher::new()?);
/// let aggregator = Aggregator::with_default_sources(MemoryStore::new(), fetcher, config);
///
/// let summary = aggregator.aggregate("data analyst").await?;
/// println!("{}", summary.message());
/// ```
pub struct Aggregator<S: ListingStore> {
    store: S,
    adapters: Vec<Arc<SiteAdapter>>,
    config: AggregatorConfig,
}

impl<S: ListingStore> Aggregator<S> {
    /// Create an aggregator over explicit adapters.
    ///
    /// `config` is taken as given; call [`AggregatorConfig::validate`] first
    /// when it comes from user input.
    pub fn new(store: S, adapters: Vec<SiteAdapter>, config: AggregatorConfig) -> Self {
        Self {
            store,
            adapters: adapters.into_iter().map(Arc::new).collect(),
            config,
        }
    }

    /// Create an aggregator over the built-in sites, all sharing one fetcher.
    ///
    /// Like [`Aggregator::new`], this does not validate `config`.
    pub fn with_default_sources(
        store: S,
        fetcher: Arc<dyn Fetcher>,
        config: AggregatorConfig,
    ) -> Self {
        let adapters = SiteProfile::defaults()
            .into_iter()
            .map(|profile| {
                let profile = profile.with_max_items(config.max_items_per_source);
                SiteAdapter::new(profile, Arc::clone(&fetcher)).with_timeout(config.fetch_timeout)
            })
            .collect();

        Self::new(store, adapters, config)
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Registered adapters, in registration order.
    pub fn adapters(&self) -> impl Iterator<Item = &SiteAdapter> {
        self.adapters.iter().map(|a| a.as_ref())
    }

    /// Run one aggregation for `query`.
    ///
    /// Stale records are evicted before any source is contacted. Each source
    /// runs on its own task; a source that fails, times out, or panics
    /// contributes nothing. The merged set is capped at `max_results` and
    /// appended to the store when non-empty.
    pub async fn aggregate(&self, query: &str) -> Result<AggregateSummary> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AggregatorError::InvalidQuery {
                reason: "query must not be blank".to_string(),
            });
        }

        let evicted = self.store.evict_older_than(self.config.cache_ttl).await?;
        debug!(evicted, "Evicted stale listings");

        let tasks = self.adapters.iter().map(|adapter| {
            let adapter = Arc::clone(adapter);
            let query = query.to_string();
            tokio::spawn(async move { adapter.collect(&query).await })
        });
        let outcomes = join_all(tasks).await;

        let mut records = Vec::new();
        for (adapter, outcome) in self.adapters.iter().zip(outcomes) {
            match outcome {
                Ok(batch) => records.extend(batch),
                Err(e) => warn!(source = %adapter.kind(), error = %e, "Source task aborted"),
            }
        }

        records.truncate(self.config.max_results);

        if !records.is_empty() {
            self.store.insert_batch(&records).await?;
        }

        info!(query, count = records.len(), "Aggregation complete");

        Ok(AggregateSummary {
            count: records.len(),
            records,
        })
    }

    /// Cached records matching `filter`, capped at `list_limit`.
    pub async fn list_records(&self, filter: &ListingFilter) -> Result<Vec<ListingRecord>> {
        self.store.query(filter, self.config.list_limit).await
    }

    /// Cached records for a set of ids, capped at `lookup_limit`.
    ///
    /// Ids that are no longer cached are silently missing from the result.
    pub async fn list_by_ids(&self, ids: &[Uuid]) -> Result<Vec<ListingRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.store.find_by_ids(ids, self.config.lookup_limit).await
    }

    /// Drop every cached record.
    pub async fn clear(&self) -> Result<usize> {
        let removed = self.store.clear().await?;
        info!(removed, "Cache cleared");
        Ok(removed)
    }

    /// Release store resources.
    pub async fn shutdown(&self) {
        self.store.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchResult;
    use crate::testing::{mcf_card, record, results_page, test_profile, MockFetcher};
    use crate::traits::fetcher::{FetchRequest, FetchedPage};
    use crate::traits::store::MockListingStore;
    use crate::types::listing::SourceKind;
    use async_trait::async_trait;
    use chrono::Duration;

    struct PanickingFetcher;

    #[async_trait]
    impl Fetcher for PanickingFetcher {
        async fn fetch(&self, _request: &FetchRequest) -> FetchResult<FetchedPage> {
            panic!("fetcher exploded");
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    fn mcf_adapter(fetcher: impl Fetcher + 'static) -> SiteAdapter {
        SiteAdapter::new(
            test_profile(SourceKind::MyCareersFuture, "https://mcf.example"),
            Arc::new(fetcher),
        )
    }

    fn jobstreet_adapter(fetcher: impl Fetcher + 'static) -> SiteAdapter {
        SiteAdapter::new(
            test_profile(SourceKind::JobStreet, "https://js.example"),
            Arc::new(fetcher),
        )
    }

    fn one_card() -> MockFetcher {
        MockFetcher::new().with_body(results_page(&[mcf_card("Analyst", "Acme", None, None)]))
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected_before_touching_store() {
        let store = MockListingStore::new();
        let fetcher = one_card();
        let aggregator = Aggregator::new(
            store,
            vec![mcf_adapter(fetcher.clone())],
            AggregatorConfig::default(),
        );

        let err = aggregator.aggregate("   ").await.unwrap_err();

        assert!(matches!(err, AggregatorError::InvalidQuery { .. }));
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_evicts_with_configured_ttl_then_inserts() {
        let mut store = MockListingStore::new();
        store
            .expect_evict_older_than()
            .withf(|ttl| *ttl == Duration::minutes(5))
            .times(1)
            .returning(|_| Ok(3));
        store
            .expect_insert_batch()
            .withf(|records: &[ListingRecord]| records.len() == 1)
            .times(1)
            .returning(|_| Ok(()));

        let config = AggregatorConfig::default().with_cache_ttl(Duration::minutes(5));
        let aggregator = Aggregator::new(store, vec![mcf_adapter(one_card())], config);

        let summary = aggregator.aggregate("analyst").await.unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.message(), "Found 1 jobs");
    }

    #[tokio::test]
    async fn test_empty_run_skips_insert() {
        let mut store = MockListingStore::new();
        store.expect_evict_older_than().returning(|_| Ok(0));
        store.expect_insert_batch().times(0);

        let aggregator = Aggregator::new(
            store,
            vec![
                mcf_adapter(MockFetcher::failing()),
                jobstreet_adapter(MockFetcher::new().with_status(403)),
            ],
            AggregatorConfig::default(),
        );

        let summary = aggregator.aggregate("analyst").await.unwrap();
        assert_eq!(summary.count, 0);
        assert!(summary.records.is_empty());
    }

    #[tokio::test]
    async fn test_eviction_failure_aborts_run() {
        let mut store = MockListingStore::new();
        store
            .expect_evict_older_than()
            .returning(|_| Err(AggregatorError::storage("disk full")));

        let fetcher = one_card();
        let aggregator = Aggregator::new(
            store,
            vec![mcf_adapter(fetcher.clone())],
            AggregatorConfig::default(),
        );

        let err = aggregator.aggregate("analyst").await.unwrap_err();
        assert!(matches!(err, AggregatorError::Storage(_)));
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_insert_failure_propagates() {
        let mut store = MockListingStore::new();
        store.expect_evict_older_than().returning(|_| Ok(0));
        store
            .expect_insert_batch()
            .returning(|_| Err(AggregatorError::storage("connection reset")));

        let aggregator = Aggregator::new(
            store,
            vec![mcf_adapter(one_card())],
            AggregatorConfig::default(),
        );

        let err = aggregator.aggregate("analyst").await.unwrap_err();
        assert!(matches!(err, AggregatorError::Storage(_)));
    }

    #[tokio::test]
    async fn test_panicking_source_contributes_nothing() {
        let mut store = MockListingStore::new();
        store.expect_evict_older_than().returning(|_| Ok(0));
        store.expect_insert_batch().times(1).returning(|_| Ok(()));

        let aggregator = Aggregator::new(
            store,
            vec![mcf_adapter(PanickingFetcher), mcf_adapter(one_card())],
            AggregatorConfig::default(),
        );

        let summary = aggregator.aggregate("analyst").await.unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.records[0].employer, "Acme");
    }

    #[tokio::test]
    async fn test_results_keep_registration_order() {
        let mut store = MockListingStore::new();
        store.expect_evict_older_than().returning(|_| Ok(0));
        store.expect_insert_batch().returning(|_| Ok(()));

        let slow = one_card().with_delay(std::time::Duration::from_millis(50));
        let aggregator = Aggregator::new(
            store,
            vec![mcf_adapter(slow), mcf_adapter(one_card()), jobstreet_adapter(MockFetcher::new())],
            AggregatorConfig::default(),
        );

        let summary = aggregator.aggregate("analyst").await.unwrap();
        assert_eq!(summary.count, 2);
        assert!(summary
            .records
            .iter()
            .all(|r| r.source == SourceKind::MyCareersFuture));
        assert!(summary.records[0].source_url.starts_with("https://mcf.example"));
    }

    #[tokio::test]
    async fn test_list_by_empty_ids_skips_store() {
        let store = MockListingStore::new();
        let aggregator = Aggregator::new(store, Vec::new(), AggregatorConfig::default());

        assert!(aggregator.list_by_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reads_use_configured_caps() {
        let mut store = MockListingStore::new();
        store
            .expect_query()
            .withf(|_, limit| *limit == 200)
            .returning(|_, _| Ok(vec![record("Analyst", "Acme", SourceKind::JobStreet)]));
        store
            .expect_find_by_ids()
            .withf(|ids: &[Uuid], limit| ids.len() == 1 && *limit == 1000)
            .returning(|_, _| Ok(Vec::new()));

        let aggregator = Aggregator::new(store, Vec::new(), AggregatorConfig::default());

        let listed = aggregator.list_records(&ListingFilter::new()).await.unwrap();
        assert_eq!(listed.len(), 1);

        let found = aggregator.list_by_ids(&[Uuid::new_v4()]).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_closes_store() {
        let mut store = MockListingStore::new();
        store.expect_close().times(1).returning(|| ());

        let aggregator = Aggregator::new(store, Vec::new(), AggregatorConfig::default());
        aggregator.shutdown().await;
    }
}
