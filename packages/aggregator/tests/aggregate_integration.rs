//! Integration tests for full aggregation runs.
//!
//! These exercise the real source adapters, normalizer, and memory store,
//! with the network replaced by `MockFetcher`.

use chrono::Duration;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use job_aggregator::{
    testing::{aged_record, jobstreet_card, mcf_card, results_page, test_profile},
    Aggregator, AggregatorConfig, ListingFilter, ListingStore, MemoryStore, MockFetcher,
    SiteAdapter, SourceKind,
};

fn mcf(fetcher: MockFetcher) -> SiteAdapter {
    SiteAdapter::new(
        test_profile(SourceKind::MyCareersFuture, "https://mcf.example"),
        Arc::new(fetcher),
    )
}

fn jobstreet(fetcher: MockFetcher) -> SiteAdapter {
    SiteAdapter::new(
        test_profile(SourceKind::JobStreet, "https://js.example"),
        Arc::new(fetcher),
    )
}

fn mcf_page(count: usize) -> MockFetcher {
    let cards: Vec<String> = (0..count)
        .map(|i| mcf_card(&format!("Role {i}"), "Acme", None, Some(&format!("/job/{i}"))))
        .collect();
    MockFetcher::new().with_body(results_page(&cards))
}

#[tokio::test]
async fn test_data_analyst_search() {
    let mcf_fetcher = MockFetcher::new().with_body(results_page(&[
        mcf_card("Data Analyst", "Acme Pte Ltd", Some("$4,000 - $6,000"), Some("/job/da-1")),
        mcf_card("Senior Data Analyst (SQL, Python)", "Globex", None, Some("/job/da-2")),
    ]));
    let js_fetcher = MockFetcher::new().with_body(results_page(&[jobstreet_card(
        "Data Analyst",
        "Initech",
        Some("Dashboards with SQL and Tableau"),
        Some("/job/da-3"),
    )]));

    let aggregator = Aggregator::new(
        MemoryStore::new(),
        vec![mcf(mcf_fetcher.clone()), jobstreet(js_fetcher.clone())],
        AggregatorConfig::default(),
    );

    let summary = aggregator.aggregate("data analyst").await.unwrap();

    assert_eq!(summary.count, 3);
    assert_eq!(summary.message(), "Found 3 jobs");
    assert_eq!(mcf_fetcher.call_count(), 1);
    assert_eq!(js_fetcher.call_count(), 1);
    assert!(js_fetcher.calls()[0].contains("data-analyst"));

    let first = &summary.records[0];
    assert_eq!(first.source, SourceKind::MyCareersFuture);
    assert_eq!(first.salary_range, "$4,000 - $6,000");
    assert_eq!(first.source_url, "https://mcf.example/job/da-1");
    assert_eq!(first.description, "Position at Acme Pte Ltd");

    let second = &summary.records[1];
    assert_eq!(second.salary_range, "Competitive");
    assert!(second.keywords.contains("sql"));
    assert!(second.keywords.contains("python"));

    let third = &summary.records[2];
    assert_eq!(third.source, SourceKind::JobStreet);
    assert_eq!(third.description, "Dashboards with SQL and Tableau");
    assert!(third.keywords.contains("sql"));

    let cached = aggregator.list_records(&ListingFilter::new()).await.unwrap();
    assert_eq!(cached.len(), 3);
    assert_eq!(cached[0].id, first.id);
}

#[tokio::test]
async fn test_data_analyst_search_with_timeout_and_stale_cache() {
    let store = MemoryStore::with_records(vec![
        aged_record("Yesterday's Analyst", "Acme", Duration::hours(26)),
        aged_record("Earlier Analyst", "Acme", Duration::minutes(20)),
    ]);
    let a = mcf(MockFetcher::new().with_body(results_page(&[
        mcf_card("Data Analyst", "Acme", None, Some("/job/1")),
        r#"<div id="job-card-x"><h3>Data Analyst Intern</h3></div>"#.to_string(),
        mcf_card("BI Analyst", "Globex", Some("$5,000"), None),
        mcf_card("Data Analyst (SQL)", "Initech", None, Some("/job/3")),
    ])));
    let b = jobstreet(mcf_page(5).with_delay(StdDuration::from_secs(10)))
        .with_timeout(StdDuration::from_millis(100));

    let aggregator = Aggregator::new(store, vec![a, b], AggregatorConfig::default());
    let summary = aggregator.aggregate("data analyst").await.unwrap();

    assert_eq!(summary.count, 3);
    assert!(summary
        .records
        .iter()
        .all(|r| r.source == SourceKind::MyCareersFuture));

    let titles: Vec<String> = aggregator
        .list_records(&ListingFilter::new())
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.title)
        .collect();
    assert_eq!(
        titles,
        vec!["Earlier Analyst", "Data Analyst", "BI Analyst", "Data Analyst (SQL)"]
    );
}

#[tokio::test]
async fn test_failed_source_does_not_affect_others() {
    let js_fetcher = MockFetcher::new().with_body(results_page(&[
        jobstreet_card("Engineer", "Initech", None, None),
        jobstreet_card("Designer", "Hooli", None, None),
    ]));

    let aggregator = Aggregator::new(
        MemoryStore::new(),
        vec![mcf(MockFetcher::failing()), jobstreet(js_fetcher)],
        AggregatorConfig::default(),
    );

    let summary = aggregator.aggregate("engineer").await.unwrap();

    assert_eq!(summary.count, 2);
    assert!(summary
        .records
        .iter()
        .all(|r| r.source == SourceKind::JobStreet));
}

#[tokio::test]
async fn test_slow_source_is_cut_off_by_timeout() {
    let slow = mcf(mcf_page(3).with_delay(StdDuration::from_secs(10)))
        .with_timeout(StdDuration::from_millis(100));
    let fast = jobstreet(MockFetcher::new().with_body(results_page(&[jobstreet_card(
        "Engineer", "Initech", None, None,
    )])));

    let aggregator = Aggregator::new(MemoryStore::new(), vec![slow, fast], AggregatorConfig::default());

    let started = std::time::Instant::now();
    let summary = aggregator.aggregate("engineer").await.unwrap();

    assert!(started.elapsed() < StdDuration::from_secs(5));
    assert_eq!(summary.count, 1);
    assert_eq!(summary.records[0].source, SourceKind::JobStreet);
}

#[tokio::test]
async fn test_all_sources_failing_yields_empty_run() {
    let aggregator = Aggregator::new(
        MemoryStore::new(),
        vec![
            mcf(MockFetcher::new().with_status(500)),
            jobstreet(MockFetcher::failing()),
        ],
        AggregatorConfig::default(),
    );

    let summary = aggregator.aggregate("anything").await.unwrap();

    assert_eq!(summary.count, 0);
    assert_eq!(aggregator.store().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_merged_results_are_capped() {
    let adapters: Vec<SiteAdapter> = (0..5).map(|_| mcf(mcf_page(50))).collect();
    let aggregator = Aggregator::new(MemoryStore::new(), adapters, AggregatorConfig::default());

    let summary = aggregator.aggregate("role").await.unwrap();

    assert_eq!(summary.count, 200);
    assert_eq!(summary.records.len(), 200);
    assert_eq!(aggregator.store().count().await.unwrap(), 200);
}

#[tokio::test]
async fn test_consecutive_runs_accumulate() {
    let aggregator = Aggregator::new(
        MemoryStore::new(),
        vec![mcf(mcf_page(2))],
        AggregatorConfig::default(),
    );

    let first = aggregator.aggregate("role").await.unwrap();
    let second = aggregator.aggregate("role").await.unwrap();

    assert_eq!(first.count, 2);
    assert_eq!(second.count, 2);
    assert_eq!(aggregator.store().count().await.unwrap(), 4);
    assert_ne!(first.records[0].id, second.records[0].id);
}

#[tokio::test]
async fn test_stale_records_are_evicted_before_run() {
    let store = MemoryStore::with_records(vec![
        aged_record("Stale", "Acme", Duration::hours(2)),
        aged_record("Recent", "Acme", Duration::minutes(30)),
    ]);
    let aggregator = Aggregator::new(store, vec![mcf(mcf_page(1))], AggregatorConfig::default());

    aggregator.aggregate("role").await.unwrap();

    let titles: Vec<String> = aggregator
        .list_records(&ListingFilter::new())
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.title)
        .collect();
    assert_eq!(titles, vec!["Recent".to_string(), "Role 0".to_string()]);
}

#[tokio::test]
async fn test_lookup_by_ids_ignores_missing() {
    let aggregator = Aggregator::new(
        MemoryStore::new(),
        vec![mcf(mcf_page(3))],
        AggregatorConfig::default(),
    );
    let summary = aggregator.aggregate("role").await.unwrap();

    let wanted = vec![summary.records[2].id, uuid::Uuid::new_v4(), summary.records[0].id];
    let found = aggregator.list_by_ids(&wanted).await.unwrap();

    assert_eq!(found.len(), 2);
    assert_eq!(found[0].id, summary.records[0].id);
    assert_eq!(found[1].id, summary.records[2].id);
}

#[tokio::test]
async fn test_filters_and_clear() {
    let aggregator = Aggregator::new(
        MemoryStore::new(),
        vec![
            mcf(mcf_page(2)),
            jobstreet(MockFetcher::new().with_body(results_page(&[jobstreet_card(
                "Engineer", "Initech", None, None,
            )]))),
        ],
        AggregatorConfig::default(),
    );
    aggregator.aggregate("role").await.unwrap();

    let by_source = aggregator
        .list_records(&ListingFilter::new().with_source(SourceKind::JobStreet))
        .await
        .unwrap();
    assert_eq!(by_source.len(), 1);

    let by_employer = aggregator
        .list_records(&ListingFilter::new().with_employer("acme"))
        .await
        .unwrap();
    assert_eq!(by_employer.len(), 2);

    assert_eq!(aggregator.clear().await.unwrap(), 3);
    assert!(aggregator
        .list_records(&ListingFilter::new())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_ttl_past_earliest_time_evicts_nothing() {
    let store = MemoryStore::with_records(vec![aged_record("Old", "Acme", Duration::days(30))]);
    let config = AggregatorConfig::default().with_cache_ttl(Duration::days(365_000_000));
    assert!(config.validate().is_err());

    let aggregator = Aggregator::new(store, vec![mcf(mcf_page(1))], config);
    let summary = aggregator.aggregate("role").await.unwrap();

    assert_eq!(summary.count, 1);
    assert_eq!(aggregator.store().count().await.unwrap(), 2);
}
