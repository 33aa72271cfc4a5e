//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AggregatorError, Result};
use crate::traits::store::ListingStore;
use crate::types::{config::ListingFilter, listing::ListingRecord};

/// In-memory listing store.
///
/// Records are kept in insertion order. Useful for testing and for running
/// the CLI without a database; data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<ListingRecord>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with records.
    pub fn with_records(records: Vec<ListingRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Snapshot of every stored record, in insertion order.
    pub async fn snapshot(&self) -> Vec<ListingRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn evict_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.retrieved_at >= cutoff);
        Ok(before - records.len())
    }

    async fn insert_batch(&self, batch: &[ListingRecord]) -> Result<()> {
        let mut records = self.records.write().await;

        let mut ids: HashSet<Uuid> = records.iter().map(|r| r.id).collect();
        if let Some(dup) = batch.iter().find(|r| !ids.insert(r.id)) {
            return Err(AggregatorError::storage(format!(
                "duplicate listing id: {}",
                dup.id
            )));
        }

        records.extend_from_slice(batch);
        Ok(())
    }

    async fn query(&self, filter: &ListingFilter, limit: usize) -> Result<Vec<ListingRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| filter.matches(r))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_by_ids(&self, ids: &[Uuid], limit: usize) -> Result<Vec<ListingRecord>> {
        let wanted: HashSet<&Uuid> = ids.iter().collect();
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| wanted.contains(&r.id))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }

    async fn clear(&self) -> Result<usize> {
        let mut records = self.records.write().await;
        let removed = records.len();
        records.clear();
        Ok(removed)
    }
}
