//! Storage trait for cached listing records.
//!
//! The store is a plain document store: predicate-based delete, append-only
//! batch insert, filtered find with a cap, and find-by-id-set. There is no
//! update operation; a record lives until it ages out or the store is cleared.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Result;
use crate::types::{config::ListingFilter, listing::ListingRecord};

/// Cache/store gateway for listing records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Delete every record retrieved strictly before `cutoff`.
    ///
    /// Returns the number of records removed.
    async fn evict_before(&self, cutoff: DateTime<Utc>) -> Result<usize>;

    /// Delete every record older than `ttl`.
    ///
    /// Running this twice in a row leaves the same surviving set as running
    /// it once. A `ttl` reaching past the earliest representable time
    /// evicts nothing.
    async fn evict_older_than(&self, ttl: Duration) -> Result<usize> {
        let cutoff = Utc::now()
            .checked_sub_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        self.evict_before(cutoff).await
    }

    /// Append a batch of records. No merge or upsert.
    async fn insert_batch(&self, records: &[ListingRecord]) -> Result<()>;

    /// Records matching `filter`, in insertion order, at most `limit`.
    async fn query(&self, filter: &ListingFilter, limit: usize) -> Result<Vec<ListingRecord>>;

    /// Records whose id is in `ids`, at most `limit`. Unknown ids are ignored.
    async fn find_by_ids(&self, ids: &[Uuid], limit: usize) -> Result<Vec<ListingRecord>>;

    /// Total number of stored records.
    async fn count(&self) -> Result<usize>;

    /// Remove every record. Returns the number removed.
    async fn clear(&self) -> Result<usize>;

    /// Release backend resources (connection pools).
    async fn close(&self) {}
}

#[async_trait]
impl<T: ListingStore + ?Sized> ListingStore for Arc<T> {
    async fn evict_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        (**self).evict_before(cutoff).await
    }

    async fn evict_older_than(&self, ttl: Duration) -> Result<usize> {
        (**self).evict_older_than(ttl).await
    }

    async fn insert_batch(&self, records: &[ListingRecord]) -> Result<()> {
        (**self).insert_batch(records).await
    }

    async fn query(&self, filter: &ListingFilter, limit: usize) -> Result<Vec<ListingRecord>> {
        (**self).query(filter, limit).await
    }

    async fn find_by_ids(&self, ids: &[Uuid], limit: usize) -> Result<Vec<ListingRecord>> {
        (**self).find_by_ids(ids, limit).await
    }

    async fn count(&self) -> Result<usize> {
        (**self).count().await
    }

    async fn clear(&self) -> Result<usize> {
        (**self).clear().await
    }

    async fn close(&self) {
        (**self).close().await
    }
}
