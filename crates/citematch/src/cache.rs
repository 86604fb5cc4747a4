//! Run-scoped search cache.
//!
//! Memoizes `(query, provider)` result lists so repeated queries within a
//! run never touch the network or the call budget. No eviction policy
//! beyond a capacity bound; the cache dies with the run.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use moka::future::Cache;

use crate::models::PaperRecord;
use crate::providers::ProviderKind;
use crate::query::SearchQuery;

/// Cache of raw per-provider search results for one processing run.
#[derive(Debug)]
pub struct SearchCache {
    entries: Cache<String, Arc<Vec<PaperRecord>>>,
    hits: AtomicU64,
}

impl SearchCache {
    /// Create a cache bounded at `max_size` entries.
    #[must_use]
    pub fn new(max_size: u64) -> Self {
        Self { entries: Cache::builder().max_capacity(max_size).build(), hits: AtomicU64::new(0) }
    }

    fn key(query: &SearchQuery, provider: ProviderKind) -> String {
        format!("{}|{}", query.folded(), provider.id())
    }

    /// Look up cached results for a query/provider pair.
    pub async fn get(
        &self,
        query: &SearchQuery,
        provider: ProviderKind,
    ) -> Option<Arc<Vec<PaperRecord>>> {
        let hit = self.entries.get(&Self::key(query, provider)).await;
        if hit.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        hit
    }

    /// Store a provider's raw result list.
    pub async fn put(&self, query: &SearchQuery, provider: ProviderKind, results: Vec<PaperRecord>) {
        self.entries.insert(Self::key(query, provider), Arc::new(results)).await;
    }

    /// Number of cache hits so far.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }
}
