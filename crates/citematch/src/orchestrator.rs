//! Concurrent multi-provider fan-out.
//!
//! Issues one query to every configured provider, bounded by the run budget
//! and backed by the run cache, then merges the results deterministically.
//! Provider failures shrink the result set; they never fail the search.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;

use crate::engine::RunContext;
use crate::models::PaperRecord;
use crate::providers::Provider;
use crate::query::SearchQuery;

/// Fans a query out to all configured providers.
pub struct FanoutOrchestrator {
    providers: Vec<Arc<dyn Provider>>,
}

/// Where a provider's results for the current query come from.
enum Slot {
    /// Served from the run cache.
    Cached(Arc<Vec<PaperRecord>>),
    /// Issued over the network; index into the joined call results.
    Fetched(usize),
}

impl FanoutOrchestrator {
    /// Create an orchestrator over providers in priority order.
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn Provider>>) -> Self {
        Self { providers }
    }

    /// Number of configured providers.
    #[must_use]
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Search every provider for a query and merge the results.
    ///
    /// Per provider, in priority order: a cache hit is used directly and
    /// consumes no budget; otherwise a budget reservation is attempted and,
    /// when granted, the call is issued. Reservation stops early once the
    /// cached results alone already hold `2 × max_results` unique titles;
    /// calls already issued are always awaited. All granted calls run
    /// concurrently. The merge walks providers in priority order, keeps each
    /// provider's own ordering, drops author-less records, and deduplicates
    /// by case-folded title with the first occurrence winning. Raw per-
    /// provider lists are cached before the merge so later queries can reuse
    /// them.
    pub async fn search_all(
        &self,
        ctx: &RunContext,
        query: &SearchQuery,
        max_results: usize,
    ) -> Vec<PaperRecord> {
        if query.is_empty() {
            return Vec::new();
        }

        let unique_target = max_results.saturating_mul(2).max(1);

        let mut slots: Vec<Slot> = Vec::with_capacity(self.providers.len());
        let mut calls = Vec::new();
        let mut cached_uniques: HashSet<String> = HashSet::new();

        for provider in &self.providers {
            let kind = provider.kind();

            if let Some(hit) = ctx.cache.get(query, kind).await {
                for paper in hit.iter() {
                    cached_uniques.insert(paper.dedup_key());
                }
                slots.push(Slot::Cached(hit));
                if cached_uniques.len() >= unique_target {
                    tracing::debug!(query = %query, "enough cached results, skipping remaining providers");
                    break;
                }
                continue;
            }

            if !ctx.budget.reserve(kind).await {
                tracing::debug!(provider = %kind, "budget exhausted, skipping provider");
                continue;
            }

            let provider = Arc::clone(provider);
            let query = query.clone();
            slots.push(Slot::Fetched(calls.len()));
            calls.push(async move {
                let results = provider.search(&query, max_results).await;
                (provider.kind(), results)
            });
        }

        let fetched: Vec<(crate::providers::ProviderKind, Vec<PaperRecord>)> =
            join_all(calls).await;

        for (kind, results) in &fetched {
            ctx.cache.put(query, *kind, results.clone()).await;
        }

        let mut merged = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        'merge: for slot in &slots {
            let records: &[PaperRecord] = match slot {
                Slot::Cached(list) => list,
                Slot::Fetched(index) => &fetched[*index].1,
            };
            for paper in records {
                if !paper.has_valid_authors() {
                    continue;
                }
                if seen.insert(paper.dedup_key()) {
                    merged.push(paper.clone());
                    if merged.len() >= unique_target {
                        break 'merge;
                    }
                }
            }
        }

        merged
    }
}
