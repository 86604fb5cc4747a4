//! The citation engine run loop.
//!
//! Wires segmentation, selection, normalization, fan-out search, and scoring
//! into one document pass that ends in a review payload. All mutable run
//! state lives in a [`RunContext`] constructed here and discarded when the
//! run ends.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

use crate::budget::ProcessingBudget;
use crate::cache::SearchCache;
use crate::config::Config;
use crate::error::{EngineError, EngineResult};
use crate::format::CitationStyle;
use crate::models::{ContextInfo, Diagnostics, PaperDetails, ReviewPayload, ScoredPaper};
use crate::oracle::{ContextOracle, DocumentContext};
use crate::orchestrator::FanoutOrchestrator;
use crate::providers::{self, Provider, ProviderKind};
use crate::query::SearchQuery;
use crate::review::{CitationProposal, Location, ReviewSession};
use crate::scorer;
use crate::segment;
use crate::selector::SentenceSelector;

/// Mutable state shared within one processing run.
///
/// Created at the start of a run, passed by reference to the orchestrator,
/// and dropped at the end; never shared across concurrent runs.
#[derive(Debug)]
pub struct RunContext {
    /// Call budget and per-provider rate limiting.
    pub budget: ProcessingBudget,

    /// Search result cache.
    pub cache: SearchCache,
}

/// Tunable options for one engine instance.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Citation style used at finalize time.
    pub style: CitationStyle,

    /// Minimum relevance score for a proposal.
    pub threshold: f64,

    /// Results requested from each provider per query.
    pub top_k: usize,

    /// Explicit call ceiling; estimated from the document when `None`.
    pub max_api_calls: Option<u32>,

    /// Reject best candidates older than this year.
    pub min_year: Option<i32>,

    /// Carry ranked runner-up candidates on each proposal.
    pub return_all: bool,

    /// Deadline for the whole run; partial results are returned when it
    /// expires.
    pub run_timeout: Option<Duration>,

    /// Fixed selector seed for reproducible runs.
    pub selector_seed: Option<u64>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            style: CitationStyle::Apa,
            threshold: 0.0,
            top_k: crate::config::defaults::DEFAULT_TOP_K,
            max_api_calls: None,
            min_year: None,
            return_all: false,
            run_timeout: None,
            selector_seed: None,
        }
    }
}

/// Result of a processing run: the payload for the caller plus the live
/// review session the caller applies decisions to.
#[derive(Debug)]
pub struct ReviewOutcome {
    /// Citation-review payload.
    pub payload: ReviewPayload,

    /// Review session over the same proposals.
    pub session: ReviewSession,
}

/// The citation matching engine.
pub struct CitationEngine {
    config: Config,
    orchestrator: FanoutOrchestrator,
    oracle: Option<Arc<dyn ContextOracle>>,
    options: EngineOptions,
}

impl CitationEngine {
    /// Create an engine with every supported provider in default priority
    /// order.
    pub fn new(config: Config, options: EngineOptions) -> anyhow::Result<Self> {
        Self::with_provider_kinds(config, options, &ProviderKind::ALL)
    }

    /// Create an engine with a chosen provider subset and priority order.
    pub fn with_provider_kinds(
        config: Config,
        options: EngineOptions,
        kinds: &[ProviderKind],
    ) -> anyhow::Result<Self> {
        let client = providers::build_http_client(&config)?;
        let adapters = providers::build_providers(&config, &client, kinds);
        Ok(Self::with_providers(config, options, adapters))
    }

    /// Create an engine over pre-built provider adapters.
    #[must_use]
    pub fn with_providers(
        config: Config,
        options: EngineOptions,
        adapters: Vec<Arc<dyn Provider>>,
    ) -> Self {
        Self { config, orchestrator: FanoutOrchestrator::new(adapters), oracle: None, options }
    }

    /// Attach a context oracle for query enrichment.
    #[must_use]
    pub fn with_oracle(mut self, oracle: Arc<dyn ContextOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Process a document and produce proposals for review.
    ///
    /// `paragraphs` is the ordered paragraph stream from the document
    /// source. Fails only on an empty document; provider failures and
    /// budget exhaustion degrade the result instead.
    pub async fn prepare_review(&self, paragraphs: &[String]) -> EngineResult<ReviewOutcome> {
        if paragraphs.iter().all(|p| p.trim().is_empty()) {
            return Err(EngineError::EmptyDocument);
        }

        let context = self.resolve_context(paragraphs).await;
        let context_terms = context.as_ref().map(DocumentContext::terms);

        let (sentences, stats) = segment::extract_sentences(paragraphs);
        tracing::info!(
            sentences = sentences.len(),
            skipped_headings = stats.skipped_headings,
            "document segmented"
        );

        let provider_count = self.orchestrator.provider_count();
        let ctx = RunContext {
            budget: ProcessingBudget::for_run(
                self.options.max_api_calls,
                sentences.len(),
                provider_count,
                self.config.provider_delays.clone(),
            ),
            cache: SearchCache::new(self.config.cache_max_size),
        };

        let mut selector = self
            .options
            .selector_seed
            .map_or_else(SentenceSelector::new, SentenceSelector::with_seed);
        let selected = selector.select(&sentences, &ctx.budget, provider_count);

        let deadline = self.options.run_timeout.map(|t| Instant::now() + t);
        let mut proposals: Vec<CitationProposal> = Vec::new();
        let mut processed = 0usize;

        for sentence in &selected {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    tracing::warn!("run deadline reached, returning partial results");
                    break;
                }
            }

            let query = SearchQuery::normalize(&sentence.text, context_terms.as_ref());
            if query.is_empty() {
                continue;
            }

            let search = self.orchestrator.search_all(&ctx, &query, self.options.top_k);
            let papers = if let Some(deadline) = deadline {
                match tokio::time::timeout_at(deadline, search).await {
                    Ok(papers) => papers,
                    Err(_) => {
                        tracing::warn!("run deadline reached mid-search, returning partial results");
                        break;
                    }
                }
            } else {
                search.await
            };
            processed += 1;

            let mut scored: Vec<ScoredPaper> = papers
                .into_iter()
                .map(|paper| {
                    let relevance_score = scorer::score(&sentence.text, &paper);
                    ScoredPaper { paper, relevance_score }
                })
                .filter(|candidate| candidate.relevance_score >= self.options.threshold)
                .collect();

            if scored.is_empty() {
                continue;
            }
            scored.sort_by(|a, b| {
                b.relevance_score
                    .partial_cmp(&a.relevance_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let best = scored.remove(0);
            if let Some(min_year) = self.options.min_year {
                if best.paper.year.is_none_or(|year| year < min_year) {
                    continue;
                }
            }

            let mut proposal = CitationProposal::new(
                sentence.text.clone(),
                PaperDetails::from(best),
                Location {
                    paragraph_index: sentence.paragraph_index,
                    sentence_index: sentence.sentence_index,
                    page_label: sentence.page_label(),
                },
            );
            if self.options.return_all {
                proposal.alternates = scored.into_iter().map(PaperDetails::from).collect();
            }
            proposals.push(proposal);
        }

        proposals
            .sort_by_key(|p| (p.location.paragraph_index, p.location.sentence_index));

        let diagnostics = Diagnostics {
            processed_sentences: processed,
            skipped_sentences: sentences.len().saturating_sub(processed),
            skipped_headings: stats.skipped_headings,
            api_calls_made: ctx.budget.calls_made(),
            max_api_calls: ctx.budget.max_calls(),
            cache_hits: ctx.cache.hits(),
        };

        let context_info = context
            .map(|c| ContextInfo {
                research_context: c.research_context,
                document_category: c.document_category,
                field_keywords: c.field_keywords,
            })
            .unwrap_or_default();

        let payload = ReviewPayload {
            document_id: Uuid::new_v4(),
            total_citations: proposals.len(),
            citations: proposals.clone(),
            context_info,
            diagnostics,
        };

        Ok(ReviewOutcome { payload, session: ReviewSession::new(self.options.style, proposals) })
    }

    /// Ask the oracle for document context, tolerating absence and failure.
    async fn resolve_context(&self, paragraphs: &[String]) -> Option<DocumentContext> {
        let oracle = self.oracle.as_ref()?;
        let full_text = paragraphs.join("\n");
        let context = oracle.document_context(&full_text).await;
        if context.is_none() {
            tracing::warn!("context oracle unavailable, using unenriched queries");
        }
        context
    }
}
