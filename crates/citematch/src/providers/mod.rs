//! Bibliographic search providers.
//!
//! One adapter per external source. Each adapter translates a normalized
//! query into its provider's request, deserializes the provider's response
//! shape, and maps it into [`PaperRecord`]s. Providers fail independently:
//! any transport or parse error becomes an empty result list, logged but
//! never propagated.

mod crossref;
mod openalex;
mod semantic_scholar;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::{Deserialize, Serialize};

pub use crossref::CrossrefProvider;
pub use openalex::OpenAlexProvider;
pub use semantic_scholar::SemanticScholarProvider;

use crate::config::Config;
use crate::models::PaperRecord;
use crate::query::SearchQuery;

/// The closed set of supported bibliographic sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Semantic Scholar Graph API.
    #[serde(rename = "semantic_scholar")]
    SemanticScholar,
    /// Crossref REST API.
    #[serde(rename = "crossref")]
    Crossref,
    /// OpenAlex works API.
    #[serde(rename = "openalex")]
    OpenAlex,
}

impl ProviderKind {
    /// Every supported provider, in default priority order.
    pub const ALL: [Self; 3] = [Self::SemanticScholar, Self::Crossref, Self::OpenAlex];

    /// Stable identifier used in cache keys and configuration.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::SemanticScholar => "semantic_scholar",
            Self::Crossref => "crossref",
            Self::OpenAlex => "openalex",
        }
    }

    /// Human-readable source name shown in payloads.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::SemanticScholar => "Semantic Scholar",
            Self::Crossref => "Crossref",
            Self::OpenAlex => "OpenAlex",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "semantic_scholar" | "semanticscholar" => Ok(Self::SemanticScholar),
            "crossref" => Ok(Self::Crossref),
            "openalex" | "open_alex" => Ok(Self::OpenAlex),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}

/// A bibliographic search source.
///
/// `search` must not fail: adapters recover from every provider-side error
/// by returning an empty list so one broken source cannot sink a run.
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    /// Which source this adapter talks to.
    fn kind(&self) -> ProviderKind;

    /// Search the source, returning at most `max_results` records.
    async fn search(&self, query: &SearchQuery, max_results: usize) -> Vec<PaperRecord>;
}

/// Build the shared HTTP client with timeouts and transient-error retries.
pub fn build_http_client(config: &Config) -> anyhow::Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .gzip(true)
        .build()?;

    let retry_policy = ExponentialBackoff::builder()
        .retry_bounds(Duration::from_millis(250), Duration::from_secs(5))
        .build_with_max_retries(2);

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

/// Construct adapters for the requested providers, in the given priority order.
#[must_use]
pub fn build_providers(
    config: &Config,
    client: &ClientWithMiddleware,
    kinds: &[ProviderKind],
) -> Vec<Arc<dyn Provider>> {
    kinds
        .iter()
        .map(|kind| -> Arc<dyn Provider> {
            match kind {
                ProviderKind::SemanticScholar => Arc::new(SemanticScholarProvider::new(
                    client.clone(),
                    config.semantic_scholar_url.clone(),
                )),
                ProviderKind::Crossref => {
                    Arc::new(CrossrefProvider::new(client.clone(), config.crossref_url.clone()))
                }
                ProviderKind::OpenAlex => {
                    Arc::new(OpenAlexProvider::new(client.clone(), config.openalex_url.clone()))
                }
            }
        })
        .collect()
}
