//! Configuration for the citation matching engine.

use std::collections::HashMap;
use std::time::Duration;

use crate::providers::ProviderKind;

/// Engine configuration constants.
pub mod defaults {
    use std::time::Duration;

    /// Semantic Scholar Graph API endpoint.
    pub const SEMANTIC_SCHOLAR_API: &str = "https://api.semanticscholar.org/graph/v1";

    /// Crossref REST API endpoint.
    pub const CROSSREF_API: &str = "https://api.crossref.org";

    /// OpenAlex API endpoint.
    pub const OPENALEX_API: &str = "https://api.openalex.org";

    /// Total request timeout per provider call.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection timeout per provider call.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(4);

    /// Minimum delay between Semantic Scholar calls (unauthenticated tier).
    pub const SEMANTIC_SCHOLAR_DELAY: Duration = Duration::from_millis(100);

    /// Minimum delay between Crossref calls.
    pub const CROSSREF_DELAY: Duration = Duration::from_millis(50);

    /// Minimum delay between OpenAlex calls.
    pub const OPENALEX_DELAY: Duration = Duration::from_millis(30);

    /// Hard ceiling on external calls for one run, regardless of document size.
    pub const HARD_CALL_CEILING: u32 = 1000;

    /// Maximum whitespace-delimited tokens in a normalized search query.
    pub const QUERY_TOKEN_CAP: usize = 15;

    /// Minimum sentence length (chars) considered worth searching for.
    pub const MIN_SENTENCE_CHARS: usize = 15;

    /// Default number of results requested from each provider.
    pub const DEFAULT_TOP_K: usize = 5;

    /// Maximum entries in the run-scoped search cache.
    pub const CACHE_MAX_SIZE: u64 = 1024;
}

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL for the Semantic Scholar Graph API.
    pub semantic_scholar_url: String,

    /// Base URL for the Crossref REST API.
    pub crossref_url: String,

    /// Base URL for the OpenAlex API.
    pub openalex_url: String,

    /// Total request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Per-provider minimum inter-call delays.
    pub provider_delays: HashMap<ProviderKind, Duration>,

    /// Maximum entries in the run-scoped search cache.
    pub cache_max_size: u64,
}

impl Config {
    /// Create a configuration pointing at the real provider endpoints.
    #[must_use]
    pub fn new() -> Self {
        let provider_delays = HashMap::from([
            (ProviderKind::SemanticScholar, defaults::SEMANTIC_SCHOLAR_DELAY),
            (ProviderKind::Crossref, defaults::CROSSREF_DELAY),
            (ProviderKind::OpenAlex, defaults::OPENALEX_DELAY),
        ]);

        Self {
            semantic_scholar_url: defaults::SEMANTIC_SCHOLAR_API.to_string(),
            crossref_url: defaults::CROSSREF_API.to_string(),
            openalex_url: defaults::OPENALEX_API.to_string(),
            request_timeout: defaults::REQUEST_TIMEOUT,
            connect_timeout: defaults::CONNECT_TIMEOUT,
            provider_delays,
            cache_max_size: defaults::CACHE_MAX_SIZE,
        }
    }

    /// Create a test configuration with every provider pointed at a mock server.
    ///
    /// Rate-limit delays are zero so tests run at full speed.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        let provider_delays = ProviderKind::ALL
            .into_iter()
            .map(|kind| (kind, Duration::from_millis(0)))
            .collect();

        Self {
            semantic_scholar_url: format!("{base_url}/graph/v1"),
            crossref_url: format!("{base_url}/crossref"),
            openalex_url: format!("{base_url}/openalex"),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            provider_delays,
            cache_max_size: defaults::CACHE_MAX_SIZE,
        }
    }

    /// Minimum inter-call delay for a provider.
    #[must_use]
    pub fn min_delay(&self, kind: ProviderKind) -> Duration {
        self.provider_delays.get(&kind).copied().unwrap_or(defaults::CROSSREF_DELAY)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
