//! Query normalization.
//!
//! Turns raw sentence text into a bounded search query, optionally enriched
//! with topical context from the context oracle. Pure; no side effects.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::defaults::QUERY_TOKEN_CAP;

/// Leading bullet or numbering markers stripped from sentences
/// (`- `, `• `, `* `, `3. `).
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-•*]\s*|\d{1,3}\.\s+)").expect("valid list marker regex"));

/// Topical context appended to queries: a document category plus up to
/// three field keywords.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextTerms {
    /// Snake-cased academic category, e.g. `quantum_physics`.
    pub category: String,

    /// Field keywords; only the first three are used.
    pub keywords: Vec<String>,
}

impl ContextTerms {
    /// The tokens this context contributes to a query, in order. Multi-word
    /// categories and keywords are flattened so the token cap stays exact.
    fn tokens(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.category.split_whitespace().collect();
        out.extend(self.keywords.iter().take(3).flat_map(|k| k.split_whitespace()));
        out
    }
}

/// A normalized search query. Value type; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Normalize raw sentence text into a search query.
    ///
    /// Strips leading list markers, appends context terms when supplied,
    /// and caps the result at [`QUERY_TOKEN_CAP`] whitespace-delimited
    /// tokens. Context terms are budgeted for before the sentence tokens
    /// are truncated, so enrichment survives the cap and the result never
    /// exceeds it. Blank input yields an empty query, which callers treat
    /// as "no search to perform".
    #[must_use]
    pub fn normalize(raw: &str, context: Option<&ContextTerms>) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self(String::new());
        }

        let stripped = LIST_MARKER.replace(trimmed, "");
        let stripped = stripped.trim();
        if stripped.is_empty() {
            return Self(String::new());
        }

        let context_tokens = context.map(ContextTerms::tokens).unwrap_or_default();
        let sentence_budget = QUERY_TOKEN_CAP.saturating_sub(context_tokens.len()).max(1);

        let mut tokens: Vec<&str> = stripped.split_whitespace().take(sentence_budget).collect();
        tokens.extend(context_tokens);
        tokens.truncate(QUERY_TOKEN_CAP);

        Self(tokens.join(" "))
    }

    /// The query text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether there is nothing to search for.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Case-folded form used for cache keys.
    #[must_use]
    pub fn folded(&self) -> String {
        self.0.trim().to_lowercase()
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
