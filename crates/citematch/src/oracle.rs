//! Context oracle boundary.
//!
//! The oracle is an external, LLM-backed collaborator that summarizes a
//! document into a research context, category, and keywords. The engine
//! only uses it to enrich queries and must keep working when it is absent
//! or failing.

use serde::{Deserialize, Serialize};

use crate::query::ContextTerms;

/// Document-level context returned by the oracle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentContext {
    /// One-sentence summary of the core research topic.
    #[serde(default)]
    pub research_context: String,

    /// Snake-cased academic category, e.g. `computational_linguistics`.
    #[serde(default)]
    pub document_category: String,

    /// Essential keywords from the document.
    #[serde(default)]
    pub field_keywords: Vec<String>,
}

impl DocumentContext {
    /// The terms this context contributes to query enrichment.
    #[must_use]
    pub fn terms(&self) -> ContextTerms {
        ContextTerms {
            category: self.document_category.clone(),
            keywords: self.field_keywords.clone(),
        }
    }
}

/// An external service that derives [`DocumentContext`] from document text.
///
/// Returning `None` means the oracle is unavailable or failed; the engine
/// falls back to unenriched queries.
#[async_trait::async_trait]
pub trait ContextOracle: Send + Sync {
    /// Analyze the full document text.
    async fn document_context(&self, full_text: &str) -> Option<DocumentContext>;
}

/// Oracle with a fixed answer; used in tests and for caller-supplied context.
#[derive(Debug, Clone)]
pub struct StaticOracle(pub DocumentContext);

#[async_trait::async_trait]
impl ContextOracle for StaticOracle {
    async fn document_context(&self, _full_text: &str) -> Option<DocumentContext> {
        Some(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_oracle_returns_fixed_context() {
        let oracle = StaticOracle(DocumentContext {
            research_context: "governance research".to_string(),
            document_category: "corporate_governance".to_string(),
            field_keywords: vec!["board".to_string()],
        });

        let context = oracle.document_context("anything").await.unwrap();
        assert_eq!(context.document_category, "corporate_governance");
        assert_eq!(context.terms().keywords, vec!["board"]);
    }
}
