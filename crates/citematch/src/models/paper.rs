//! Paper records in the engine's common shape.
//!
//! Every provider adapter maps its wire schema into [`PaperRecord`] so the
//! rest of the engine never sees provider-specific fields.

use serde::{Deserialize, Serialize};

use crate::providers::ProviderKind;

/// A candidate paper in the engine's common shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperRecord {
    /// Paper title.
    pub title: String,

    /// Author names, in the provider's order.
    pub authors: Vec<String>,

    /// Publication year.
    #[serde(default)]
    pub year: Option<i32>,

    /// Publication venue (journal or conference).
    #[serde(default)]
    pub venue: Option<String>,

    /// Landing page or publisher URL.
    #[serde(default)]
    pub url: String,

    /// Digital Object Identifier.
    #[serde(default)]
    pub doi: Option<String>,

    /// Number of citations the paper has received.
    #[serde(default)]
    pub citation_count: i64,

    /// Provider the record came from.
    pub provider: ProviderKind,

    /// Paper abstract, when the provider returns one.
    #[serde(default)]
    pub abstract_text: Option<String>,
}

impl PaperRecord {
    /// Deduplication identity: lower-cased, trimmed title.
    #[must_use]
    pub fn dedup_key(&self) -> String {
        self.title.trim().to_lowercase()
    }

    /// Whether at least one author name is non-blank.
    #[must_use]
    pub fn has_valid_authors(&self) -> bool {
        self.authors.iter().any(|a| !a.trim().is_empty())
    }

    /// Author names with blank entries removed.
    #[must_use]
    pub fn valid_authors(&self) -> Vec<&str> {
        self.authors.iter().map(String::as_str).filter(|a| !a.trim().is_empty()).collect()
    }
}

/// A paper record paired with its relevance score against one sentence.
///
/// Exists only during a single scoring pass; never persisted standalone.
#[derive(Debug, Clone)]
pub struct ScoredPaper {
    /// The underlying paper record.
    pub paper: PaperRecord,

    /// Relevance score in [0, 1].
    pub relevance_score: f64,
}

/// Paper details as carried inside a citation proposal payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperDetails {
    /// Paper title.
    pub title: String,

    /// Author names.
    pub authors: Vec<String>,

    /// Publication year.
    #[serde(default)]
    pub year: Option<i32>,

    /// Landing page or publisher URL.
    #[serde(default)]
    pub url: String,

    /// Digital Object Identifier.
    #[serde(default)]
    pub doi: Option<String>,

    /// Publication venue.
    #[serde(default)]
    pub venue: Option<String>,

    /// Citation count.
    #[serde(default)]
    pub citations: i64,

    /// Relevance score against the originating sentence, rounded to 3 decimals.
    pub relevance_score: f64,

    /// Provider the record came from.
    pub source: ProviderKind,
}

impl From<ScoredPaper> for PaperDetails {
    fn from(scored: ScoredPaper) -> Self {
        let ScoredPaper { paper, relevance_score } = scored;
        Self {
            title: paper.title,
            authors: paper.authors,
            year: paper.year,
            url: paper.url,
            doi: paper.doi,
            venue: paper.venue,
            citations: paper.citation_count,
            relevance_score: (relevance_score * 1000.0).round() / 1000.0,
            source: paper.provider,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, authors: &[&str]) -> PaperRecord {
        PaperRecord {
            title: title.to_string(),
            authors: authors.iter().map(ToString::to_string).collect(),
            year: Some(2023),
            venue: None,
            url: String::new(),
            doi: None,
            citation_count: 0,
            provider: ProviderKind::Crossref,
            abstract_text: None,
        }
    }

    #[test]
    fn test_dedup_key_folds_case_and_whitespace() {
        let a = record("  Deep Learning in Healthcare ", &["A"]);
        let b = record("deep learning in healthcare", &["B"]);
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_valid_authors_filters_blank_names() {
        let paper = record("T", &["", "  ", "Jane Smith"]);
        assert!(paper.has_valid_authors());
        assert_eq!(paper.valid_authors(), vec!["Jane Smith"]);

        let none = record("T", &["", "  "]);
        assert!(!none.has_valid_authors());
    }

    #[test]
    fn test_paper_details_rounds_score() {
        let scored = ScoredPaper { paper: record("T", &["A"]), relevance_score: 0.123_456 };
        let details = PaperDetails::from(scored);
        assert!((details.relevance_score - 0.123).abs() < f64::EPSILON);
    }
}
