//! Semantic Scholar Graph API adapter.

use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;

use super::{Provider, ProviderKind};
use crate::error::{ClientError, ClientResult};
use crate::models::PaperRecord;
use crate::query::SearchQuery;

const SEARCH_FIELDS: &str = "title,authors,year,venue,citationCount,url,abstract,externalIds";

/// Adapter for the Semantic Scholar paper search endpoint.
pub struct SemanticScholarProvider {
    client: ClientWithMiddleware,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<PaperEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaperEntry {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authors: Vec<AuthorEntry>,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    venue: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    citation_count: Option<i64>,
    #[serde(default)]
    r#abstract: Option<String>,
    #[serde(default)]
    external_ids: Option<ExternalIds>,
}

#[derive(Debug, Deserialize)]
struct AuthorEntry {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExternalIds {
    #[serde(rename = "DOI", default)]
    doi: Option<String>,
}

impl SemanticScholarProvider {
    /// Create the adapter against a Graph API base URL.
    #[must_use]
    pub fn new(client: ClientWithMiddleware, base_url: String) -> Self {
        Self { client, base_url }
    }

    async fn fetch(&self, query: &SearchQuery, max_results: usize) -> ClientResult<Vec<PaperRecord>> {
        let url = format!("{}/paper/search", self.base_url);
        let params = [
            ("query", query.as_str().to_string()),
            ("limit", max_results.to_string()),
            ("fields", SEARCH_FIELDS.to_string()),
        ];

        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::unexpected_status(status.as_u16(), message));
        }

        let body: SearchResponse = serde_json::from_slice(&response.bytes().await?)?;
        Ok(body.data.into_iter().filter_map(into_record).collect())
    }
}

fn into_record(entry: PaperEntry) -> Option<PaperRecord> {
    let title = entry.title.filter(|t| !t.trim().is_empty())?;
    let authors: Vec<String> = entry
        .authors
        .into_iter()
        .filter_map(|a| a.name)
        .filter(|name| !name.trim().is_empty())
        .collect();
    if authors.is_empty() {
        return None;
    }

    Some(PaperRecord {
        title,
        authors,
        year: entry.year,
        venue: entry.venue.filter(|v| !v.trim().is_empty()),
        url: entry.url.unwrap_or_default(),
        doi: entry.external_ids.and_then(|ids| ids.doi),
        citation_count: entry.citation_count.unwrap_or(0),
        provider: ProviderKind::SemanticScholar,
        abstract_text: entry.r#abstract,
    })
}

#[async_trait::async_trait]
impl Provider for SemanticScholarProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::SemanticScholar
    }

    async fn search(&self, query: &SearchQuery, max_results: usize) -> Vec<PaperRecord> {
        match self.fetch(query, max_results).await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(provider = %self.kind(), error = %err, "provider search failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let json = serde_json::json!({
            "total": 1,
            "data": [{
                "paperId": "abc",
                "title": "Deep Learning in Healthcare",
                "authors": [{"authorId": "1", "name": "Jane Smith"}],
                "year": 2022,
                "venue": "Nature Medicine",
                "url": "https://example.org/paper",
                "citationCount": 120,
                "abstract": "A survey.",
                "externalIds": {"DOI": "10.1/abc"}
            }]
        });

        let response: SearchResponse = serde_json::from_value(json).unwrap();
        let records: Vec<PaperRecord> = response.data.into_iter().filter_map(into_record).collect();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.title, "Deep Learning in Healthcare");
        assert_eq!(record.authors, vec!["Jane Smith"]);
        assert_eq!(record.year, Some(2022));
        assert_eq!(record.citation_count, 120);
        assert_eq!(record.doi.as_deref(), Some("10.1/abc"));
        assert_eq!(record.provider, ProviderKind::SemanticScholar);
    }

    #[test]
    fn test_records_without_title_or_authors_are_dropped() {
        let json = serde_json::json!({
            "data": [
                {"paperId": "a", "authors": [{"name": "Someone"}]},
                {"paperId": "b", "title": "Orphan Paper", "authors": []},
                {"paperId": "c", "title": "Blank Authors", "authors": [{"name": "  "}]}
            ]
        });

        let response: SearchResponse = serde_json::from_value(json).unwrap();
        let records: Vec<PaperRecord> = response.data.into_iter().filter_map(into_record).collect();
        assert!(records.is_empty());
    }
}
