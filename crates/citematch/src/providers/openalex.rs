//! OpenAlex works API adapter.

use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;

use super::{Provider, ProviderKind};
use crate::error::{ClientError, ClientResult};
use crate::models::PaperRecord;
use crate::query::SearchQuery;

/// Adapter for the OpenAlex `/works` endpoint.
pub struct OpenAlexProvider {
    client: ClientWithMiddleware,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct WorksResponse {
    #[serde(default)]
    results: Vec<Work>,
}

#[derive(Debug, Deserialize)]
struct Work {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authorships: Vec<Authorship>,
    #[serde(default)]
    publication_year: Option<i32>,
    #[serde(default)]
    primary_location: Option<Location>,
    #[serde(default)]
    cited_by_count: Option<i64>,
    #[serde(default)]
    doi: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Authorship {
    #[serde(default)]
    author: Option<WorkAuthor>,
}

#[derive(Debug, Deserialize)]
struct WorkAuthor {
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Location {
    #[serde(default)]
    source: Option<Source>,
    #[serde(default)]
    landing_page_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Source {
    #[serde(default)]
    display_name: Option<String>,
}

impl OpenAlexProvider {
    /// Create the adapter against an OpenAlex base URL.
    #[must_use]
    pub fn new(client: ClientWithMiddleware, base_url: String) -> Self {
        Self { client, base_url }
    }

    async fn fetch(&self, query: &SearchQuery, max_results: usize) -> ClientResult<Vec<PaperRecord>> {
        let url = format!("{}/works", self.base_url);
        let params = [
            ("search", query.as_str().to_string()),
            ("per-page", max_results.to_string()),
            ("sort", "relevance_score:desc".to_string()),
        ];

        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::unexpected_status(status.as_u16(), message));
        }

        let body: WorksResponse = serde_json::from_slice(&response.bytes().await?)?;
        Ok(body.results.into_iter().filter_map(into_record).collect())
    }
}

fn into_record(work: Work) -> Option<PaperRecord> {
    let title = work.title.filter(|t| !t.trim().is_empty())?;
    let authors: Vec<String> = work
        .authorships
        .into_iter()
        .filter_map(|a| a.author.and_then(|author| author.display_name))
        .filter(|name| !name.trim().is_empty())
        .collect();
    if authors.is_empty() {
        return None;
    }

    let (venue, url) = work
        .primary_location
        .map(|location| {
            let venue = location.source.and_then(|s| s.display_name);
            (venue, location.landing_page_url.unwrap_or_default())
        })
        .unwrap_or((None, String::new()));

    Some(PaperRecord {
        title,
        authors,
        year: work.publication_year,
        venue: venue.filter(|v| !v.trim().is_empty()),
        url,
        doi: work.doi,
        citation_count: work.cited_by_count.unwrap_or(0),
        provider: ProviderKind::OpenAlex,
        abstract_text: None,
    })
}

#[async_trait::async_trait]
impl Provider for OpenAlexProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAlex
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
