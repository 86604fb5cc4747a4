//! Crossref REST API adapter.

use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;

use super::{Provider, ProviderKind};
use crate::error::{ClientError, ClientResult};
use crate::models::PaperRecord;
use crate::query::SearchQuery;

/// Adapter for the Crossref `/works` endpoint.
pub struct CrossrefProvider {
    client: ClientWithMiddleware,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct WorksResponse {
    message: WorksMessage,
}

#[derive(Debug, Deserialize)]
struct WorksMessage {
    #[serde(default)]
    items: Vec<WorkItem>,
}

#[derive(Debug, Deserialize)]
struct WorkItem {
    #[serde(default)]
    title: Vec<String>,
    #[serde(default)]
    author: Vec<WorkAuthor>,
    #[serde(rename = "published-print", default)]
    published_print: Option<DateParts>,
    #[serde(rename = "container-title", default)]
    container_title: Vec<String>,
    #[serde(rename = "URL", default)]
    url: Option<String>,
    #[serde(rename = "DOI", default)]
    doi: Option<String>,
    #[serde(rename = "is-referenced-by-count", default)]
    is_referenced_by_count: i64,
    #[serde(rename = "abstract", default)]
    abstract_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WorkAuthor {
    #[serde(default)]
    given: Option<String>,
    #[serde(default)]
    family: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DateParts {
    #[serde(rename = "date-parts", default)]
    date_parts: Vec<Vec<Option<i32>>>,
}

impl WorkAuthor {
    /// Crossref splits names into given/family; rejoin them.
    fn full_name(&self) -> String {
        [self.given.as_deref(), self.family.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }
}

impl DateParts {
    fn year(&self) -> Option<i32> {
        self.date_parts.first()?.first().copied().flatten()
    }
}

impl CrossrefProvider {
    /// Create the adapter against a Crossref base URL.
    #[must_use]
    pub fn new(client: ClientWithMiddleware, base_url: String) -> Self {
        Self { client, base_url }
    }

    async fn fetch(&self, query: &SearchQuery, max_results: usize) -> ClientResult<Vec<PaperRecord>> {
        let url = format!("{}/works", self.base_url);
        let params = [
            ("query", query.as_str().to_string()),
            ("rows", max_results.to_string()),
            ("sort", "relevance".to_string()),
        ];

        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::unexpected_status(status.as_u16(), message));
        }

        let body: WorksResponse = serde_json::from_slice(&response.bytes().await?)?;
        Ok(body.message.items.into_iter().filter_map(into_record).collect())
    }
}

fn into_record(item: WorkItem) -> Option<PaperRecord> {
    let title = item.title.join(" ");
    if title.trim().is_empty() {
        return None;
    }

    let authors: Vec<String> =
        item.author.iter().map(WorkAuthor::full_name).filter(|name| !name.is_empty()).collect();
    if authors.is_empty() {
        return None;
    }

    let venue = item.container_title.join(" ");

    Some(PaperRecord {
        title,
        authors,
        year: item.published_print.as_ref().and_then(DateParts::year),
        venue: (!venue.trim().is_empty()).then_some(venue),
        url: item.url.unwrap_or_default(),
        doi: item.doi,
        citation_count: item.is_referenced_by_count,
        provider: ProviderKind::Crossref,
        abstract_text: item.abstract_text,
    })
}

#[async_trait::async_trait]
impl Provider for CrossrefProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Crossref
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
