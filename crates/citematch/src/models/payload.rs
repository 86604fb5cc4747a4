//! Payloads handed to external collaborators.
//!
//! [`ReviewPayload`] is the citation-review document returned after a run;
//! [`FinalizedCitation`] rows are what the document renderer inserts back.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::review::CitationProposal;

/// Document context produced by the context oracle, echoed back to the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextInfo {
    /// One-sentence summary of the document's research topic.
    #[serde(default)]
    pub research_context: String,

    /// Snake-cased academic field the document belongs to.
    #[serde(default)]
    pub document_category: String,

    /// Technical keywords extracted from the document.
    #[serde(default)]
    pub field_keywords: Vec<String>,
}

/// Run diagnostics reported alongside the proposals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Sentences that went through a provider search.
    pub processed_sentences: usize,

    /// Sentences extracted but never searched (too short, unselected,
    /// empty query, or cut off by the run deadline).
    pub skipped_sentences: usize,

    /// Paragraphs skipped as headings.
    pub skipped_headings: usize,

    /// External provider calls actually made.
    pub api_calls_made: u32,

    /// Call ceiling for the run.
    pub max_api_calls: u32,

    /// Search-cache hits during the run.
    pub cache_hits: u64,
}

/// Citation-review payload for one processing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewPayload {
    /// Unique id for this run.
    pub document_id: Uuid,

    /// Number of proposals generated.
    pub total_citations: usize,

    /// Proposals in paragraph/sentence order.
    pub citations: Vec<CitationProposal>,

    /// Context-oracle output used to enrich queries (empty when unavailable).
    pub context_info: ContextInfo,

    /// Run diagnostics.
    pub diagnostics: Diagnostics,
}

/// One formatted citation ready for insertion into the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizedCitation {
    /// The sentence the citation is attached to.
    pub sentence: String,

    /// Rendered in-text citation, e.g. `(Jane et al., 2023)`.
    pub citation: String,

    /// 1-based paragraph index of the sentence.
    pub paragraph_index: usize,

    /// 1-based sentence index within the paragraph.
    pub sentence_index: usize,
}
