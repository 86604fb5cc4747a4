//! Citation proposals and the review state machine.
//!
//! Each qualifying sentence produces one [`CitationProposal`] in
//! `pending_review`. A reviewer then accepts, edits, or rejects it; those
//! states are terminal. The session lives in memory for one request and is
//! never persisted.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::format::{CitationStyle, format_citation};
use crate::models::{FinalizedCitation, PaperDetails};

/// Review status of a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    /// Awaiting a reviewer decision.
    PendingReview,
    /// Approved as proposed.
    Accepted,
    /// Approved with replacement paper details and/or style.
    Edited,
    /// Excluded from the final output.
    Rejected,
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PendingReview => "pending_review",
            Self::Accepted => "accepted",
            Self::Edited => "edited",
            Self::Rejected => "rejected",
        })
    }
}

/// Where in the document a proposal's sentence sits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    /// 1-based paragraph index.
    pub paragraph_index: usize,

    /// 1-based sentence index within the paragraph.
    pub sentence_index: usize,

    /// Page-style hint in the `paragraph(sentence)` form.
    pub page_label: String,
}

/// A proposed citation awaiting review.
///
/// Created by the engine; mutated only by [`ReviewSession`] in response to
/// reviewer decisions, never by internal scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationProposal {
    /// Unique proposal id.
    pub id: Uuid,

    /// The sentence the citation would attach to.
    pub original_sentence: String,

    /// Best-scored candidate paper.
    pub paper: PaperDetails,

    /// Lower-ranked candidates above threshold (multi-candidate mode only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternates: Vec<PaperDetails>,

    /// Review status.
    pub status: ProposalStatus,

    /// Location metadata.
    pub location: Location,

    /// Style override supplied by an edit decision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_override: Option<CitationStyle>,
}

impl CitationProposal {
    /// Create a pending proposal.
    #[must_use]
    pub fn new(original_sentence: String, paper: PaperDetails, location: Location) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_sentence,
            paper,
            alternates: Vec::new(),
            status: ProposalStatus::PendingReview,
            location,
            style_override: None,
        }
    }
}

/// A reviewer decision on one proposal.
#[derive(Debug, Clone)]
pub enum Decision {
    /// Keep the proposal as-is.
    Accept,
    /// Replace the paper details and/or citation style.
    Edit {
        /// Replacement paper details, if changed.
        paper: Option<PaperDetails>,
        /// Replacement style, if changed.
        style: Option<CitationStyle>,
    },
    /// Drop the proposal from the final output.
    Reject,
}

impl Decision {
    fn target_status(&self) -> ProposalStatus {
        match self {
            Self::Accept => ProposalStatus::Accepted,
            Self::Edit { .. } => ProposalStatus::Edited,
            Self::Reject => ProposalStatus::Rejected,
        }
    }
}

/// In-memory review session holding the proposals of one run.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    style: CitationStyle,
    proposals: Vec<CitationProposal>,
}

impl ReviewSession {
    /// Create a session over the proposals of a run.
    #[must_use]
    pub fn new(style: CitationStyle, proposals: Vec<CitationProposal>) -> Self {
        Self { style, proposals }
    }

    /// The proposals, in document order.
    #[must_use]
    pub fn proposals(&self) -> &[CitationProposal] {
        &self.proposals
    }

    /// Apply a reviewer decision to one proposal.
    ///
    /// Re-applying a decision that matches the proposal's terminal status is
    /// a no-op (re-editing an edited proposal updates its payload); a
    /// conflicting decision on a terminal proposal is an error.
    pub fn decide(&mut self, id: Uuid, decision: Decision) -> EngineResult<()> {
        let target = decision.target_status();
        let proposal = self
            .proposals
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(EngineError::UnknownProposal(id))?;

        if proposal.status != ProposalStatus::PendingReview && proposal.status != target {
            return Err(EngineError::InvalidTransition { id, from: proposal.status, to: target });
        }

        if let Decision::Edit { paper, style } = decision {
            if let Some(paper) = paper {
                proposal.paper = paper;
            }
            if let Some(style) = style {
                proposal.style_override = Some(style);
            }
        }
        proposal.status = target;
        Ok(())
    }

    /// Render the final citation list.
    ///
    /// Non-rejected proposals are formatted in paragraph/sentence order;
    /// edited proposals use their replacement details and style.
    #[must_use]
    pub fn finalize(&self) -> Vec<FinalizedCitation> {
        let mut kept: Vec<&CitationProposal> =
            self.proposals.iter().filter(|p| p.status != ProposalStatus::Rejected).collect();
        kept.sort_by_key(|p| (p.location.paragraph_index, p.location.sentence_index));

        kept.into_iter()
            .map(|proposal| {
                let style = proposal.style_override.unwrap_or(self.style);
                FinalizedCitation {
                    sentence: proposal.original_sentence.clone(),
                    citation: format_citation(&proposal.paper.authors, proposal.paper.year, style),
                    paragraph_index: proposal.location.paragraph_index,
                    sentence_index: proposal.location.sentence_index,
                }
            })
            .collect()
    }
}
