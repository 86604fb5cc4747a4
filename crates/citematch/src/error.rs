//! Error types for the citation matching engine.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! Provider-side failures are recovered inside the adapters and never reach callers;
//! `EngineError` covers the few conditions that are fatal for a run or a single call.

use uuid::Uuid;

use crate::review::ProposalStatus;

/// Errors from the HTTP client layer.
///
/// These never escape a provider adapter: the adapter logs them and
/// reports zero results instead.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error (retry layer).
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Unexpected HTTP status.
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Response body or message.
        message: String,
    },
}

impl ClientError {
    /// Create an unexpected-status error.
    #[must_use]
    pub fn unexpected_status(status: u16, message: impl Into<String>) -> Self {
        Self::UnexpectedStatus { status, message: message.into() }
    }
}

/// Errors surfaced to callers of the engine and the review session.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// The source document contained no usable text (fatal, no partial run).
    #[error("document contains no text to process")]
    EmptyDocument,

    /// Citation style string did not name a supported style.
    #[error("unsupported citation style: {0}")]
    UnsupportedStyle(String),

    /// Review decision referenced a proposal id that does not exist.
    #[error("unknown proposal: {0}")]
    UnknownProposal(Uuid),

    /// Review decision conflicts with a terminal proposal status.
    #[error("proposal {id} is already {from}, cannot transition to {to}")]
    InvalidTransition {
        /// Proposal the decision targeted.
        id: Uuid,
        /// Status the proposal already holds.
        from: ProposalStatus,
        /// Status the decision asked for.
        to: ProposalStatus,
    },
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
