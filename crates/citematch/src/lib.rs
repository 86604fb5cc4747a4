//! Citation matching engine.
//!
//! Locates, scores, and attaches academic citations to sentences extracted
//! from a document, drawing evidence from several independent bibliographic
//! search providers (Semantic Scholar, Crossref, OpenAlex).
//!
//! # Features
//!
//! - **Concurrent fan-out**: each query hits every provider at once, with
//!   per-provider rate limiting and a global call budget
//! - **Run-scoped caching**: repeated queries never touch the network twice
//! - **Deterministic scoring**: lexical overlap plus metadata boosts
//! - **Human review**: proposals move through an accept/edit/reject state
//!   machine before anything is committed to the document
//!
//! # Example
//!
//! ```no_run
//! use citematch::{CitationEngine, Config, EngineOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = CitationEngine::new(Config::default(), EngineOptions::default())?;
//!
//!     let paragraphs = vec![
//!         "Deep learning models are transforming healthcare delivery.".to_string(),
//!     ];
//!     let outcome = engine.prepare_review(&paragraphs).await?;
//!     println!("{} proposals", outcome.payload.total_citations);
//!     Ok(())
//! }
//! ```

pub mod budget;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod models;
pub mod oracle;
pub mod orchestrator;
pub mod providers;
pub mod query;
pub mod review;
pub mod scorer;
pub mod segment;
pub mod selector;

pub use config::Config;
pub use engine::{CitationEngine, EngineOptions, ReviewOutcome, RunContext};
pub use error::{ClientError, EngineError};
pub use format::CitationStyle;
pub use review::{Decision, ReviewSession};
