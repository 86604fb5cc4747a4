//! Data models shared across the engine.

mod paper;
mod payload;
mod sentence;

pub use paper::{PaperDetails, PaperRecord, ScoredPaper};
pub use payload::{ContextInfo, Diagnostics, FinalizedCitation, ReviewPayload};
pub use sentence::SentenceUnit;
