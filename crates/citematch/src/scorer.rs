//! Deterministic relevance scoring.
//!
//! Maps a (sentence, paper) pair to a score in [0, 1] from lexical overlap
//! and paper metadata. Pure: no I/O, no randomness, identical inputs always
//! produce an identical float.

use std::collections::HashSet;

use crate::models::PaperRecord;

/// Stop words removed before overlap computation.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "in", "on", "to", "for", "of", "is", "are", "was", "were",
];

/// Academic vocabulary used for the domain boost and sentence prioritization.
pub const DOMAIN_VOCABULARY: &[&str] = &[
    "study",
    "research",
    "analysis",
    "data",
    "results",
    "findings",
    "evidence",
    "method",
    "approach",
    "theory",
    "model",
    "framework",
    "hypothesis",
    "significant",
    "correlation",
    "impact",
    "effect",
    "relationship",
    "according",
    "reported",
    "demonstrated",
    "showed",
    "indicated",
];

/// Venue tokens that mark established publication outlets.
const HIGH_IMPACT_VENUE_TOKENS: &[&str] =
    &["journal", "proceedings", "conference", "review", "nature", "science", "ieee", "acm"];

/// Lower-cased word set with punctuation trimmed and stop words removed.
fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|token| !token.is_empty() && !STOP_WORDS.contains(&token.as_str()))
        .collect()
}

fn overlap(sentence_words: &HashSet<String>, other: &HashSet<String>) -> f64 {
    if sentence_words.is_empty() {
        return 0.0;
    }
    let shared = sentence_words.intersection(other).count();
    shared as f64 / sentence_words.len() as f64
}

/// Score a candidate paper against a sentence.
///
/// Papers without a single non-blank author are disqualified outright, as
/// are sentences whose word set is empty after stop-word removal.
#[must_use]
pub fn score(sentence: &str, paper: &PaperRecord) -> f64 {
    if !paper.has_valid_authors() {
        return 0.0;
    }

    let sentence_words = word_set(sentence);
    if sentence_words.is_empty() {
        return 0.0;
    }

    let title_words = word_set(&paper.title);
    let title_overlap = overlap(&sentence_words, &title_words);

    let abstract_overlap = paper
        .abstract_text
        .as_deref()
        .map(|text| overlap(&sentence_words, &word_set(text)))
        .unwrap_or(0.0);

    let mut score = 0.8 * title_overlap + 0.2 * abstract_overlap;

    // Additive domain boost, capped at +0.2.
    let title_lower = paper.title.to_lowercase();
    let domain_hits =
        DOMAIN_VOCABULARY.iter().filter(|term| title_lower.contains(**term)).count();
    score += (domain_hits as f64 * 0.1).min(0.2);

    // Recency.
    if let Some(year) = paper.year {
        if year >= 2020 {
            score *= 1.2;
        } else if year >= 2015 {
            score *= 1.1;
        } else if year >= 2010 {
            score *= 1.05;
        }
    }

    // Citation weight.
    if paper.citation_count > 100 {
        score *= 1.1;
    } else if paper.citation_count > 50 {
        score *= 1.05;
    } else if paper.citation_count > 10 {
        score *= 1.02;
    }

    // Multi-author papers.
    if paper.valid_authors().len() > 1 {
        score *= 1.05;
    }

    // Established venues.
    if let Some(venue) = &paper.venue {
        let venue_lower = venue.to_lowercase();
        if HIGH_IMPACT_VENUE_TOKENS.iter().any(|token| venue_lower.contains(token)) {
            score *= 1.05;
        }
    }

    score.min(1.0)
}

/// Number of domain vocabulary terms appearing in a sentence.
#[must_use]
pub fn domain_term_count(sentence: &str) -> usize {
    let lower = sentence.to_lowercase();
    DOMAIN_VOCABULARY.iter().filter(|term| lower.contains(**term)).count()
}
