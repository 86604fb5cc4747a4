//! Sentence selection under a call budget.
//!
//! Decides, once per run, which sentences are worth spending provider calls
//! on. When everything fits the budget the selection is the identity;
//! otherwise sentences are ranked by a priority heuristic with a small
//! random jitter so borderline sentences are not starved on every run.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::budget::ProcessingBudget;
use crate::config::defaults::MIN_SENTENCE_CHARS;
use crate::models::SentenceUnit;
use crate::scorer;

/// Selects the sentences a run will spend provider calls on.
#[derive(Debug)]
pub struct SentenceSelector {
    min_chars: usize,
    rng: StdRng,
}

impl SentenceSelector {
    /// Selector with a randomly seeded jitter source.
    #[must_use]
    pub fn new() -> Self {
        Self { min_chars: MIN_SENTENCE_CHARS, rng: StdRng::from_entropy() }
    }

    /// Selector with a fixed seed, for reproducible runs and tests.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self { min_chars: MIN_SENTENCE_CHARS, rng: StdRng::seed_from_u64(seed) }
    }

    /// Priority heuristic: longer sentences, domain vocabulary, and digits
    /// (a proxy for statistics and claims) rank higher.
    fn priority(sentence: &SentenceUnit) -> f64 {
        let token_count = sentence.text.split_whitespace().count();
        let domain_hits = scorer::domain_term_count(&sentence.text);
        let has_digit = sentence.text.chars().any(|c| c.is_ascii_digit());

        token_count as f64 * 0.1 + domain_hits as f64 + if has_digit { 0.5 } else { 0.0 }
    }

    /// Choose which sentences to search, within what the budget can pay for.
    ///
    /// Short sentences are dropped as noise. If the rest fit the
    /// budget-implied capacity they are all returned; otherwise the top
    /// capacity-many by jittered priority are taken and the lower half of
    /// that selection is shuffled to diversify coverage. A sentence is
    /// never selected twice.
    pub fn select(
        &mut self,
        sentences: &[SentenceUnit],
        budget: &ProcessingBudget,
        provider_count: usize,
    ) -> Vec<SentenceUnit> {
        let candidates: Vec<&SentenceUnit> =
            sentences.iter().filter(|s| s.text.chars().count() >= self.min_chars).collect();

        // Budget-implied capacity: one sentence costs up to one call per
        // provider. A nonzero budget always pays for at least one sentence,
        // even if its fan-out will be partial.
        let remaining = budget.remaining() as usize;
        let capacity = match remaining {
            0 => 0,
            _ => (remaining / provider_count.max(1)).max(1),
        };
        if candidates.len() <= capacity {
            return candidates.into_iter().cloned().collect();
        }

        let mut ranked: Vec<(f64, &SentenceUnit)> = candidates
            .into_iter()
            .map(|s| (Self::priority(s) + self.rng.gen_range(0.0..1.0), s))
            .collect();
        ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(capacity);

        let mut selected: Vec<SentenceUnit> =
            ranked.into_iter().map(|(_, s)| s.clone()).collect();

        let half = selected.len() / 2;
        selected[half..].shuffle(&mut self.rng);

        selected
    }
}

impl Default for SentenceSelector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::collections::HashSet;
    use std::time::Duration;

    use super::*;
    use crate::providers::ProviderKind;

    fn budget_with(max_calls: u32) -> ProcessingBudget {
        let delays: HashMap<ProviderKind, Duration> =
            ProviderKind::ALL.into_iter().map(|kind| (kind, Duration::ZERO)).collect();
        ProcessingBudget::new(max_calls, delays)
    }

    fn sentence(text: &str, index: usize) -> SentenceUnit {
        SentenceUnit::new(text, 1, index)
    }

    #[test]
    fn test_short_sentences_are_filtered() {
        let mut selector = SentenceSelector::with_seed(1);
        let sentences = vec![
            sentence("Too short.", 1),
            sentence("This sentence is comfortably long enough to search.", 2),
        ];
        let selected = selector.select(&sentences, &budget_with(100), 2);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].sentence_index, 2);
    }

    #[test]
    fn test_everything_returned_when_budget_allows() {
        let mut selector = SentenceSelector::with_seed(1);
        let sentences: Vec<SentenceUnit> = (1..=5)
            .map(|i| sentence("A sentence that is long enough for selection purposes.", i))
            .collect();
        let selected = selector.select(&sentences, &budget_with(100), 3);
        assert_eq!(selected.len(), 5);
    }

    #[test]
    fn test_selection_bounded_by_capacity() {
        let mut selector = SentenceSelector::with_seed(7);
        let sentences: Vec<SentenceUnit> = (1..=20)
            .map(|i| sentence("A sentence that is long enough for selection purposes.", i))
            .collect();
        // 9 remaining calls across 3 providers pays for 3 sentences.
        let selected = selector.select(&sentences, &budget_with(9), 3);
        assert_eq!(selected.len(), 3);
    }

    #[test]
    fn test_no_sentence_selected_twice() {
        let mut selector = SentenceSelector::with_seed(42);
        let sentences: Vec<SentenceUnit> = (1..=30)
            .map(|i| sentence("Research results showed significant effects in 2024 data.", i))
            .collect();
        let selected = selector.select(&sentences, &budget_with(20), 2);
        let indices: HashSet<usize> = selected.iter().map(|s| s.sentence_index).collect();
        assert_eq!(indices.len(), selected.len());
    }

    #[test]
    fn test_domain_sentences_outrank_plain_ones() {
        let mut selector = SentenceSelector::with_seed(3);
        let mut sentences = vec![
            sentence("The weather was pleasant and everyone enjoyed walking.", 1),
            sentence("The study reported significant findings from the 2023 data analysis.", 2),
            sentence("Dinner was served late in the evening as usual.", 3),
        ];
        sentences.extend(
            (4..=10).map(|i| sentence("Another plain sentence without any special terms.", i)),
        );

        // Capacity of one: the domain-heavy sentence should win even with jitter.
        let selected = selector.select(&sentences, &budget_with(1), 1);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].sentence_index, 2);
    }
}
