//! Paragraph segmentation.
//!
//! Splits the document source's paragraph stream into [`SentenceUnit`]s and
//! skips headings, which are never citable.

use crate::models::SentenceUnit;

/// Counters describing what segmentation skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentStats {
    /// Paragraphs recognized as headings.
    pub skipped_headings: usize,
    /// Paragraphs with no text.
    pub empty_paragraphs: usize,
}

/// Heading heuristic: short paragraphs without sentence punctuation.
#[must_use]
pub fn is_heading(paragraph: &str) -> bool {
    let text = paragraph.trim();
    if text.is_empty() {
        return false;
    }
    let words = text.split_whitespace().count();
    words < 8 && !text.chars().any(|c| matches!(c, '.' | '?' | '!' | ';' | ':'))
}

/// Split a paragraph into sentences on terminal punctuation.
fn split_sentences(paragraph: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = paragraph.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '?' | '!') {
            // Sentence boundary only when followed by whitespace or the end,
            // so decimals and abbreviations like "3.5" stay intact.
            match chars.peek() {
                Some(next) if !next.is_whitespace() => {}
                _ => {
                    let sentence = current.trim();
                    if !sentence.is_empty() {
                        sentences.push(sentence.to_string());
                    }
                    current.clear();
                }
            }
        }
    }

    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

/// Extract sentence units from an ordered paragraph stream.
///
/// Paragraph and sentence indices are 1-based. Headings and blank
/// paragraphs are skipped and counted in the returned stats.
#[must_use]
pub fn extract_sentences(paragraphs: &[String]) -> (Vec<SentenceUnit>, SegmentStats) {
    let mut units = Vec::new();
    let mut stats = SegmentStats::default();

    for (para_idx, paragraph) in paragraphs.iter().enumerate() {
        let text = paragraph.trim();
        if text.is_empty() {
            stats.empty_paragraphs += 1;
            continue;
        }
        if is_heading(text) {
            stats.skipped_headings += 1;
            continue;
        }

        for (sent_idx, sentence) in split_sentences(text).into_iter().enumerate() {
            units.push(SentenceUnit::new(sentence, para_idx + 1, sent_idx + 1));
        }
    }

    (units, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_detection() {
        assert!(is_heading("Introduction"));
        assert!(is_heading("Results and Discussion"));
        assert!(!is_heading("This is a full sentence that ends properly."));
        assert!(!is_heading("Methods: overview"));
        assert!(!is_heading(""));
    }

    #[test]
    fn test_split_sentences_keeps_decimals() {
        let sentences = split_sentences("Growth was 3.5 percent. That was expected.");
        assert_eq!(sentences, vec!["Growth was 3.5 percent.", "That was expected."]);
    }

    #[test]
    fn test_extract_skips_headings_and_blanks() {
        let paragraphs = vec![
            "Overview".to_string(),
            String::new(),
            "First sentence here. Second sentence too!".to_string(),
        ];
        let (units, stats) = extract_sentences(&paragraphs);

        assert_eq!(stats.skipped_headings, 1);
        assert_eq!(stats.empty_paragraphs, 1);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].paragraph_index, 3);
        assert_eq!(units[0].sentence_index, 1);
        assert_eq!(units[1].sentence_index, 2);
    }

    #[test]
    fn test_unterminated_paragraph_yields_trailing_sentence() {
        let sentences = split_sentences("A closing thought without punctuation");
        assert_eq!(sentences.len(), 1);
    }
}
