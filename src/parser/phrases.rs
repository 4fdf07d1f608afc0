use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// One unigram or bigram occurrence extracted from a message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseOccurrence {
    pub text: String,
    /// 1 for unigrams, 2 for bigrams.
    pub num_words: u32,
}

/// Extract unigram and bigram occurrences from message text.
///
/// Words come from UAX-29 word-boundary segmentation, so punctuation does
/// not stick to tokens the way a whitespace split would leave it. All
/// unigrams are emitted first, then adjacent-pair bigrams joined by a
/// single space, both in left-to-right order.
pub fn extract(text: &str) -> Vec<PhraseOccurrence> {
    let words: Vec<&str> = text.unicode_words().collect();

    let mut phrases = Vec::with_capacity(words.len().saturating_mul(2));
    for word in &words {
        phrases.push(PhraseOccurrence {
            text: (*word).to_string(),
            num_words: 1,
        });
    }
    for pair in words.windows(2) {
        phrases.push(PhraseOccurrence {
            text: format!("{} {}", pair[0], pair[1]),
            num_words: 2,
        });
    }
    phrases
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(phrases: &[PhraseOccurrence], num_words: u32) -> Vec<&str> {
        phrases
            .iter()
            .filter(|p| p.num_words == num_words)
            .map(|p| p.text.as_str())
            .collect()
    }

    #[test]
    fn test_unigrams_and_bigrams_in_order() {
        let phrases = extract("the quick brown fox");
        assert_eq!(texts(&phrases, 1), vec!["the", "quick", "brown", "fox"]);
        assert_eq!(
            texts(&phrases, 2),
            vec!["the quick", "quick brown", "brown fox"]
        );
    }

    #[test]
    fn test_empty_text() {
        assert!(extract("").is_empty());
        assert!(extract("   \n\t ").is_empty());
    }

    #[test]
    fn test_single_word_has_no_bigram() {
        let phrases = extract("hello");
        assert_eq!(phrases.len(), 1);
        assert_eq!(phrases[0].text, "hello");
        assert_eq!(phrases[0].num_words, 1);
    }

    #[test]
    fn test_punctuation_does_not_join_words() {
        let phrases = extract("Hello, world! How's it going?");
        let unigrams = texts(&phrases, 1);
        assert!(unigrams.contains(&"Hello"));
        assert!(unigrams.contains(&"world"));
        // Contractions survive as single words under UAX-29.
        assert!(unigrams.contains(&"How's"));
        assert!(!unigrams.iter().any(|w| w.contains(',') || w.contains('!')));
    }

    #[test]
    fn test_unicode_text() {
        let phrases = extract("café naïve");
        assert_eq!(texts(&phrases, 1), vec!["café", "naïve"]);
        assert_eq!(texts(&phrases, 2), vec!["café naïve"]);
    }
}
