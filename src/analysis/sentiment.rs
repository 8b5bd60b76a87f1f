use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::text::lexicon::{NEGATIVE_WORDS, POSITIVE_WORDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

/// Word → polarity. A word carries at most one polarity.
pub struct Lexicon {
    words: HashMap<String, Polarity>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::from_lists(POSITIVE_WORDS, NEGATIVE_WORDS)
    }
}

impl Lexicon {
    /// Build from word lists. A word listed in both ends up negative.
    pub fn from_lists(positive: &[&str], negative: &[&str]) -> Self {
        let mut words = HashMap::new();
        for w in positive {
            words.insert(w.to_string(), Polarity::Positive);
        }
        for w in negative {
            words.insert(w.to_string(), Polarity::Negative);
        }
        Self { words }
    }

    pub fn polarity(&self, word: &str) -> Option<Polarity> {
        self.words.get(word).copied()
    }

    /// Count lexicon hits in normalized text.
    pub fn score(&self, clean_text: &str) -> SentimentScore {
        let mut out = SentimentScore::default();
        for word in clean_text.split_whitespace() {
            match self.polarity(word) {
                Some(Polarity::Positive) => out.positive += 1,
                Some(Polarity::Negative) => out.negative += 1,
                None => {}
            }
        }
        out.score = out.positive as i64 - out.negative as i64;
        out
    }
}

static DEFAULT_LEXICON: Lazy<Lexicon> = Lazy::new(Lexicon::default);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentScore {
    pub positive: u32,
    pub negative: u32,
    pub score: i64,
}

/// Score against the built-in lexicon.
pub fn score(clean_text: &str) -> SentimentScore {
    DEFAULT_LEXICON.score(clean_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::word_count;

    #[test]
    fn scenario_scores() {
        let lex = Lexicon::from_lists(&["love"], &["broke", "badly"]);
        assert_eq!(
            lex.score("love this moisturizer"),
            SentimentScore { positive: 1, negative: 0, score: 1 }
        );
        assert_eq!(
            lex.score("this broke me out badly"),
            SentimentScore { positive: 0, negative: 2, score: -2 }
        );
    }

    #[test]
    fn no_hits_is_all_zero() {
        assert_eq!(score("plain words here"), SentimentScore::default());
        assert_eq!(score(""), SentimentScore::default());
    }

    #[test]
    fn default_lexicon_covers_common_words() {
        let s = score("love this serum but the smell is awful and it burns");
        assert_eq!(s.positive, 1);
        assert_eq!(s.negative, 2);
        assert_eq!(s.score, -1);
    }

    #[test]
    fn score_bounded_by_word_count() {
        let texts = [
            "love love love",
            "awful terrible worst",
            "great serum terrible smell",
            "nothing matches",
            "",
        ];
        for t in texts {
            let s = score(t);
            assert!(s.score.unsigned_abs() as usize <= word_count(t), "{t:?}");
            assert_eq!(s.score, s.positive as i64 - s.negative as i64);
        }
    }
}
