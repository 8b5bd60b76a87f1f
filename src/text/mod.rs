pub mod lexicon;

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9 ]").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"@[a-z0-9_]+").expect("valid regex"));

/// Normalize raw text for matching and counting.
///
/// Lowercases, drops URL tokens, removes `@mention` handles wherever they sit
/// in a token, strips the `#` from hashtags, turns everything outside
/// `[a-z0-9 ]` into spaces and collapses whitespace.
/// Output only ever contains `[a-z0-9]` words separated by single spaces, so
/// running it twice changes nothing.
pub fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase();

    let kept: Vec<&str> = lowered
        .split_whitespace()
        .filter(|tok| !is_url(tok))
        .map(|tok| tok.trim_start_matches('#'))
        .collect();

    let joined = kept.join(" ");
    let unmentioned = MENTION.replace_all(&joined, " ");
    let spaced = NON_ALNUM.replace_all(&unmentioned, " ");
    WHITESPACE.replace_all(&spaced, " ").trim().to_string()
}

fn is_url(token: &str) -> bool {
    token.contains("://") || token.starts_with("www.")
}

/// Whitespace-delimited tokens of already-normalized text.
pub fn tokens(clean: &str) -> Vec<&str> {
    clean.split_whitespace().collect()
}

pub fn word_count(clean: &str) -> usize {
    clean.split_whitespace().count()
}

/// Substring matcher deciding whether normalized text is skincare related.
#[derive(Debug, Clone)]
pub struct DomainMatcher {
    keywords: Vec<String>,
}

impl Default for DomainMatcher {
    fn default() -> Self {
        Self::new(lexicon::DOMAIN_KEYWORDS.iter().map(|s| s.to_string()))
    }
}

impl DomainMatcher {
    pub fn new<I: IntoIterator<Item = String>>(keywords: I) -> Self {
        let keywords = keywords
            .into_iter()
            .map(|k| normalize(&k))
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn is_in_domain(&self, clean: &str) -> bool {
        !clean.is_empty() && self.keywords.iter().any(|k| clean.contains(k.as_str()))
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

/// Union of the standard and custom stop-word lists.
#[derive(Debug, Clone)]
pub struct StopWords {
    words: HashSet<String>,
}

impl Default for StopWords {
    fn default() -> Self {
        Self::from_words(
            lexicon::STANDARD_STOPWORDS
                .iter()
                .chain(lexicon::CUSTOM_STOPWORDS)
                .copied(),
        )
    }
}

impl StopWords {
    pub fn from_words<'a, I: IntoIterator<Item = &'a str>>(words: I) -> Self {
        Self {
            words: words.into_iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
