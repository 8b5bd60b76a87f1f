use std::collections::HashMap;

use crate::models::{NgramEntry, NgramKind};
use crate::text::{self, StopWords};

/// Which orders to compute and how many rows the "top" table keeps per order.
#[derive(Debug, Clone, PartialEq)]
pub struct NgramOptions {
    pub unigrams: bool,
    pub bigrams: bool,
    pub trigrams: bool,
    pub top_k: usize,
}

impl Default for NgramOptions {
    fn default() -> Self {
        Self {
            unigrams: true,
            bigrams: true,
            trigrams: true,
            top_k: 50,
        }
    }
}

impl NgramOptions {
    pub fn enabled_kinds(&self) -> Vec<NgramKind> {
        let mut kinds = Vec::new();
        if self.unigrams {
            kinds.push(NgramKind::Unigram);
        }
        if self.bigrams {
            kinds.push(NgramKind::Bigram);
        }
        if self.trigrams {
            kinds.push(NgramKind::Trigram);
        }
        kinds
    }
}

/// Ranked n-gram tables for every enabled order.
#[derive(Debug, Clone, Default)]
pub struct NgramTables {
    /// Full ranked table, orders concatenated unigram → trigram.
    pub all: Vec<NgramEntry>,
    /// First `top_k` rows of each order.
    pub top: Vec<NgramEntry>,
}

impl NgramTables {
    /// Number of distinct n-grams of one order.
    pub fn unique_count(&self, kind: NgramKind) -> usize {
        self.all.iter().filter(|e| e.kind == kind).count()
    }
}

/// Windows of `n` tokens that contain no stop word.
pub fn ngrams_of(tokens: &[&str], n: usize, stop: &StopWords) -> Vec<String> {
    if n == 0 || tokens.len() < n {
        return Vec::new();
    }
    tokens
        .windows(n)
        .filter(|w| !w.iter().any(|t| stop.contains(t)))
        .map(|w| w.join(" "))
        .collect()
}

/// Count surviving n-grams of one order across every text.
pub fn count_ngrams<'a, I>(texts: I, n: usize, stop: &StopWords) -> HashMap<String, u64>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<String, u64> = HashMap::new();
    for clean in texts {
        let toks = text::tokens(clean);
        for gram in ngrams_of(&toks, n, stop) {
            *counts.entry(gram).or_insert(0) += 1;
        }
    }
    counts
}

/// Rank counts: count descending, ties by n-gram ascending. Percent is over
/// the order's total and rounded to two decimals.
pub fn rank_counts(kind: NgramKind, counts: HashMap<String, u64>) -> Vec<NgramEntry> {
    let total: u64 = counts.values().sum();
    let mut rows: Vec<(String, u64)> = counts.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    rows.into_iter()
        .enumerate()
        .map(|(i, (ngram, count))| NgramEntry {
            kind,
            ngram,
            count,
            percent: round2(count as f64 / total.max(1) as f64 * 100.0),
            rank: i + 1,
        })
        .collect()
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Build ranked tables over the combined corpus of `texts`.
pub fn aggregate(texts: &[&str], opts: &NgramOptions, stop: &StopWords) -> NgramTables {
    let mut tables = NgramTables::default();
    for kind in opts.enabled_kinds() {
        let counts = count_ngrams(texts.iter().copied(), kind.n(), stop);
        let ranked = rank_counts(kind, counts);
        tables
            .top
            .extend(ranked.iter().take(opts.top_k).cloned());
        tables.all.extend(ranked);
    }
    tables
}
