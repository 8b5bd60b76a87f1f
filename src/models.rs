use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::sentiment::SentimentScore;

/// A video as fetched from the API, later enriched with derived fields.
///
/// Flat on purpose: the CSV writer cannot serialize nested structs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub channel_id: String,
    pub channel_title: String,
    pub published_at: DateTime<Utc>,
    pub search_keyword: Option<String>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub duration: String,

    // Derived
    pub duration_seconds: u64,
    pub url: String,
    pub engagement_rate: f64,
    pub clean_text: String,
    pub word_count: usize,
    pub is_in_domain: bool,
    pub positive: u32,
    pub negative: u32,
    pub sentiment_score: i64,
    pub sentiment_label: SentimentLabel,
}

impl VideoRecord {
    /// Partial record from a search hit; statistics and derived fields zeroed.
    pub fn from_snippet(
        video_id: String,
        title: String,
        description: String,
        channel_id: String,
        channel_title: String,
        published_at: DateTime<Utc>,
        search_keyword: Option<String>,
    ) -> Self {
        let url = format!("https://www.youtube.com/watch?v={video_id}");
        Self {
            video_id,
            title,
            description,
            channel_id,
            channel_title,
            published_at,
            search_keyword,
            view_count: 0,
            like_count: 0,
            comment_count: 0,
            duration: String::new(),
            duration_seconds: 0,
            url,
            engagement_rate: 0.0,
            clean_text: String::new(),
            word_count: 0,
            is_in_domain: false,
            positive: 0,
            negative: 0,
            sentiment_score: 0,
            sentiment_label: SentimentLabel::Neutral,
        }
    }

    /// Text the normalizer sees: title and description joined.
    pub fn full_text(&self) -> String {
        if self.description.is_empty() {
            self.title.clone()
        } else {
            format!("{} {}", self.title, self.description)
        }
    }

    pub fn apply_stats(&mut self, stats: &VideoStats) {
        self.view_count = stats.view_count;
        self.like_count = stats.like_count;
        self.comment_count = stats.comment_count;
        self.duration = stats.duration.clone();
        self.duration_seconds = parse_iso8601_duration(&stats.duration).unwrap_or(0);
        self.engagement_rate = engagement_rate(self.like_count, self.comment_count, self.view_count);
    }

    pub fn apply_sentiment(&mut self, s: SentimentScore) {
        self.positive = s.positive;
        self.negative = s.negative;
        self.sentiment_score = s.score;
        self.sentiment_label = SentimentLabel::from_score(s.score);
    }
}

/// A top-level comment on a video.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentRecord {
    pub comment_id: String,
    pub video_id: String,
    pub comment_text: String,
    pub author: String,
    pub like_count: u64,
    pub published_at: DateTime<Utc>,

    // Derived
    pub clean_text: String,
    pub word_count: usize,
    pub is_in_domain: bool,
    pub positive: u32,
    pub negative: u32,
    pub sentiment_score: i64,
    pub sentiment_label: SentimentLabel,
}

impl CommentRecord {
    pub fn new(
        comment_id: String,
        video_id: String,
        comment_text: String,
        author: String,
        like_count: u64,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            comment_id,
            video_id,
            comment_text,
            author,
            like_count,
            published_at,
            clean_text: String::new(),
            word_count: 0,
            is_in_domain: false,
            positive: 0,
            negative: 0,
            sentiment_score: 0,
            sentiment_label: SentimentLabel::Neutral,
        }
    }

    pub fn apply_sentiment(&mut self, s: SentimentScore) {
        self.positive = s.positive;
        self.negative = s.negative;
        self.sentiment_score = s.score;
        self.sentiment_label = SentimentLabel::from_score(s.score);
    }
}

/// Statistics looked up per video id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoStats {
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub duration: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn from_score(score: i64) -> Self {
        match score {
            s if s > 0 => SentimentLabel::Positive,
            s if s < 0 => SentimentLabel::Negative,
            _ => SentimentLabel::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum NgramKind {
    Unigram,
    Bigram,
    Trigram,
}

impl NgramKind {
    pub fn n(&self) -> usize {
        match self {
            NgramKind::Unigram => 1,
            NgramKind::Bigram => 2,
            NgramKind::Trigram => 3,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            NgramKind::Unigram => "unigram",
            NgramKind::Bigram => "bigram",
            NgramKind::Trigram => "trigram",
        }
    }
}

/// One row of an n-gram frequency table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NgramEntry {
    #[serde(rename = "type")]
    pub kind: NgramKind,
    pub ngram: String,
    pub count: u64,
    pub percent: f64,
    pub rank: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelSummary {
    pub channel_id: String,
    pub channel_title: String,
    pub video_count: usize,
    pub total_views: u64,
    pub total_likes: u64,
    pub total_comments: u64,
    pub avg_views: f64,
    pub avg_engagement_rate: f64,
    pub avg_sentiment: f64,
}

/// Run-level statistics written to `run_summary.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub run_started_at: DateTime<Utc>,
    pub run_completed_at: DateTime<Utc>,
    pub search_strategy: String,
    pub total_videos_fetched: usize,
    pub videos_after_filter: usize,
    pub comments_fetched: usize,
    pub comments_after_filter: usize,
    pub unique_channels: usize,
    pub date_range: String,
    pub total_views: u64,
    pub total_likes: u64,
    pub avg_engagement_rate: f64,
    pub unique_unigrams: usize,
    pub unique_bigrams: usize,
    pub unique_trigrams: usize,
}

/// (likes + comments) / max(views, 1)
pub fn engagement_rate(likes: u64, comments: u64, views: u64) -> f64 {
    (likes + comments) as f64 / views.max(1) as f64
}

/// Parse an ISO-8601 video duration such as `PT1H2M3S` or `P1DT5M` into seconds.
pub fn parse_iso8601_duration(s: &str) -> Option<u64> {
    let rest = s.strip_prefix('P')?;
    let mut total = 0u64;
    let mut digits = String::new();
    let mut in_time = false;
    let mut seen_unit = false;

    for ch in rest.chars() {
        match ch {
            'T' => {
                if !digits.is_empty() {
                    return None;
                }
                in_time = true;
            }
            '0'..='9' => digits.push(ch),
            unit => {
                let value: u64 = digits.parse().ok()?;
                digits.clear();
                let factor = match (unit, in_time) {
                    ('W', false) => 604_800,
                    ('D', false) => 86_400,
                    ('H', true) => 3_600,
                    ('M', true) => 60,
                    ('S', true) => 1,
                    _ => return None,
                };
                total = value.checked_mul(factor)?.checked_add(total)?;
                seen_unit = true;
            }
        }
    }

    if !digits.is_empty() || !seen_unit {
        return None;
    }
    Some(total)
}
