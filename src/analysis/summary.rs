use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::analysis::ngrams::NgramTables;
use crate::models::{CommentRecord, NgramKind, RunSummary, VideoRecord};

/// Everything the run summary is computed from.
pub struct SummaryInput<'a> {
    pub run_started_at: DateTime<Utc>,
    pub search_strategy: &'a str,
    pub total_videos_fetched: usize,
    pub comments_fetched: usize,
    pub videos: &'a [VideoRecord],
    pub comments: &'a [CommentRecord],
    pub ngrams: &'a NgramTables,
}

pub fn build_summary(input: &SummaryInput<'_>, completed_at: DateTime<Utc>) -> RunSummary {
    let videos = input.videos;
    let unique_channels = videos
        .iter()
        .map(|v| v.channel_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let avg_engagement_rate = if videos.is_empty() {
        0.0
    } else {
        videos.iter().map(|v| v.engagement_rate).sum::<f64>() / videos.len() as f64
    };

    RunSummary {
        run_started_at: input.run_started_at,
        run_completed_at: completed_at,
        search_strategy: input.search_strategy.to_string(),
        total_videos_fetched: input.total_videos_fetched,
        videos_after_filter: videos.len(),
        comments_fetched: input.comments_fetched,
        comments_after_filter: input.comments.len(),
        unique_channels,
        date_range: date_range(videos),
        total_views: videos.iter().map(|v| v.view_count).sum(),
        total_likes: videos.iter().map(|v| v.like_count).sum(),
        avg_engagement_rate,
        unique_unigrams: input.ngrams.unique_count(NgramKind::Unigram),
        unique_bigrams: input.ngrams.unique_count(NgramKind::Bigram),
        unique_trigrams: input.ngrams.unique_count(NgramKind::Trigram),
    }
}

/// `"YYYY-MM-DD to YYYY-MM-DD"` over publish dates, `"n/a"` when empty.
pub fn date_range(videos: &[VideoRecord]) -> String {
    let min = videos.iter().map(|v| v.published_at).min();
    let max = videos.iter().map(|v| v.published_at).max();
    match (min, max) {
        (Some(lo), Some(hi)) => format!("{} to {}", lo.format("%Y-%m-%d"), hi.format("%Y-%m-%d")),
        _ => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VideoStats;
    use chrono::TimeZone;

    fn video(id: &str, channel: &str, day: u32, views: u64, likes: u64) -> VideoRecord {
        let mut v = VideoRecord::from_snippet(
            id.into(),
            "t".into(),
            String::new(),
            channel.into(),
            channel.into(),
            Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap(),
            None,
        );
        v.apply_stats(&VideoStats {
            view_count: views,
            like_count: likes,
            comment_count: 0,
            duration: String::new(),
        });
        v
    }

    #[test]
    fn summary_over_filtered_videos() {
        let videos = vec![
            video("a", "c1", 9, 100, 10),
            video("b", "c2", 2, 200, 40),
            video("c", "c1", 20, 100, 0),
        ];
        let ngrams = NgramTables::default();
        let started = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
        let input = SummaryInput {
            run_started_at: started,
            search_strategy: "keywords",
            total_videos_fetched: 7,
            comments_fetched: 4,
            videos: &videos,
            comments: &[],
            ngrams: &ngrams,
        };
        let s = build_summary(&input, started);
        assert_eq!(s.total_videos_fetched, 7);
        assert_eq!(s.videos_after_filter, 3);
        assert_eq!(s.comments_fetched, 4);
        assert_eq!(s.comments_after_filter, 0);
        assert_eq!(s.unique_channels, 2);
        assert_eq!(s.date_range, "2025-03-02 to 2025-03-20");
        assert_eq!(s.total_views, 400);
        assert_eq!(s.total_likes, 50);
        assert!((s.avg_engagement_rate - (0.1 + 0.2 + 0.0) / 3.0).abs() < 1e-12);
        assert_eq!(s.unique_bigrams, 0);
    }

    #[test]
    fn empty_run_has_neutral_summary() {
        let ngrams = NgramTables::default();
        let now = Utc::now();
        let input = SummaryInput {
            run_started_at: now,
            search_strategy: "both",
            total_videos_fetched: 2,
            comments_fetched: 0,
            videos: &[],
            comments: &[],
            ngrams: &ngrams,
        };
        let s = build_summary(&input, now);
        assert_eq!(s.date_range, "n/a");
        assert_eq!(s.avg_engagement_rate, 0.0);
        assert_eq!(s.unique_channels, 0);
    }
}
