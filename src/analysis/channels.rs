use std::collections::HashMap;

use crate::models::{ChannelSummary, VideoRecord};

/// Per-channel totals and means over filtered videos, busiest channel first.
///
/// Counts are already zero-defaulted at the API boundary, so every mean is
/// taken over all of the channel's videos.
pub fn summarize_channels(videos: &[VideoRecord]) -> Vec<ChannelSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&VideoRecord>> = HashMap::new();

    for v in videos {
        let group = groups.entry(v.channel_id.as_str()).or_insert_with(|| {
            order.push(v.channel_id.as_str());
            Vec::new()
        });
        group.push(v);
    }

    let mut out: Vec<ChannelSummary> = order
        .into_iter()
        .filter_map(|id| groups.get(id).map(|members| summarize_group(id, members)))
        .collect();

    out.sort_by(|a, b| {
        b.total_views
            .cmp(&a.total_views)
            .then_with(|| a.channel_id.cmp(&b.channel_id))
    });
    out
}

fn summarize_group(channel_id: &str, members: &[&VideoRecord]) -> ChannelSummary {
    let n = members.len().max(1) as f64;
    let total_views: u64 = members.iter().map(|v| v.view_count).sum();
    let total_likes: u64 = members.iter().map(|v| v.like_count).sum();
    let total_comments: u64 = members.iter().map(|v| v.comment_count).sum();
    let engagement: f64 = members.iter().map(|v| v.engagement_rate).sum();
    let sentiment: i64 = members.iter().map(|v| v.sentiment_score).sum();

    ChannelSummary {
        channel_id: channel_id.to_string(),
        channel_title: members
            .first()
            .map(|v| v.channel_title.clone())
            .unwrap_or_default(),
        video_count: members.len(),
        total_views,
        total_likes,
        total_comments,
        avg_views: total_views as f64 / n,
        avg_engagement_rate: engagement / n,
        avg_sentiment: sentiment as f64 / n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VideoStats;
    use chrono::{DateTime, Utc};

    fn video(id: &str, channel: &str, views: u64, likes: u64, comments: u64, score: i64) -> VideoRecord {
        let mut v = VideoRecord::from_snippet(
            id.into(),
            format!("title {id}"),
            String::new(),
            channel.into(),
            format!("{channel} title"),
            DateTime::<Utc>::UNIX_EPOCH,
            None,
        );
        v.apply_stats(&VideoStats {
            view_count: views,
            like_count: likes,
            comment_count: comments,
            duration: String::new(),
        });
        v.sentiment_score = score;
        v
    }

    #[test]
    fn totals_match_member_sums() {
        let videos = vec![
            video("a", "c1", 100, 10, 5, 2),
            video("b", "c2", 5000, 300, 20, -1),
            video("c", "c1", 300, 30, 15, 0),
        ];
        let summary = summarize_channels(&videos);
        assert_eq!(summary.len(), 2);

        for ch in &summary {
            let members: Vec<_> = videos.iter().filter(|v| v.channel_id == ch.channel_id).collect();
            assert_eq!(ch.video_count, members.len());
            assert_eq!(ch.total_views, members.iter().map(|v| v.view_count).sum::<u64>());
            assert_eq!(ch.total_likes, members.iter().map(|v| v.like_count).sum::<u64>());
            assert_eq!(ch.total_comments, members.iter().map(|v| v.comment_count).sum::<u64>());
        }

        let c1 = summary.iter().find(|c| c.channel_id == "c1").expect("c1");
        assert_eq!(c1.avg_views, 200.0);
        assert_eq!(c1.avg_sentiment, 1.0);
        assert_eq!(c1.channel_title, "c1 title");
        assert!((c1.avg_engagement_rate - (0.15 + 0.15) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn ordered_by_total_views() {
        let videos = vec![
            video("a", "small", 10, 0, 0, 0),
            video("b", "big", 9000, 0, 0, 0),
            video("c", "mid", 500, 0, 0, 0),
        ];
        let ids: Vec<_> = summarize_channels(&videos)
            .into_iter()
            .map(|c| c.channel_id)
            .collect();
        assert_eq!(ids, ["big", "mid", "small"]);
    }

    #[test]
    fn no_videos_no_channels() {
        assert!(summarize_channels(&[]).is_empty());
    }
}
