use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::OutputConfig;
use crate::models::{ChannelSummary, CommentRecord, NgramEntry, RunSummary, VideoRecord};

pub const VIDEOS_FILE: &str = "videos_filtered.csv";
pub const COMMENTS_FILE: &str = "comments_filtered.csv";
pub const NGRAMS_TOP_FILE: &str = "ngrams_top.csv";
pub const NGRAMS_ALL_FILE: &str = "ngrams_all.csv";
pub const CHANNELS_FILE: &str = "channel_stats.csv";
pub const SUMMARY_FILE: &str = "run_summary.json";

/// Everything a run can persist. `None` tables were not computed.
pub struct Artifacts<'a> {
    pub videos: &'a [VideoRecord],
    pub comments: Option<&'a [CommentRecord]>,
    pub ngrams_top: &'a [NgramEntry],
    pub ngrams_all: &'a [NgramEntry],
    pub channels: Option<&'a [ChannelSummary]>,
    pub summary: &'a RunSummary,
}

/// Write every enabled artifact into the output directory. Returns the paths written.
pub fn write_all(cfg: &OutputConfig, a: &Artifacts<'_>) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(&cfg.dir)
        .with_context(|| format!("Failed to create output directory: {}", cfg.dir.display()))?;

    let mut written = Vec::new();

    if cfg.save_videos {
        written.push(write_csv(&cfg.dir.join(VIDEOS_FILE), a.videos)?);
    }
    if cfg.save_comments {
        if let Some(comments) = a.comments {
            written.push(write_csv(&cfg.dir.join(COMMENTS_FILE), comments)?);
        }
    }
    if cfg.save_ngrams {
        written.push(write_csv(&cfg.dir.join(NGRAMS_TOP_FILE), a.ngrams_top)?);
        written.push(write_csv(&cfg.dir.join(NGRAMS_ALL_FILE), a.ngrams_all)?);
    }
    if cfg.save_channels {
        if let Some(channels) = a.channels {
            written.push(write_csv(&cfg.dir.join(CHANNELS_FILE), channels)?);
        }
    }
    if cfg.save_summary {
        written.push(write_json(&cfg.dir.join(SUMMARY_FILE), a.summary)?);
    }

    Ok(written)
}

/// Serialize rows to CSV. An empty slice still gets a header row.
pub fn write_csv<T: Serialize + HeaderRow>(path: &Path, rows: &[T]) -> Result<PathBuf> {
    let mut w = csv::WriterBuilder::new()
        .has_headers(!rows.is_empty())
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    if rows.is_empty() {
        w.write_record(T::header())
            .with_context(|| format!("Failed to write header to {}", path.display()))?;
    }
    for row in rows {
        w.serialize(row)
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
    }
    w.flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(path.to_path_buf())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(path.to_path_buf())
}

/// Column names for a table, used when there are no rows to infer them from.
pub trait HeaderRow {
    fn header() -> &'static [&'static str];
}

impl HeaderRow for VideoRecord {
    fn header() -> &'static [&'static str] {
        &[
            "video_id", "title", "description", "channel_id", "channel_title", "published_at",
            "search_keyword", "view_count", "like_count", "comment_count", "duration",
            "duration_seconds", "url", "engagement_rate", "clean_text", "word_count",
            "is_in_domain", "positive", "negative", "sentiment_score", "sentiment_label",
        ]
    }
}

impl HeaderRow for CommentRecord {
    fn header() -> &'static [&'static str] {
        &[
            "comment_id", "video_id", "comment_text", "author", "like_count", "published_at",
            "clean_text", "word_count", "is_in_domain", "positive", "negative",
            "sentiment_score", "sentiment_label",
        ]
    }
}

impl HeaderRow for NgramEntry {
    fn header() -> &'static [&'static str] {
        &["type", "ngram", "count", "percent", "rank"]
    }
}

impl HeaderRow for ChannelSummary {
    fn header() -> &'static [&'static str] {
        &[
            "channel_id", "channel_title", "video_count", "total_views", "total_likes",
            "total_comments", "avg_views", "avg_engagement_rate", "avg_sentiment",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NgramKind;

    #[test]
    fn ngram_csv_has_expected_columns() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("n.csv");
        let rows = vec![NgramEntry {
            kind: NgramKind::Bigram,
            ngram: "dry patches".into(),
            count: 4,
            percent: 12.5,
            rank: 1,
        }];
        write_csv(&path, &rows).expect("write");
        let content = std::fs::read_to_string(&path).expect("read");
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("type,ngram,count,percent,rank"));
        assert_eq!(lines.next(), Some("bigram,dry patches,4,12.5,1"));
    }

    #[test]
    fn declared_headers_match_serialized_fields() {
        use chrono::{DateTime, Utc};

        let dir = tempfile::tempdir().expect("tempdir");
        let v = VideoRecord::from_snippet(
            "v".into(),
            "t".into(),
            "d".into(),
            "c".into(),
            "ct".into(),
            DateTime::<Utc>::UNIX_EPOCH,
            None,
        );
        let c = CommentRecord::new(
            "c1".into(),
            "v".into(),
            "hi".into(),
            "a".into(),
            0,
            DateTime::<Utc>::UNIX_EPOCH,
        );
        let vp = write_csv(&dir.path().join("v.csv"), &[v]).expect("videos");
        let cp = write_csv(&dir.path().join("c.csv"), &[c]).expect("comments");

        let first_line = |p: &Path| {
            std::fs::read_to_string(p)
                .expect("read")
                .lines()
                .next()
                .map(|l| l.to_string())
                .unwrap_or_default()
        };
        assert_eq!(first_line(&vp), VideoRecord::header().join(","));
        assert_eq!(first_line(&cp), CommentRecord::header().join(","));
    }

    #[test]
    fn empty_table_still_has_header() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("c.csv");
        write_csv::<ChannelSummary>(&path, &[]).expect("write");
        let content = std::fs::read_to_string(&path).expect("read");
        assert_eq!(content.trim_end(), ChannelSummary::header().join(","));
    }
}
