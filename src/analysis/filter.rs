use crate::models::{CommentRecord, VideoRecord};

/// Minimum values a record must reach to be kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    pub min_text_length: usize,
    pub min_word_count: usize,
    pub min_view_count: u64,
    pub min_engagement_rate: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_text_length: 10,
            min_word_count: 3,
            min_view_count: 100,
            min_engagement_rate: 0.0,
        }
    }
}

fn text_passes(clean_text: &str, word_count: usize, in_domain: bool, t: &Thresholds) -> bool {
    in_domain && clean_text.len() >= t.min_text_length && word_count >= t.min_word_count
}

pub fn keep_video(v: &VideoRecord, t: &Thresholds) -> bool {
    text_passes(&v.clean_text, v.word_count, v.is_in_domain, t)
        && v.view_count >= t.min_view_count
        && v.engagement_rate >= t.min_engagement_rate
}

pub fn keep_comment(c: &CommentRecord, t: &Thresholds) -> bool {
    text_passes(&c.clean_text, c.word_count, c.is_in_domain, t)
}

pub fn filter_videos(videos: Vec<VideoRecord>, t: &Thresholds) -> Vec<VideoRecord> {
    videos.into_iter().filter(|v| keep_video(v, t)).collect()
}

pub fn filter_comments(comments: Vec<CommentRecord>, t: &Thresholds) -> Vec<CommentRecord> {
    comments.into_iter().filter(|c| keep_comment(c, t)).collect()
}
