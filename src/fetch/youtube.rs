use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use tracing::info;

use crate::fetch::{SearchQuery, SearchTarget, VideoSource};
use crate::models::{CommentRecord, VideoRecord, VideoStats};

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// YouTube Data API v3 client (search, videos, commentThreads).
pub struct YouTubeClient {
    api_key: String,
    base_url: String,
    client: reqwest::blocking::Client,
}

impl YouTubeClient {
    pub fn new(api_key: String, base_url: Option<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("skinscope/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            client,
        })
    }

    fn request(&self, endpoint: &str, params: &[(&str, String)]) -> Result<reqwest::blocking::Request> {
        let url = format!("{}/{}", self.base_url, endpoint);
        self.client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .build()
            .with_context(|| format!("Failed to build {endpoint} request"))
    }

    fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<reqwest::blocking::Response> {
        let req = self.request(endpoint, params)?;
        self.client
            .execute(req)
            .with_context(|| format!("Failed to GET {endpoint}"))
    }

    fn get_json<T: for<'de> Deserialize<'de>>(&self, endpoint: &str, params: &[(&str, String)]) -> Result<T> {
        let resp = self.get(endpoint, params)?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(api_failure(status, endpoint, &text));
        }
        resp.json()
            .with_context(|| format!("Failed to parse YouTube {endpoint} response"))
    }
}

impl VideoSource for YouTubeClient {
    fn name(&self) -> &str {
        "youtube"
    }

    fn search(&self, query: &SearchQuery) -> Result<Vec<VideoRecord>> {
        let resp: SearchResponse = self.get_json("search", &search_params(query))?;
        Ok(resp.into_records(&query.target))
    }

    fn statistics(&self, ids: &[String]) -> Result<HashMap<String, VideoStats>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let params = [
            ("part", "statistics,contentDetails".to_string()),
            ("id", ids.join(",")),
            ("maxResults", ids.len().to_string()),
        ];
        let resp: VideosResponse = self.get_json("videos", &params)?;
        Ok(resp.into_stats())
    }

    fn comments(&self, video_id: &str, max_results: u32) -> Result<Vec<CommentRecord>> {
        let params = [
            ("part", "snippet".to_string()),
            ("videoId", video_id.to_string()),
            ("maxResults", max_results.to_string()),
            ("order", "relevance".to_string()),
            ("textFormat", "plainText".to_string()),
        ];
        let resp = self.get("commentThreads", &params)?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return comments_failure(status, video_id, &text);
        }
        let threads: CommentThreadsResponse = resp
            .json()
            .context("Failed to parse YouTube commentThreads response")?;
        Ok(threads.into_records(video_id))
    }
}

fn search_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("part", "snippet".to_string()),
        ("type", "video".to_string()),
        ("order", "date".to_string()),
        ("maxResults", query.max_results.to_string()),
    ];
    match &query.target {
        SearchTarget::Keyword(k) => params.push(("q", k.clone())),
        SearchTarget::Channel(c) => params.push(("channelId", c.clone())),
    }
    if let Some(after) = query.window.after {
        params.push(("publishedAfter", rfc3339(after)));
    }
    if let Some(before) = query.window.before {
        params.push(("publishedBefore", rfc3339(before)));
    }
    params
}

fn api_failure(status: StatusCode, endpoint: &str, body: &str) -> anyhow::Error {
    anyhow!("YouTube API returned {} for {}: {}", status, endpoint, api_error_message(body))
}

/// A 403 for a video with comments turned off is an empty thread list.
fn comments_failure(status: StatusCode, video_id: &str, body: &str) -> Result<Vec<CommentRecord>> {
    if status == StatusCode::FORBIDDEN && body.contains("commentsDisabled") {
        info!("Comments disabled for {video_id}");
        return Ok(Vec::new());
    }
    Err(api_failure(status, &format!("commentThreads ({video_id})"), body))
}

fn rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Pull `error.message` out of an API error body, falling back to the raw text.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| body.trim().to_string())
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Search snippets arrive HTML-escaped.
fn unescape_html(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Counts come back as decimal strings; accept numbers too and default to 0.
fn lenient_u64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u64, D::Error> {
    let v = Option::<serde_json::Value>::deserialize(d)?;
    Ok(match v {
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
        Some(serde_json::Value::Number(n)) => n.as_u64().unwrap_or(0),
        _ => 0,
    })
}

// --- search ---

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    id: SearchItemId,
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Debug, Deserialize, Default)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct Snippet {
    published_at: String,
    channel_id: String,
    title: String,
    description: String,
    channel_title: String,
}

impl SearchResponse {
    fn into_records(self, target: &SearchTarget) -> Vec<VideoRecord> {
        let label = match target {
            SearchTarget::Keyword(k) => k.clone(),
            SearchTarget::Channel(c) => format!("channel:{c}"),
        };
        self.items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id.filter(|id| !id.is_empty())?;
                let s = item.snippet;
                Some(VideoRecord::from_snippet(
                    video_id,
                    unescape_html(&s.title),
                    unescape_html(&s.description),
                    s.channel_id,
                    unescape_html(&s.channel_title),
                    parse_timestamp(&s.published_at),
                    Some(label.clone()),
                ))
            })
            .collect()
    }
}

// --- videos ---

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    #[serde(default)]
    id: String,
    #[serde(default)]
    statistics: Statistics,
    #[serde(default)]
    content_details: ContentDetails,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    #[serde(default, deserialize_with = "lenient_u64")]
    view_count: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    like_count: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    comment_count: u64,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentDetails {
    duration: String,
}

impl VideosResponse {
    fn into_stats(self) -> HashMap<String, VideoStats> {
        self.items
            .into_iter()
            .filter(|item| !item.id.is_empty())
            .map(|item| {
                (
                    item.id,
                    VideoStats {
                        view_count: item.statistics.view_count,
                        like_count: item.statistics.like_count,
                        comment_count: item.statistics.comment_count,
                        duration: item.content_details.duration,
                    },
                )
            })
            .collect()
    }
}

// --- commentThreads ---

#[derive(Debug, Deserialize)]
struct CommentThreadsResponse {
    #[serde(default)]
    items: Vec<CommentThread>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    #[serde(default)]
    id: String,
    #[serde(default)]
    snippet: ThreadSnippet,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct ThreadSnippet {
    video_id: Option<String>,
    top_level_comment: Option<TopLevelComment>,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    #[serde(default)]
    id: String,
    #[serde(default)]
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    #[serde(default)]
    text_original: Option<String>,
    #[serde(default)]
    text_display: Option<String>,
    #[serde(default)]
    author_display_name: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    like_count: u64,
    #[serde(default)]
    published_at: String,
}

impl CommentThreadsResponse {
    fn into_records(self, requested_video: &str) -> Vec<CommentRecord> {
        self.items
            .into_iter()
            .filter_map(|thread| {
                let top = thread.snippet.top_level_comment?;
                let id = if top.id.is_empty() { thread.id } else { top.id };
                if id.is_empty() {
                    return None;
                }
                let video_id = thread
                    .snippet
                    .video_id
                    .unwrap_or_else(|| requested_video.to_string());
                let text = top
                    .snippet
                    .text_original
                    .or(top.snippet.text_display)
                    .unwrap_or_default();
                Some(CommentRecord::new(
                    id,
                    video_id,
                    text,
                    top.snippet.author_display_name,
                    top.snippet.like_count,
                    parse_timestamp(&top.snippet.published_at),
                ))
            })
            .collect()
    }
}
