pub mod youtube;

use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::{Config, PublishWindow, SearchConfig};
use crate::models::{CommentRecord, VideoRecord, VideoStats};

/// API caps per request.
pub const MAX_SEARCH_RESULTS: u32 = 50;
pub const MAX_COMMENT_RESULTS: u32 = 100;
pub const STATS_BATCH_SIZE: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchTarget {
    Keyword(String),
    Channel(String),
}

impl std::fmt::Display for SearchTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchTarget::Keyword(k) => write!(f, "keyword '{k}'"),
            SearchTarget::Channel(c) => write!(f, "channel {c}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub target: SearchTarget,
    pub max_results: u32,
    pub window: PublishWindow,
}

/// Raw access to a video platform. One method call is one remote request.
///
/// Implementations report failures as errors; the free functions in this
/// module turn them into logged, empty results.
pub trait VideoSource {
    /// Source name used in log lines.
    fn name(&self) -> &str;

    /// Videos matching a keyword or belonging to a channel (no statistics).
    fn search(&self, query: &SearchQuery) -> Result<Vec<VideoRecord>>;

    /// Statistics for at most [`STATS_BATCH_SIZE`] ids.
    fn statistics(&self, ids: &[String]) -> Result<HashMap<String, VideoStats>>;

    /// Top-level comments. Comments being disabled is `Ok(vec![])`.
    fn comments(&self, video_id: &str, max_results: u32) -> Result<Vec<CommentRecord>>;
}

/// Delay applied after every remote call.
pub trait Pacer {
    fn pause(&self);
}

pub struct ThreadSleepPacer {
    delay: Duration,
}

impl ThreadSleepPacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Pacer for ThreadSleepPacer {
    fn pause(&self) {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
    }
}

pub struct NoPacer;

impl Pacer for NoPacer {
    fn pause(&self) {}
}

pub fn search_by_keyword(
    source: &dyn VideoSource,
    keyword: &str,
    max_results: u32,
    window: PublishWindow,
    pacer: &dyn Pacer,
) -> Vec<VideoRecord> {
    run_search(
        source,
        SearchQuery {
            target: SearchTarget::Keyword(keyword.to_string()),
            max_results: max_results.clamp(1, MAX_SEARCH_RESULTS),
            window,
        },
        pacer,
    )
}

pub fn fetch_channel_videos(
    source: &dyn VideoSource,
    channel_id: &str,
    max_results: u32,
    window: PublishWindow,
    pacer: &dyn Pacer,
) -> Vec<VideoRecord> {
    run_search(
        source,
        SearchQuery {
            target: SearchTarget::Channel(channel_id.to_string()),
            max_results: max_results.clamp(1, MAX_SEARCH_RESULTS),
            window,
        },
        pacer,
    )
}

fn run_search(source: &dyn VideoSource, query: SearchQuery, pacer: &dyn Pacer) -> Vec<VideoRecord> {
    let label = query.target.to_string();
    let result = source.search(&query);
    pacer.pause();

    match result {
        Ok(videos) if videos.is_empty() => {
            warn!("No videos found on {} for {}", source.name(), label);
            Vec::new()
        }
        Ok(videos) => {
            info!("Found {} videos for {}", videos.len(), label);
            videos
        }
        Err(e) => {
            error!("Search failed for {}: {:#}", label, e);
            Vec::new()
        }
    }
}

/// Statistics for every id, requested in batches of [`STATS_BATCH_SIZE`].
/// A failed batch is skipped; the others still land.
pub fn fetch_statistics(
    source: &dyn VideoSource,
    video_ids: &[String],
    pacer: &dyn Pacer,
) -> HashMap<String, VideoStats> {
    let mut out = HashMap::new();
    let batches = video_ids.len().div_ceil(STATS_BATCH_SIZE);

    for (i, batch) in video_ids.chunks(STATS_BATCH_SIZE).enumerate() {
        let result = source.statistics(batch);
        pacer.pause();
        match result {
            Ok(stats) => out.extend(stats),
            Err(e) => error!(
                "Statistics batch {}/{} ({} ids) failed: {:#}",
                i + 1,
                batches,
                batch.len(),
                e
            ),
        }
    }
    out
}

pub fn fetch_comments(
    source: &dyn VideoSource,
    video_id: &str,
    max_results: u32,
    pacer: &dyn Pacer,
) -> Vec<CommentRecord> {
    let result = source.comments(video_id, max_results.clamp(1, MAX_COMMENT_RESULTS));
    pacer.pause();
    match result {
        Ok(comments) => comments,
        Err(e) => {
            warn!("Could not fetch comments for {}: {:#}", video_id, e);
            Vec::new()
        }
    }
}

/// Keep the first record per id, preserving order.
pub fn dedup_videos(videos: Vec<VideoRecord>) -> Vec<VideoRecord> {
    let mut seen = HashSet::new();
    videos
        .into_iter()
        .filter(|v| seen.insert(v.video_id.clone()))
        .collect()
}

pub fn dedup_comments(comments: Vec<CommentRecord>) -> Vec<CommentRecord> {
    let mut seen = HashSet::new();
    comments
        .into_iter()
        .filter(|c| seen.insert(c.comment_id.clone()))
        .collect()
}

/// Result of the discovery stage.
pub struct CollectedVideos {
    /// Unique videos with statistics merged in.
    pub videos: Vec<VideoRecord>,
    /// Hits before deduplication.
    pub raw_hits: usize,
}

/// Every request the configured strategy will issue, keywords first.
pub fn plan_queries(search: &SearchConfig, window: PublishWindow) -> Vec<SearchQuery> {
    let mut queries = Vec::new();
    if search.strategy.uses_keywords() {
        queries.extend(search.keywords.iter().map(|k| SearchQuery {
            target: SearchTarget::Keyword(k.clone()),
            max_results: search.max_results_per_query.clamp(1, MAX_SEARCH_RESULTS),
            window,
        }));
    }
    if search.strategy.uses_channels() {
        queries.extend(search.channels.iter().map(|c| SearchQuery {
            target: SearchTarget::Channel(c.clone()),
            max_results: search.max_results_per_channel.clamp(1, MAX_SEARCH_RESULTS),
            window,
        }));
    }
    queries
}

/// Run every configured search, deduplicate, then attach statistics.
pub fn collect_videos(
    source: &dyn VideoSource,
    config: &Config,
    window: PublishWindow,
    pacer: &dyn Pacer,
) -> CollectedVideos {
    let queries = plan_queries(&config.search, window);
    let mut hits = Vec::new();

    for (i, q) in queries.iter().enumerate() {
        eprintln!("  [{}/{}] Searching {}", i + 1, queries.len(), q.target);
        hits.extend(match &q.target {
            SearchTarget::Keyword(k) => search_by_keyword(source, k, q.max_results, q.window, pacer),
            SearchTarget::Channel(c) => {
                fetch_channel_videos(source, c, q.max_results, q.window, pacer)
            }
        });
    }

    let raw_hits = hits.len();
    let mut videos = dedup_videos(hits);
    info!("{} hits, {} unique videos", raw_hits, videos.len());

    if !videos.is_empty() {
        let ids: Vec<String> = videos.iter().map(|v| v.video_id.clone()).collect();
        let stats = fetch_statistics(source, &ids, pacer);
        let missing = videos.len() - videos.iter().filter(|v| stats.contains_key(&v.video_id)).count();
        if missing > 0 {
            warn!("No statistics for {} videos; counts left at 0", missing);
        }
        for v in &mut videos {
            if let Some(s) = stats.get(&v.video_id) {
                v.apply_stats(s);
            }
        }
    }

    CollectedVideos { videos, raw_hits }
}

/// Comments for already-filtered videos.
pub fn collect_comments(
    source: &dyn VideoSource,
    videos: &[VideoRecord],
    max_per_video: u32,
    pacer: &dyn Pacer,
) -> Vec<CommentRecord> {
    let mut all = Vec::new();
    let width = format!("{}", videos.len()).len();
    for (i, v) in videos.iter().enumerate() {
        let comments = fetch_comments(source, &v.video_id, max_per_video, pacer);
        eprintln!(
            "  [{:>width$}/{}] {} comments on {}",
            i + 1,
            videos.len(),
            comments.len(),
            v.video_id,
        );
        all.extend(comments);
    }
    dedup_comments(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchStrategy;
    use anyhow::bail;
    use chrono::{DateTime, Utc};
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct FakeSource {
        searches: HashMap<String, Vec<&'static str>>,
        failing_search: Option<String>,
        fail_batch: Option<usize>,
        batch_sizes: RefCell<Vec<usize>>,
        max_results_seen: RefCell<Vec<u32>>,
    }

    fn video(id: &str) -> VideoRecord {
        VideoRecord::from_snippet(
            id.into(),
            format!("title {id}"),
            String::new(),
            "ch".into(),
            "Chan".into(),
            DateTime::<Utc>::UNIX_EPOCH,
            None,
        )
    }

    impl VideoSource for FakeSource {
        fn name(&self) -> &str {
            "fake"
        }

        fn search(&self, query: &SearchQuery) -> Result<Vec<VideoRecord>> {
            self.max_results_seen.borrow_mut().push(query.max_results);
            let key = match &query.target {
                SearchTarget::Keyword(k) => k.clone(),
                SearchTarget::Channel(c) => c.clone(),
            };
            if self.failing_search.as_deref() == Some(key.as_str()) {
                bail!("boom");
            }
            Ok(self
                .searches
                .get(&key)
                .map(|ids| ids.iter().map(|id| video(id)).collect())
                .unwrap_or_default())
        }

        fn statistics(&self, ids: &[String]) -> Result<HashMap<String, VideoStats>> {
            let n = {
                let mut sizes = self.batch_sizes.borrow_mut();
                sizes.push(ids.len());
                sizes.len()
            };
            if self.fail_batch == Some(n) {
                bail!("quota");
            }
            Ok(ids
                .iter()
                .map(|id| {
                    (
                        id.clone(),
                        VideoStats {
                            view_count: 1000,
                            like_count: 10,
                            comment_count: 5,
                            duration: "PT1M".into(),
                        },
                    )
                })
                .collect())
        }

        fn comments(&self, video_id: &str, _max: u32) -> Result<Vec<CommentRecord>> {
            if video_id == "broken" {
                bail!("403");
            }
            Ok(vec![CommentRecord::new(
                format!("c-{video_id}"),
                video_id.into(),
                "nice".into(),
                "a".into(),
                0,
                DateTime::<Utc>::UNIX_EPOCH,
            )])
        }
    }

    #[derive(Default)]
    struct CountingPacer {
        calls: Cell<usize>,
    }

    impl Pacer for CountingPacer {
        fn pause(&self) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("v{i}")).collect()
    }

    #[test]
    fn statistics_are_batched_by_fifty() {
        let src = FakeSource::default();
        let pacer = CountingPacer::default();
        let stats = fetch_statistics(&src, &ids(120), &pacer);
        assert_eq!(*src.batch_sizes.borrow(), [50, 50, 20]);
        assert_eq!(stats.len(), 120);
        assert_eq!(pacer.calls.get(), 3);
    }

    #[test]
    fn failed_batch_is_skipped_only() {
        let src = FakeSource {
            fail_batch: Some(2),
            ..FakeSource::default()
        };
        let stats = fetch_statistics(&src, &ids(120), &NoPacer);
        assert_eq!(stats.len(), 70);
        assert!(stats.contains_key("v0"));
        assert!(!stats.contains_key("v50"));
        assert!(stats.contains_key("v119"));
    }

    #[test]
    fn search_errors_become_empty_results() {
        let src = FakeSource {
            failing_search: Some("acne".into()),
            ..FakeSource::default()
        };
        let pacer = CountingPacer::default();
        let out = search_by_keyword(&src, "acne", 50, PublishWindow::default(), &pacer);
        assert!(out.is_empty());
        assert_eq!(pacer.calls.get(), 1);
    }

    #[test]
    fn max_results_are_clamped() {
        let src = FakeSource::default();
        search_by_keyword(&src, "a", 500, PublishWindow::default(), &NoPacer);
        fetch_channel_videos(&src, "c", 0, PublishWindow::default(), &NoPacer);
        assert_eq!(*src.max_results_seen.borrow(), [50, 1]);
    }

    #[test]
    fn comment_errors_become_empty() {
        let src = FakeSource::default();
        assert!(fetch_comments(&src, "broken", 100, &NoPacer).is_empty());
        assert_eq!(fetch_comments(&src, "ok", 100, &NoPacer).len(), 1);
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let mut first = video("shared");
        first.title = "first".into();
        let mut second = video("shared");
        second.title = "second".into();
        let merged = dedup_videos(vec![video("a"), first, video("b"), second]);
        let got: Vec<_> = merged.iter().map(|v| (v.video_id.as_str(), v.title.as_str())).collect();
        assert_eq!(got, [("a", "title a"), ("shared", "first"), ("b", "title b")]);
    }

    #[test]
    fn collect_merges_keyword_and_channel_hits() {
        let mut searches = HashMap::new();
        searches.insert("acne".to_string(), vec!["v1", "v2"]);
        searches.insert("eczema".to_string(), vec!["v2", "v3"]);
        searches.insert("UC1".to_string(), vec!["v3", "v4"]);
        let src = FakeSource {
            searches,
            ..FakeSource::default()
        };
        let mut config = Config::default();
        config.search.strategy = SearchStrategy::Both;
        config.search.keywords = vec!["acne".into(), "eczema".into()];
        config.search.channels = vec!["UC1".into()];

        let pacer = CountingPacer::default();
        let collected = collect_videos(&src, &config, PublishWindow::default(), &pacer);
        assert_eq!(collected.raw_hits, 6);
        let got: Vec<_> = collected.videos.iter().map(|v| v.video_id.as_str()).collect();
        assert_eq!(got, ["v1", "v2", "v3", "v4"]);
        assert!(collected.videos.iter().all(|v| v.view_count == 1000));
        assert!((collected.videos[0].engagement_rate - 0.015).abs() < 1e-12);
        // three searches plus one statistics batch
        assert_eq!(pacer.calls.get(), 4);
    }

    #[test]
    fn plan_lists_keywords_then_channels() {
        let mut config = Config::default();
        config.search.strategy = SearchStrategy::Both;
        config.search.keywords = vec!["acne".into()];
        config.search.channels = vec!["UC1".into(), "UC2".into()];
        config.search.max_results_per_channel = 80;
        let plan = plan_queries(&config.search, PublishWindow::default());
        let targets: Vec<_> = plan.iter().map(|q| q.target.to_string()).collect();
        assert_eq!(targets, ["keyword 'acne'", "channel UC1", "channel UC2"]);
        assert_eq!(plan[1].max_results, 50);

        config.search.strategy = SearchStrategy::Channels;
        assert_eq!(plan_queries(&config.search, PublishWindow::default()).len(), 2);
    }

    #[test]
    fn collect_comments_dedups_and_skips_failures() {
        let src = FakeSource::default();
        let videos = vec![video("a"), video("broken"), video("a")];
        let comments = collect_comments(&src, &videos, 100, &NoPacer);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].video_id, "a");
    }
}
