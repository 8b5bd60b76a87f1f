use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::analysis::channels::summarize_channels;
use crate::analysis::filter::{filter_comments, filter_videos};
use crate::analysis::ngrams::{self, NgramTables};
use crate::analysis::sentiment;
use crate::analysis::summary::{build_summary, SummaryInput};
use crate::analysis::{enrich_comment, enrich_video};
use crate::config::Config;
use crate::error::PipelineError;
use crate::fetch::{collect_comments, collect_videos, Pacer, VideoSource};
use crate::models::{ChannelSummary, CommentRecord, RunSummary, VideoRecord};
use crate::output::files::{self, Artifacts};
use crate::text::StopWords;

/// Everything a run produced, before anything is written.
pub struct RunOutcome {
    pub videos: Vec<VideoRecord>,
    /// `None` when comment fetching is disabled.
    pub comments: Option<Vec<CommentRecord>>,
    pub ngrams: NgramTables,
    /// `None` when channel analysis is disabled.
    pub channels: Option<Vec<ChannelSummary>>,
    pub summary: RunSummary,
}

/// Fetch, filter, score and aggregate. Stages run once each, in order.
///
/// Fails only when the configuration cannot produce a search window or when
/// nothing at all was fetched.
pub fn run(source: &dyn VideoSource, config: &Config, pacer: &dyn Pacer) -> Result<RunOutcome> {
    run_at(source, config, pacer, Utc::now())
}

/// [`run`] with an explicit start time (publish window is relative to it).
pub fn run_at(
    source: &dyn VideoSource,
    config: &Config,
    pacer: &dyn Pacer,
    started: DateTime<Utc>,
) -> Result<RunOutcome> {
    let window = config.search.window(started)?;

    eprintln!("Searching {} ({})...", source.name(), config.search.strategy.as_str());
    let collected = collect_videos(source, config, window, pacer);
    if collected.videos.is_empty() {
        return Err(PipelineError::NoVideos.into());
    }
    let total_videos = collected.videos.len();

    // Normalize + filter videos
    let matcher = config.filter.matcher();
    let thresholds = config.filter.thresholds();
    let mut videos = collected.videos;
    for v in &mut videos {
        enrich_video(v, &matcher);
    }
    let mut videos = filter_videos(videos, &thresholds);
    eprintln!("  {} of {} videos passed the relevance filter", videos.len(), total_videos);
    if videos.is_empty() {
        warn!("No videos passed the relevance filter; outputs will be empty");
    }

    // Comments, only for videos that passed
    let mut comments_fetched = 0usize;
    let mut comments = if config.features.fetch_comments && !videos.is_empty() {
        eprintln!("Fetching comments for {} videos...", videos.len());
        let mut fetched = collect_comments(
            source,
            &videos,
            config.search.max_comments_per_video,
            pacer,
        );
        comments_fetched = fetched.len();
        for c in &mut fetched {
            enrich_comment(c, &matcher);
        }
        let kept = filter_comments(fetched, &thresholds);
        eprintln!("  {} of {} comments passed the relevance filter", kept.len(), comments_fetched);
        Some(kept)
    } else if config.features.fetch_comments {
        Some(Vec::new())
    } else {
        None
    };

    if config.features.compute_sentiment {
        for v in &mut videos {
            v.apply_sentiment(sentiment::score(&v.clean_text));
        }
        for c in comments.iter_mut().flatten() {
            c.apply_sentiment(sentiment::score(&c.clean_text));
        }
        info!("Scored sentiment");
    }

    let ngrams = {
        let mut texts: Vec<&str> = videos.iter().map(|v| v.clean_text.as_str()).collect();
        texts.extend(comments.iter().flatten().map(|c| c.clean_text.as_str()));
        ngrams::aggregate(&texts, &config.ngrams.options(), &StopWords::default())
    };
    info!("Built n-gram tables: {} rows", ngrams.all.len());

    let channels = config
        .features
        .analyze_channels
        .then(|| summarize_channels(&videos));

    let empty: Vec<CommentRecord> = Vec::new();
    let summary = build_summary(
        &SummaryInput {
            run_started_at: started,
            search_strategy: config.search.strategy.as_str(),
            total_videos_fetched: total_videos,
            comments_fetched,
            videos: &videos,
            comments: comments.as_deref().unwrap_or(&empty),
            ngrams: &ngrams,
        },
        Utc::now().max(started),
    );

    Ok(RunOutcome {
        videos,
        comments,
        ngrams,
        channels,
        summary,
    })
}

/// Persist every enabled artifact of a finished run.
pub fn write_outputs(outcome: &RunOutcome, config: &Config) -> Result<Vec<PathBuf>> {
    files::write_all(
        &config.output,
        &Artifacts {
            videos: &outcome.videos,
            comments: outcome.comments.as_deref(),
            ngrams_top: &outcome.ngrams.top,
            ngrams_all: &outcome.ngrams.all,
            channels: outcome.channels.as_deref(),
            summary: &outcome.summary,
        },
    )
}
