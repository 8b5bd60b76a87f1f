use unicode_width::UnicodeWidthStr;

use crate::models::{ChannelSummary, NgramEntry, NgramKind, RunSummary};

/// Truncate a string to fit within max_width (respecting unicode width).
fn truncate(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + cw + 3 > max_width {
            result.push_str("...");
            break;
        }
        result.push(ch);
        width += cw;
    }
    result
}

/// Pad to a display width; `format!("{:<n}")` counts chars, not columns.
fn pad(s: &str, width: usize) -> String {
    let t = truncate(s, width);
    let w = UnicodeWidthStr::width(t.as_str());
    format!("{t}{}", " ".repeat(width.saturating_sub(w)))
}

/// 1234567 → "1.2M"
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.1}B", n as f64 / 1e9)
    } else if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1e6)
    } else if n >= 10_000 {
        format!("{:.1}K", n as f64 / 1e3)
    } else {
        n.to_string()
    }
}

pub fn print_run_summary(s: &RunSummary) {
    println!("Run Summary ({}):", s.search_strategy);
    println!("  Videos fetched:   {}", s.total_videos_fetched);
    println!("  Videos kept:      {}", s.videos_after_filter);
    println!("  Comments fetched: {}", s.comments_fetched);
    println!("  Comments kept:    {}", s.comments_after_filter);
    println!("  Channels:         {}", s.unique_channels);
    println!("  Date range:       {}", s.date_range);
    println!("  Total views:      {}", format_count(s.total_views));
    println!("  Total likes:      {}", format_count(s.total_likes));
    println!("  Avg engagement:   {:.2}%", s.avg_engagement_rate * 100.0);
    println!(
        "  Unique n-grams:   {} / {} / {} (uni / bi / tri)",
        s.unique_unigrams, s.unique_bigrams, s.unique_trigrams
    );
    let secs = (s.run_completed_at - s.run_started_at).num_milliseconds() as f64 / 1000.0;
    println!("  Duration:         {secs:.1}s");
}

pub fn print_top_channels(channels: &[ChannelSummary], limit: usize) {
    if channels.is_empty() {
        println!("\nNo channels.");
        return;
    }

    println!("\nTop channels:\n");
    println!(
        "  {} {:>6} {:>9} {:>11} {:>9}",
        pad("CHANNEL", 36),
        "VIDEOS",
        "VIEWS",
        "ENGAGEMENT",
        "SENTIMENT"
    );
    println!("  {}", "-".repeat(75));

    for c in channels.iter().take(limit) {
        println!(
            "  {} {:>6} {:>9} {:>10.2}% {:>+9.2}",
            pad(&c.channel_title, 36),
            c.video_count,
            format_count(c.total_views),
            c.avg_engagement_rate * 100.0,
            c.avg_sentiment,
        );
    }
}

/// Top rows of each n-gram order, one block per order.
pub fn print_top_ngrams(top: &[NgramEntry], per_kind: usize) {
    for kind in [NgramKind::Unigram, NgramKind::Bigram, NgramKind::Trigram] {
        let rows: Vec<&NgramEntry> = top
            .iter()
            .filter(|e| e.kind == kind)
            .take(per_kind)
            .collect();
        if rows.is_empty() {
            continue;
        }
        println!("\nTop {}s:", kind.as_str());
        for e in rows {
            println!(
                "  {:>3}. {} {:>6} {:>6.2}%",
                e.rank,
                pad(&e.ngram, 40),
                e.count,
                e.percent
            );
        }
    }
}
