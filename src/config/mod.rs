use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::analysis::filter::Thresholds;
use crate::analysis::ngrams::NgramOptions;
use crate::error::PipelineError;
use crate::text::DomainMatcher;

pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

/// How videos are discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    #[default]
    Keywords,
    Channels,
    Both,
}

impl SearchStrategy {
    pub fn as_str(&self) -> &str {
        match self {
            SearchStrategy::Keywords => "keywords",
            SearchStrategy::Channels => "channels",
            SearchStrategy::Both => "both",
        }
    }

    pub fn uses_keywords(&self) -> bool {
        matches!(self, SearchStrategy::Keywords | SearchStrategy::Both)
    }

    pub fn uses_channels(&self) -> bool {
        matches!(self, SearchStrategy::Channels | SearchStrategy::Both)
    }
}

#[derive(Debug, Deserialize, Serialize, Default, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub api_key: Option<String>,
    pub api_key_command: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub strategy: SearchStrategy,
    pub keywords: Vec<String>,
    pub channels: Vec<String>,
    pub max_results_per_query: u32,
    pub max_results_per_channel: u32,
    pub max_comments_per_video: u32,
    pub days_back: Option<i64>,
    pub published_after: Option<String>,
    pub published_before: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::Keywords,
            keywords: [
                "skincare",
                "eczema",
                "psoriasis",
                "acne",
                "rosacea",
                "dermatitis",
                "skin barrier",
                "sensitive skin",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            channels: Vec::new(),
            max_results_per_query: 50,
            max_results_per_channel: 50,
            max_comments_per_video: 100,
            days_back: Some(30),
            published_after: None,
            published_before: None,
        }
    }
}

/// Resolved publish-time bounds for search requests.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PublishWindow {
    pub after: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
}

impl SearchConfig {
    /// Explicit `published_after` wins over `days_back`.
    pub fn window(&self, now: DateTime<Utc>) -> Result<PublishWindow> {
        let after = match self.published_after.as_deref() {
            Some(s) => Some(parse_bound(s)?),
            None => self.days_back.map(|d| now - Duration::days(d)),
        };
        let before = self
            .published_before
            .as_deref()
            .map(parse_bound)
            .transpose()?;

        if let (Some(a), Some(b)) = (after, before) {
            if a >= b {
                return Err(PipelineError::InvalidConfig(format!(
                    "published_after ({a}) must be earlier than published_before ({b})"
                ))
                .into());
            }
        }
        Ok(PublishWindow { after, before })
    }
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_bound(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date: {s} (expected YYYY-MM-DD or RFC 3339)"))?;
    Ok(date
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or_default())
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct FilterConfig {
    pub min_text_length: usize,
    pub min_word_count: usize,
    pub min_view_count: u64,
    pub min_engagement_rate: f64,
    /// Replaces the built-in domain keyword list when set.
    pub domain_keywords: Option<Vec<String>>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        let t = Thresholds::default();
        Self {
            min_text_length: t.min_text_length,
            min_word_count: t.min_word_count,
            min_view_count: t.min_view_count,
            min_engagement_rate: t.min_engagement_rate,
            domain_keywords: None,
        }
    }
}

impl FilterConfig {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            min_text_length: self.min_text_length,
            min_word_count: self.min_word_count,
            min_view_count: self.min_view_count,
            min_engagement_rate: self.min_engagement_rate,
        }
    }

    pub fn matcher(&self) -> DomainMatcher {
        match &self.domain_keywords {
            Some(words) => DomainMatcher::new(words.iter().cloned()),
            None => DomainMatcher::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct NgramConfig {
    pub unigrams: bool,
    pub bigrams: bool,
    pub trigrams: bool,
    pub top_k: usize,
}

impl Default for NgramConfig {
    fn default() -> Self {
        let o = NgramOptions::default();
        Self {
            unigrams: o.unigrams,
            bigrams: o.bigrams,
            trigrams: o.trigrams,
            top_k: o.top_k,
        }
    }
}

impl NgramConfig {
    pub fn options(&self) -> NgramOptions {
        NgramOptions {
            unigrams: self.unigrams,
            bigrams: self.bigrams,
            trigrams: self.trigrams,
            top_k: self.top_k,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct FeatureConfig {
    pub fetch_comments: bool,
    pub compute_sentiment: bool,
    pub analyze_channels: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            fetch_comments: true,
            compute_sentiment: true,
            analyze_channels: true,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub save_videos: bool,
    pub save_comments: bool,
    pub save_ngrams: bool,
    pub save_channels: bool,
    pub save_summary: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            save_videos: true,
            save_comments: true,
            save_ngrams: true,
            save_channels: true,
            save_summary: true,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct RateLimitConfig {
    pub delay_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { delay_ms: 1000 }
    }
}

/// Top-level skinscope config file structure.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub filter: FilterConfig,
    pub ngrams: NgramConfig,
    pub features: FeatureConfig,
    pub output: OutputConfig,
    pub rate_limit: RateLimitConfig,
}

/// Values from the command line that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub strategy: Option<SearchStrategy>,
    pub keywords: Vec<String>,
    pub channels: Vec<String>,
    pub days_back: Option<i64>,
    pub after: Option<String>,
    pub before: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub top_k: Option<usize>,
    pub no_comments: bool,
    pub no_sentiment: bool,
    pub no_channels: bool,
    pub delay_ms: Option<u64>,
}

impl Config {
    /// Load config from `path`. Returns default if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config.toml")
    }

    /// Apply command-line overrides. Consumes self so the result is the one
    /// value every stage reads from.
    pub fn with_overrides(mut self, o: Overrides) -> Self {
        if let Some(s) = o.strategy {
            self.search.strategy = s;
        }
        if !o.keywords.is_empty() {
            self.search.keywords = o.keywords;
        }
        if !o.channels.is_empty() {
            self.search.channels = o.channels;
        }
        if let Some(d) = o.days_back {
            self.search.days_back = Some(d);
            self.search.published_after = None;
        }
        if o.after.is_some() {
            self.search.published_after = o.after;
        }
        if o.before.is_some() {
            self.search.published_before = o.before;
        }
        if let Some(dir) = o.output_dir {
            self.output.dir = dir;
        }
        if let Some(k) = o.top_k {
            self.ngrams.top_k = k;
        }
        if o.no_comments {
            self.features.fetch_comments = false;
        }
        if o.no_sentiment {
            self.features.compute_sentiment = false;
        }
        if o.no_channels {
            self.features.analyze_channels = false;
        }
        if let Some(ms) = o.delay_ms {
            self.rate_limit.delay_ms = ms;
        }
        self
    }

    /// Reject configurations that cannot produce a search.
    pub fn validate(&self) -> Result<()> {
        let s = &self.search;
        if s.strategy.uses_keywords() && s.keywords.is_empty() {
            return Err(PipelineError::InvalidConfig(format!(
                "strategy '{}' needs at least one keyword",
                s.strategy.as_str()
            ))
            .into());
        }
        if s.strategy.uses_channels() && s.channels.is_empty() {
            return Err(PipelineError::InvalidConfig(format!(
                "strategy '{}' needs at least one channel id",
                s.strategy.as_str()
            ))
            .into());
        }
        if let Some(d) = s.days_back {
            if d <= 0 {
                return Err(PipelineError::InvalidConfig(format!(
                    "days_back must be positive, got {d}"
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Copy with the API key masked.
    pub fn redacted(&self) -> Self {
        let mut shown = self.clone();
        if let Some(ref key) = shown.api.api_key {
            shown.api.api_key = Some(redact(key));
        }
        shown
    }

    /// Display config with secrets redacted.
    pub fn display_redacted(&self) -> Result<String> {
        toml::to_string_pretty(&self.redacted()).context("Failed to render config")
    }
}

fn redact(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "****".to_string()
    }
}

/// Resolve a credential through the chain: CLI flag > env var > config key > config command.
pub fn resolve_credential(
    cli_flag: Option<&str>,
    env_var_name: &str,
    api: &ApiConfig,
) -> Result<String> {
    // 1. CLI flag
    if let Some(key) = cli_flag {
        if !key.is_empty() {
            return Ok(key.to_string());
        }
    }

    // 2. Environment variable
    if let Ok(val) = std::env::var(env_var_name) {
        if !val.is_empty() {
            return Ok(val);
        }
    }

    // 3. Config file api_key
    if let Some(ref key) = api.api_key {
        if !key.is_empty() {
            return Ok(key.clone());
        }
    }

    // 4. External command
    if let Some(ref cmd) = api.api_key_command {
        if !cmd.is_empty() {
            let output = std::process::Command::new("sh")
                .arg("-c")
                .arg(cmd)
                .output()
                .with_context(|| format!("Failed to run api_key_command: {cmd}"))?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(PipelineError::CredentialCommand {
                    code: output.status.code().unwrap_or(-1),
                    stderr: stderr.trim().to_string(),
                }
                .into());
            }

            let secret = String::from_utf8(output.stdout)
                .context("api_key_command output is not valid UTF-8")?
                .trim()
                .to_string();

            if !secret.is_empty() {
                return Ok(secret);
            }
        }
    }

    Err(PipelineError::MissingCredential {
        env_var: env_var_name.to_string(),
    }
    .into())
}

/// Path to the config file: ~/.skinscope/config.toml
pub fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".skinscope").join("config.toml"))
}

/// Default config template content.
pub fn default_config_template() -> &'static str {
    r#"# ~/.skinscope/config.toml
# Credential resolution order: CLI flag > YOUTUBE_API_KEY env var > api_key > api_key_command

[api]
# api_key = "your-youtube-data-api-key"
# api_key_command = "your-secrets-manager-command-here"

[search]
strategy = "keywords"   # keywords | channels | both
keywords = ["skincare", "eczema", "psoriasis", "acne", "rosacea", "dermatitis", "skin barrier", "sensitive skin"]
channels = []
max_results_per_query = 50
max_results_per_channel = 50
max_comments_per_video = 100
days_back = 30
# published_after = "2025-01-01"
# published_before = "2025-02-01"

[filter]
min_text_length = 10
min_word_count = 3
min_view_count = 100
min_engagement_rate = 0.0
# domain_keywords = ["skin", "acne", "eczema"]

[ngrams]
unigrams = true
bigrams = true
trigrams = true
top_k = 50

[features]
fetch_comments = true
compute_sentiment = true
analyze_channels = true

[output]
dir = "output"
save_videos = true
save_comments = true
save_ngrams = true
save_channels = true
save_summary = true

[rate_limit]
delay_ms = 1000
"#
}

/// Create the default config file if it doesn't already exist.
pub fn init_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, default_config_template())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn template_parses_to_defaults() {
        let parsed = Config::from_toml(default_config_template()).expect("template parses");
        let defaults = Config::default();
        assert_eq!(parsed.search.keywords, defaults.search.keywords);
        assert_eq!(parsed.search.strategy, SearchStrategy::Keywords);
        assert_eq!(parsed.filter.thresholds(), defaults.filter.thresholds());
        assert_eq!(parsed.ngrams.options(), defaults.ngrams.options());
        assert_eq!(parsed.rate_limit.delay_ms, 1000);
        assert_eq!(parsed.output.dir, PathBuf::from("output"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = Config::from_toml(
            r#"
[search]
strategy = "both"
channels = ["UC123"]

[ngrams]
trigrams = false
"#,
        )
        .expect("parses");
        assert_eq!(cfg.search.strategy, SearchStrategy::Both);
        assert_eq!(cfg.search.channels, ["UC123"]);
        assert_eq!(cfg.search.max_results_per_query, 50);
        assert!(!cfg.ngrams.trigrams);
        assert!(cfg.ngrams.bigrams);
        assert!(cfg.features.fetch_comments);
        cfg.validate().expect("valid");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = Config::load(Path::new("/nonexistent/skinscope/config.toml")).expect("default");
        assert_eq!(cfg.search.days_back, Some(30));
    }

    #[test]
    fn overrides_take_precedence() {
        let cfg = Config::default().with_overrides(Overrides {
            strategy: Some(SearchStrategy::Channels),
            channels: vec!["UCabc".into()],
            top_k: Some(5),
            no_comments: true,
            delay_ms: Some(0),
            ..Overrides::default()
        });
        assert_eq!(cfg.search.strategy, SearchStrategy::Channels);
        assert_eq!(cfg.search.channels, ["UCabc"]);
        assert_eq!(cfg.ngrams.top_k, 5);
        assert!(!cfg.features.fetch_comments);
        assert!(cfg.features.compute_sentiment);
        assert_eq!(cfg.rate_limit.delay_ms, 0);
    }

    #[test]
    fn channel_strategy_without_channels_is_invalid() {
        let cfg = Config::default().with_overrides(Overrides {
            strategy: Some(SearchStrategy::Channels),
            ..Overrides::default()
        });
        let err = cfg.validate().expect_err("must fail");
        assert!(err.to_string().contains("channel"));
    }

    #[test]
    fn window_from_days_back_or_explicit_bounds() {
        let now = Utc.with_ymd_and_hms(2025, 6, 30, 0, 0, 0).unwrap();
        let w = SearchConfig::default().window(now).expect("window");
        assert_eq!(w.after, Some(Utc.with_ymd_and_hms(2025, 5, 31, 0, 0, 0).unwrap()));
        assert_eq!(w.before, None);

        let explicit = SearchConfig {
            published_after: Some("2025-01-01".into()),
            published_before: Some("2025-02-01T12:00:00Z".into()),
            ..SearchConfig::default()
        };
        let w = explicit.window(now).expect("window");
        assert_eq!(w.after, Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(w.before, Some(Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap()));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let cfg = SearchConfig {
            published_after: Some("2025-03-01".into()),
            published_before: Some("2025-02-01".into()),
            ..SearchConfig::default()
        };
        assert!(cfg.window(Utc::now()).is_err());
    }

    #[test]
    fn credential_chain_order() {
        let api = ApiConfig {
            api_key: Some("from-config".into()),
            api_key_command: Some("echo from-command".into()),
            base_url: None,
        };
        let unset_var = "SKINSCOPE_TEST_UNSET_KEY_VAR";
        assert_eq!(
            resolve_credential(Some("from-flag"), unset_var, &api).expect("flag"),
            "from-flag"
        );
        assert_eq!(
            resolve_credential(None, unset_var, &api).expect("config"),
            "from-config"
        );
        let cmd_only = ApiConfig {
            api_key: None,
            ..api.clone()
        };
        assert_eq!(
            resolve_credential(Some(""), unset_var, &cmd_only).expect("command"),
            "from-command"
        );
    }

    #[test]
    fn missing_credential_is_typed() {
        let err = resolve_credential(None, "SKINSCOPE_TEST_UNSET_KEY_VAR", &ApiConfig::default())
            .expect_err("no key anywhere");
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::MissingCredential { .. })
        ));
    }

    #[test]
    fn redacted_display_hides_key() {
        let mut cfg = Config::default();
        cfg.api.api_key = Some("AIzaSyVerySecretKey1234".into());
        let shown = cfg.display_redacted().expect("renders");
        assert!(shown.contains("AIza...1234"));
        assert!(!shown.contains("VerySecret"));
    }

    #[test]
    fn redaction_respects_char_boundaries() {
        assert_eq!(redact("ключключключ"), "ключ...ключ");
        assert_eq!(redact("é1234567890é"), "é123...890é");
        assert_eq!(redact("short"), "****");
    }
}
