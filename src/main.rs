use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use skinscope::config::{self, Config, Overrides, SearchStrategy, API_KEY_ENV};
use skinscope::fetch::youtube::YouTubeClient;
use skinscope::fetch::{plan_queries, ThreadSleepPacer};
use skinscope::output::{print_json, table};
use skinscope::pipeline;

#[derive(Parser)]
#[command(name = "skinscope", version, about = "Skincare video and comment collector for YouTube")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Path to config file (default: ~/.skinscope/config.toml)
    #[arg(long, global = true, env = "SKINSCOPE_CONFIG")]
    config: Option<PathBuf>,

    /// Log progress at info level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search, filter, analyze and write output files
    Run {
        /// YouTube Data API key (overrides env and config)
        #[arg(long)]
        api_key: Option<String>,

        /// Discovery strategy
        #[arg(long, value_enum)]
        strategy: Option<SearchStrategy>,

        /// Search keyword (repeatable; replaces configured keywords)
        #[arg(long = "keyword")]
        keywords: Vec<String>,

        /// Channel id (repeatable; replaces configured channels)
        #[arg(long = "channel")]
        channels: Vec<String>,

        /// Only videos published in the last N days
        #[arg(long)]
        days_back: Option<i64>,

        /// Published after (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        after: Option<String>,

        /// Published before (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        before: Option<String>,

        /// Directory for CSV/JSON outputs
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Rows kept per n-gram order in the top table
        #[arg(long)]
        top_k: Option<usize>,

        /// Skip comment collection
        #[arg(long)]
        no_comments: bool,

        /// Skip sentiment scoring
        #[arg(long)]
        no_sentiment: bool,

        /// Skip channel aggregation
        #[arg(long)]
        no_channels: bool,

        /// Pause after each API request, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Print the planned searches without calling the API
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Create a default config file
    Init,
    /// Show the effective configuration (secrets redacted)
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let json_output = cli.json;
    let config_file = match cli.config {
        Some(p) => p,
        None => config::config_path()?,
    };

    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Init => {
                if config::init_config(&config_file)? {
                    println!("Created {}", config_file.display());
                } else {
                    println!("Config already exists: {}", config_file.display());
                }
            }
            ConfigAction::Show => {
                let cfg = Config::load(&config_file)?;
                if json_output {
                    print_json(&cfg.redacted())?;
                } else {
                    println!("# {}", config_file.display());
                    print!("{}", cfg.display_redacted()?);
                }
            }
        },

        Commands::Run {
            api_key,
            strategy,
            keywords,
            channels,
            days_back,
            after,
            before,
            output_dir,
            top_k,
            no_comments,
            no_sentiment,
            no_channels,
            delay_ms,
            dry_run,
        } => {
            let cfg = Config::load(&config_file)?.with_overrides(Overrides {
                strategy,
                keywords,
                channels,
                days_back,
                after,
                before,
                output_dir,
                top_k,
                no_comments,
                no_sentiment,
                no_channels,
                delay_ms,
            });
            cfg.validate()?;

            if dry_run {
                let window = cfg.search.window(Utc::now())?;
                let plan: Vec<String> = plan_queries(&cfg.search, window)
                    .iter()
                    .map(|q| format!("{} (max {})", q.target, q.max_results))
                    .collect();
                if json_output {
                    print_json(&serde_json::json!({
                        "strategy": cfg.search.strategy.as_str(),
                        "published_after": window.after,
                        "published_before": window.before,
                        "searches": plan,
                        "output_dir": cfg.output.dir,
                    }))?;
                } else {
                    println!("[dry-run] {} searches ({}):", plan.len(), cfg.search.strategy.as_str());
                    for line in &plan {
                        println!("  {line}");
                    }
                    println!("Outputs would go to {}", cfg.output.dir.display());
                }
                return Ok(());
            }

            let key = config::resolve_credential(api_key.as_deref(), API_KEY_ENV, &cfg.api)?;
            let client = YouTubeClient::new(key, cfg.api.base_url.clone())?;
            let pacer = ThreadSleepPacer::new(Duration::from_millis(cfg.rate_limit.delay_ms));

            let outcome = pipeline::run(&client, &cfg, &pacer)?;
            let written = pipeline::write_outputs(&outcome, &cfg)
                .with_context(|| format!("Failed to write outputs to {}", cfg.output.dir.display()))?;

            if json_output {
                print_json(&outcome.summary)?;
            } else {
                println!();
                table::print_run_summary(&outcome.summary);
                if let Some(ref channels) = outcome.channels {
                    table::print_top_channels(channels, 10);
                }
                table::print_top_ngrams(&outcome.ngrams.top, 10);
                println!("\nWrote {} file{}:", written.len(), if written.len() == 1 { "" } else { "s" });
                for p in &written {
                    println!("  {}", p.display());
                }
            }
        }
    }

    Ok(())
}
