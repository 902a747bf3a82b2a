use anyhow::Result;
use clap::Parser;
use collector::oauth::Credentials;
use collector::twitter::TwitterClient;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};
use tweets_core::config::{self, RunConfig};
use tweets_core::locale::LocaleFilter;

#[derive(Parser, Debug)]
#[command(name = "collector")]
#[command(about = "Collect matching tweets and merge them into a CSV dataset")]
struct Cli {
    /// Search terms, in search query syntax
    #[arg(long, default_value = config::DEFAULT_SEARCH_WORDS)]
    search_words: String,
    /// Language tag passed to the search
    #[arg(long, default_value = config::DEFAULT_LANGUAGE)]
    language: String,
    /// First day to collect (inclusive), YYYY-MM-DD
    #[arg(long, default_value = "2021-01-25", value_parser = config::parse_date)]
    since: time::Date,
    /// Day to stop at (exclusive), YYYY-MM-DD
    #[arg(long, default_value = "2021-01-26", value_parser = config::parse_date)]
    until: time::Date,
    /// Maximum number of tweets to fetch
    #[arg(long, default_value_t = config::DEFAULT_ITEMS_LIMIT)]
    items_limit: usize,
    /// Dataset CSV to create or update
    #[arg(long, default_value = config::DEFAULT_DATASET_PATH)]
    output: PathBuf,
    /// Request timeout seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

impl From<Cli> for RunConfig {
    fn from(args: Cli) -> Self {
        Self {
            search_words: args.search_words,
            language: args.language,
            date_since: args.since,
            date_until: args.until,
            items_limit: args.items_limit,
            dataset_path: args.output,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))).init();
    let args = Cli::parse();
    let timeout = Duration::from_secs(args.timeout_secs);
    let cfg = RunConfig::from(args);

    let creds = Credentials::from_env()?;
    let client = TwitterClient::new(creds, timeout)?;
    let report = collector::run(&client, &cfg, &LocaleFilter::default()).await?;

    tracing::info!(
        rows = report.final_rows,
        path = %cfg.dataset_path.display(),
        "done"
    );
    Ok(())
}
