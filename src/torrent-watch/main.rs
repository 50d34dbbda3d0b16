use core::time::Duration;
use std::path::PathBuf;

use twatch::{config, history::History, scrape, watch};

/// Search a torrent aggregator and print titles not seen in earlier runs.
#[derive(clap::Parser)]
#[command(version, about)]
struct Args {
    /// Search terms [default: ubuntu, "elementary os"]
    #[arg(value_name = "TERM")]
    terms: Vec<String>,

    /// Titles already reported, one per line
    #[arg(short, long, default_value = config::LOG_FILE)]
    log_file: PathBuf,

    /// Search URL the term is appended to (repeatable)
    #[arg(short, long = "source", value_name = "URL")]
    sources: Vec<String>,

    /// Results kept per source
    #[arg(short = 'n', long, default_value_t = config::LIMIT, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    limit: usize,

    /// CSS selector of a result title
    #[arg(long, default_value = config::SELECTOR)]
    selector: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = config::TIMEOUT.as_secs(), value_parser = clap::builder::RangedU64ValueParser::<u64>::new().range(1..))]
    timeout: u64,

    /// Pause between requests in milliseconds
    #[arg(long, default_value_t = config::DELAY.as_millis() as u64)]
    delay: u64,
}

const FRESH_NOTICE: &str = "No old results found...\n";

fn notice(history: &History) -> Option<&'static str> {
    history.is_fresh().then_some(FRESH_NOTICE)
}

/// Warnings are shown unless `RUST_LOG` says otherwise.
fn init_logger() {
    pretty_env_logger::formatted_timed_builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    use clap::Parser;

    init_logger();

    let args = Args::parse();

    let terms = if args.terms.is_empty() {
        Vec::from(config::TERMS.map(String::from))
    } else {
        args.terms
    };
    let sources = if args.sources.is_empty() {
        Vec::from(config::SOURCES.map(String::from))
    } else {
        args.sources
    };

    let client = scrape::basic(Duration::from_secs(args.timeout))?;
    let fetcher = scrape::Fetcher {
        limit: args.limit,
        delay: Duration::from_millis(args.delay),
        sel_title: scrape::parse_selector(&args.selector)?,
        ..scrape::Fetcher::new(client, sources)
    };

    let mut history = History::open(&args.log_file)?;
    if let Some(notice) = notice(&history) {
        println!("{notice}");
    }
    tracing::info!(target: "main", "{} titles known from {}", history.len(), history.path().display());

    let total = watch::process(&fetcher, &mut history, &terms, |report| {
        println!("{report}");
    })
    .await?;

    history.close()?;
    tracing::info!(target: "main", "\x1b[36m{total} new titles over {} terms\x1b[0m", terms.len());

    Ok(())
}
