//! # World News Feeds
//!
//! Collects article metadata from a fixed set of international RSS/Atom
//! feeds, normalizes every entry into one record shape, and saves the result
//! three ways: a CSV file, a JSON file and a SQLite database.
//!
//! ## Usage
//!
//! ```sh
//! world_news_feeds
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Fetching**: Download each feed in turn (10 second timeout, 1 second pause between feeds)
//! 2. **Parsing**: Read entries out of the RSS/Atom document
//! 3. **Normalizing**: Trim fields, canonicalize dates, strip HTML from summaries
//! 4. **Output**: Write CSV (first link wins), JSON (last link wins) and SQLite (insert-or-ignore)
//!
//! A feed that fails to download contributes no articles and the run goes on.
//! A failure while writing output ends the run with an error.

use clap::Parser;
use std::error::Error;
use std::time::Instant;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregator;
mod cli;
mod feeds;
mod models;
mod outputs;
mod sources;
#[cfg(test)]
mod test_support;

use aggregator::Aggregator;
use cli::Cli;
use feeds::fetch::{FETCH_TIMEOUT, Fetcher};

#[tokio::main(flavor = "current_thread")]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = Instant::now();
    info!("world_news_feeds starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Collect ----
    let feeds = sources::load_sources(args.feeds.as_deref()).await?;
    let fetcher = Fetcher::new(FETCH_TIMEOUT)?;
    let articles = Aggregator::new(feeds, fetcher).run_all().await;

    // ---- Save ----
    let csv_rows = outputs::csv::write_csv(&articles, &args.csv).await?;
    let json_records = outputs::json::write_json(&articles, &args.json).await?;
    let db_inserted = outputs::sqlite::write_sqlite(&articles, &args.db).await?;

    let elapsed = start_time.elapsed();
    info!(
        articles = articles.len(),
        csv_rows,
        json_records,
        db_inserted,
        secs = elapsed.as_secs(),
        "Completed! Data saved to CSV, JSON, and SQLite."
    );

    Ok(())
}
