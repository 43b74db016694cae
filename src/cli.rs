//! Command-line interface definitions for World News Feeds.
//!
//! Every option has a default, so running the binary with no arguments
//! collects the built-in feeds into `news_data.csv`, `news_data.json` and
//! `news.db` in the current directory. Options can also be set through
//! environment variables. The fetch timeout and the pause between feeds are
//! fixed and cannot be changed from here.

use clap::Parser;

/// Command-line arguments for the World News Feeds collector.
///
/// # Examples
///
/// ```sh
/// # Built-in feeds, default outputs in the current directory
/// world_news_feeds
///
/// # Custom feed list and output locations
/// world_news_feeds --feeds feeds.yaml --csv out/news.csv --json out/news.json --db out/news.db
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// YAML file listing the feeds to collect (defaults to the built-in list)
    #[arg(short, long, env = "NEWS_FEEDS")]
    pub feeds: Option<String>,

    /// Path of the CSV output file
    #[arg(long, env = "NEWS_CSV", default_value = "news_data.csv")]
    pub csv: String,

    /// Path of the JSON output file
    #[arg(long, env = "NEWS_JSON", default_value = "news_data.json")]
    pub json: String,

    /// Path of the SQLite database
    #[arg(long, env = "NEWS_DB", default_value = "news.db")]
    pub db: String,
}
