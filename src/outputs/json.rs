//! JSON output.
//!
//! The file holds a single pretty-printed array of article objects with
//! non-ASCII text written as-is. When a link repeats, the last article seen
//! wins, in the position where that link first appeared.

use crate::models::Article;
use std::collections::HashMap;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Articles with repeated links collapsed onto the last occurrence of each.
pub fn last_seen_by_link(articles: &[Article]) -> Vec<&Article> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut unique: Vec<&Article> = Vec::new();

    for article in articles {
        match positions.get(article.link.as_str()) {
            Some(&index) => unique[index] = article,
            None => {
                positions.insert(&article.link, unique.len());
                unique.push(article);
            }
        }
    }
    unique
}

/// Render the deduplicated articles as an indented JSON array.
pub fn to_json(articles: &[Article]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&last_seen_by_link(articles))
}

/// Write the JSON file at `path`, replacing any previous one.
///
/// # Returns
///
/// The number of objects written.
#[instrument(level = "info", skip(articles), fields(articles = articles.len()))]
pub async fn write_json(articles: &[Article], path: &str) -> Result<usize, Box<dyn Error>> {
    let records = last_seen_by_link(articles).len();
    let json = to_json(articles)?;
    fs::write(path, json).await?;
    info!(%path, records, "Wrote JSON");
    Ok(records)
}
