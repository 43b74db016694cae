//! Data models for collected articles.
//!
//! - [`Article`]: the normalized record produced for every feed entry
//!
//! Field order on [`Article`] is significant: it is the column order of the
//! CSV output and the key order of the JSON output.

use serde::{Deserialize, Serialize};

/// A normalized news article as read from one feed entry.
///
/// Articles are plain values. They are built by
/// [`normalize`](crate::feeds::normalize::normalize), collected by the
/// [`Aggregator`](crate::aggregator::Aggregator) and read by every writer in
/// [`outputs`](crate::outputs).
///
/// `link` is the natural key. Nothing in memory enforces its uniqueness; each
/// writer deduplicates on its own terms.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    /// Display name of the feed the entry came from.
    pub source: String,
    /// Country the feed is attributed to.
    pub country: String,
    /// Entry headline, trimmed. Empty when the entry had none.
    pub title: String,
    /// Entry link, trimmed.
    pub link: String,
    /// `YYYY-MM-DDTHH:MM:SS` when the feed date could be parsed, otherwise
    /// the raw published/updated text, otherwise empty.
    pub published: String,
    /// Plain-text summary with all markup removed.
    pub summary: String,
}

#[cfg(test)]
pub(crate) fn article(link: &str, title: &str) -> Article {
    Article {
        source: "BBC News".to_string(),
        country: "UK".to_string(),
        title: title.to_string(),
        link: link.to_string(),
        published: "2024-03-15T09:30:00".to_string(),
        summary: "Summary".to_string(),
    }
}
