//! Sequential collection of articles across every configured feed.
//!
//! Feeds are processed strictly one after another, in registry order, with a
//! fixed pause after each one whether it succeeded or not. A feed that cannot
//! be fetched contributes nothing and the run moves on.

use crate::feeds::fetch::FeedFetcher;
use crate::feeds::normalize::normalize;
use crate::feeds::parser;
use crate::models::Article;
use crate::sources::FeedSource;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

/// Pause after each feed, to go easy on upstream servers.
pub const FEED_DELAY: Duration = Duration::from_secs(1);

/// Drives fetch, parse and normalize over an immutable feed registry.
#[derive(Debug)]
pub struct Aggregator<F> {
    sources: Vec<FeedSource>,
    fetcher: F,
    delay: Duration,
}

impl<F> Aggregator<F>
where
    F: FeedFetcher,
{
    pub fn new(sources: Vec<FeedSource>, fetcher: F) -> Self {
        Self {
            sources,
            fetcher,
            delay: FEED_DELAY,
        }
    }

    #[cfg(test)]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Collect articles from every feed.
    ///
    /// Articles keep entry order within a feed and feed order across feeds.
    /// Duplicate links are not removed here.
    #[instrument(level = "info", skip_all, fields(feeds = self.sources.len()))]
    pub async fn run_all(&self) -> Vec<Article> {
        let mut articles = Vec::new();

        for feed in &self.sources {
            info!(
                source = %feed.source,
                country = %feed.country,
                url = %feed.url,
                "Fetching feed"
            );
            let payload = self.fetcher.fetch(&feed.url).await;
            let document = parser::parse(&payload);

            let before = articles.len();
            articles.extend(
                document
                    .entries
                    .iter()
                    .map(|entry| normalize(entry, &feed.source, &feed.country)),
            );
            debug!(
                source = %feed.source,
                count = articles.len() - before,
                empty_payload = payload.is_empty(),
                malformed = document.malformed,
                "Normalized feed entries"
            );

            sleep(self.delay).await;
        }

        info!(count = articles.len(), "Collected articles from all feeds");
        articles
    }
}
