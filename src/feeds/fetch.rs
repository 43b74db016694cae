//! HTTP retrieval of raw feed documents.
//!
//! A fetch never fails from the caller's point of view. Network errors,
//! timeouts and non-2xx statuses are logged against the URL and turned into
//! an empty [`RawFeedPayload`], which parses to a feed with no entries.

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Per-request timeout for feed downloads.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// The undecoded body of a feed response.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawFeedPayload {
    bytes: Vec<u8>,
}

impl RawFeedPayload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// The "no entries" payload handed back when a fetch fails.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Anything that can turn a feed URL into a payload.
///
/// Implementations must not return errors: a failed fetch is reported through
/// logging and yields [`RawFeedPayload::empty`].
pub trait FeedFetcher {
    async fn fetch(&self, url: &str) -> RawFeedPayload;
}

/// HTTP fetcher backed by a single [`reqwest::Client`].
///
/// One GET per call, bounded by the client timeout. There is no retry.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Build a fetcher whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    async fn try_fetch(&self, url: &str) -> Result<Vec<u8>, reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

impl FeedFetcher for Fetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> RawFeedPayload {
        match self.try_fetch(url).await {
            Ok(bytes) => {
                debug!(%url, bytes = bytes.len(), "Fetched feed");
                RawFeedPayload::new(bytes)
            }
            Err(e) => {
                error!(%url, error = %e, "Failed to fetch feed");
                RawFeedPayload::empty()
            }
        }
    }
}
