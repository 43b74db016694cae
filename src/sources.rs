//! Feed source registry.
//!
//! The registry is an ordered list of [`FeedSource`] descriptors. It is read
//! once at startup, either from the built-in table below or from a YAML file
//! passed with `--feeds`, and never changes afterwards.
//!
//! # YAML Format
//!
//! ```yaml
//! - source: BBC News
//!   country: UK
//!   url: http://feeds.bbci.co.uk/news/rss.xml
//! - source: NHK
//!   country: Japan
//!   url: https://www3.nhk.or.jp/rss/news/cat0.xml
//! ```

use serde::Deserialize;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument, warn};
use url::Url;

/// One configured feed: a display name, a country and the URL to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedSource {
    pub source: String,
    pub country: String,
    pub url: String,
}

impl FeedSource {
    pub fn new(source: &str, country: &str, url: &str) -> Self {
        Self {
            source: source.to_string(),
            country: country.to_string(),
            url: url.to_string(),
        }
    }
}

/// `(source, country, url)` rows of the built-in registry, in fetch order.
const DEFAULT_FEEDS: &[(&str, &str, &str)] = &[
    ("BBC News", "UK", "http://feeds.bbci.co.uk/news/rss.xml"),
    ("CNN", "USA", "http://rss.cnn.com/rss/edition.rss"),
    ("Al Jazeera", "Qatar", "https://www.aljazeera.com/xml/rss/all.xml"),
    ("NHK", "Japan", "https://www3.nhk.or.jp/rss/news/cat0.xml"),
    ("NDTV", "India", "https://feeds.feedburner.com/ndtvnews-top-stories"),
    ("Korea Herald", "South Korea", "http://www.koreaherald.com/rss/rss_welcome.php"),
    ("Le Monde", "France", "https://www.lemonde.fr/rss/une.xml"),
    ("Der Spiegel", "Germany", "https://www.spiegel.de/international/index.rss"),
    ("El Pais", "Spain", "https://elpais.com/rss/feed.html?feedId=1022"),
    ("Folha de S.Paulo", "Brazil", "https://feeds.folha.uol.com.br/emcimadahora/rss091.xml"),
    ("RT", "Russia", "https://www.rt.com/rss/news"),
    ("The Australian", "Australia", "https://www.theaustralian.com.au/rss"),
    ("The Guardian", "UK", "https://www.theguardian.com/uk/rss"),
    ("Times of India", "India", "https://timesofindia.indiatimes.com/rssfeedstopstories.cms"),
    ("CNA", "Singapore", "https://www.channelnewsasia.com/news/rss"),
    ("Xinhua", "China", "http://www.xinhuanet.com/english/rss/worldrss.xml"),
    ("Excélsior", "Mexico", "https://www.excelsior.com.mx/rss.xml"),
    ("Detik News", "Indonesia", "https://rss.detik.com/index.php/detikcom"),
    ("Clarín", "Argentina", "https://www.clarin.com/rss/lo-ultimo/"),
    ("Global News", "Canada", "https://globalnews.ca/feed/"),
];

/// The built-in registry of international outlets.
pub fn default_sources() -> Vec<FeedSource> {
    DEFAULT_FEEDS
        .iter()
        .map(|(source, country, url)| FeedSource::new(source, country, url))
        .collect()
}

/// Parse a YAML registry and check every URL.
///
/// # Errors
///
/// Returns an error if the document is not a list of `{source, country, url}`
/// mappings or if any `url` is not an absolute URL.
pub fn parse_sources(yaml: &str) -> Result<Vec<FeedSource>, Box<dyn Error>> {
    let sources: Vec<FeedSource> = serde_yaml::from_str(yaml)?;
    for feed in &sources {
        if let Err(e) = Url::parse(&feed.url) {
            return Err(format!("invalid url for {}: {} ({})", feed.source, feed.url, e).into());
        }
    }
    Ok(sources)
}

/// Resolve the registry for this run.
///
/// With no path the built-in registry is used; otherwise the YAML file at
/// `path` replaces it entirely.
#[instrument(level = "info")]
pub async fn load_sources(path: Option<&str>) -> Result<Vec<FeedSource>, Box<dyn Error>> {
    let sources = match path {
        None => default_sources(),
        Some(path) => {
            let yaml = fs::read_to_string(path).await?;
            parse_sources(&yaml)?
        }
    };

    if sources.is_empty() {
        warn!("Feed registry is empty; nothing will be fetched");
    }
    info!(count = sources.len(), "Loaded feed registry");
    Ok(sources)
}
