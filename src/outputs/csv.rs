//! CSV output.
//!
//! One header row (`source,country,title,link,published,summary`) followed by
//! one row per distinct link. When a link repeats, the first article seen
//! wins.

use crate::models::Article;
use ::csv::{Terminator, WriterBuilder};
use itertools::Itertools;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Column names, in [`Article`] field order.
pub const HEADER: [&str; 6] = ["source", "country", "title", "link", "published", "summary"];

/// Articles with repeated links removed, keeping the first of each.
pub fn first_seen_by_link(articles: &[Article]) -> Vec<&Article> {
    articles.iter().unique_by(|article| article.link.as_str()).collect()
}

/// Render the deduplicated articles as UTF-8 CSV.
///
/// The header is written even when there are no rows.
pub fn to_csv(articles: &[Article]) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for article in first_seen_by_link(articles) {
        writer.serialize(article)?;
    }
    Ok(writer.into_inner().map_err(|e| e.into_error())?)
}

/// Write the CSV file at `path`, replacing any previous one.
///
/// # Returns
///
/// The number of data rows written.
#[instrument(level = "info", skip(articles), fields(articles = articles.len()))]
pub async fn write_csv(articles: &[Article], path: &str) -> Result<usize, Box<dyn Error>> {
    let rows = first_seen_by_link(articles).len();
    let bytes = to_csv(articles)?;
    fs::write(path, bytes).await?;
    info!(%path, rows, "Wrote CSV");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::article;

    #[test]
    fn test_first_seen_by_link_keeps_first() {
        let articles = vec![
            article("http://x/1", "first"),
            article("http://x/2", "other"),
            article("http://x/1", "second"),
        ];
        let unique = first_seen_by_link(&articles);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].title, "first");
        assert_eq!(unique[1].link, "http://x/2");
    }

    #[test]
    fn test_to_csv_header_and_rows() {
        let articles = vec![
            article("http://x/1", "first"),
            article("http://x/1", "second"),
        ];
        let text = String::from_utf8(to_csv(&articles).unwrap()).unwrap();
        assert_eq!(
            text,
            "source,country,title,link,published,summary\n\
             BBC News,UK,first,http://x/1,2024-03-15T09:30:00,Summary\n"
        );
    }

    #[test]
    fn test_to_csv_quotes_and_unicode() {
        let mut tricky = article("http://x/3", "Clarín: \"hoy\", mañana");
        tricky.summary = "line one\nline two".to_string();
        let text = String::from_utf8(to_csv(&[tricky]).unwrap()).unwrap();
        assert!(text.contains("\"Clarín: \"\"hoy\"\", mañana\""));
        assert!(text.contains("\"line one\nline two\""));
    }

    #[test]
    fn test_to_csv_empty_writes_header() {
        let text = String::from_utf8(to_csv(&[]).unwrap()).unwrap();
        assert_eq!(text, "source,country,title,link,published,summary\n");
    }

    #[tokio::test]
    async fn test_write_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("news_data.csv");
        let path = path.to_str().unwrap();

        let articles = vec![article("http://x/1", "a"), article("http://x/2", "b")];
        assert_eq!(write_csv(&articles, path).await.unwrap(), 2);

        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(written.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_write_csv_unwritable_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("news_data.csv");
        assert!(write_csv(&[], path.to_str().unwrap()).await.is_err());
    }
}
