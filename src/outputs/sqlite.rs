//! SQLite output.
//!
//! Articles go into a single `articles` table keyed by `link`. Inserts use
//! `INSERT OR IGNORE`, so a link stored by an earlier run (or earlier in this
//! one) is never overwritten and never raises a constraint error. Running the
//! pipeline twice over the same feeds leaves the row count unchanged.
//!
//! The connection lives only for the duration of one [`write_sqlite`] call.

use crate::models::Article;
use sqlx::Connection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use std::error::Error;
use tracing::{debug, info, instrument};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS articles (
        link TEXT PRIMARY KEY,
        source TEXT,
        country TEXT,
        title TEXT,
        published TEXT,
        summary TEXT
    )
"#;

const INSERT_OR_IGNORE: &str = r#"
    INSERT OR IGNORE INTO articles
    (link, source, country, title, published, summary)
    VALUES (?, ?, ?, ?, ?, ?)
"#;

/// Store articles in the database at `db_path`, creating it if needed.
///
/// All inserts run in one transaction.
///
/// # Returns
///
/// The number of rows actually inserted; ignored duplicates are not counted.
#[instrument(level = "info", skip(articles), fields(articles = articles.len()))]
pub async fn write_sqlite(articles: &[Article], db_path: &str) -> Result<u64, Box<dyn Error>> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);
    let mut conn = SqliteConnection::connect_with(&options).await?;

    sqlx::query(CREATE_TABLE).execute(&mut conn).await?;

    let mut tx = conn.begin().await?;
    let mut inserted = 0;
    for article in articles {
        inserted += sqlx::query(INSERT_OR_IGNORE)
            .bind(article.link.as_str())
            .bind(article.source.as_str())
            .bind(article.country.as_str())
            .bind(article.title.as_str())
            .bind(article.published.as_str())
            .bind(article.summary.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();
    }
    tx.commit().await?;
    conn.close().await?;

    debug!(ignored = articles.len() as u64 - inserted, "Skipped existing links");
    info!(path = %db_path, inserted, "Wrote SQLite");
    Ok(inserted)
}
