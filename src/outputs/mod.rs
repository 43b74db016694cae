//! Persistence of collected articles.
//!
//! Three independent writers each take the full article list of a run and
//! deduplicate it by `link` their own way:
//!
//! | Writer | Output | Duplicate link |
//! |--------|--------|----------------|
//! | [`csv`] | `news_data.csv` | first occurrence kept |
//! | [`json`] | `news_data.json` | last occurrence kept |
//! | [`sqlite`] | `news.db` | existing row kept, across runs |
//!
//! The CSV and JSON files are rewritten on every run. The SQLite table
//! accumulates. Write errors are returned to the caller untouched.

pub mod csv;
pub mod json;
pub mod sqlite;
