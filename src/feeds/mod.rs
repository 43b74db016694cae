//! Feed ingestion: fetching, parsing and normalizing.
//!
//! Each configured feed goes through three steps:
//!
//! 1. **Fetching** ([`fetch`]): one HTTP GET with a timeout; failures become an
//!    empty payload
//! 2. **Parsing** ([`parser`]): RSS/Atom entries are read out of the payload;
//!    broken documents yield the entries read so far
//! 3. **Normalizing** ([`normalize`]): each entry becomes an
//!    [`Article`](crate::models::Article)
//!
//! None of these steps can abort a run.

pub mod fetch;
pub mod normalize;
pub mod parser;
