//! News retrieval: API search plus optional article page scraping.
//!
//! Retrieval follows a two-phase pattern:
//!
//! 1. **Searching**: Query the news API for article records
//! 2. **Fetching**: Download each article page and keep its visible text
//!
//! | Module | Role |
//! |--------|------|
//! | [`perigon`] | Perigon `/v1/all` search, record normalization |
//! | [`page`] | Page download and visible-text extraction |
//!
//! Both phases fail soft: errors are logged and the affected article (or the
//! whole search) yields empty results instead of aborting the run.

pub mod page;
pub mod perigon;
