//! Scrapers for pages used as response sources.
//!
//! | Source | Module | Method |
//! |--------|--------|--------|
//! | ITMO News | [`news`] | HTML scraping of the front page |
//!
//! Scrapers never fail the request they serve: a failed fetch is logged and
//! produces no links.

pub mod news;
