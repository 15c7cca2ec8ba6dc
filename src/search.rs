//! Web search placeholder.
//!
//! No search backend is wired up yet; [`search_web`] returns the same two
//! university pages for every query.

use url::Url;

const STATIC_RESULTS: [&str; 2] = ["https://itmo.ru/ru/", "https://abit.itmo.ru/"];

/// Return source URLs relevant to `query`.
///
/// The query is currently ignored and the result is always the two fixed
/// URLs, in the same order.
pub fn search_web(_query: &str) -> Vec<Url> {
    STATIC_RESULTS
        .iter()
        .filter_map(|s| Url::parse(s).ok())
        .collect()
}
