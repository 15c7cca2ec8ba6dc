//! ITMO News front-page link scraper.
//!
//! Fetches the news front page once per request and keeps anchors whose
//! `href` contains `news`. Relative links are resolved against the site
//! root, e.g. `/ru/news/123/` becomes `https://news.itmo.ru/ru/news/123/`.

use crate::models::MAX_SOURCES;
use scraper::{Html, Selector};
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://news.itmo.ru";
pub const DEFAULT_PAGE_PATH: &str = "/ru/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Substring an `href` must contain to count as a news link.
const NEWS_MARKER: &str = "news";

/// Fetcher for the latest news links.
#[derive(Debug, Clone)]
pub struct NewsFetcher {
    client: reqwest::Client,
    base_url: Url,
    page_url: Url,
}

impl NewsFetcher {
    /// Build a fetcher for `page_path` on `base_url`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Site root; links are resolved against it
    /// * `page_path` - Path of the page listing the news, joined onto `base_url`
    /// * `timeout` - Total time allowed for the page fetch
    ///
    /// # Errors
    ///
    /// Returns an error if the URLs do not parse or the HTTP client cannot be built.
    pub fn new(base_url: &str, page_path: &str, timeout: Duration) -> Result<Self, Box<dyn Error>> {
        let base_url = Url::parse(base_url)?;
        let page_url = base_url.join(page_path)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            page_url,
        })
    }

    /// Fetch up to three news links from the front page, in document order.
    ///
    /// Any failure (connection, timeout, non-success status, unreadable body)
    /// is logged and yields an empty list.
    #[instrument(level = "info", skip_all, fields(page = %self.page_url))]
    pub async fn fetch_latest(&self) -> Vec<Url> {
        match self.fetch_page().await {
            Ok(html) => {
                let links = extract_news_links(&html, &self.base_url);
                info!(count = links.len(), "Collected news links");
                debug!(urls = ?links, "News links");
                links
            }
            Err(e) => {
                warn!(error = %e, "News fetch failed; continuing without news links");
                Vec::new()
            }
        }
    }

    async fn fetch_page(&self) -> Result<String, reqwest::Error> {
        self.client
            .get(self.page_url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

/// Collect up to three `a[href]` targets containing `news`, resolved against `base`.
///
/// Hrefs that cannot be joined onto `base`, or that resolve to anything other
/// than an `http`/`https` URL, are skipped. Repeated links are kept.
pub fn extract_news_links(html: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let anchor_selector = Selector::parse("a[href]").unwrap();

    document
        .select(&anchor_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| href.contains(NEWS_MARKER))
        .filter_map(|href| base.join(href).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .take(MAX_SOURCES)
        .collect()
}
