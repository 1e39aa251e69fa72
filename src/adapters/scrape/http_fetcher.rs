//! Implements PageFetcher over reqwest, plus an in-memory fetcher for offline runs.

use crate::domain::DomainError;
use crate::ports::PageFetcher;
use reqwest::Client;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// Plain GET with the default client. No retries, no rate limiting.
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for ReqwestFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PageFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, DomainError> {
        debug!(url, "fetching page");
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::Scrape(format!("Request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            return Err(DomainError::Scrape(format!("GET {} returned {}", url, status)));
        }

        res.text()
            .await
            .map_err(|e| DomainError::Scrape(format!("Failed to read body of {}: {}", url, e)))
    }
}

/// Serves pages from a fixed URL -> HTML map and records requested URLs.
#[derive(Default)]
pub struct StaticPageFetcher {
    pages: HashMap<String, String>,
    requested: Mutex<Vec<String>>,
}

impl StaticPageFetcher {
    pub fn new<I, K, V>(pages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pages: pages
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// URLs fetched so far, in order.
    pub async fn requested(&self) -> Vec<String> {
        self.requested.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl PageFetcher for StaticPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, DomainError> {
        self.requested.lock().await.push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| DomainError::Scrape(format!("GET {} returned 404 Not Found", url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_fetcher() {
        let fetcher = StaticPageFetcher::new([("http://a/", "<p>a</p>")]);
        assert_eq!(fetcher.fetch("http://a/").await.unwrap(), "<p>a</p>");
        assert!(matches!(
            fetcher.fetch("http://b/").await,
            Err(DomainError::Scrape(_))
        ));
        assert_eq!(fetcher.requested().await, vec!["http://a/", "http://b/"]);
    }
}
