//! Scrape adapters. HTTP page fetching and HTML extraction for the report site.

pub mod html;
pub mod http_fetcher;

pub use html::DEFAULT_BASE_URL;
pub use http_fetcher::{ReqwestFetcher, StaticPageFetcher};
