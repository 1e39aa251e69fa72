//! Scrape service. Index page -> substance pages -> report pages -> JSON file.
//!
//! Fully sequential; one request at a time, no retries.

use crate::adapters::persistence::fs_repo::to_pretty_json;
use crate::adapters::scrape::html;
use crate::domain::DomainError;
use crate::ports::PageFetcher;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{info, warn};

/// Substance name -> report texts.
pub type ScrapedReports = BTreeMap<String, Vec<String>>;

pub struct ScrapeService {
    fetcher: Arc<dyn PageFetcher>,
    base_url: String,
}

impl ScrapeService {
    pub fn new(fetcher: Arc<dyn PageFetcher>, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    /// Substance name -> listing page URL, for the names found in the index table.
    pub async fn get_substance_links(
        &self,
        substances: &[String],
    ) -> Result<BTreeMap<String, String>, DomainError> {
        let page = self.fetcher.fetch(&self.base_url).await?;
        let links = html::substance_links(&page, &self.base_url, substances)?;
        info!(found = links.len(), wanted = substances.len(), "substance links found");
        Ok(links)
    }

    /// Text of every report linked from one substance listing page.
    ///
    /// Report pages without a body element are skipped.
    pub async fn scrape_substance_reports(&self, listing_url: &str) -> Result<Vec<String>, DomainError> {
        let listing = self.fetcher.fetch(listing_url).await?;
        let report_urls = html::report_links(&listing, &self.base_url)?;

        let mut reports = Vec::with_capacity(report_urls.len());
        for url in report_urls {
            let page = self.fetcher.fetch(&url).await?;
            match html::report_text(&page)? {
                Some(text) => reports.push(text),
                None => warn!(url = %url, "report page has no report body"),
            }
        }
        info!(url = listing_url, reports = reports.len(), "substance page scraped");
        Ok(reports)
    }

    /// Scrape listing pages given directly as URLs, keyed by URL.
    pub async fn scrape_all(&self, listing_urls: &[String]) -> Result<ScrapedReports, DomainError> {
        let mut all = ScrapedReports::new();
        for url in listing_urls {
            let reports = self.scrape_substance_reports(url).await?;
            all.insert(url.clone(), reports);
        }
        Ok(all)
    }

    /// Full scrape for the allow-listed substances, written to `output` as JSON.
    pub async fn run(
        &self,
        substances: &[String],
        output: &Path,
    ) -> Result<ScrapedReports, DomainError> {
        let links = self.get_substance_links(substances).await?;

        let mut all = ScrapedReports::new();
        for (substance, url) in &links {
            info!(substance = %substance, url = %url, "scraping substance");
            let reports = self.scrape_substance_reports(url).await?;
            all.insert(substance.clone(), reports);
        }

        save_reports_to_file(&all, output).await?;
        Ok(all)
    }
}

/// Write scraped reports as pretty JSON, creating parent directories.
pub async fn save_reports_to_file(reports: &ScrapedReports, output: &Path) -> Result<(), DomainError> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
    }
    let bytes = to_pretty_json(reports).map_err(|e| DomainError::Repo(e.to_string()))?;
    fs::write(output, bytes)
        .await
        .map_err(|e| DomainError::Repo(format!("write {}: {}", output.display(), e)))?;
    info!(path = %output.display(), substances = reports.len(), "scraped reports saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::scrape::StaticPageFetcher;

    const BASE: &str = "https://example.org/experiences/";

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn site() -> StaticPageFetcher {
        StaticPageFetcher::new([
            (
                BASE.to_string(),
                r#"<table id="exp-front-top-table"><tr>
                    <td><a href="lsd.shtml">LSD</a></td><td><a href="dmt.shtml">DMT</a></td>
                </tr></table>"#
                    .to_string(),
            ),
            (
                format!("{}lsd.shtml", BASE),
                r#"<a class="report-link-class" href="r1.html">r1</a>
                   <a class="report-link-class" href="r2.html">r2</a>"#
                    .to_string(),
            ),
            (
                format!("{}r1.html", BASE),
                r#"<div class="report-text-class">Melting walls.</div>"#.to_string(),
            ),
            (
                format!("{}r2.html", BASE),
                r#"<div class="other">No body here.</div>"#.to_string(),
            ),
        ])
    }

    #[tokio::test]
    async fn test_run_scrapes_matching_substances() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out/trip_reports.json");
        let service = ScrapeService::new(Arc::new(site()), BASE);

        let reports = service.run(&names(&["LSD"]), &output).await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports["LSD"], names(&["Melting walls."]));

        let saved: ScrapedReports =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(saved, reports);
    }

    #[tokio::test]
    async fn test_no_matching_anchors_gives_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("trip_reports.json");
        let fetcher = Arc::new(site());
        let service = ScrapeService::new(fetcher.clone(), BASE);

        let links = service.get_substance_links(&names(&["Ketamine"])).await.unwrap();
        assert!(links.is_empty());

        let reports = service.run(&names(&["Ketamine"]), &output).await.unwrap();
        assert!(reports.is_empty());
        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(saved, serde_json::json!({}));
        assert_eq!(fetcher.requested().await, vec![BASE.to_string(), BASE.to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let service = ScrapeService::new(Arc::new(site()), BASE);
        let result = service
            .run(&names(&["DMT"]), &dir.path().join("x.json"))
            .await;
        assert!(matches!(result, Err(DomainError::Scrape(_))));
    }

    #[tokio::test]
    async fn test_scrape_all_by_url() {
        let service = ScrapeService::new(Arc::new(site()), BASE);
        let url = format!("{}lsd.shtml", BASE);
        let all = service.scrape_all(&[url.clone()]).await.unwrap();
        assert_eq!(all[&url].len(), 1);
    }
}
