//! HTML extraction for the experience-report site, using the `scraper` crate.
//!
//! Markup assumptions are fixed: the index table is found by id, report links
//! and report bodies by CSS class. Different markup yields nothing.

use crate::domain::DomainError;
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://erowid.org/experiences/";
pub const INDEX_TABLE_ID: &str = "exp-front-top-table";
pub const REPORT_LINK_CLASS: &str = "report-link-class";
pub const REPORT_TEXT_CLASS: &str = "report-text-class";

fn selector(css: &str) -> Result<Selector, DomainError> {
    Selector::parse(css).map_err(|e| DomainError::Scrape(format!("bad selector {}: {:?}", css, e)))
}

/// Absolute hrefs are kept; anything else is appended to `base`.
pub fn join_url(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}{}", base, href)
    }
}

/// Links from the index table whose anchor text is one of `substances`.
///
/// A page without the index table yields an empty map.
pub fn substance_links(
    html: &str,
    base: &str,
    substances: &[String],
) -> Result<BTreeMap<String, String>, DomainError> {
    let doc = Html::parse_document(html);
    let table_sel = selector(&format!("table#{}", INDEX_TABLE_ID))?;
    let link_sel = selector("a[href]")?;

    let mut links = BTreeMap::new();
    let Some(table) = doc.select(&table_sel).next() else {
        warn!(table = INDEX_TABLE_ID, "index table not found");
        return Ok(links);
    };
    for anchor in table.select(&link_sel) {
        let name = anchor.text().collect::<String>();
        let name = name.trim();
        if !substances.iter().any(|s| s == name) {
            continue;
        }
        if let Some(href) = anchor.value().attr("href") {
            links.insert(name.to_string(), join_url(base, href));
        }
    }
    Ok(links)
}

/// Report page URLs listed on a substance page.
pub fn report_links(html: &str, base: &str) -> Result<Vec<String>, DomainError> {
    let doc = Html::parse_document(html);
    let link_sel = selector(&format!("a.{}[href]", REPORT_LINK_CLASS))?;
    Ok(doc
        .select(&link_sel)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| join_url(base, href))
        .collect())
}

/// Body text of a single report page, if the page has one.
pub fn report_text(html: &str) -> Result<Option<String>, DomainError> {
    let doc = Html::parse_document(html);
    let body_sel = selector(&format!("div.{}", REPORT_TEXT_CLASS))?;
    Ok(doc
        .select(&body_sel)
        .next()
        .map(|div| div.text().collect::<String>().trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.org/experiences/";

    fn allow(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_substance_links_filters_by_allow_list() {
        let html = r#"
            <html><body>
            <a href="outside.shtml">LSD</a>
            <table id="exp-front-top-table"><tr>
                <td><a href="subs/exp_LSD.shtml">LSD</a></td>
                <td><a href="subs/exp_DMT.shtml"> DMT </a></td>
                <td><a href="subs/exp_Cannabis.shtml">Cannabis</a></td>
                <td><a>MDMA</a></td>
            </tr></table>
            </body></html>"#;
        let links = substance_links(html, BASE, &allow(&["LSD", "DMT", "MDMA"])).unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links["LSD"], "https://example.org/experiences/subs/exp_LSD.shtml");
        assert_eq!(links["DMT"], "https://example.org/experiences/subs/exp_DMT.shtml");
    }

    #[test]
    fn test_substance_links_without_table_is_empty() {
        let html = r#"<html><body><a href="x">LSD</a></body></html>"#;
        assert!(substance_links(html, BASE, &allow(&["LSD"])).unwrap().is_empty());
    }

    #[test]
    fn test_report_links_and_text() {
        let listing = r#"
            <a class="report-link-class" href="exp.php?ID=1">One</a>
            <a class="other" href="exp.php?ID=2">Two</a>
            <a class="report-link-class" href="https://mirror.example/exp.php?ID=3">Three</a>"#;
        assert_eq!(
            report_links(listing, BASE).unwrap(),
            vec![
                "https://example.org/experiences/exp.php?ID=1".to_string(),
                "https://mirror.example/exp.php?ID=3".to_string(),
            ]
        );

        let page = r#"<div class="report-text-class">
            I sat by the lake. <b>Everything</b> breathed.
        </div>"#;
        assert_eq!(
            report_text(page).unwrap().unwrap(),
            "I sat by the lake. Everything breathed."
        );
        assert_eq!(report_text("<div>nothing</div>").unwrap(), None);
    }
}
