//! Application use cases. Orchestrate domain logic via ports.

pub mod aggregation;
pub mod analysis_service;
pub mod categorization;
pub mod prompts;
pub mod scrape_service;

pub use aggregation::{aggregate_mapping_counts, mapping_coverage, tally_raw};
pub use analysis_service::AnalysisService;
pub use categorization::{Categorization, Categorizer, dedup_preserving_order};
pub use scrape_service::{ScrapeService, ScrapedReports, save_reports_to_file};
