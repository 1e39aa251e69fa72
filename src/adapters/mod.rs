//! Infrastructure adapters. Implement outbound ports.
//!
//! Model API, filesystem, CSV datasets, web scraping, charts, dashboard and terminal UI.
//! Map errors to DomainError.

pub mod ai;
pub mod charts;
pub mod persistence;
pub mod scrape;
pub mod ui;
pub mod web;
