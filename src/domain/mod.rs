//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;

pub use entities::{
    AggregatedCounts, AnalysisResult, BroadCategorySet, CategoryKind, CategoryMapping, Dataset,
    MappingCoverage, NOT_AVAILABLE, Report, RunSummary, SessionId,
};
pub use errors::DomainError;
