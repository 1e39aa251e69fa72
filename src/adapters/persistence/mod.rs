//! Persistence adapters. JSON result files and CSV datasets.

pub mod csv_datasets;
pub mod fs_repo;

pub use csv_datasets::CsvDatasetRepo;
pub use fs_repo::FsResultStore;
