//! Browser dashboard. axum routes over the analysis service.

pub mod error;
pub mod handlers;
pub mod routes;

pub use routes::{create_router, serve};

use crate::domain::Dataset;
use crate::ports::{ModelPort, ResultStorePort};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Builds the model for one run from the API key typed into the page (if any).
pub type ModelFactory = Arc<dyn Fn(Option<String>) -> Arc<dyn ModelPort> + Send + Sync>;

/// Shared, read-only dashboard state. Datasets are loaded once at start.
#[derive(Clone)]
pub struct DashboardState {
    pub datasets: Arc<BTreeMap<String, Dataset>>,
    pub store: Arc<dyn ResultStorePort>,
    pub model_factory: ModelFactory,
    pub visualizations_dir: PathBuf,
}

impl DashboardState {
    pub fn new(
        datasets: Vec<Dataset>,
        store: Arc<dyn ResultStorePort>,
        model_factory: ModelFactory,
        visualizations_dir: PathBuf,
    ) -> Self {
        Self {
            datasets: Arc::new(datasets.into_iter().map(|d| (d.name.clone(), d)).collect()),
            store,
            model_factory,
            visualizations_dir,
        }
    }
}
