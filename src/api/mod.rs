pub mod chart;
pub mod error;
pub mod films;
pub mod health;
pub mod ingest;
pub mod response;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::dataset::DatasetHandle;
use crate::services::IngestService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub dataset: DatasetHandle,
    pub ingest: Arc<IngestService>,
}
