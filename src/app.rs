//! Wiring of the store handle into the registry and recorder

use std::sync::Arc;
use tracing::info;

use crate::config::StoreConfig;
use crate::error::AppError;
use crate::models::records::Project;
use crate::projects::ProjectRegistry;
use crate::runs::RunRecorder;
use crate::store::{self, Store};

/// Components sharing one store client, built once per process
#[derive(Clone)]
pub struct Tracker {
    pub store: Arc<dyn Store>,
    pub projects: ProjectRegistry,
    pub runs: RunRecorder,
}

impl Tracker {
    pub fn connect(config: &StoreConfig) -> Result<Self, AppError> {
        Ok(Self::with_store(store::connect(config)?))
    }

    pub fn with_store(store: Arc<dyn Store>) -> Self {
        Self {
            projects: ProjectRegistry::new(store.clone()),
            runs: RunRecorder::new(store.clone()),
            store,
        }
    }

    /// Startup check: reach the store and make sure a project exists
    pub async fn start(&self) -> Result<Vec<Project>, AppError> {
        let projects = self.projects.ensure_default().await?;
        info!(
            backend = self.store.backend_name(),
            projects = projects.len(),
            "Store ready"
        );
        Ok(projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StartupFailure, StoreErrorKind};
    use crate::store::{Collection, MemoryStore};

    #[tokio::test]
    async fn test_start_bootstraps_default_project() {
        let tracker = Tracker::with_store(Arc::new(MemoryStore::new()));
        let projects = tracker.start().await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(tracker.start().await.unwrap(), projects);
    }

    #[tokio::test]
    async fn test_start_reports_schema_errors() {
        let tracker = Tracker::with_store(Arc::new(MemoryStore::without(Collection::Projects)));
        let err = tracker.start().await.unwrap_err();
        assert_eq!(err.store_kind(), Some(StoreErrorKind::CollectionNotFound));
        assert_eq!(StartupFailure::classify(&err), StartupFailure::Schema);
    }
}
