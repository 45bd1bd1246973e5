//! Project registry: list, create and default bootstrap

use std::sync::Arc;
use tracing::info;

use crate::error::{AppError, StoreError};
use crate::models::records::{from_record, to_record, NewProject, Project};
use crate::store::{Collection, ListQuery, SortDirection, Store};

pub const DEFAULT_PROJECT_NAME: &str = "Default Project";

#[derive(Clone)]
pub struct ProjectRegistry {
    store: Arc<dyn Store>,
}

impl ProjectRegistry {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// All projects, oldest first
    pub async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        let rows = self
            .store
            .list(
                Collection::Projects,
                &ListQuery::ordered_by("created_at", SortDirection::Ascending),
            )
            .await?;

        rows.into_iter()
            .map(|row| from_record(row).map_err(StoreError::from))
            .collect()
    }

    /// Create a project; `name` must contain something besides whitespace
    pub async fn create_project(&self, name: &str) -> Result<Project, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidInput(
                "project name cannot be empty".to_string(),
            ));
        }

        let fields = to_record(&NewProject {
            name: name.to_string(),
        })
        .map_err(StoreError::from)?;
        let row = self.store.insert(Collection::Projects, fields).await?;
        let project: Project = from_record(row).map_err(StoreError::from)?;

        info!(project_id = %project.id, name = %project.name, "Created project");
        Ok(project)
    }

    /// Return the existing projects, creating "Default Project" if there are none
    pub async fn ensure_default(&self) -> Result<Vec<Project>, AppError> {
        let projects = self.list_projects().await?;
        if !projects.is_empty() {
            return Ok(projects);
        }

        let project = self.create_project(DEFAULT_PROJECT_NAME).await?;
        Ok(vec![project])
    }

    /// Look up a project by id
    pub async fn find(&self, id: &str) -> Result<Option<Project>, StoreError> {
        Ok(self
            .list_projects()
            .await?
            .into_iter()
            .find(|p| p.id == id))
    }
}
