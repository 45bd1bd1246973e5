//! Persistence gateway
//!
//! Create/read access to the `projects` and `runs` collections. The gateway
//! owns no business logic: it filters, orders, inserts and classifies
//! failures into [`StoreErrorKind`](crate::error::StoreErrorKind).

pub mod memory;
pub mod rest;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::config::{StoreBackend, StoreConfig};
use crate::error::StoreError;
use crate::models::records::Record;

pub use memory::MemoryStore;
pub use rest::RestStore;

/// Record collections known to the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Projects,
    Runs,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Runs => "runs",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Equality filter on a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: String,
    pub value: String,
}

/// Parameters of a `list` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: Option<FieldFilter>,
    pub order_by: String,
    pub direction: SortDirection,
}

impl ListQuery {
    pub fn ordered_by(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            filter: None,
            order_by: field.into(),
            direction,
        }
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter = Some(FieldFilter {
            field: field.into(),
            value: value.into(),
        });
        self
    }
}

/// Backing store interface
///
/// Implementations auto-generate `id` and `created_at` on insert.
#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend name for logs
    fn backend_name(&self) -> &str;

    /// List records, optionally filtered, in the requested order
    async fn list(&self, collection: Collection, query: &ListQuery) -> Result<Vec<Record>, StoreError>;

    /// Insert one record and return it as stored
    async fn insert(&self, collection: Collection, fields: Record) -> Result<Record, StoreError>;
}

/// Build the store handle selected by configuration
pub fn connect(config: &StoreConfig) -> Result<Arc<dyn Store>, StoreError> {
    match config.backend {
        StoreBackend::Supabase => Ok(Arc::new(RestStore::new(config)?)),
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_builder() {
        let query = ListQuery::ordered_by("created_at", SortDirection::Descending)
            .where_eq("project_id", "abc");

        assert_eq!(query.order_by, "created_at");
        assert_eq!(query.direction.as_str(), "desc");
        assert_eq!(
            query.filter,
            Some(FieldFilter {
                field: "project_id".to_string(),
                value: "abc".to_string(),
            })
        );
    }

    #[test]
    fn test_connect_memory_backend() {
        let config = StoreConfig {
            backend: StoreBackend::Memory,
            ..StoreConfig::default()
        };
        let store = connect(&config).unwrap();
        assert_eq!(store.backend_name(), "memory");
    }
}
