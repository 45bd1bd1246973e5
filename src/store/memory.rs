//! In-process implementation of the persistence gateway
//!
//! Used by the `memory` backend and by tests. Mirrors the remote store's
//! behaviour: generated `id`/`created_at`, foreign-key check on runs and
//! `CollectionNotFound` for tables that do not exist.

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::{Collection, ListQuery, SortDirection, Store};
use crate::error::{StoreError, StoreErrorKind};
use crate::models::records::Record;

struct Tables {
    rows: HashMap<Collection, Vec<Record>>,
    last_created_at: Option<DateTime<Utc>>,
}

pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let rows = [Collection::Projects, Collection::Runs]
            .into_iter()
            .map(|c| (c, Vec::new()))
            .collect();

        Self {
            tables: Mutex::new(Tables {
                rows,
                last_created_at: None,
            }),
        }
    }

    /// A store where `collection` was never created
    pub fn without(collection: Collection) -> Self {
        let store = Self::new();
        store.lock().rows.remove(&collection);
        store
    }

    /// Number of rows currently held in `collection`
    pub fn len(&self, collection: Collection) -> usize {
        self.lock().rows.get(&collection).map_or(0, Vec::len)
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Tables {
    /// Strictly increasing creation time, even for inserts in the same tick
    fn next_created_at(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last_created_at {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created_at = Some(next);
        next
    }

    fn table(&self, collection: Collection) -> Result<&Vec<Record>, StoreError> {
        self.rows
            .get(&collection)
            .ok_or_else(|| StoreError::collection_not_found(collection.as_str()).with_code("PGRST205"))
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn list(&self, collection: Collection, query: &ListQuery) -> Result<Vec<Record>, StoreError> {
        let tables = self.lock();
        let mut rows: Vec<Record> = tables
            .table(collection)?
            .iter()
            .filter(|row| match &query.filter {
                Some(filter) => {
                    row.get(&filter.field).and_then(value_key).as_deref() == Some(filter.value.as_str())
                }
                None => true,
            })
            .cloned()
            .collect();

        rows.sort_by(|a, b| {
            let ordering = compare_values(a.get(&query.order_by), b.get(&query.order_by));
            match query.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        Ok(rows)
    }

    async fn insert(&self, collection: Collection, mut fields: Record) -> Result<Record, StoreError> {
        let mut tables = self.lock();
        tables.table(collection)?;

        if collection == Collection::Runs {
            let project_id = fields.get("project_id").and_then(value_key);
            let projects = tables.table(Collection::Projects)?;
            let exists = project_id.as_ref().is_some_and(|id| {
                projects
                    .iter()
                    .any(|p| p.get("id").and_then(value_key).as_ref() == Some(id))
            });
            if !exists {
                return Err(StoreError::new(
                    StoreErrorKind::ForeignKeyViolation,
                    format!(
                        "Key (project_id)=({}) is not present in table \"projects\"",
                        project_id.unwrap_or_default()
                    ),
                )
                .with_code("23503"));
            }
        }

        let created_at = tables.next_created_at();
        fields.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        fields.insert(
            "created_at".to_string(),
            Value::String(created_at.to_rfc3339_opts(SecondsFormat::Micros, true)),
        );

        if let Some(rows) = tables.rows.get_mut(&collection) {
            rows.push(fields.clone());
        }

        Ok(fields)
    }
}

/// Equality key for filter matching: strings and numbers only
fn value_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Order nulls first, numbers numerically, timestamps chronologically
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (
                DateTime::parse_from_rfc3339(x),
                DateTime::parse_from_rfc3339(y),
            ) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}
