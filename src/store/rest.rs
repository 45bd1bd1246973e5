//! PostgREST (Supabase) implementation of the persistence gateway

use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{Collection, ListQuery, Store};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreErrorKind};
use crate::models::records::Record;

/// Error body returned by PostgREST
#[derive(Debug, Default, Deserialize)]
struct PostgrestError {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
}

/// Store client talking to `{url}/rest/v1`
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}/rest/v1", config.url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, collection: Collection) -> String {
        format!("{}/{}", self.base_url, collection.as_str())
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
    }
}

#[async_trait]
impl Store for RestStore {
    fn backend_name(&self) -> &str {
        "supabase"
    }

    async fn list(&self, collection: Collection, query: &ListQuery) -> Result<Vec<Record>, StoreError> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        if let Some(filter) = &query.filter {
            params.push((filter.field.clone(), format!("eq.{}", filter.value)));
        }
        params.push((
            "order".to_string(),
            format!("{}.{}", query.order_by, query.direction.as_str()),
        ));

        debug!(collection = %collection, ?params, "Listing records");

        let response = self
            .authorized(self.client.get(self.endpoint(collection)))
            .query(&params)
            .send()
            .await?;

        let body = read_success(response).await?;
        match body {
            Value::Array(rows) => rows.into_iter().map(into_record).collect(),
            other => Err(StoreError::decode(format!(
                "expected an array of {} rows, got {}",
                collection, other
            ))),
        }
    }

    async fn insert(&self, collection: Collection, fields: Record) -> Result<Record, StoreError> {
        debug!(collection = %collection, fields = fields.len(), "Inserting record");

        let response = self
            .authorized(self.client.post(self.endpoint(collection)))
            .header("Prefer", "return=representation")
            .json(&fields)
            .send()
            .await?;

        let body = read_success(response).await?;
        match body {
            // PostgREST returns the inserted batch; we insert one row
            Value::Array(rows) => rows
                .into_iter()
                .next()
                .map(into_record)
                .unwrap_or_else(|| {
                    Err(StoreError::decode(format!(
                        "insert into {} returned no rows",
                        collection
                    )))
                }),
            Value::Object(map) => Ok(map),
            other => Err(StoreError::decode(format!(
                "unexpected insert response: {}",
                other
            ))),
        }
    }
}

fn into_record(value: Value) -> Result<Record, StoreError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::decode(format!("expected an object row, got {}", other))),
    }
}

/// Return the JSON body of a successful response, or the classified error
async fn read_success(response: Response) -> Result<Value, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<Value>().await?);
    }

    let text = response.text().await.unwrap_or_default();
    Err(classify_error(status, &text))
}

/// Map an error response onto the closed set of store error kinds
pub fn classify_error(status: StatusCode, body: &str) -> StoreError {
    let parsed: PostgrestError = serde_json::from_str(body).unwrap_or_default();
    let code = parsed.code.as_deref().unwrap_or("");

    let kind = match code {
        "PGRST205" | "42P01" => StoreErrorKind::CollectionNotFound,
        "23503" => StoreErrorKind::ForeignKeyViolation,
        c if c.starts_with("PGRST3") => StoreErrorKind::Unauthorized,
        _ => match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreErrorKind::Unauthorized,
            StatusCode::NOT_FOUND if mentions_missing_table(parsed.message.as_deref(), body) => {
                StoreErrorKind::CollectionNotFound
            }
            _ => StoreErrorKind::Rejected,
        },
    };

    let message = match (parsed.message, parsed.details) {
        (Some(message), Some(details)) => format!("{} ({})", message, details),
        (Some(message), None) => message,
        _ if !body.trim().is_empty() => format!("HTTP {}: {}", status, body.trim()),
        _ => format!("HTTP {}", status),
    };

    let error = StoreError::new(kind, message);
    if code.is_empty() {
        error
    } else {
        error.with_code(code)
    }
}

/// Older PostgREST versions report a missing table without an error code
fn mentions_missing_table(message: Option<&str>, body: &str) -> bool {
    message
        .unwrap_or(body)
        .to_lowercase()
        .contains("could not find the table")
}
