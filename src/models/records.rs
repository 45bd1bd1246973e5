//! Typed views over the rows stored in the `projects` and `runs` collections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A raw row as exchanged with the persistence gateway
pub type Record = serde_json::Map<String, Value>;

/// Named grouping of runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// One logged prompt/response interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub project_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub model_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub prompt: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub response: String,
    /// Seconds, rounded to 4 decimals on write
    #[serde(default)]
    pub latency: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for `projects`
#[derive(Debug, Clone, Serialize)]
pub struct NewProject {
    pub name: String,
}

/// Insert payload for `runs`
#[derive(Debug, Clone, Serialize)]
pub struct NewRun {
    pub project_id: String,
    pub model_name: String,
    pub prompt: String,
    pub response: String,
    pub latency: f64,
}

/// Accept string or integer ids and keep them as opaque strings
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or integer id, got {}",
            other
        ))),
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Serialize an insert payload into a gateway record
pub fn to_record<T: Serialize>(value: &T) -> serde_json::Result<Record> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(serde::ser::Error::custom(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

/// Deserialize a gateway record into a typed row
pub fn from_record<T: for<'de> Deserialize<'de>>(record: Record) -> serde_json::Result<T> {
    serde_json::from_value(Value::Object(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_project_with_uuid_id() {
        let project: Project = from_record(record(json!({
            "id": "2b7c1f6e-7f43-4c55-9b0e-1d1f0c9d7a11",
            "name": "Default Project",
            "created_at": "2025-01-12T09:30:00.123456+00:00"
        })))
        .unwrap();

        assert_eq!(project.id, "2b7c1f6e-7f43-4c55-9b0e-1d1f0c9d7a11");
        assert_eq!(project.name, "Default Project");
    }

    #[test]
    fn test_run_with_integer_ids_and_null_fields() {
        let run: Run = from_record(record(json!({
            "id": 42,
            "project_id": 7,
            "model_name": "mistral",
            "prompt": null,
            "response": "hi",
            "latency": null,
            "created_at": "2025-01-12T09:30:00Z"
        })))
        .unwrap();

        assert_eq!(run.id, "42");
        assert_eq!(run.project_id, "7");
        assert_eq!(run.prompt, "");
        assert_eq!(run.latency, None);
    }

    #[test]
    fn test_run_rejects_object_id() {
        let result: serde_json::Result<Run> = from_record(record(json!({
            "id": {"nested": true},
            "project_id": "p",
            "created_at": "2025-01-12T09:30:00Z"
        })));
        assert!(result.is_err());
    }

    #[test]
    fn test_new_run_record_fields() {
        let rec = to_record(&NewRun {
            project_id: "p1".to_string(),
            model_name: "llama3".to_string(),
            prompt: "q".to_string(),
            response: "a".to_string(),
            latency: 0.5,
        })
        .unwrap();

        assert_eq!(rec.len(), 5);
        assert_eq!(rec["latency"], json!(0.5));
        assert!(!rec.contains_key("id"));
        assert!(!rec.contains_key("created_at"));
    }
}
