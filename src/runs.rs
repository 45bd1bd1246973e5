//! Run recorder: append completed interactions and read a project's history

use std::sync::Arc;
use tracing::info;

use crate::error::StoreError;
use crate::models::records::{from_record, to_record, NewRun, Run};
use crate::store::{Collection, ListQuery, SortDirection, Store};

/// Decimal places kept for stored latencies
pub const LATENCY_PRECISION: usize = 4;

/// Round to `LATENCY_PRECISION` decimal places
///
/// Rounds the exact decimal value of `seconds`, so `2.00005` (stored as
/// `2.0000499..`) becomes `2.0`.
pub fn round_latency(seconds: f64) -> f64 {
    format!("{:.*}", LATENCY_PRECISION, seconds)
        .parse()
        .unwrap_or(seconds)
}

#[derive(Clone)]
pub struct RunRecorder {
    store: Arc<dyn Store>,
}

impl RunRecorder {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Persist one completed interaction
    pub async fn record(
        &self,
        project_id: &str,
        model_name: &str,
        prompt: &str,
        response: &str,
        latency: f64,
    ) -> Result<Run, StoreError> {
        let fields = to_record(&NewRun {
            project_id: project_id.to_string(),
            model_name: model_name.to_string(),
            prompt: prompt.to_string(),
            response: response.to_string(),
            latency: round_latency(latency),
        })?;

        let row = self.store.insert(Collection::Runs, fields).await?;
        let run: Run = from_record(row)?;

        info!(
            run_id = %run.id,
            project_id = %run.project_id,
            model = %run.model_name,
            latency = ?run.latency,
            "Recorded run"
        );
        Ok(run)
    }

    /// All runs of a project, most recent first
    pub async fn history(&self, project_id: &str) -> Result<Vec<Run>, StoreError> {
        let query = ListQuery::ordered_by("created_at", SortDirection::Descending)
            .where_eq("project_id", project_id);
        let rows = self.store.list(Collection::Runs, &query).await?;

        rows.into_iter()
            .map(|row| from_record(row).map_err(StoreError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreErrorKind;
    use crate::projects::ProjectRegistry;
    use crate::store::MemoryStore;

    async fn setup() -> (ProjectRegistry, RunRecorder, String) {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let registry = ProjectRegistry::new(store.clone());
        let project = registry.create_project("Tests").await.unwrap();
        (registry, RunRecorder::new(store), project.id)
    }

    #[test]
    fn test_round_latency_rounds_not_truncates() {
        assert_eq!(round_latency(1.23456), 1.2346);
        assert_eq!(round_latency(1.23454), 1.2345);
        assert_eq!(round_latency(0.0), 0.0);
        assert_eq!(round_latency(2.5), 2.5);
    }

    #[test]
    fn test_round_latency_uses_decimal_value() {
        assert_eq!(round_latency(2.00005), 2.0);
        assert_eq!(round_latency(12.345678), 12.3457);
        assert_eq!(round_latency(-1.23456), -1.2346);
    }

    #[tokio::test]
    async fn test_record_stores_rounded_latency() {
        let (_, recorder, project_id) = setup().await;

        let run = recorder
            .record(&project_id, "mistral", "Why?", "Because.", 1.23456)
            .await
            .unwrap();

        assert_eq!(run.latency, Some(1.2346));
        assert_eq!(run.project_id, project_id);

        let history = recorder.history(&project_id).await.unwrap();
        assert_eq!(history[0].latency, Some(1.2346));
    }

    #[tokio::test]
    async fn test_record_accepts_empty_strings() {
        let (_, recorder, project_id) = setup().await;
        let run = recorder.record(&project_id, "", "", "", 0.0).await.unwrap();
        assert_eq!(run.prompt, "");
        assert_eq!(run.response, "");
    }

    #[tokio::test]
    async fn test_record_unknown_project_fails() {
        let (_, recorder, _) = setup().await;
        let err = recorder
            .record("no-such-project", "mistral", "q", "a", 0.1)
            .await
            .unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::ForeignKeyViolation);
    }

    #[tokio::test]
    async fn test_history_newest_first_and_scoped() {
        let (registry, recorder, project_id) = setup().await;
        let other = registry.create_project("Other").await.unwrap();

        for prompt in ["first", "second", "third"] {
            recorder
                .record(&project_id, "mistral", prompt, "ok", 0.1)
                .await
                .unwrap();
            recorder
                .record(&other.id, "llama3", prompt, "ok", 0.2)
                .await
                .unwrap();
        }

        let history = recorder.history(&project_id).await.unwrap();
        let prompts: Vec<&str> = history.iter().map(|r| r.prompt.as_str()).collect();
        assert_eq!(prompts, vec!["third", "second", "first"]);
        assert!(history.windows(2).all(|w| w[0].created_at > w[1].created_at));
        assert!(history.iter().all(|r| r.project_id == project_id));
    }

    #[tokio::test]
    async fn test_history_empty() {
        let (_, recorder, project_id) = setup().await;
        assert!(recorder.history(&project_id).await.unwrap().is_empty());
    }
}
