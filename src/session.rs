//! Interaction session: one question in, one answer out, one run recorded
//!
//! Each user session owns a [`SessionState`]. [`InteractionSession::submit`]
//! borrows it mutably for the whole model call, so a session can never have
//! two requests in flight.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

use crate::error::{AppError, StoreError};
use crate::models::records::Run;
use crate::providers::{LanguageModel, ModelInput};
use crate::runs::RunRecorder;

/// Per-session conversation state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    context: String,
    pub project_id: Option<String>,
    pub model_name: String,
}

impl SessionState {
    pub fn new(model_name: impl Into<String>, project_id: Option<String>) -> Self {
        Self {
            context: String::new(),
            project_id,
            model_name: model_name.into(),
        }
    }

    /// Transcript sent verbatim to the model on every turn
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Forget the conversation; recorded runs are untouched
    pub fn clear(&mut self) {
        self.context.clear();
    }

    fn append_turn(&mut self, question: &str, answer: &str) {
        self.context.push_str("\nUser: ");
        self.context.push_str(question);
        self.context.push_str("\nAI: ");
        self.context.push_str(answer);
    }
}

/// What happened to the run log for one interaction
#[derive(Debug)]
pub enum RecordOutcome {
    Recorded(Run),
    /// No project selected
    Skipped,
    /// The store refused or could not be reached; the answer still stands
    Failed(StoreError),
}

/// Result of one completed submission
#[derive(Debug)]
pub struct Interaction {
    pub question: String,
    pub answer: String,
    /// Wall-clock seconds around the model call
    pub latency: f64,
    pub record: RecordOutcome,
}

/// Run `fut` and return its output with the elapsed wall-clock seconds
pub async fn measure_latency<F: Future>(fut: F) -> (F::Output, f64) {
    let start = Instant::now();
    let output = fut.await;
    (output, start.elapsed().as_secs_f64())
}

#[derive(Clone)]
pub struct InteractionSession {
    model: Arc<dyn LanguageModel>,
    recorder: RunRecorder,
}

impl InteractionSession {
    pub fn new(model: Arc<dyn LanguageModel>, recorder: RunRecorder) -> Self {
        Self { model, recorder }
    }

    /// Ask `question` in the context of `state`
    ///
    /// A model failure is returned as an error and leaves `state` as it was.
    /// A logging failure is not an error: it is reported in
    /// [`Interaction::record`].
    pub async fn submit(&self, state: &mut SessionState, question: &str) -> Result<Interaction, AppError> {
        let input = ModelInput {
            context: state.context.clone(),
            question: question.to_string(),
        };

        let (result, latency) = measure_latency(self.model.invoke(&state.model_name, &input)).await;
        let answer = result?;

        state.append_turn(question, &answer);

        let record = match state.project_id.as_deref() {
            None => RecordOutcome::Skipped,
            Some(project_id) => match self
                .recorder
                .record(project_id, &state.model_name, question, &answer, latency)
                .await
            {
                Ok(run) => RecordOutcome::Recorded(run),
                Err(e) => {
                    warn!(project_id, error = %e, "Run not logged");
                    RecordOutcome::Failed(e)
                }
            },
        };

        Ok(Interaction {
            question: question.to_string(),
            answer,
            latency,
            record,
        })
    }
}
