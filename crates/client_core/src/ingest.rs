use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::{domain::DocumentSubmission, protocol::AddDocumentResponse};
use tokio::sync::watch;
use tracing::info;

use crate::{
    error::ClientError,
    outcome::{Admission, Outcome, OutcomeCell, Submission},
    transport::Transport,
};

/// Backend confirmation for an ingested document, kept exactly as returned.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub segment: String,
    pub reloaded: bool,
    pub total_time_ms: Option<f64>,
}

impl From<AddDocumentResponse> for IngestReport {
    fn from(response: AddDocumentResponse) -> Self {
        Self {
            segment: response.segment,
            reloaded: response.reloaded,
            total_time_ms: response.total_time_ms,
        }
    }
}

pub type IngestionOutcome = Outcome<IngestReport>;

pub struct IngestionController {
    transport: Arc<dyn Transport>,
    input: Mutex<DocumentSubmission>,
    state: Arc<OutcomeCell<IngestReport>>,
}

impl IngestionController {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            input: Mutex::new(DocumentSubmission::default()),
            state: OutcomeCell::new(),
        }
    }

    pub fn set_cord_root(&self, value: impl Into<String>) {
        self.input().cord_root = value.into();
    }

    pub fn set_json_relpath(&self, value: impl Into<String>) {
        self.input().json_relpath = value.into();
    }

    pub fn set_cord_uid(&self, value: impl Into<String>) {
        self.input().cord_uid = value.into();
    }

    pub fn set_title(&self, value: impl Into<String>) {
        self.input().title = value.into();
    }

    pub fn pending(&self) -> DocumentSubmission {
        self.input().clone()
    }

    pub fn outcome(&self) -> IngestionOutcome {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<IngestionOutcome> {
        self.state.subscribe()
    }

    pub fn reset(&self) {
        self.state.reset();
    }

    /// Sends the pending submission. Any blank field fails with
    /// "All fields are required." and nothing is sent. Must be called from
    /// within a Tokio runtime.
    pub fn submit(&self) -> Submission {
        let begun = self.state.try_begin(|| {
            let submission = self.pending();
            match submission.validate() {
                Ok(()) => Admission::Proceed(submission),
                Err(err) => Admission::Reject(err),
            }
        });
        let (generation, submission) = match begun {
            Ok(begun) => begun,
            Err(submission) => return submission,
        };

        let transport = Arc::clone(&self.transport);
        let handle = self
            .state
            .spawn_settle(generation, "add_document", async move {
                let response = transport.add_document(&submission).await?;
                info!(
                    cord_uid = %submission.cord_uid,
                    segment = %response.segment,
                    reloaded = response.reloaded,
                    total_time_ms = response.total_time_ms,
                    "add_document: completed"
                );
                Ok::<_, ClientError>(IngestReport::from(response))
            });
        Submission::Dispatched(handle)
    }

    fn input(&self) -> MutexGuard<'_, DocumentSubmission> {
        self.input.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "tests/ingest_tests.rs"]
mod tests;
