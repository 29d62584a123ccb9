//! The Idle/Loading/Success/Failure state shared by both controllers, plus the
//! bookkeeping that keeps one request in flight and drops stale resolutions.

use std::{
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use shared::error::ValidationError;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, warn};

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Idle,
    Loading,
    Success(T),
    Failure(Failure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Input was refused before any request went out.
    Validation,
    /// The backend could not be reached or answered with an error.
    Transport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Validation,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transport,
            message: message.into(),
        }
    }
}

impl From<&ClientError> for Failure {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::Validation(_) => Self::validation(err.failure_message()),
            ClientError::Transport(_) => Self::transport(err.failure_message()),
        }
    }
}

impl<T> Outcome<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Failure(failure) => Some(failure),
            _ => None,
        }
    }
}

/// What a call to `submit()` did.
#[derive(Debug)]
pub enum Submission {
    /// A request went out; the handle resolves once the outcome has settled.
    Dispatched(JoinHandle<()>),
    /// A request was already in flight; nothing changed.
    InFlight,
    /// Input was not submittable; the outcome was left untouched.
    Ignored(ValidationError),
    /// Input failed validation; the outcome moved to `Failure`.
    Rejected(ValidationError),
}

impl Submission {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, Self::Dispatched(_))
    }

    /// Waits for a dispatched request to settle. Returns immediately otherwise.
    pub async fn settled(self) {
        if let Self::Dispatched(handle) = self {
            if let Err(err) = handle.await {
                warn!(error = %err, "submission task did not complete");
            }
        }
    }
}

pub(crate) enum Admission<P> {
    Proceed(P),
    Ignore(ValidationError),
    Reject(ValidationError),
}

pub(crate) struct OutcomeCell<T> {
    outcome: watch::Sender<Outcome<T>>,
    generation: AtomicU64,
}

impl<T> OutcomeCell<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new() -> Arc<Self> {
        let (outcome, _) = watch::channel(Outcome::Idle);
        Arc::new(Self {
            outcome,
            generation: AtomicU64::new(0),
        })
    }

    pub(crate) fn snapshot(&self) -> Outcome<T> {
        self.outcome.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Outcome<T>> {
        self.outcome.subscribe()
    }

    /// Moves to `Loading` unless a request is already in flight or `admit`
    /// turns the input away. Returns the generation tag of the new request.
    pub(crate) fn try_begin<P>(
        &self,
        admit: impl FnOnce() -> Admission<P>,
    ) -> Result<(u64, P), Submission> {
        let mut begun = Err(Submission::InFlight);
        self.outcome.send_if_modified(|current| {
            if current.is_loading() {
                return false;
            }
            match admit() {
                Admission::Proceed(payload) => {
                    let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
                    *current = Outcome::Loading;
                    begun = Ok((generation, payload));
                    true
                }
                Admission::Ignore(reason) => {
                    begun = Err(Submission::Ignored(reason));
                    false
                }
                Admission::Reject(reason) => {
                    *current = Outcome::Failure(Failure::validation(reason.to_string()));
                    begun = Err(Submission::Rejected(reason));
                    true
                }
            }
        });
        begun
    }

    /// Applies a resolution if it still belongs to the newest request.
    pub(crate) fn settle(&self, generation: u64, result: Result<T, ClientError>) -> bool {
        self.outcome.send_if_modified(|current| {
            if self.generation.load(Ordering::SeqCst) != generation || !current.is_loading() {
                return false;
            }
            *current = match result {
                Ok(value) => Outcome::Success(value),
                Err(err) => Outcome::Failure(Failure::from(&err)),
            };
            true
        })
    }

    /// Back to `Idle`; whatever is in flight is orphaned.
    pub(crate) fn reset(&self) {
        self.outcome.send_modify(|current| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            *current = Outcome::Idle;
        });
    }

    /// Runs `work` on the runtime and settles its result. The task only holds a
    /// weak reference, so a dropped controller never sees the resolution.
    pub(crate) fn spawn_settle<F>(
        self: &Arc<Self>,
        generation: u64,
        operation: &'static str,
        work: F,
    ) -> JoinHandle<()>
    where
        F: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        let cell = Arc::downgrade(self);
        tokio::spawn(async move {
            let result = work.await;
            let Some(cell) = cell.upgrade() else {
                debug!(operation, "controller dropped before resolution; discarding");
                return;
            };
            if !cell.settle(generation, result) {
                debug!(operation, generation, "discarding stale resolution");
            }
        })
    }
}

#[cfg(test)]
#[path = "tests/outcome_tests.rs"]
mod tests;
