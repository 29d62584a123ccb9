use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::{
    domain::Query,
    error::ValidationError,
    protocol::{SearchResponse, SearchResult},
};
use tokio::sync::watch;
use tracing::info;

use crate::{
    error::ClientError,
    outcome::{Admission, Outcome, OutcomeCell, Submission},
    transport::Transport,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub results: Vec<SearchResult>,
    pub search_time_ms: Option<f64>,
    pub total_time_ms: Option<f64>,
}

impl From<SearchResponse> for SearchReport {
    fn from(response: SearchResponse) -> Self {
        Self {
            results: response.results,
            search_time_ms: response.search_time_ms,
            total_time_ms: response.total_time_ms,
        }
    }
}

pub type SearchOutcome = Outcome<SearchReport>;

/// Owns the search input and the search outcome. At most one search is in
/// flight per controller; setters only affect the next submission.
pub struct QueryController {
    transport: Arc<dyn Transport>,
    input: Mutex<Query>,
    state: Arc<OutcomeCell<SearchReport>>,
}

impl QueryController {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            input: Mutex::new(Query::default()),
            state: OutcomeCell::new(),
        }
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.input().text = text.into();
    }

    pub fn set_top_k(&self, top_k: u32) {
        self.input().top_k = top_k;
    }

    pub fn text(&self) -> String {
        self.input().text.clone()
    }

    pub fn top_k(&self) -> u32 {
        self.input().top_k
    }

    pub fn pending(&self) -> Query {
        self.input().clone()
    }

    pub fn outcome(&self) -> SearchOutcome {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchOutcome> {
        self.state.subscribe()
    }

    pub fn reset(&self) {
        self.state.reset();
    }

    /// Sends the pending query. Blank text is ignored and an out-of-range
    /// top-k fails without reaching the transport. Must be called from within
    /// a Tokio runtime.
    pub fn submit(&self) -> Submission {
        let begun = self.state.try_begin(|| {
            let query = self.pending();
            match query.validate() {
                Ok(()) => Admission::Proceed(query),
                Err(ValidationError::EmptyQuery) => Admission::Ignore(ValidationError::EmptyQuery),
                Err(err) => Admission::Reject(err),
            }
        });
        let (generation, query) = match begun {
            Ok(begun) => begun,
            Err(submission) => return submission,
        };

        let transport = Arc::clone(&self.transport);
        let handle = self.state.spawn_settle(generation, "search", async move {
            let response = transport.search(&query).await?;
            info!(
                k = query.top_k,
                results = response.results.len(),
                search_time_ms = response.search_time_ms,
                total_time_ms = response.total_time_ms,
                "search: completed"
            );
            Ok::<_, ClientError>(SearchReport::from(response))
        });
        Submission::Dispatched(handle)
    }

    fn input(&self) -> MutexGuard<'_, Query> {
        self.input.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod tests;
