//! In-memory transport for controller tests.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use reqwest::StatusCode;
use shared::{
    domain::{DocumentSubmission, Query},
    protocol::{AddDocumentResponse, SearchResponse, SearchResult},
};
use tokio::sync::Notify;

use crate::{error::TransportError, transport::Transport};

/// One scripted reply. A gated reply waits until the gate is notified.
pub(crate) struct Scripted<T> {
    pub gate: Option<Arc<Notify>>,
    pub result: Result<T, TransportError>,
}

impl<T> Scripted<T> {
    pub fn ok(value: T) -> Self {
        Self {
            gate: None,
            result: Ok(value),
        }
    }

    pub fn err(err: TransportError) -> Self {
        Self {
            gate: None,
            result: Err(err),
        }
    }

    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }
}

#[derive(Default)]
pub(crate) struct FakeTransport {
    search_replies: Mutex<VecDeque<Scripted<SearchResponse>>>,
    add_replies: Mutex<VecDeque<Scripted<AddDocumentResponse>>>,
    pub search_calls: AtomicUsize,
    pub add_calls: AtomicUsize,
    pub queries: Mutex<Vec<Query>>,
    pub submissions: Mutex<Vec<DocumentSubmission>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_search(&self, reply: Scripted<SearchResponse>) {
        self.search_replies.lock().expect("lock").push_back(reply);
    }

    pub fn push_add(&self, reply: Scripted<AddDocumentResponse>) {
        self.add_replies.lock().expect("lock").push_back(reply);
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn add_calls(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn search(&self, query: &Query) -> Result<SearchResponse, TransportError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().expect("lock").push(query.clone());
        let reply = self
            .search_replies
            .lock()
            .expect("lock")
            .pop_front()
            .expect("unscripted search call");
        if let Some(gate) = reply.gate {
            gate.notified().await;
        }
        reply.result
    }

    async fn add_document(
        &self,
        submission: &DocumentSubmission,
    ) -> Result<AddDocumentResponse, TransportError> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        self.submissions.lock().expect("lock").push(submission.clone());
        let reply = self
            .add_replies
            .lock()
            .expect("lock")
            .pop_front()
            .expect("unscripted add_document call");
        if let Some(gate) = reply.gate {
            gate.notified().await;
        }
        reply.result
    }
}

pub(crate) fn server_error(message: &str) -> TransportError {
    TransportError::Status {
        status: StatusCode::SERVICE_UNAVAILABLE,
        server_message: Some(message.to_string()),
    }
}

pub(crate) fn result(doc_id: &str, score: f64) -> SearchResult {
    SearchResult {
        doc_id: doc_id.to_string(),
        title: format!("Document {doc_id}"),
        url: None,
        score,
        segment: "seg_000".into(),
        cord_uid: format!("uid-{doc_id}"),
        json_relpath: format!("document_parses/pmc_json/{doc_id}.json"),
        publish_time: None,
        author: None,
    }
}

pub(crate) fn search_response(results: Vec<SearchResult>) -> SearchResponse {
    SearchResponse {
        results,
        search_time_ms: Some(1.25),
        total_time_ms: Some(3.5),
    }
}

pub(crate) fn complete_submission() -> DocumentSubmission {
    DocumentSubmission {
        cord_root: "/srv/cord19".into(),
        json_relpath: "document_parses/pdf_json/0001.json".into(),
        cord_uid: "ug7v899j".into(),
        title: "Clinical features of culture-proven Mycoplasma pneumoniae infections".into(),
    }
}
