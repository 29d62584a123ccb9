use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{DocumentSubmission, Query},
    protocol::{AddDocumentRequest, AddDocumentResponse, ErrorBody, SearchParams, SearchResponse},
};
use tracing::{debug, warn};

use crate::{config::Settings, error::TransportError};

const MAX_PLAIN_ERROR_LEN: usize = 200;

/// Request/response mapping to the search backend. No retries and no
/// timeouts are applied here.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn search(&self, query: &Query) -> Result<SearchResponse, TransportError>;
    async fn add_document(
        &self,
        submission: &DocumentSubmission,
    ) -> Result<AddDocumentResponse, TransportError>;
}

pub struct HttpTransport {
    http: Client,
    api_base: String,
}

impl HttpTransport {
    pub fn new(settings: &Settings) -> Self {
        Self::with_client(Client::new(), settings.api_base.clone())
    }

    pub fn with_client(http: Client, api_base: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn search(&self, query: &Query) -> Result<SearchResponse, TransportError> {
        debug!(k = query.top_k, "search: dispatching request");
        let response = self
            .http
            .get(format!("{}/search", self.api_base))
            .query(&SearchParams::from(query))
            .send()
            .await?;
        decode_json(response, "search").await
    }

    async fn add_document(
        &self,
        submission: &DocumentSubmission,
    ) -> Result<AddDocumentResponse, TransportError> {
        debug!(cord_uid = %submission.cord_uid, "add_document: dispatching request");
        let response = self
            .http
            .post(format!("{}/add_document", self.api_base))
            .json(&AddDocumentRequest::from(submission))
            .send()
            .await?;
        decode_json(response, "add_document").await
    }
}

async fn decode_json<T: DeserializeOwned>(
    response: Response,
    operation: &'static str,
) -> Result<T, TransportError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let server_message = server_message_from_body(&body);
        warn!(
            operation,
            status = status.as_u16(),
            server_message = server_message.as_deref().unwrap_or(""),
            "backend rejected request"
        );
        return Err(TransportError::Status {
            status,
            server_message,
        });
    }

    serde_json::from_str(&body).map_err(|err| {
        warn!(operation, error = %err, "backend response did not match contract");
        TransportError::Decode {
            detail: err.to_string(),
        }
    })
}

/// The `{"error": ..}` text of a JSON body, or a short single-line plain-text body.
fn server_message_from_body(body: &str) -> Option<String> {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.into_message();
    }
    let text = body.trim();
    if text.is_empty() || text.chars().count() > MAX_PLAIN_ERROR_LEN || text.contains('\n') {
        return None;
    }
    Some(text.to_string())
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
