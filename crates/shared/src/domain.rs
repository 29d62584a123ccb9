use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MIN_TOP_K: u32 = 1;
pub const MAX_TOP_K: u32 = 200;
pub const DEFAULT_TOP_K: u32 = 25;

/// A free-text search bounded to `top_k` ranked results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    pub top_k: u32,
}

impl Query {
    pub fn new(text: impl Into<String>, top_k: u32) -> Self {
        Self {
            text: text.into(),
            top_k,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        if !(MIN_TOP_K..=MAX_TOP_K).contains(&self.top_k) {
            return Err(ValidationError::TopKOutOfRange { value: self.top_k });
        }
        Ok(())
    }
}

impl Default for Query {
    fn default() -> Self {
        Self::new(String::new(), DEFAULT_TOP_K)
    }
}

/// Server-side file locator plus metadata for a document to be indexed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSubmission {
    pub cord_root: String,
    pub json_relpath: String,
    pub cord_uid: String,
    pub title: String,
}

impl DocumentSubmission {
    /// Presence-only check; the path is never resolved on the client.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            &self.cord_root,
            &self.json_relpath,
            &self.cord_uid,
            &self.title,
        ];
        if fields.iter().any(|field| field.trim().is_empty()) {
            return Err(ValidationError::MissingFields);
        }
        Ok(())
    }
}
