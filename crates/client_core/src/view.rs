//! Render-ready values derived from controller state. Nothing here mutates.

use shared::{domain::Query, protocol::SearchResult};

use crate::{
    ingest::{IngestReport, IngestionController, IngestionOutcome},
    outcome::{FailureKind, Outcome},
    query::{QueryController, SearchOutcome},
};

pub const BACKEND_HINT: &str = "Make sure backend is running: ./api_server <INDEX_DIR> 8080";
pub const NO_RESULTS: &str = "No results.";
const UNTITLED: &str = "(untitled)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub message: String,
    /// Remediation hint; only backend failures get one.
    pub hint: Option<&'static str>,
}

impl ErrorBanner {
    fn from_outcome<T>(outcome: &Outcome<T>) -> Option<Self> {
        outcome.failure().map(|failure| Self {
            message: failure.message.clone(),
            hint: match failure.kind {
                FailureKind::Transport => Some(BACKEND_HINT),
                FailureKind::Validation => None,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    pub title: String,
    pub link: Option<String>,
    pub score: String,
    pub locator: String,
    pub json_relpath: String,
    pub byline: Option<String>,
}

impl From<&SearchResult> for ResultCard {
    fn from(result: &SearchResult) -> Self {
        let title = if result.title.trim().is_empty() {
            UNTITLED.to_string()
        } else {
            result.title.clone()
        };
        let byline = [result.author.as_deref(), result.publish_time.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>();

        Self {
            title,
            link: result.url.clone().filter(|url| !url.is_empty()),
            score: format!("{:.4}", result.score),
            locator: format!(
                "docId: {} • segment: {} • cord_uid: {}",
                result.doc_id, result.segment, result.cord_uid
            ),
            json_relpath: result.json_relpath.clone(),
            byline: (!byline.is_empty()).then(|| byline.join(" • ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchView {
    pub submit_label: &'static str,
    pub submit_enabled: bool,
    pub timing: Option<String>,
    pub error: Option<ErrorBanner>,
    pub results: Vec<ResultCard>,
    pub empty_notice: Option<&'static str>,
}

pub fn search_view(pending: &Query, outcome: &SearchOutcome) -> SearchView {
    let loading = outcome.is_loading();
    let report = outcome.success();
    let results: Vec<ResultCard> = report
        .map(|report| report.results.iter().map(ResultCard::from).collect())
        .unwrap_or_default();

    let timing = report.and_then(|report| {
        let parts: Vec<String> = [
            report.search_time_ms.map(|ms| format!("Search: {ms:.2} ms")),
            report
                .total_time_ms
                .map(|ms| format!("Backend total: {ms:.2} ms")),
        ]
        .into_iter()
        .flatten()
        .collect();
        (!parts.is_empty()).then(|| parts.join(" • "))
    });

    SearchView {
        submit_label: if loading { "Searching..." } else { "Search" },
        submit_enabled: !loading && !pending.text.trim().is_empty(),
        timing,
        error: ErrorBanner::from_outcome(outcome),
        empty_notice: (!loading && results.is_empty()).then_some(NO_RESULTS),
        results,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionView {
    pub submit_label: &'static str,
    pub submit_enabled: bool,
    pub confirmation: Option<String>,
    pub error: Option<ErrorBanner>,
}

pub fn ingestion_view(outcome: &IngestionOutcome) -> IngestionView {
    let loading = outcome.is_loading();
    IngestionView {
        submit_label: if loading { "Adding..." } else { "Add" },
        submit_enabled: !loading,
        confirmation: outcome.success().map(confirmation_line),
        error: ErrorBanner::from_outcome(outcome),
    }
}

fn confirmation_line(report: &IngestReport) -> String {
    let mut line = format!(
        "Added: {} (reloaded={})",
        report.segment, report.reloaded
    );
    if let Some(ms) = report.total_time_ms {
        line.push_str(&format!(" time={ms:.2}ms"));
    }
    line
}

impl QueryController {
    pub fn view(&self) -> SearchView {
        search_view(&self.pending(), &self.outcome())
    }
}

impl IngestionController {
    pub fn view(&self) -> IngestionView {
        ingestion_view(&self.outcome())
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
