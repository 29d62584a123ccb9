//! Client-side request/response lifecycle for the search backend: a search
//! controller, a document-ingestion controller and the HTTP transport they
//! share.

pub mod config;
pub mod error;
pub mod ingest;
pub mod outcome;
pub mod query;
pub mod transport;
pub mod view;

pub use config::{load_settings, Settings};
pub use error::{ClientError, ConfigError, TransportError};
pub use ingest::{IngestReport, IngestionController, IngestionOutcome};
pub use outcome::{Failure, FailureKind, Outcome, Submission};
pub use query::{QueryController, SearchOutcome, SearchReport};
pub use transport::{HttpTransport, Transport};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
