use reqwest::StatusCode;
use shared::error::ValidationError;
use thiserror::Error;

/// Failures surfaced by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("could not reach backend: {detail}")]
    Network { detail: String },
    #[error("backend returned HTTP {status}")]
    Status {
        status: StatusCode,
        server_message: Option<String>,
    },
    #[error("malformed response from backend: {detail}")]
    Decode { detail: String },
}

impl TransportError {
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { server_message, .. } => server_message.as_deref(),
            Self::Network { .. } | Self::Decode { .. } => None,
        }
    }

    /// Text shown to the user: the backend's own words when it sent any.
    pub fn display_message(&self) -> String {
        self.server_message()
            .map(str::to_string)
            .unwrap_or_else(|| self.to_string())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Decode {
                detail: err.to_string(),
            };
        }
        if let Some(status) = err.status() {
            return Self::Status {
                status,
                server_message: None,
            };
        }
        Self::Network {
            detail: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ClientError {
    pub fn failure_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Transport(err) => err.display_message(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    File {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid api base url '{value}': {reason}")]
    InvalidBaseUrl { value: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_message_prefers_server_text() {
        let err = TransportError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            server_message: Some("index unavailable".into()),
        };
        assert_eq!(err.display_message(), "index unavailable");
    }

    #[test]
    fn display_message_falls_back_to_generic_description() {
        let err = TransportError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            server_message: None,
        };
        assert_eq!(
            err.display_message(),
            "backend returned HTTP 503 Service Unavailable"
        );

        let err = TransportError::Network {
            detail: "connection refused".into(),
        };
        assert_eq!(
            err.display_message(),
            "could not reach backend: connection refused"
        );
    }

    #[test]
    fn validation_failure_message_is_the_validation_text() {
        let err = ClientError::from(ValidationError::MissingFields);
        assert_eq!(err.failure_message(), "All fields are required.");
    }
}
