use thiserror::Error;

/// Failure talking to one of the external providers
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} {operation} returned {status}: {body}")]
    Status {
        service: &'static str,
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} {operation} response could not be decoded: {message}")]
    Decode {
        service: &'static str,
        operation: &'static str,
        message: String,
    },

    #[error("{service} rejected {operation}: {description}")]
    Rejected {
        service: &'static str,
        operation: &'static str,
        description: String,
    },
}

impl SourceError {
    pub fn transport(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| SourceError::Transport { service, source }
    }

    pub fn decode(service: &'static str, operation: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |e| SourceError::Decode {
            service,
            operation,
            message: e.to_string(),
        }
    }

    /// HTTP status code, when the provider answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            SourceError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
