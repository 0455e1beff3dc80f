//! Error types for checkbridge

use thiserror::Error;

/// Result type for notifier operations
pub type NotifierResult<T> = std::result::Result<T, NotifierError>;

/// Errors that can end a notification run
#[derive(Error, Debug)]
pub enum NotifierError {
    /// Missing or invalid configuration, unreadable event payload
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote service answered with a non-2xx status
    #[error("{service} request failed with status {status}: {body}")]
    Transport {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// Connection-level failure (DNS, TLS, reset, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Malformed response body
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NotifierError {
    /// Whether this error came from talking to a remote service.
    ///
    /// Transport, network and decode failures are all fatal to a run and
    /// never retried in-process.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            NotifierError::Transport { .. } | NotifierError::Network(_) | NotifierError::Decode(_)
        )
    }
}

impl From<serde_json::Error> for NotifierError {
    fn from(err: serde_json::Error) -> Self {
        NotifierError::Decode(err.to_string())
    }
}
