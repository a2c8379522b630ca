use std::io;

/// Custom error type for pipeline_notifier operations
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event validation failed: {0}")]
    Validation(String),

    #[error("Webhook delivery failed{}: {message}", status_suffix(.status))]
    Delivery {
        status: Option<u16>,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl NotifierError {
    /// True for errors that end the invocation instead of producing an error outcome.
    pub fn is_delivery_failure(&self) -> bool {
        matches!(self, NotifierError::Delivery { .. } | NotifierError::Http(_))
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" with status {s}")).unwrap_or_default()
}

/// Helper type for Results that use NotifierError
pub type Result<T> = std::result::Result<T, NotifierError>;
