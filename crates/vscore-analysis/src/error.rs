//! Analysis error types.

use thiserror::Error;

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Failures inside the remote analysis path. All of these are recovered by
/// the analyzer into the fallback report; only `Config` escapes, at startup.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Gemini request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected Gemini response: {0}")]
    Protocol(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Remote processing of {0} failed")]
    RemoteProcessingFailed(String),

    #[error("Remote file {name} still processing after {polls} polls")]
    PollTimeout { name: String, polls: u32 },

    #[error("Failed to parse analysis JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl AnalysisError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Config(_) => "config",
            AnalysisError::Http(_) => "http",
            AnalysisError::Api { .. } => "api",
            AnalysisError::Protocol(_) => "protocol",
            AnalysisError::Io(_) => "io",
            AnalysisError::RemoteProcessingFailed(_) => "remote_failed",
            AnalysisError::PollTimeout { .. } => "poll_timeout",
            AnalysisError::Parse(_) => "parse",
        }
    }
}
