//! Error types for basic-llm-call.
//!
//! Recoverable conditions (an unregistered tool name) never show up here:
//! they are turned into data and fed back to the model. Everything in this
//! enum aborts the operation that produced it.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid configuration; raised before any network activity.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("service unavailable ({status}): {body}")]
    ServiceUnavailable { status: u16, body: String },

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The API answered, but not with something we can use.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("invalid JSON arguments for tool '{tool}': {source}")]
    InvalidToolArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("tool '{tool}' failed: {source}")]
    ToolFailed {
        tool: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("response does not match {schema}: {}", .violations.join("; "))]
    SchemaValidation {
        schema: String,
        violations: Vec<String>,
    },

    #[error("schema error: {0}")]
    Schema(String),
}

impl Error {
    /// Whether a retry wrapper should try the request again.
    ///
    /// Rate limits, timeouts, unavailable services and generic server-side
    /// API errors are transient. Client errors (4xx other than 408/429),
    /// bad configuration and everything raised locally are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Timeout(_) | Error::RateLimited(_) | Error::ServiceUnavailable { .. } => true,
            Error::Api { status, .. } => *status >= 500,
            Error::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }
}
