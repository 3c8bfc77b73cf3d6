//! Admin API Errors

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors returned by admin API operations
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connect, timeout, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The requested resource does not exist
    #[error("{resource} not found")]
    NotFound {
        /// Path of the missing resource
        resource: String,
    },

    /// The server answered with a non-success status
    #[error("Admin server returned {status}: {message}")]
    Status {
        /// HTTP status
        status: StatusCode,
        /// Message extracted from the error body
        message: String,
    },

    /// The response body could not be decoded
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        /// Request URL
        url: String,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// A request URL could not be built from the base URL
    #[error("Cannot build request URL from {0}")]
    Url(String),
}

impl ApiError {
    /// Whether this error means the resource is absent
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[derive(Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    logref: Option<String>,
    message: String,
}

/// Extract a readable message from an error body
///
/// The server reports failures as `[{"logref": "...", "message": "..."}]`.
/// Anything else is returned trimmed as-is.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(entries) = serde_json::from_str::<Vec<ErrorEntry>>(body) {
        if !entries.is_empty() {
            return entries
                .into_iter()
                .map(|e| match e.logref {
                    Some(logref) => format!("{} ({logref})", e.message),
                    None => e.message,
                })
                .collect::<Vec<_>>()
                .join("; ");
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "<empty body>".to_string()
    } else {
        trimmed.to_string()
    }
}
