//! Application-wide error types and the error envelope returned to callers.

use serde::Serialize;
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An upstream search returned nothing where at least one record was required.
    #[error("No records found: {message}")]
    NoRecords {
        /// Domain error code supplied by the caller.
        code: String,
        /// Human readable detail.
        message: String,
    },

    /// A transfer counterpart could not be resolved.
    #[error("Unresolved transfer link: {0}")]
    UnresolvedLink(String),

    /// Mambu answered with a non-success status.
    #[error("Upstream error ({status}): {message}")]
    Upstream {
        /// HTTP status returned by Mambu.
        status: u16,
        /// Reason reported by Mambu.
        message: String,
        /// Individual Mambu error entries.
        details: Vec<ErrorDetail>,
    },

    /// Mambu could not be reached or answered with something undecodable.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::NoRecords { .. } => 404,
            Self::Validation(_) => 400,
            Self::Upstream { status: 404, .. } => 404,
            Self::Upstream { status: 400, .. } => 400,
            Self::UnresolvedLink(_) | Self::Upstream { .. } | Self::ExternalService(_) => 502,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NoRecords { code, .. } => code,
            Self::UnresolvedLink(_) => "UNRESOLVED_TRANSFER_LINK",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Builds the envelope sent to callers.
    ///
    /// Internal failures never leak their detail.
    #[must_use]
    pub fn envelope(&self) -> ErrorEnvelope {
        let message = match self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::NotFound(msg)
            | Self::Validation(msg)
            | Self::UnresolvedLink(msg)
            | Self::ExternalService(msg) => msg.clone(),
            Self::NoRecords { message, .. } | Self::Upstream { message, .. } => message.clone(),
        };

        let details = match self {
            Self::Upstream { details, .. } => details.clone(),
            _ => Vec::new(),
        };

        ErrorEnvelope {
            code: self.error_code().to_string(),
            message,
            details,
        }
    }
}

/// Uniform error body returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    /// Stable machine readable code.
    pub code: String,
    /// Human readable message.
    pub message: String,
    /// Upstream error entries, when there are any.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ErrorDetail>,
}

/// A single upstream error entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    /// Upstream error code.
    pub code: String,
    /// Field or parameter the error refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Upstream reason.
    pub reason: String,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
