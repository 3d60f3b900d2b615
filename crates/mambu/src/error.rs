//! Mambu client errors.

use loanlink_core::lookup::LookupError;
use loanlink_shared::ErrorDetail;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

/// Errors raised by [`crate::MambuClient`].
#[derive(Debug, Clone, Error)]
pub enum MambuError {
    /// Client could not be built from its configuration.
    #[error("invalid Mambu configuration: {0}")]
    Configuration(String),

    /// Request never produced a response (connect failure, timeout).
    #[error("Mambu request failed: {0}")]
    Transport(String),

    /// Mambu answered with a non-success status.
    #[error("Mambu returned {status}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Parsed error entries; empty when the body was not an error envelope.
        errors: Vec<MambuErrorEntry>,
    },

    /// Response body did not match the expected shape.
    #[error("could not decode Mambu response: {0}")]
    Decode(String),
}

impl MambuError {
    /// Builds an `Http` error from a response status and raw body.
    #[must_use]
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let errors = serde_json::from_slice::<ErrorEnvelope>(body)
            .map(|envelope| envelope.errors)
            .unwrap_or_default();
        Self::Http { status, errors }
    }

    /// Transport failures, 429 and 5xx are worth another attempt.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            Self::Configuration(_) | Self::Decode(_) => false,
        }
    }
}

/// One entry of the Mambu error envelope `{"errors": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MambuErrorEntry {
    /// Numeric or symbolic error code, kept as text.
    #[serde(default, deserialize_with = "code_as_text")]
    pub error_code: String,
    /// Field the error refers to.
    #[serde(default)]
    pub error_source: Option<String>,
    /// Human readable reason, e.g. `INVALID_LOAN_ACCOUNT_ID`.
    #[serde(default)]
    pub error_reason: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<MambuErrorEntry>,
}

fn code_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(code) => code,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

impl From<MambuErrorEntry> for ErrorDetail {
    fn from(entry: MambuErrorEntry) -> Self {
        Self {
            code: entry.error_code,
            source: entry.error_source,
            reason: entry.error_reason,
        }
    }
}

impl From<MambuError> for LookupError {
    fn from(err: MambuError) -> Self {
        match err {
            MambuError::Http { status, errors } => {
                let reason = errors
                    .iter()
                    .map(|entry| entry.error_reason.as_str())
                    .find(|reason| !reason.is_empty())
                    .map_or_else(|| format!("HTTP {status}"), str::to_string);
                Self::Http {
                    status,
                    reason,
                    details: errors.into_iter().map(ErrorDetail::from).collect(),
                }
            }
            MambuError::Configuration(message) | MambuError::Transport(message) => {
                Self::Transport(message)
            }
            MambuError::Decode(message) => Self::Decode(message),
        }
    }
}
