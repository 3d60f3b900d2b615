//! Shared types, errors, and configuration for Loanlink.
//!
//! This crate provides common types used across all other crates:
//! - Typed Mambu identifiers
//! - Offset paging for Mambu list endpoints
//! - Application-wide error types and the error envelope
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{
    AppConfig, MambuConfig, ReconciliationConfig, RetryConfig, UnresolvedLinkPolicy,
};
pub use error::{AppError, AppResult, ErrorDetail, ErrorEnvelope};
pub use types::{ErrorCode, LoanAccountId, LoanTransactionId, PageRequest};
