//! Loan transaction flow errors and their mapping onto `AppError`.

use loanlink_shared::AppError;
use thiserror::Error;

use crate::lookup::LookupError;
use crate::reconciliation::ReconciliationError;

/// Errors raised by the loan transaction flows.
#[derive(Debug, Error)]
pub enum LoanServiceError {
    /// The request itself is invalid.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A loan or transaction fetch failed.
    #[error(transparent)]
    Upstream(#[from] LookupError),

    /// Reconciliation failed.
    #[error(transparent)]
    Reconciliation(#[from] ReconciliationError),

    /// A fetched transaction has no owning account key.
    #[error("Transaction {transaction} has no parent account key")]
    MissingParentAccount {
        /// Reference of the transaction.
        transaction: String,
    },

    /// Reconciliation returned nothing for a single-transaction batch.
    #[error("Reconciliation returned no record for transaction {0}")]
    EmptyOutcome(String),
}

impl From<LookupError> for AppError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Http {
                status,
                reason,
                details,
            } => Self::Upstream {
                status,
                message: reason,
                details,
            },
            LookupError::Transport(msg) | LookupError::Decode(msg) => Self::ExternalService(msg),
        }
    }
}

impl From<ReconciliationError> for AppError {
    fn from(err: ReconciliationError) -> Self {
        match err {
            ReconciliationError::NoRecordsFound { code } => Self::NoRecords {
                code,
                message: "No transactions found for the requested criteria".to_string(),
            },
            ReconciliationError::UnresolvedLink(link) => Self::UnresolvedLink(link.to_string()),
            err @ ReconciliationError::AmbiguousTransferLink { .. } => {
                Self::ExternalService(err.to_string())
            }
            ReconciliationError::Lookup { source, .. } => source.into(),
        }
    }
}

impl From<LoanServiceError> for AppError {
    fn from(err: LoanServiceError) -> Self {
        match err {
            LoanServiceError::InvalidRequest(msg) => Self::Validation(msg),
            LoanServiceError::Upstream(source) => source.into(),
            LoanServiceError::Reconciliation(source) => source.into(),
            err @ LoanServiceError::MissingParentAccount { .. } => {
                Self::ExternalService(err.to_string())
            }
            err @ LoanServiceError::EmptyOutcome(_) => Self::Internal(err.to_string()),
        }
    }
}
