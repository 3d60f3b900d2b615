//! Collaborators the core consumes.
//!
//! Implementations live outside this crate (the Mambu client). Retries and
//! transport-level failure handling are their concern; the core only sees a
//! result set or a `LookupError`. An empty result set means "no matches".

use async_trait::async_trait;
use loanlink_shared::{ErrorDetail, LoanAccountId, LoanTransactionId, PageRequest};
use thiserror::Error;

use crate::loans::TransactionQuery;
use crate::model::{AccountRecord, LinkedTransaction, Transaction};

/// Failure reported by an upstream collaborator.
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    /// Upstream answered with a non-success status.
    #[error("upstream returned {status}: {reason}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Summary reason.
        reason: String,
        /// Upstream error entries.
        details: Vec<ErrorDetail>,
    },

    /// Upstream could not be reached.
    #[error("upstream unreachable: {0}")]
    Transport(String),

    /// Upstream answered with a body that could not be decoded.
    #[error("undecodable upstream response: {0}")]
    Decode(String),
}

impl LookupError {
    /// Whether the upstream reported the record as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }
}

/// Counterpart search for one foreign system (deposits or loans).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterpartLookup: Send + Sync {
    /// Searches counterpart transactions by encoded key (`detailsLevel=BASIC`).
    async fn search_transactions(
        &self,
        keys: &[String],
    ) -> Result<Vec<LinkedTransaction>, LookupError>;

    /// Searches accounts by encoded key (`detailsLevel=FULL`).
    async fn search_accounts(&self, keys: &[String]) -> Result<Vec<AccountRecord>, LookupError>;
}

/// Loan account and loan transaction retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanApi: Send + Sync {
    /// Fetches a loan account with full details.
    async fn get_loan(&self, loan_id: &LoanAccountId) -> Result<AccountRecord, LookupError>;

    /// Fetches a single loan transaction with full details.
    async fn get_transaction(
        &self,
        transaction_id: &LoanTransactionId,
    ) -> Result<Transaction, LookupError>;

    /// Searches the transactions of one loan, optionally bounded by creation date.
    async fn search_loan_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<Transaction>, LookupError>;

    /// Lists the transactions of one loan.
    async fn list_loan_transactions(
        &self,
        loan_id: &LoanAccountId,
        page: PageRequest,
    ) -> Result<Vec<Transaction>, LookupError>;
}
