//! Reconciliation error types.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::lookup::LookupError;
use crate::model::LinkKind;

/// Where in the join a transfer link failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolutionStage {
    /// The linked transaction key matched no counterpart transaction.
    CounterpartTransaction,
    /// The owning account key matched no counterpart account.
    CounterpartAccount,
}

impl fmt::Display for ResolutionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CounterpartTransaction => write!(f, "transaction"),
            Self::CounterpartAccount => write!(f, "account"),
        }
    }
}

/// A transfer link that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedLink {
    /// Reference of the transaction carrying the link.
    pub transaction: String,
    /// The key that found no match.
    pub missing_key: String,
    /// Foreign system searched.
    pub kind: LinkKind,
    /// Join step that failed.
    pub stage: ResolutionStage,
}

impl fmt::Display for UnresolvedLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transaction {} references {} {} {} which was not found",
            self.transaction, self.kind, self.stage, self.missing_key
        )
    }
}

/// Errors that abort a reconciliation.
#[derive(Debug, Error)]
pub enum ReconciliationError {
    /// The upstream search returned no transactions.
    #[error("No records found ({code})")]
    NoRecordsFound {
        /// Domain error code supplied by the caller.
        code: String,
    },

    /// A transfer link could not be resolved and the policy is to fail.
    #[error("Unresolved transfer link: {0}")]
    UnresolvedLink(UnresolvedLink),

    /// A transaction links to both a deposit and a loan transaction.
    #[error("Transaction {transaction} links to both a deposit and a loan transaction")]
    AmbiguousTransferLink {
        /// Reference of the offending transaction.
        transaction: String,
    },

    /// A counterpart lookup failed.
    #[error("{kind} counterpart lookup failed: {source}")]
    Lookup {
        /// Foreign system searched.
        kind: LinkKind,
        /// Underlying failure.
        #[source]
        source: LookupError,
    },
}
