//! Output records.

use serde::Serialize;

use super::{AccountRecord, Transaction};

/// A transaction with its parent and transfer counterpart details attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedTransaction {
    /// The upstream transaction.
    #[serde(flatten)]
    pub transaction: Transaction,
    /// Full record of the loan account owning the transaction.
    pub parent_account_details: AccountRecord,
    /// Owning account of the transfer counterpart.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_account_key: Option<String>,
    /// Full record of the transfer counterpart account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_account_details: Option<AccountRecord>,
    /// Set when the transaction carried a transfer link that could not be resolved.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub transfer_unresolved: bool,
}

impl EnrichedTransaction {
    /// Attaches the parent account to a transaction.
    #[must_use]
    pub fn new(transaction: Transaction, parent_account_details: AccountRecord) -> Self {
        Self {
            transaction,
            parent_account_details,
            transfer_account_key: None,
            transfer_account_details: None,
            transfer_unresolved: false,
        }
    }
}

/// Transactions of one loan in the multi-loan flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTransactions {
    /// The loan id as requested.
    pub parent_account_id: String,
    /// Enriched transactions of that loan.
    pub transactions: Vec<EnrichedTransaction>,
}
