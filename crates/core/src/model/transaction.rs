//! Loan transaction records as returned by Mambu.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A loan transaction.
///
/// Only the fields the connector reads are typed; everything else is kept in
/// `fields` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Mambu encoded key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoded_key: Option<String>,
    /// Human readable id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Encoded key of the owning loan account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_account_key: Option<String>,
    /// Link to a transfer counterpart, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_details: Option<TransferDetails>,
    /// Fields carried through untouched.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Transaction {
    /// Creates a bare transaction with the given id.
    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            encoded_key: None,
            id: Some(id.into()),
            parent_account_key: None,
            transfer_details: None,
            fields: Map::new(),
        }
    }

    /// Attaches transfer details.
    #[must_use]
    pub fn linked(mut self, details: TransferDetails) -> Self {
        self.transfer_details = Some(details);
        self
    }

    /// Label used in logs and errors: the id, else the encoded key.
    #[must_use]
    pub fn reference(&self) -> &str {
        self.id
            .as_deref()
            .or(self.encoded_key.as_deref())
            .unwrap_or("<unidentified>")
    }

    /// Classifies the transfer link of this transaction.
    ///
    /// # Errors
    ///
    /// Returns `AmbiguousLink` when both a deposit and a loan key are present.
    pub fn transfer_link(&self) -> Result<Option<TransferLink>, AmbiguousLink> {
        self.transfer_details
            .as_ref()
            .map_or(Ok(None), TransferDetails::link)
    }
}

/// The `transferDetails` sub-record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferDetails {
    /// Key of the linked transaction on a deposit account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_deposit_transaction_key: Option<String>,
    /// Key of the linked transaction on another loan account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_loan_transaction_key: Option<String>,
    /// Fields carried through untouched.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl TransferDetails {
    /// Details pointing at a deposit transaction.
    #[must_use]
    pub fn deposit(key: impl Into<String>) -> Self {
        Self {
            linked_deposit_transaction_key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Details pointing at a loan transaction.
    #[must_use]
    pub fn loan(key: impl Into<String>) -> Self {
        Self {
            linked_loan_transaction_key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Returns the link these details describe. Blank keys count as absent.
    ///
    /// # Errors
    ///
    /// Returns `AmbiguousLink` when both keys are present.
    pub fn link(&self) -> Result<Option<TransferLink>, AmbiguousLink> {
        let deposit = non_blank(self.linked_deposit_transaction_key.as_deref());
        let loan = non_blank(self.linked_loan_transaction_key.as_deref());

        match (deposit, loan) {
            (Some(_), Some(_)) => Err(AmbiguousLink),
            (Some(key), None) => Ok(Some(TransferLink::Deposit(key.to_string()))),
            (None, Some(key)) => Ok(Some(TransferLink::Loan(key.to_string()))),
            (None, None) => Ok(None),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Both a deposit and a loan key were present on one transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmbiguousLink;

/// Which foreign system a transfer points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkKind {
    /// Linked deposit transaction.
    Deposit,
    /// Linked loan transaction.
    Loan,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => write!(f, "deposit"),
            Self::Loan => write!(f, "loan"),
        }
    }
}

/// A resolved transfer reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferLink {
    /// `linkedDepositTransactionKey`.
    Deposit(String),
    /// `linkedLoanTransactionKey`.
    Loan(String),
}

impl TransferLink {
    /// The foreign system this link points at.
    #[must_use]
    pub const fn kind(&self) -> LinkKind {
        match self {
            Self::Deposit(_) => LinkKind::Deposit,
            Self::Loan(_) => LinkKind::Loan,
        }
    }

    /// Consumes the link, returning the key.
    #[must_use]
    pub fn into_key(self) -> String {
        match self {
            Self::Deposit(key) | Self::Loan(key) => key,
        }
    }
}
