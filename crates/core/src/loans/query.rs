//! Request types for the loan transaction flows.

use chrono::NaiveDate;
use loanlink_shared::{LoanAccountId, PageRequest};

use super::error::LoanServiceError;

/// Transactions of one loan, optionally bounded by creation date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    /// Loan whose transactions are searched.
    pub loan_id: LoanAccountId,
    /// Lower bound on creation date.
    pub from_date: Option<NaiveDate>,
    /// Upper bound on creation date.
    pub to_date: Option<NaiveDate>,
    /// Page of results.
    pub page: PageRequest,
}

impl TransactionQuery {
    /// Query for all transactions of a loan, first page.
    #[must_use]
    pub fn for_loan(loan_id: LoanAccountId) -> Self {
        Self {
            loan_id,
            from_date: None,
            to_date: None,
            page: PageRequest::default(),
        }
    }

    /// Checks the date range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` when `from_date` is after `to_date`.
    pub fn validate(&self) -> Result<(), LoanServiceError> {
        if let (Some(from), Some(to)) = (self.from_date, self.to_date) {
            if from > to {
                return Err(LoanServiceError::InvalidRequest(format!(
                    "fromDate {from} is after toDate {to}"
                )));
            }
        }
        Ok(())
    }
}

/// Parses loan ids given as comma separated values, possibly repeated.
///
/// Blank entries are skipped and duplicates collapse onto their first occurrence.
#[must_use]
pub fn parse_loan_ids<S: AsRef<str>>(raw: &[S]) -> Vec<LoanAccountId> {
    let mut ids: Vec<LoanAccountId> = Vec::new();
    for id in raw
        .iter()
        .flat_map(|value| value.as_ref().split(','))
        .filter_map(|value| LoanAccountId::new(value).ok())
    {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}
