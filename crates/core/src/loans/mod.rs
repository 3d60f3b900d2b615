//! Loan transaction flows: single loan, single transaction, many loans.

pub mod error;
pub mod query;
pub mod service;

#[cfg(test)]
mod tests;

pub use error::LoanServiceError;
pub use query::{TransactionQuery, parse_loan_ids};
pub use service::LoanTransactionService;
