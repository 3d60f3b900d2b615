//! Loan transaction retrieval flows.
//!
//! Each flow fetches the owning loan account, fetches the raw transactions and
//! hands both to the reconciliation engine.

use std::sync::Arc;

use futures::future::try_join_all;
use loanlink_shared::{ErrorCode, LoanAccountId, LoanTransactionId, PageRequest};
use tracing::{debug, info};

use crate::lookup::LoanApi;
use crate::model::{EnrichedTransaction, LoanTransactions};
use crate::reconciliation::ReconciliationEngine;

use super::error::LoanServiceError;
use super::query::TransactionQuery;

/// Service behind the loan transaction endpoints.
#[derive(Clone)]
pub struct LoanTransactionService {
    api: Arc<dyn LoanApi>,
    engine: ReconciliationEngine,
}

impl LoanTransactionService {
    /// Creates the service.
    #[must_use]
    pub fn new(api: Arc<dyn LoanApi>, engine: ReconciliationEngine) -> Self {
        Self { api, engine }
    }

    /// Transactions of one loan, searched by creation date.
    ///
    /// Fails with `NO_TRANSACTIONS_FOUND_FOR_ACCOUNT` when the search is empty.
    pub async fn transactions_for_loan(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<EnrichedTransaction>, LoanServiceError> {
        info!(loan_id = %query.loan_id, "Retrieving loan transactions");
        query.validate()?;

        let parent = self.api.get_loan(&query.loan_id).await?;
        debug!(loan_id = %query.loan_id, parent = %parent.encoded_key, "Parent account retrieved");

        let transactions = self.api.search_loan_transactions(query).await?;
        debug!(loan_id = %query.loan_id, count = transactions.len(), "Loan transactions retrieved");

        let outcome = self
            .engine
            .reconcile_required(
                transactions,
                &parent,
                ErrorCode::NO_TRANSACTIONS_FOUND_FOR_ACCOUNT,
            )
            .await?;

        info!(
            loan_id = %query.loan_id,
            count = outcome.transactions.len(),
            unresolved = outcome.unresolved.len(),
            "Completed loan transactions retrieval"
        );
        Ok(outcome.transactions)
    }

    /// A single transaction, enriched with its parent loan and transfer counterpart.
    pub async fn transaction_by_id(
        &self,
        transaction_id: &LoanTransactionId,
    ) -> Result<EnrichedTransaction, LoanServiceError> {
        info!(%transaction_id, "Retrieving loan transaction");

        let transaction = self.api.get_transaction(transaction_id).await?;
        let parent_id = transaction
            .parent_account_key
            .as_deref()
            .and_then(|key| LoanAccountId::new(key).ok())
            .ok_or_else(|| LoanServiceError::MissingParentAccount {
                transaction: transaction.reference().to_string(),
            })?;
        debug!(%transaction_id, parent = %parent_id, "Retrieving parent account");

        let parent = self.api.get_loan(&parent_id).await?;
        let outcome = self.engine.reconcile(vec![transaction], &parent).await?;

        info!(%transaction_id, "Completed loan transaction retrieval");
        outcome
            .transactions
            .into_iter()
            .next()
            .ok_or_else(|| LoanServiceError::EmptyOutcome(transaction_id.to_string()))
    }

    /// Transactions of several loans, one group per distinct loan id.
    ///
    /// Loans are processed concurrently; the first failure fails the request.
    pub async fn transactions_for_loans(
        &self,
        loan_ids: &[LoanAccountId],
        page: PageRequest,
    ) -> Result<Vec<LoanTransactions>, LoanServiceError> {
        if loan_ids.is_empty() {
            return Err(LoanServiceError::InvalidRequest(
                "at least one loan id is required".to_string(),
            ));
        }

        let mut distinct: Vec<&LoanAccountId> = Vec::with_capacity(loan_ids.len());
        for id in loan_ids {
            if !distinct.contains(&id) {
                distinct.push(id);
            }
        }
        info!(loans = distinct.len(), "Retrieving transactions for multiple loans");

        let groups =
            try_join_all(distinct.into_iter().map(|loan_id| self.loan_group(loan_id, page)))
                .await?;

        info!(loans = groups.len(), "Completed transactions retrieval for multiple loans");
        Ok(groups)
    }

    /// One loan of the multi-loan flow. Each loan carries its own parent record.
    async fn loan_group(
        &self,
        loan_id: &LoanAccountId,
        page: PageRequest,
    ) -> Result<LoanTransactions, LoanServiceError> {
        debug!(%loan_id, "Retrieving loan account transactions");
        let parent = self.api.get_loan(loan_id).await?;
        let transactions = self.api.list_loan_transactions(loan_id, page).await?;
        let outcome = self.engine.reconcile(transactions, &parent).await?;
        debug!(%loan_id, count = outcome.transactions.len(), "Loan account transactions reconciled");

        Ok(LoanTransactions {
            parent_account_id: loan_id.to_string(),
            transactions: outcome.transactions,
        })
    }
}
