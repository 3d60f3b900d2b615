//! Lookup trait implementations backed by [`MambuClient`].

use async_trait::async_trait;
use loanlink_core::loans::TransactionQuery;
use loanlink_core::lookup::{CounterpartLookup, LoanApi, LookupError};
use loanlink_core::model::{AccountRecord, LinkKind, LinkedTransaction, Transaction};
use loanlink_shared::{LoanAccountId, LoanTransactionId, PageRequest};
use loanlink_shared::types::pagination::MAX_PAGE_LIMIT;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::{DetailsLevel, MambuClient};
use crate::search::SearchRequest;

/// Counterpart search against one Mambu product family.
#[derive(Debug, Clone)]
pub struct CounterpartSearch {
    client: MambuClient,
    kind: LinkKind,
    transactions_path: &'static [&'static str],
    accounts_path: &'static [&'static str],
}

impl CounterpartSearch {
    /// Deposit transactions and deposit accounts.
    #[must_use]
    pub fn deposits(client: MambuClient) -> Self {
        Self {
            client,
            kind: LinkKind::Deposit,
            transactions_path: &["deposits", "transactions:search"],
            accounts_path: &["deposits:search"],
        }
    }

    /// Loan transactions and loan accounts.
    #[must_use]
    pub fn loans(client: MambuClient) -> Self {
        Self {
            client,
            kind: LinkKind::Loan,
            transactions_path: &["loans", "transactions:search"],
            accounts_path: &["loans:search"],
        }
    }

    /// Searches `keys` in batches no larger than one Mambu page.
    async fn search_keys<T: DeserializeOwned>(
        &self,
        path: &[&str],
        details: DetailsLevel,
        keys: &[String],
    ) -> Result<Vec<T>, LookupError> {
        let mut records = Vec::with_capacity(keys.len());
        for batch in keys.chunks(MAX_PAGE_LIMIT as usize) {
            let page = PageRequest::from_parts(None, u32::try_from(batch.len()).ok());
            let found: Vec<T> = self
                .client
                .search(path, details, &SearchRequest::by_encoded_keys(batch), page)
                .await?;
            records.extend(found);
        }
        debug!(kind = %self.kind, requested = keys.len(), found = records.len(), "Counterpart search completed");
        Ok(records)
    }
}

#[async_trait]
impl CounterpartLookup for CounterpartSearch {
    async fn search_transactions(
        &self,
        keys: &[String],
    ) -> Result<Vec<LinkedTransaction>, LookupError> {
        self.search_keys(self.transactions_path, DetailsLevel::Basic, keys)
            .await
    }

    async fn search_accounts(&self, keys: &[String]) -> Result<Vec<AccountRecord>, LookupError> {
        self.search_keys(self.accounts_path, DetailsLevel::Full, keys)
            .await
    }
}

#[async_trait]
impl LoanApi for MambuClient {
    async fn get_loan(&self, loan_id: &LoanAccountId) -> Result<AccountRecord, LookupError> {
        Ok(self.get(&["loans", loan_id.as_str()], DetailsLevel::Full).await?)
    }

    async fn get_transaction(
        &self,
        transaction_id: &LoanTransactionId,
    ) -> Result<Transaction, LookupError> {
        Ok(self
            .get(&["loans", "transactions", transaction_id.as_str()], DetailsLevel::Full)
            .await?)
    }

    async fn search_loan_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<Transaction>, LookupError> {
        Ok(self
            .search(
                &["loans", "transactions:search"],
                DetailsLevel::Full,
                &SearchRequest::loan_transactions(query),
                query.page,
            )
            .await?)
    }

    async fn list_loan_transactions(
        &self,
        loan_id: &LoanAccountId,
        page: PageRequest,
    ) -> Result<Vec<Transaction>, LookupError> {
        Ok(self
            .list(&["loans", loan_id.as_str(), "transactions"], DetailsLevel::Full, page)
            .await?)
    }
}
