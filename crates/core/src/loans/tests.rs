//! Flow tests against mocked Mambu collaborators.

use std::sync::Arc;

use loanlink_shared::{LoanAccountId, LoanTransactionId, PageRequest, ReconciliationConfig};
use serde_json::json;

use super::*;
use crate::lookup::{LookupError, MockCounterpartLookup, MockLoanApi};
use crate::model::{AccountRecord, LinkedTransaction, Transaction, TransferDetails};
use crate::reconciliation::{ReconciliationEngine, ReconciliationError};

fn loan_id(value: &str) -> LoanAccountId {
    LoanAccountId::new(value).unwrap()
}

fn untouched() -> MockCounterpartLookup {
    let mut lookup = MockCounterpartLookup::new();
    lookup.expect_search_transactions().never();
    lookup.expect_search_accounts().never();
    lookup
}

fn service(
    api: MockLoanApi,
    deposits: MockCounterpartLookup,
    loans: MockCounterpartLookup,
) -> LoanTransactionService {
    let engine = ReconciliationEngine::new(
        Arc::new(deposits),
        Arc::new(loans),
        ReconciliationConfig::default(),
    );
    LoanTransactionService::new(Arc::new(api), engine)
}

fn loan(encoded_key: &str, name: &str) -> AccountRecord {
    AccountRecord::new(encoded_key).with_field("loanName", name)
}

#[tokio::test]
async fn test_single_loan_enriches_transactions() {
    let mut api = MockLoanApi::new();
    api.expect_get_loan()
        .withf(|id| id.as_str() == "L1")
        .times(1)
        .returning(|_| Ok(loan("8aL1", "Home loan")));
    api.expect_search_loan_transactions()
        .withf(|query| query.loan_id.as_str() == "L1")
        .times(1)
        .returning(|_| {
            Ok(vec![
                Transaction::with_id("t1"),
                Transaction::with_id("t2").linked(TransferDetails::deposit("d1")),
            ])
        });

    let mut deposits = MockCounterpartLookup::new();
    deposits
        .expect_search_transactions()
        .returning(|_| Ok(vec![LinkedTransaction::new("d1", "A1")]));
    deposits
        .expect_search_accounts()
        .returning(|_| Ok(vec![AccountRecord::new("A1").with_field("name", "Acct A1")]));

    let transactions = service(api, deposits, untouched())
        .transactions_for_loan(&TransactionQuery::for_loan(loan_id("L1")))
        .await
        .unwrap();

    assert_eq!(transactions.len(), 2);
    assert!(
        transactions
            .iter()
            .all(|t| t.parent_account_details.encoded_key == "8aL1")
    );
    let value = serde_json::to_value(&transactions[1]).unwrap();
    assert_eq!(value["transferAccountDetails"]["encodedKey"], json!("A1"));
    assert_eq!(value["parentAccountDetails"]["loanName"], json!("Home loan"));
}

#[tokio::test]
async fn test_single_loan_without_transactions_fails_with_code() {
    let mut api = MockLoanApi::new();
    api.expect_get_loan()
        .returning(|_| Ok(loan("8aL1", "Home loan")));
    api.expect_search_loan_transactions()
        .returning(|_| Ok(vec![]));

    let error = service(api, untouched(), untouched())
        .transactions_for_loan(&TransactionQuery::for_loan(loan_id("L1")))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        LoanServiceError::Reconciliation(ReconciliationError::NoRecordsFound { ref code })
            if code == "NO_TRANSACTIONS_FOUND_FOR_ACCOUNT"
    ));
}

#[tokio::test]
async fn test_single_loan_rejects_inverted_dates_before_calls() {
    let mut api = MockLoanApi::new();
    api.expect_get_loan().never();
    api.expect_search_loan_transactions().never();

    let mut query = TransactionQuery::for_loan(loan_id("L1"));
    query.from_date = chrono::NaiveDate::from_ymd_opt(2025, 6, 1);
    query.to_date = chrono::NaiveDate::from_ymd_opt(2025, 1, 1);

    let error = service(api, untouched(), untouched())
        .transactions_for_loan(&query)
        .await
        .unwrap_err();

    assert!(matches!(error, LoanServiceError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_single_loan_missing_loan_propagates() {
    let mut api = MockLoanApi::new();
    api.expect_get_loan().returning(|_| {
        Err(LookupError::Http {
            status: 404,
            reason: "INVALID_LOAN_ACCOUNT_ID".into(),
            details: vec![],
        })
    });
    api.expect_search_loan_transactions().never();

    let error = service(api, untouched(), untouched())
        .transactions_for_loan(&TransactionQuery::for_loan(loan_id("missing")))
        .await
        .unwrap_err();

    assert!(matches!(error, LoanServiceError::Upstream(ref e) if e.is_not_found()));
}

#[tokio::test]
async fn test_transaction_by_id_fetches_parent() {
    let mut api = MockLoanApi::new();
    api.expect_get_transaction()
        .withf(|id| id.as_str() == "55")
        .times(1)
        .returning(|_| {
            let mut transaction =
                Transaction::with_id("55").linked(TransferDetails::loan("l9"));
            transaction.parent_account_key = Some("8aL1".into());
            Ok(transaction)
        });
    api.expect_get_loan()
        .withf(|id| id.as_str() == "8aL1")
        .times(1)
        .returning(|_| Ok(loan("8aL1", "Home loan")));

    let mut loans = MockCounterpartLookup::new();
    loans
        .expect_search_transactions()
        .returning(|_| Ok(vec![LinkedTransaction::new("l9", "B2")]));
    loans
        .expect_search_accounts()
        .returning(|_| Ok(vec![AccountRecord::new("B2")]));

    let transaction = service(api, untouched(), loans)
        .transaction_by_id(&LoanTransactionId::new("55").unwrap())
        .await
        .unwrap();

    assert_eq!(transaction.parent_account_details.encoded_key, "8aL1");
    assert_eq!(transaction.transfer_account_key.as_deref(), Some("B2"));
}

#[tokio::test]
async fn test_transaction_by_id_without_parent_key() {
    let mut api = MockLoanApi::new();
    api.expect_get_transaction()
        .returning(|_| Ok(Transaction::with_id("55")));
    api.expect_get_loan().never();

    let error = service(api, untouched(), untouched())
        .transaction_by_id(&LoanTransactionId::new("55").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        LoanServiceError::MissingParentAccount { ref transaction } if transaction == "55"
    ));
}

#[tokio::test]
async fn test_multiple_loans_keep_their_own_parent() {
    let mut api = MockLoanApi::new();
    api.expect_get_loan()
        .withf(|id| id.as_str() == "L1")
        .times(1)
        .returning(|_| Ok(loan("8aL1", "First")));
    api.expect_get_loan()
        .withf(|id| id.as_str() == "L2")
        .times(1)
        .returning(|_| Ok(loan("8aL2", "Second")));
    api.expect_list_loan_transactions()
        .withf(|id, _| id.as_str() == "L1")
        .times(1)
        .returning(|_, _| Ok(vec![Transaction::with_id("a1"), Transaction::with_id("a2")]));
    api.expect_list_loan_transactions()
        .withf(|id, _| id.as_str() == "L2")
        .times(1)
        .returning(|_, _| Ok(vec![Transaction::with_id("b1")]));

    let ids = parse_loan_ids(&["L1,L2", "L1"]);
    let groups = service(api, untouched(), untouched())
        .transactions_for_loans(&ids, PageRequest::default())
        .await
        .unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].parent_account_id, "L1");
    assert_eq!(groups[0].transactions.len(), 2);
    assert!(
        groups[0]
            .transactions
            .iter()
            .all(|t| t.parent_account_details.encoded_key == "8aL1")
    );
    assert_eq!(groups[1].parent_account_id, "L2");
    assert!(
        groups[1]
            .transactions
            .iter()
            .all(|t| t.parent_account_details.encoded_key == "8aL2")
    );
}

#[tokio::test]
async fn test_multiple_loans_allow_empty_loan() {
    let mut api = MockLoanApi::new();
    api.expect_get_loan()
        .returning(|_| Ok(loan("8aL1", "First")));
    api.expect_list_loan_transactions()
        .returning(|_, _| Ok(vec![]));

    let groups = service(api, untouched(), untouched())
        .transactions_for_loans(&[loan_id("L1")], PageRequest::default())
        .await
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert!(groups[0].transactions.is_empty());
}

#[tokio::test]
async fn test_multiple_loans_stop_on_failure() {
    let mut api = MockLoanApi::new();
    api.expect_get_loan()
        .withf(|id| id.as_str() == "L1")
        .returning(|_| Ok(loan("8aL1", "First")));
    api.expect_get_loan()
        .withf(|id| id.as_str() == "L2")
        .returning(|_| Err(LookupError::Transport("connection refused".into())));
    api.expect_list_loan_transactions()
        .returning(|_, _| Ok(vec![Transaction::with_id("a1")]));

    let error = service(api, untouched(), untouched())
        .transactions_for_loans(&[loan_id("L1"), loan_id("L2")], PageRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        LoanServiceError::Upstream(LookupError::Transport(_))
    ));
}

#[tokio::test]
async fn test_multiple_loans_require_an_id() {
    let error = service(MockLoanApi::new(), untouched(), untouched())
        .transactions_for_loans(&[], PageRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(error, LoanServiceError::InvalidRequest(_)));
}
