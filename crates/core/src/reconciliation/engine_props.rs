//! Property-based tests for the reconciliation engine.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use loanlink_shared::ReconciliationConfig;
use proptest::prelude::*;

use super::ReconciliationEngine;
use crate::lookup::{CounterpartLookup, LookupError};
use crate::model::{AccountRecord, LinkedTransaction, Transaction, TransferDetails};

/// In-memory lookup where counterpart `k` is owned by account `acct-k`.
#[derive(Default)]
struct FakeLookup {
    searched: Mutex<Vec<String>>,
}

#[async_trait]
impl CounterpartLookup for FakeLookup {
    async fn search_transactions(
        &self,
        keys: &[String],
    ) -> Result<Vec<LinkedTransaction>, LookupError> {
        self.searched.lock().unwrap().extend(keys.iter().cloned());
        Ok(keys
            .iter()
            .map(|key| LinkedTransaction::new(key.clone(), format!("acct-{key}")))
            .collect())
    }

    async fn search_accounts(&self, keys: &[String]) -> Result<Vec<AccountRecord>, LookupError> {
        Ok(keys.iter().map(AccountRecord::new).collect())
    }
}

#[derive(Debug, Clone)]
enum Shape {
    Plain,
    EmptyDetails,
    Deposit(String),
    Loan(String),
}

fn arb_key() -> impl Strategy<Value = String> {
    "[a-z]{1,3}"
}

fn arb_shape() -> impl Strategy<Value = Shape> {
    prop_oneof![
        Just(Shape::Plain),
        Just(Shape::EmptyDetails),
        arb_key().prop_map(Shape::Deposit),
        arb_key().prop_map(Shape::Loan),
    ]
}

fn build(shapes: &[Shape]) -> Vec<Transaction> {
    shapes
        .iter()
        .enumerate()
        .map(|(i, shape)| {
            let transaction = Transaction::with_id(format!("t{i}"));
            match shape {
                Shape::Plain => transaction,
                Shape::EmptyDetails => transaction.linked(TransferDetails::default()),
                Shape::Deposit(key) => transaction.linked(TransferDetails::deposit(key.clone())),
                Shape::Loan(key) => transaction.linked(TransferDetails::loan(key.clone())),
            }
        })
        .collect()
}

fn run(
    shapes: &[Shape],
    preserve_order: bool,
) -> (Vec<crate::model::EnrichedTransaction>, Vec<String>, Vec<String>) {
    let deposits = Arc::new(FakeLookup::default());
    let loans = Arc::new(FakeLookup::default());
    let options = ReconciliationConfig {
        preserve_order,
        ..ReconciliationConfig::default()
    };
    let engine = ReconciliationEngine::new(deposits.clone(), loans.clone(), options);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let outcome = runtime
        .block_on(engine.reconcile(build(shapes), &AccountRecord::new("L1")))
        .unwrap();

    let deposit_searched = deposits.searched.lock().unwrap().clone();
    let loan_searched = loans.searched.lock().unwrap().clone();
    (outcome.transactions, deposit_searched, loan_searched)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Reconciliation never drops or duplicates transactions.
    #[test]
    fn prop_cardinality_is_preserved(
        shapes in prop::collection::vec(arb_shape(), 0..40),
        preserve_order in any::<bool>(),
    ) {
        let (output, _, _) = run(&shapes, preserve_order);

        prop_assert_eq!(output.len(), shapes.len());
        let ids: HashSet<&str> = output.iter().map(|t| t.transaction.reference()).collect();
        prop_assert_eq!(ids.len(), shapes.len());
    }

    /// With order preservation on, output order equals input order.
    #[test]
    fn prop_order_is_preserved(shapes in prop::collection::vec(arb_shape(), 0..40)) {
        let (output, _, _) = run(&shapes, true);

        let expected: Vec<String> = (0..shapes.len()).map(|i| format!("t{i}")).collect();
        let actual: Vec<String> = output
            .iter()
            .map(|t| t.transaction.reference().to_string())
            .collect();
        prop_assert_eq!(actual, expected);
    }

    /// Deposit keys only reach the deposit lookup, loan keys only the loan lookup,
    /// and transactions without a link never gain transfer details.
    #[test]
    fn prop_links_are_routed_by_kind(shapes in prop::collection::vec(arb_shape(), 1..40)) {
        let (output, deposit_searched, loan_searched) = run(&shapes, true);

        let deposit_keys: HashSet<String> = shapes.iter().filter_map(|s| match s {
            Shape::Deposit(key) => Some(key.clone()),
            _ => None,
        }).collect();
        let loan_keys: HashSet<String> = shapes.iter().filter_map(|s| match s {
            Shape::Loan(key) => Some(key.clone()),
            _ => None,
        }).collect();

        prop_assert_eq!(deposit_searched.iter().cloned().collect::<HashSet<_>>(), deposit_keys);
        prop_assert_eq!(loan_searched.iter().cloned().collect::<HashSet<_>>(), loan_keys);
        prop_assert_eq!(deposit_searched.len(), deposit_searched.iter().collect::<HashSet<_>>().len());

        for (shape, transaction) in shapes.iter().zip(&output) {
            match shape {
                Shape::Plain | Shape::EmptyDetails => {
                    prop_assert!(transaction.transfer_account_details.is_none());
                }
                Shape::Deposit(key) | Shape::Loan(key) => {
                    let expected = format!("acct-{key}");
                    prop_assert_eq!(
                        transaction.transfer_account_details.as_ref().map(|a| a.encoded_key.as_str()),
                        Some(expected.as_str())
                    );
                }
            }
        }
    }

    /// Every output transaction carries the parent account.
    #[test]
    fn prop_parent_is_always_attached(shapes in prop::collection::vec(arb_shape(), 0..20)) {
        let (output, _, _) = run(&shapes, false);
        prop_assert!(output.iter().all(|t| t.parent_account_details.encoded_key == "L1"));
    }
}
