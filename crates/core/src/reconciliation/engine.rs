//! Transaction reconciliation engine.
//!
//! Attaches the parent account to every transaction of a batch and resolves
//! transfer counterparts through the deposit and loan lookups. The two lookups
//! work on disjoint groups and run concurrently; the first failure drops the
//! other branch and fails the whole call.

use std::collections::HashMap;
use std::sync::Arc;

use loanlink_shared::{ReconciliationConfig, UnresolvedLinkPolicy};
use tracing::{debug, warn};

use crate::lookup::CounterpartLookup;
use crate::model::{
    AccountRecord, EnrichedTransaction, LinkKind, LinkedTransactionLookupResult, Transaction,
};

use super::error::{ReconciliationError, ResolutionStage, UnresolvedLink};
use super::partition::{LinkedSlot, Partition, Slot, distinct_keys};

/// Result of reconciling one batch.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationOutcome {
    /// One enriched record per input transaction.
    pub transactions: Vec<EnrichedTransaction>,
    /// Transfer links that could not be resolved.
    pub unresolved: Vec<UnresolvedLink>,
}

/// Fails with `NoRecordsFound` when the batch is empty.
///
/// # Errors
///
/// Returns `ReconciliationError::NoRecordsFound` carrying `code`.
pub fn ensure_records(
    transactions: &[Transaction],
    code: &str,
) -> Result<(), ReconciliationError> {
    if transactions.is_empty() {
        return Err(ReconciliationError::NoRecordsFound {
            code: code.to_string(),
        });
    }
    Ok(())
}

/// Engine for enriching loan transactions with their counterparts.
#[derive(Clone)]
pub struct ReconciliationEngine {
    deposits: Arc<dyn CounterpartLookup>,
    loans: Arc<dyn CounterpartLookup>,
    options: ReconciliationConfig,
}

impl ReconciliationEngine {
    /// Creates an engine over the deposit and loan counterpart lookups.
    #[must_use]
    pub fn new(
        deposits: Arc<dyn CounterpartLookup>,
        loans: Arc<dyn CounterpartLookup>,
        options: ReconciliationConfig,
    ) -> Self {
        Self {
            deposits,
            loans,
            options,
        }
    }

    /// Reconciles a batch that must contain at least one transaction.
    ///
    /// An empty batch fails before any lookup is invoked.
    pub async fn reconcile_required(
        &self,
        transactions: Vec<Transaction>,
        parent: &AccountRecord,
        no_records_code: &str,
    ) -> Result<ReconciliationOutcome, ReconciliationError> {
        ensure_records(&transactions, no_records_code)?;
        self.reconcile(transactions, parent).await
    }

    /// Reconciles a batch. An empty batch yields an empty outcome.
    pub async fn reconcile(
        &self,
        transactions: Vec<Transaction>,
        parent: &AccountRecord,
    ) -> Result<ReconciliationOutcome, ReconciliationError> {
        let enriched = transactions
            .into_iter()
            .map(|transaction| EnrichedTransaction::new(transaction, parent.clone()))
            .collect();

        let partition = Partition::split(enriched)?;
        debug!(
            parent = %parent.encoded_key,
            total = partition.len(),
            unlinked = partition.unlinked.len(),
            deposit_linked = partition.deposit_linked.len(),
            loan_linked = partition.loan_linked.len(),
            "Partitioned transactions"
        );

        let Partition {
            unlinked,
            deposit_linked,
            loan_linked,
        } = partition;

        let (deposits, loans) = tokio::try_join!(
            resolve_group(self.deposits.as_ref(), LinkKind::Deposit, deposit_linked),
            resolve_group(self.loans.as_ref(), LinkKind::Loan, loan_linked),
        )?;

        let mut slots = unlinked;
        slots.extend(deposits.slots);
        slots.extend(loans.slots);
        if self.options.preserve_order {
            slots.sort_by_key(|slot| slot.index);
        }

        let mut unresolved = deposits.unresolved;
        unresolved.extend(loans.unresolved);

        if self.options.unresolved_links == UnresolvedLinkPolicy::Fail && !unresolved.is_empty() {
            return Err(ReconciliationError::UnresolvedLink(unresolved.swap_remove(0)));
        }

        Ok(ReconciliationOutcome {
            transactions: slots.into_iter().map(|slot| slot.transaction).collect(),
            unresolved,
        })
    }
}

#[derive(Default)]
struct ResolvedGroup {
    slots: Vec<Slot>,
    unresolved: Vec<UnresolvedLink>,
}

/// Resolves one linked group: counterpart transactions first, then their accounts.
async fn resolve_group(
    lookup: &dyn CounterpartLookup,
    kind: LinkKind,
    group: Vec<LinkedSlot>,
) -> Result<ResolvedGroup, ReconciliationError> {
    if group.is_empty() {
        return Ok(ResolvedGroup::default());
    }

    let transaction_keys = distinct_keys(group.iter().map(|linked| linked.linked_key.as_str()));
    let linked = lookup
        .search_transactions(&transaction_keys)
        .await
        .map_err(|source| ReconciliationError::Lookup { kind, source })?;
    let owners = LinkedTransactionLookupResult::from_records(&linked);
    debug!(%kind, requested = transaction_keys.len(), found = owners.len(), "Counterpart transactions resolved");

    let mut resolved = ResolvedGroup::default();
    for LinkedSlot { mut slot, linked_key } in group {
        match owners.owning_account(&linked_key) {
            Some(owner) => slot.transaction.transfer_account_key = Some(owner.to_string()),
            None => resolved.unresolved.push(mark_unresolved(
                &mut slot,
                kind,
                linked_key,
                ResolutionStage::CounterpartTransaction,
            )),
        }
        resolved.slots.push(slot);
    }

    let account_keys = distinct_keys(
        resolved
            .slots
            .iter()
            .filter_map(|slot| slot.transaction.transfer_account_key.as_deref()),
    );
    if account_keys.is_empty() {
        return Ok(resolved);
    }

    let accounts = lookup
        .search_accounts(&account_keys)
        .await
        .map_err(|source| ReconciliationError::Lookup { kind, source })?;
    let mut by_key: HashMap<&str, &AccountRecord> = HashMap::with_capacity(accounts.len());
    for account in &accounts {
        by_key.entry(account.encoded_key.as_str()).or_insert(account);
    }

    for slot in &mut resolved.slots {
        let Some(account_key) = slot.transaction.transfer_account_key.clone() else {
            continue;
        };
        match by_key.get(account_key.as_str()) {
            Some(account) => slot.transaction.transfer_account_details = Some((*account).clone()),
            None => resolved.unresolved.push(mark_unresolved(
                slot,
                kind,
                account_key,
                ResolutionStage::CounterpartAccount,
            )),
        }
    }

    Ok(resolved)
}

fn mark_unresolved(
    slot: &mut Slot,
    kind: LinkKind,
    missing_key: String,
    stage: ResolutionStage,
) -> UnresolvedLink {
    slot.transaction.transfer_unresolved = true;
    let link = UnresolvedLink {
        transaction: slot.transaction.transaction.reference().to_string(),
        missing_key,
        kind,
        stage,
    };
    warn!(
        transaction = %link.transaction,
        missing_key = %link.missing_key,
        %kind,
        %stage,
        "Transfer link could not be resolved"
    );
    link
}
