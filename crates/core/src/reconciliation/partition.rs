//! Splitting a batch by transfer link.

use crate::model::{EnrichedTransaction, LinkKind};

use super::error::ReconciliationError;

/// A transaction and its position in the upstream batch.
#[derive(Debug, Clone)]
pub(crate) struct Slot {
    pub index: usize,
    pub transaction: EnrichedTransaction,
}

/// A slot whose transaction references a counterpart transaction.
#[derive(Debug, Clone)]
pub(crate) struct LinkedSlot {
    pub slot: Slot,
    pub linked_key: String,
}

/// The three disjoint groups of a batch.
#[derive(Debug, Default)]
pub(crate) struct Partition {
    pub unlinked: Vec<Slot>,
    pub deposit_linked: Vec<LinkedSlot>,
    pub loan_linked: Vec<LinkedSlot>,
}

impl Partition {
    /// Splits transactions into no-transfer, deposit-linked and loan-linked groups.
    ///
    /// Input order is kept within each group.
    pub fn split(transactions: Vec<EnrichedTransaction>) -> Result<Self, ReconciliationError> {
        let mut partition = Self::default();

        for (index, transaction) in transactions.into_iter().enumerate() {
            let link = transaction.transaction.transfer_link().map_err(|_| {
                ReconciliationError::AmbiguousTransferLink {
                    transaction: transaction.transaction.reference().to_string(),
                }
            })?;
            let slot = Slot { index, transaction };

            let Some(link) = link else {
                partition.unlinked.push(slot);
                continue;
            };
            let group = match link.kind() {
                LinkKind::Deposit => &mut partition.deposit_linked,
                LinkKind::Loan => &mut partition.loan_linked,
            };
            group.push(LinkedSlot {
                slot,
                linked_key: link.into_key(),
            });
        }

        Ok(partition)
    }

    pub fn len(&self) -> usize {
        self.unlinked.len() + self.deposit_linked.len() + self.loan_linked.len()
    }
}

/// Distinct keys in first-seen order.
pub(crate) fn distinct_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    keys.into_iter()
        .filter(|key| seen.insert(*key))
        .map(str::to_string)
        .collect()
}
