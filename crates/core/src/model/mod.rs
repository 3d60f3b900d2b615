//! Typed Mambu records.
//!
//! Records are decoded at the JSON boundary. Fields the connector does not
//! interpret are preserved so the consumer still receives the full payload.

pub mod account;
pub mod enriched;
pub mod transaction;

pub use account::{AccountRecord, LinkedTransaction, LinkedTransactionLookupResult};
pub use enriched::{EnrichedTransaction, LoanTransactions};
pub use transaction::{AmbiguousLink, LinkKind, Transaction, TransferDetails, TransferLink};
