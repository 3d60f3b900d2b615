//! Transfer reconciliation for loan transactions.
//!
//! # Modules
//!
//! - `engine` - Parent enrichment, concurrent counterpart resolution and merge
//! - `partition` - Splitting a batch by transfer link
//! - `error` - Reconciliation error types

pub mod engine;
pub mod error;
mod partition;


#[cfg(test)]
mod engine_props;

pub use engine::{ReconciliationEngine, ReconciliationOutcome, ensure_records};
pub use error::{ReconciliationError, ResolutionStage, UnresolvedLink};
