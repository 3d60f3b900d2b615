//! Mambu v2 REST client for Loanlink.
//!
//! Implements the lookup traits of `loanlink-core` against a Mambu tenant.
//!
//! # Modules
//!
//! - [`client`]: authenticated GET/search calls with retries
//! - [`error`]: client errors and the Mambu error envelope
//! - [`lookups`]: deposit/loan counterpart lookups and the loan API
//! - [`retry`]: exponential backoff policy
//! - [`search`]: search request bodies

pub mod client;
pub mod error;
pub mod lookups;
pub mod retry;
pub mod search;

pub use client::{DetailsLevel, MambuClient};
pub use error::{MambuError, MambuErrorEntry};
pub use lookups::CounterpartSearch;
pub use retry::RetryPolicy;
pub use search::{FilterCriterion, FilterOperator, SearchRequest, SortOrder, SortingCriteria};
