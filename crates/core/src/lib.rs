//! Core business logic for Loanlink.
//!
//! This crate contains pure domain logic with ZERO web or HTTP dependencies.
//! Upstream systems are reached through the traits in `lookup`.
//!
//! # Modules
//!
//! - `model` - Typed Mambu records and output records
//! - `lookup` - Collaborator traits for Mambu lookups
//! - `reconciliation` - Transfer counterpart resolution
//! - `loans` - Loan transaction retrieval flows

pub mod loans;
pub mod lookup;
pub mod model;
pub mod reconciliation;
