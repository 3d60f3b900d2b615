//! Common types used across the application.

pub mod codes;
pub mod id;
pub mod pagination;

pub use codes::ErrorCode;
pub use id::*;
pub use pagination::PageRequest;
