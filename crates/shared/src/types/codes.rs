//! Domain error codes surfaced to callers.

/// Stable codes carried by domain errors.
pub struct ErrorCode;

impl ErrorCode {
    /// The transaction search for a single loan returned nothing.
    pub const NO_TRANSACTIONS_FOUND_FOR_ACCOUNT: &'static str = "NO_TRANSACTIONS_FOUND_FOR_ACCOUNT";
}
