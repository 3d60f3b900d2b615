//! Typed identifiers for Mambu entities.
//!
//! Mambu addresses records either by their `id` or by their `encodedKey`; both are
//! opaque strings. Wrapping them keeps a loan id from being passed where a
//! transaction id is expected.

use serde::{Deserialize, Serialize};

/// Error returned when parsing an empty identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identifier must not be empty")]
pub struct EmptyIdError;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an ID, rejecting blank input.
            ///
            /// # Errors
            ///
            /// Returns `EmptyIdError` if the trimmed input is empty.
            pub fn new(value: impl Into<String>) -> Result<Self, EmptyIdError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(EmptyIdError);
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Returns the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = EmptyIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

typed_id!(LoanAccountId, "Identifier (id or encoded key) of a loan account.");
typed_id!(
    LoanTransactionId,
    "Identifier (id or encoded key) of a loan transaction."
);

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
