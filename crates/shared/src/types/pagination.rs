//! Offset paging for Mambu list and search endpoints.

use serde::{Deserialize, Serialize};

/// Largest page Mambu serves in one call.
pub const MAX_PAGE_LIMIT: u32 = 1_000;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Number of records to skip.
    #[serde(default)]
    pub offset: u32,
    /// Number of records to return.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    50
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: default_limit(),
        }
    }
}

impl PageRequest {
    /// Builds a page request from optional query values, clamping the limit.
    #[must_use]
    pub fn from_parts(offset: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            offset: offset.unwrap_or(0),
            limit: limit.unwrap_or_else(default_limit).clamp(1, MAX_PAGE_LIMIT),
        }
    }

    /// Query pairs understood by Mambu.
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("offset", self.offset.to_string()),
            ("limit", self.limit.to_string()),
            ("paginationDetails", "OFF".to_string()),
        ]
    }
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
