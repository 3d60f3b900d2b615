//! Account records and counterpart search results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Full details of a loan or deposit account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    /// Mambu encoded key.
    pub encoded_key: String,
    /// Human readable id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Fields carried through untouched.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl AccountRecord {
    /// Creates a record with only an encoded key.
    #[must_use]
    pub fn new(encoded_key: impl Into<String>) -> Self {
        Self {
            encoded_key: encoded_key.into(),
            id: None,
            fields: Map::new(),
        }
    }

    /// Adds an opaque field.
    #[must_use]
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }
}

/// A counterpart transaction found by a `detailsLevel=BASIC` search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedTransaction {
    /// Encoded key of the counterpart transaction.
    pub encoded_key: String,
    /// Encoded key of the account owning the counterpart transaction.
    #[serde(default)]
    pub parent_account_key: Option<String>,
    /// Fields carried through untouched.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl LinkedTransaction {
    /// Creates a search result owned by `parent_account_key`.
    #[must_use]
    pub fn new(encoded_key: impl Into<String>, parent_account_key: impl Into<String>) -> Self {
        Self {
            encoded_key: encoded_key.into(),
            parent_account_key: Some(parent_account_key.into()),
            fields: Map::new(),
        }
    }
}

/// Join table from counterpart transaction key to owning account key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkedTransactionLookupResult {
    owners: HashMap<String, String>,
}

impl LinkedTransactionLookupResult {
    /// Builds the join table. The first result wins on duplicate keys;
    /// results without an owner are skipped.
    #[must_use]
    pub fn from_records(records: &[LinkedTransaction]) -> Self {
        let mut owners = HashMap::with_capacity(records.len());
        for record in records {
            if let Some(owner) = record.parent_account_key.as_deref() {
                owners
                    .entry(record.encoded_key.clone())
                    .or_insert_with(|| owner.to_string());
            }
        }
        Self { owners }
    }

    /// Owning account of a counterpart transaction.
    #[must_use]
    pub fn owning_account(&self, transaction_key: &str) -> Option<&str> {
        self.owners.get(transaction_key).map(String::as_str)
    }

    /// Number of resolvable keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Whether nothing resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_account_record_keeps_details() {
        let raw = json!({"encodedKey": "A1", "id": "ACC-1", "name": "Acct A1", "balances": {"total": 10}});
        let account: AccountRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(account.encoded_key, "A1");
        assert_eq!(account.fields["name"], json!("Acct A1"));
        assert_eq!(serde_json::to_value(&account).unwrap(), raw);
    }

    #[test]
    fn test_account_record_requires_encoded_key() {
        let result = serde_json::from_value::<AccountRecord>(json!({"id": "ACC-1"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_lookup_result_first_match_wins() {
        let records = vec![
            LinkedTransaction::new("d1", "A1"),
            LinkedTransaction::new("d1", "A2"),
            LinkedTransaction::new("d2", "A3"),
        ];
        let lookup = LinkedTransactionLookupResult::from_records(&records);
        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup.owning_account("d1"), Some("A1"));
        assert_eq!(lookup.owning_account("d2"), Some("A3"));
        assert_eq!(lookup.owning_account("d3"), None);
    }

    #[test]
    fn test_lookup_result_skips_ownerless_records() {
        let raw = json!([{"encodedKey": "d1"}]);
        let records: Vec<LinkedTransaction> = serde_json::from_value(raw).unwrap();
        let lookup = LinkedTransactionLookupResult::from_records(&records);
        assert!(lookup.is_empty());
    }
}
