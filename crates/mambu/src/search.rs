//! Search request bodies for Mambu `:search` endpoints.

use loanlink_core::loans::TransactionQuery;
use serde::Serialize;

/// Date format Mambu accepts in search filters.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Filter operators used by the connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterOperator {
    /// Field equals `value`.
    Equals,
    /// Field is one of `values`.
    In,
    /// Field lies between `value` and `secondValue`.
    Between,
    /// Field is after `value`.
    After,
    /// Field is before `value`.
    Before,
}

/// One filter criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriterion {
    /// Field name, e.g. `encodedKey`.
    pub field: String,
    /// Operator.
    pub operator: FilterOperator,
    /// Operand of single-value operators.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Upper bound for `BETWEEN`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_value: Option<String>,
    /// Operands of `IN`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl FilterCriterion {
    fn single(field: &str, operator: FilterOperator, value: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            operator,
            value: Some(value.into()),
            second_value: None,
            values: Vec::new(),
        }
    }

    /// `field EQUALS value`.
    #[must_use]
    pub fn equals(field: &str, value: impl Into<String>) -> Self {
        Self::single(field, FilterOperator::Equals, value)
    }

    /// `field IN values`.
    #[must_use]
    pub fn one_of(field: &str, values: Vec<String>) -> Self {
        Self {
            field: field.to_string(),
            operator: FilterOperator::In,
            value: None,
            second_value: None,
            values,
        }
    }

    /// `field BETWEEN from AND to`.
    #[must_use]
    pub fn between(field: &str, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            second_value: Some(to.into()),
            ..Self::single(field, FilterOperator::Between, from)
        }
    }

    /// `field AFTER value`.
    #[must_use]
    pub fn after(field: &str, value: impl Into<String>) -> Self {
        Self::single(field, FilterOperator::After, value)
    }

    /// `field BEFORE value`.
    #[must_use]
    pub fn before(field: &str, value: impl Into<String>) -> Self {
        Self::single(field, FilterOperator::Before, value)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// Sorting criteria of a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortingCriteria {
    /// Field to sort by.
    pub field: String,
    /// Direction.
    pub order: SortOrder,
}

/// Body of a Mambu search request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Criteria combined with AND.
    pub filter_criteria: Vec<FilterCriterion>,
    /// Optional ordering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorting_criteria: Option<SortingCriteria>,
}

impl SearchRequest {
    /// Records whose encoded key is one of `keys`.
    #[must_use]
    pub fn by_encoded_keys(keys: &[String]) -> Self {
        Self {
            filter_criteria: vec![FilterCriterion::one_of("encodedKey", keys.to_vec())],
            sorting_criteria: None,
        }
    }

    /// Transactions of one loan, newest first, optionally bounded by creation date.
    #[must_use]
    pub fn loan_transactions(query: &TransactionQuery) -> Self {
        let mut filter_criteria = vec![FilterCriterion::equals(
            "parentAccountId",
            query.loan_id.as_str(),
        )];

        let from = query.from_date.map(|date| date.format(DATE_FORMAT).to_string());
        let to = query.to_date.map(|date| date.format(DATE_FORMAT).to_string());
        match (from, to) {
            (Some(from), Some(to)) => {
                filter_criteria.push(FilterCriterion::between("creationDate", from, to));
            }
            (Some(from), None) => filter_criteria.push(FilterCriterion::after("creationDate", from)),
            (None, Some(to)) => filter_criteria.push(FilterCriterion::before("creationDate", to)),
            (None, None) => {}
        }

        Self {
            filter_criteria,
            sorting_criteria: Some(SortingCriteria {
                field: "creationDate".to_string(),
                order: SortOrder::Desc,
            }),
        }
    }
}
