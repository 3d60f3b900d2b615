//! Loan transaction routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use loanlink_core::loans::{TransactionQuery, parse_loan_ids};
use loanlink_shared::{AppError, AppResult, LoanAccountId, LoanTransactionId, PageRequest};
use serde::Deserialize;
use tracing::info;

use crate::{AppState, error::ApiError};

/// Creates the loan transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/loans/transactions", get(list_transactions_for_loans))
        .route("/loans/transactions/{transaction_id}", get(get_transaction))
        .route("/loans/{loan_id}/transactions", get(list_loan_transactions))
}

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters for a single loan's transactions.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTransactionsQuery {
    /// Creation date lower bound (YYYY-MM-DD).
    pub from_date: Option<NaiveDate>,
    /// Creation date upper bound (YYYY-MM-DD).
    pub to_date: Option<NaiveDate>,
    /// Records to skip.
    pub offset: Option<u32>,
    /// Page size (default: 50, max: 1000).
    pub limit: Option<u32>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/loans/{loan_id}/transactions` - Transactions of one loan.
async fn list_loan_transactions(
    State(state): State<AppState>,
    Path(loan_id): Path<String>,
    query: Result<Query<LoanTransactionsQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let loan_id = LoanAccountId::new(loan_id).map_err(|e| AppError::Validation(e.to_string()))?;
    info!(%loan_id, "GET loan transactions");

    let request = TransactionQuery {
        loan_id,
        from_date: query.from_date,
        to_date: query.to_date,
        page: PageRequest::from_parts(query.offset, query.limit),
    };
    let transactions = state.service.transactions_for_loan(&request).await?;

    Ok((StatusCode::OK, Json(transactions)))
}

/// GET `/loans/transactions/{transaction_id}` - One transaction.
async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction_id =
        LoanTransactionId::new(transaction_id).map_err(|e| AppError::Validation(e.to_string()))?;
    info!(%transaction_id, "GET loan transaction");

    let transaction = state.service.transaction_by_id(&transaction_id).await?;

    Ok((StatusCode::OK, Json(transaction)))
}

/// GET `/loans/transactions?loanIds=a,b` - Transactions of several loans.
///
/// `loanIds` may be comma separated, repeated, or both.
async fn list_transactions_for_loans(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(pairs) = query?;

    let mut raw_ids = Vec::new();
    let mut offset = None;
    let mut limit = None;
    for (name, value) in pairs {
        match name.as_str() {
            "loanIds" => raw_ids.push(value),
            "offset" => offset = Some(parse_number("offset", &value)?),
            "limit" => limit = Some(parse_number("limit", &value)?),
            _ => {}
        }
    }

    let loan_ids = parse_loan_ids(&raw_ids);
    info!(loans = loan_ids.len(), "GET transactions for loans");

    let groups = state
        .service
        .transactions_for_loans(&loan_ids, PageRequest::from_parts(offset, limit))
        .await?;

    Ok((StatusCode::OK, Json(groups)))
}

fn parse_number(name: &str, value: &str) -> AppResult<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("{name} must be a non-negative integer")))
}

#[cfg(test)]
#[path = "loans_tests.rs"]
mod tests;
