//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes for loan transaction retrieval
//! - Mapping of flow errors onto the JSON error envelope

pub mod error;
pub mod routes;

use axum::{Router, http::Uri};
use loanlink_core::loans::LoanTransactionService;
use loanlink_shared::AppError;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Loan transaction flows.
    pub service: Arc<LoanTransactionService>,
}

impl AppState {
    /// Wraps the service for sharing across handlers.
    #[must_use]
    pub fn new(service: LoanTransactionService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Unknown paths answer with the error envelope instead of an empty body.
async fn route_not_found(uri: Uri) -> ApiError {
    ApiError(AppError::NotFound(format!("No route for {}", uri.path())))
}
