//! Loanlink API Server
//!
//! Main entry point for the Mambu loan transaction connector.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use loanlink_api::{AppState, create_router};
use loanlink_core::loans::LoanTransactionService;
use loanlink_core::reconciliation::ReconciliationEngine;
use loanlink_mambu::{CounterpartSearch, MambuClient};
use loanlink_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loanlink=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Mambu client shared by every lookup
    let client = MambuClient::new(&config.mambu).context("Failed to create Mambu client")?;
    info!(
        base_url = %config.mambu.base_url,
        timeout_secs = config.mambu.timeout_secs,
        max_retries = config.mambu.retry.max_retries,
        "Mambu client configured"
    );

    let engine = ReconciliationEngine::new(
        Arc::new(CounterpartSearch::deposits(client.clone())),
        Arc::new(CounterpartSearch::loans(client.clone())),
        config.reconciliation.clone(),
    );
    info!(
        preserve_order = config.reconciliation.preserve_order,
        unresolved_links = ?config.reconciliation.unresolved_links,
        "Reconciliation engine configured"
    );

    let service = LoanTransactionService::new(Arc::new(client), engine);
    let app = create_router(AppState::new(service));

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
