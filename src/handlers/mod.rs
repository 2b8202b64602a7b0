pub mod finance;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // API (JSON for the finance explorer)
        .route("/api/years", get(finance::years))
        .route("/api/finance-details/:id", get(finance::details))
        .route("/api/ledger/reload", post(finance::reload))
        .route("/api/cache/stats", get(finance::cache_stats))
        // Health check
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}
