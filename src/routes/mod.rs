pub mod bids;
pub mod health;
pub mod tenders;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        // Tenders
        .route("/api/tenders", post(tenders::create_tender))
        .route("/api/tenders", get(tenders::list_tenders))
        .route("/api/tenders/:tender_id", get(tenders::get_tender))
        // Bids (nested under tenders)
        .route("/api/tenders/:tender_id/bids", post(bids::create_bid))
        .route("/api/tenders/:tender_id/bids", get(bids::list_bids))
        // Demo data
        .route("/api/seed", post(tenders::seed_tenders))
}
