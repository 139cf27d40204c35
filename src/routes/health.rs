use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::MessageResponse;
use crate::app::AppState;
use crate::config::StoreBackend;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: ServiceHealth,
}

#[derive(Serialize, Deserialize)]
pub struct ServiceHealth {
    pub store: String,
    pub store_backend: String,
}

/// GET /
pub async fn root() -> MessageResponse {
    MessageResponse::new("Qatar Tender Platform Backend Running")
}

/// Health check endpoint - public
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let store_result = state.store.health_check().await;

    if let Err(e) = &store_result {
        tracing::warn!(error = %e, "Document store health check failed");
    }

    let store_backend = match state.settings.store {
        StoreBackend::Postgres { .. } => "postgres",
        StoreBackend::Memory => "memory",
    };

    // The store is the only dependency, so its state is the service's state
    let (status_code, status, store_status) = if store_result.is_ok() {
        (StatusCode::OK, "healthy", "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "error")
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            services: ServiceHealth {
                store: store_status.to_string(),
                store_backend: store_backend.to_string(),
            },
        }),
    )
}
