//! Health check endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use ledger::InventoryStore;
use serde::Serialize;

use super::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub demo_mode: bool,
}

/// GET /health — returns process health and operating mode.
pub async fn check<S: InventoryStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        demo_mode: state.settings.demo_mode,
    })
}
