//! Root-level liveness and readiness probe.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the store answers, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Per-claim deadline in milliseconds; `null` when claims wait indefinitely.
    pub claim_deadline_ms: Option<u64>,
    /// Connections currently held by the pool, busy or idle.
    pub db_pool_size: u32,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = coupon_db::health_check(&state.pool).await.is_ok();
    let claim_deadline_ms = state
        .claim_engine
        .deadline()
        .map(|deadline| u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX));

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        claim_deadline_ms,
        db_pool_size: state.pool.size(),
    })
}

/// Mounted at the root, outside `/api`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
