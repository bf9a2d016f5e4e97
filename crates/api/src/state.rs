use std::sync::Arc;

use coupon_db::engine::ClaimEngine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: coupon_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Claim allocation engine sharing `pool`.
    pub claim_engine: ClaimEngine,
}

impl AppState {
    /// Build state with a claim engine configured from `config`.
    pub fn new(pool: coupon_db::DbPool, config: ServerConfig) -> Self {
        let claim_engine = ClaimEngine::new(pool.clone()).with_deadline(config.claim_deadline());
        Self {
            pool,
            config: Arc::new(config),
            claim_engine,
        }
    }
}
