pub mod coupon;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /coupons                 list, create
/// /coupons/claim           claim (POST)
/// /coupons/{name}          details, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/coupons", coupon::router())
}
