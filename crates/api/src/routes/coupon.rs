//! Route definitions for coupons.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::coupon;
use crate::state::AppState;

/// Routes mounted at `/coupons`.
///
/// ```text
/// GET    /          -> list
/// POST   /          -> create
/// POST   /claim     -> claim
/// GET    /{name}    -> get_details
/// PUT    /{name}    -> update
/// DELETE /{name}    -> delete
/// ```
///
/// The static `/claim` segment takes priority over `/{name}`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(coupon::list).post(coupon::create))
        .route("/claim", post(coupon::claim))
        .route(
            "/{name}",
            get(coupon::get_details)
                .put(coupon::update)
                .delete(coupon::delete),
        )
}
