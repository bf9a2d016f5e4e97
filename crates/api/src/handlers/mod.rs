//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to `coupon_db` and map errors via [`AppError`](crate::error::AppError).

pub mod coupon;
