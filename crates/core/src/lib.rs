//! Domain core for the coupon claim service.
//!
//! Holds the shared types, the error taxonomy, the claim rejection table and
//! the input rules. Nothing in this crate performs I/O, so it can be used by
//! the repository layer, the HTTP layer and tests alike.

pub mod claim;
pub mod coupon;
pub mod error;
pub mod pagination;
pub mod types;
