//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Plain reads
//! accept any Postgres executor (`&PgPool` or a transaction connection); the
//! locking and counter operations take the caller's transaction explicitly.

pub mod coupon_claim_repo;
pub mod coupon_repo;

pub use coupon_claim_repo::CouponClaimRepo;
pub use coupon_repo::{CouponRepo, UpdateOutcome};
