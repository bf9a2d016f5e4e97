//! Coupon claim entity model and DTOs.

use coupon_core::coupon::{validate_no_nul, MAX_USER_ID_LEN};
use coupon_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `coupon_claims` table. Append-only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CouponClaim {
    pub id: DbId,
    pub user_id: String,
    pub coupon_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for a claim request. `name` is the coupon name.
///
/// `name` has no upper bound: an over-long name is an unknown coupon.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ClaimCoupon {
    #[validate(length(min = 1, max = MAX_USER_ID_LEN), custom(function = "validate_no_nul"))]
    pub user_id: String,
    #[validate(length(min = 1), custom(function = "validate_no_nul"))]
    pub name: String,
}
