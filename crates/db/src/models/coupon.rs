//! Coupon entity model and DTOs.

use coupon_core::coupon::{validate_no_nul, MAX_NAME_LEN, MIN_NAME_LEN};
use coupon_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `coupons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Coupon {
    pub id: DbId,
    pub name: String,
    pub capacity: i32,
    pub consumed_count: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Coupon {
    /// Units still available for claiming.
    pub fn remaining(&self) -> i32 {
        coupon_core::coupon::remaining(self.capacity, self.consumed_count)
    }

    /// Whether at least one more claim fits under the capacity.
    pub fn has_capacity(&self) -> bool {
        self.consumed_count < self.capacity
    }
}

/// DTO for creating a new coupon.
///
/// The wire field is `amount`; it becomes the coupon's capacity.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCoupon {
    #[validate(length(min = MIN_NAME_LEN, max = MAX_NAME_LEN), custom(function = "validate_no_nul"))]
    pub name: String,
    #[serde(rename = "amount")]
    #[validate(range(min = 1))]
    pub capacity: i32,
}

/// DTO for the administrative update path. Name is immutable.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCoupon {
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
    pub is_active: Option<bool>,
}

/// Read projection of a coupon together with everyone who claimed it.
#[derive(Debug, Clone, Serialize)]
pub struct CouponDetails {
    pub name: String,
    pub amount: i32,
    pub remaining_amount: i32,
    /// User ids in claim order.
    pub claimed_by: Vec<String>,
}
