//! Read-only coupon projections.
//!
//! No row locks are taken. Reads observe every committed claim; a claim still
//! in flight may or may not be visible.

use coupon_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use sqlx::PgPool;

use crate::models::coupon::{Coupon, CouponDetails};
use crate::repositories::{CouponClaimRepo, CouponRepo};

/// Read facade over the coupon and claim stores.
pub struct CouponQuery;

impl CouponQuery {
    /// Coupon detail with its claimant list, or `None` if no such coupon.
    ///
    /// Both reads share one `REPEATABLE READ` snapshot so `remaining_amount`
    /// and `claimed_by` always describe the same set of committed claims.
    pub async fn details(pool: &PgPool, name: &str) -> Result<Option<CouponDetails>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let Some(coupon) = CouponRepo::find_by_name(&mut *tx, name).await? else {
            tx.rollback().await?;
            return Ok(None);
        };
        let claimed_by = CouponClaimRepo::list_claimants(&mut *tx, coupon.id).await?;
        tx.commit().await?;

        Ok(Some(CouponDetails {
            amount: coupon.capacity,
            remaining_amount: coupon.remaining(),
            name: coupon.name,
            claimed_by,
        }))
    }

    /// Coupons ordered by creation time, newest first.
    ///
    /// `limit` defaults to [`DEFAULT_LIST_LIMIT`] and is capped at
    /// [`MAX_LIST_LIMIT`]; a negative `offset` is treated as zero.
    pub async fn list(
        pool: &PgPool,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Coupon>, sqlx::Error> {
        let limit = clamp_limit(limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
        let offset = clamp_offset(offset);
        CouponRepo::list(pool, limit, offset).await
    }
}
