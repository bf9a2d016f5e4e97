//! Repository for the `coupons` table.

use coupon_core::coupon::validate_capacity_change;
use coupon_core::error::CoreError;
use coupon_core::types::DbId;
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};

use crate::models::coupon::{Coupon, CreateCoupon, UpdateCoupon};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, capacity, consumed_count, is_active, created_at, updated_at";

/// Result of an administrative coupon update.
#[derive(Debug)]
pub enum UpdateOutcome {
    Updated(Coupon),
    NotFound,
    /// The requested capacity would break `consumed_count <= capacity`.
    Invalid(CoreError),
}

/// Provides storage operations for coupons.
pub struct CouponRepo;

impl CouponRepo {
    /// Insert a new coupon with `consumed_count = 0` and `is_active = true`.
    ///
    /// A duplicate name surfaces as a unique violation on `uq_coupons_name`.
    pub async fn create(pool: &PgPool, input: &CreateCoupon) -> Result<Coupon, sqlx::Error> {
        let query = format!(
            "INSERT INTO coupons (name, capacity, consumed_count, is_active) \
             VALUES ($1, $2, 0, true) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Coupon>(&query)
            .bind(&input.name)
            .bind(input.capacity)
            .fetch_one(pool)
            .await
    }

    /// Find a coupon by its unique name.
    pub async fn find_by_name<'e, E>(executor: E, name: &str) -> Result<Option<Coupon>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM coupons WHERE name = $1");
        sqlx::query_as::<_, Coupon>(&query)
            .bind(name)
            .fetch_optional(executor)
            .await
    }

    /// Find a coupon by name and lock its row until `tx` ends.
    ///
    /// Any other transaction asking for the same lock blocks until this one
    /// commits or rolls back.
    pub async fn find_by_name_for_update(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<Option<Coupon>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM coupons WHERE name = $1 FOR UPDATE");
        sqlx::query_as::<_, Coupon>(&query)
            .bind(name)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Increment `consumed_count` by one only while it is below `capacity`.
    ///
    /// The guard and the increment are a single statement. Returns `false`
    /// when no row changed.
    pub async fn increment_consumed(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE coupons SET consumed_count = consumed_count + 1 \
             WHERE id = $1 AND consumed_count < capacity",
        )
        .bind(id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List coupons, newest first. `limit` and `offset` must already be clamped.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Coupon>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM coupons \
             ORDER BY created_at DESC, id DESC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Coupon>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update capacity and/or activation. Only non-`None` fields are applied.
    ///
    /// Takes the same row lock as a claim so the capacity check sees the
    /// latest `consumed_count`.
    pub async fn update(
        pool: &PgPool,
        name: &str,
        input: &UpdateCoupon,
    ) -> Result<UpdateOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(current) = Self::find_by_name_for_update(&mut tx, name).await? else {
            tx.rollback().await?;
            return Ok(UpdateOutcome::NotFound);
        };

        if let Some(capacity) = input.capacity {
            if let Err(e) = validate_capacity_change(capacity, current.consumed_count) {
                tx.rollback().await?;
                return Ok(UpdateOutcome::Invalid(e));
            }
        }

        let query = format!(
            "UPDATE coupons SET \
                capacity = COALESCE($2, capacity), \
                is_active = COALESCE($3, is_active) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let coupon = sqlx::query_as::<_, Coupon>(&query)
            .bind(current.id)
            .bind(input.capacity)
            .bind(input.is_active)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(UpdateOutcome::Updated(coupon))
    }

    /// Delete a coupon and, by cascade, its claims.
    pub async fn delete(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM coupons WHERE name = $1")
            .bind(name)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
