//! Repository for the `coupon_claims` table.

use coupon_core::types::DbId;
use sqlx::{PgExecutor, Postgres, Transaction};

use crate::models::coupon_claim::CouponClaim;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, coupon_id, created_at, updated_at";

/// Name of the composite unique constraint on `(user_id, coupon_id)`.
pub const UNIQUE_USER_COUPON: &str = "uq_coupon_claims_user_coupon";

/// Provides storage operations for coupon claims.
pub struct CouponClaimRepo;

impl CouponClaimRepo {
    /// Insert a claim row inside the caller's transaction.
    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        coupon_id: DbId,
        user_id: &str,
    ) -> Result<CouponClaim, sqlx::Error> {
        let query = format!(
            "INSERT INTO coupon_claims (user_id, coupon_id) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CouponClaim>(&query)
            .bind(user_id)
            .bind(coupon_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Whether `user_id` already holds a claim on `coupon_id`.
    pub async fn exists<'e, E>(executor: E, coupon_id: DbId, user_id: &str) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM coupon_claims WHERE coupon_id = $1 AND user_id = $2)",
        )
        .bind(coupon_id)
        .bind(user_id)
        .fetch_one(executor)
        .await?;
        Ok(exists)
    }

    /// User ids that claimed `coupon_id`, in claim order.
    ///
    /// Claim ids are drawn while the coupon row is locked, so id order is
    /// admission order.
    pub async fn list_claimants<'e, E>(executor: E, coupon_id: DbId) -> Result<Vec<String>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT user_id FROM coupon_claims WHERE coupon_id = $1 ORDER BY id")
                .bind(coupon_id)
                .fetch_all(executor)
                .await?;
        Ok(rows.into_iter().map(|(user_id,)| user_id).collect())
    }

    /// All claim rows for a coupon, in claim order.
    pub async fn list_for_coupon<'e, E>(
        executor: E,
        coupon_id: DbId,
    ) -> Result<Vec<CouponClaim>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM coupon_claims WHERE coupon_id = $1 ORDER BY id");
        sqlx::query_as::<_, CouponClaim>(&query)
            .bind(coupon_id)
            .fetch_all(executor)
            .await
    }

    /// Number of claim rows for a coupon. Matches `consumed_count` when the
    /// counter and the audit trail agree.
    pub async fn count_for_coupon<'e, E>(executor: E, coupon_id: DbId) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM coupon_claims WHERE coupon_id = $1")
                .bind(coupon_id)
                .fetch_one(executor)
                .await?;
        Ok(count)
    }
}
