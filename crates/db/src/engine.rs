//! Coupon claim allocation engine.
//!
//! [`ClaimEngine::claim`] admits or rejects a single claim. Every call runs in
//! its own transaction that starts by locking the coupon row
//! (`SELECT ... FOR UPDATE`), so claims on the same coupon are serialized by
//! PostgreSQL while claims on different coupons never contend. Nothing is
//! cached between calls; each decision re-reads the locked row.

use std::time::Duration;

use coupon_core::claim::ClaimRejection;
use coupon_core::coupon::validate_claim_input;
use coupon_core::error::CoreError;
use sqlx::PgPool;

use crate::models::coupon_claim::CouponClaim;
use crate::repositories::coupon_claim_repo::UNIQUE_USER_COUPON;
use crate::repositories::{CouponClaimRepo, CouponRepo};

/// Default deadline for one claim unit of work.
pub const DEFAULT_CLAIM_TIMEOUT: Duration = Duration::from_secs(5);

/// PostgreSQL `unique_violation`.
const SQLSTATE_UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL `lock_not_available`, raised when `lock_timeout` expires.
const SQLSTATE_LOCK_NOT_AVAILABLE: &str = "55P03";
/// PostgreSQL `query_canceled`, raised when `statement_timeout` expires.
const SQLSTATE_QUERY_CANCELED: &str = "57014";

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Business result of a claim attempt.
#[derive(Debug)]
pub enum ClaimOutcome {
    /// The claim row is committed and one capacity unit is consumed.
    Admitted(CouponClaim),
    /// Nothing was written.
    Rejected(ClaimRejection),
}

impl ClaimOutcome {
    pub fn is_admitted(&self) -> bool {
        matches!(self, ClaimOutcome::Admitted(_))
    }

    pub fn rejection(&self) -> Option<ClaimRejection> {
        match self {
            ClaimOutcome::Admitted(_) => None,
            ClaimOutcome::Rejected(reason) => Some(*reason),
        }
    }
}

/// Claim attempt that did not reach a business decision.
#[derive(Debug, thiserror::Error)]
pub enum ClaimError {
    /// The request failed its preconditions before any store access.
    #[error(transparent)]
    InvalidInput(#[from] CoreError),

    /// The store failed; the transaction was rolled back.
    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),

    /// The unit of work exceeded its deadline and was rolled back.
    #[error("Claim did not complete within {0:?}")]
    Timeout(Duration),
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Transactional claim protocol over the coupon and claim stores.
///
/// Cheap to clone; holds only the pool handle and timing settings.
#[derive(Debug, Clone)]
pub struct ClaimEngine {
    pool: PgPool,
    deadline: Option<Duration>,
}

impl ClaimEngine {
    /// Create an engine with the [`DEFAULT_CLAIM_TIMEOUT`] deadline.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            deadline: Some(DEFAULT_CLAIM_TIMEOUT),
        }
    }

    /// Replace the per-claim deadline. `None` waits indefinitely.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Admit or reject `user_id`'s claim on the coupon named `coupon_name`.
    ///
    /// Business rejections come back as `Ok(ClaimOutcome::Rejected(_))`.
    /// `Err` means nothing was decided and nothing was written; retrying is
    /// safe because a repeat after an admission yields `AlreadyClaimed`.
    pub async fn claim(&self, user_id: &str, coupon_name: &str) -> Result<ClaimOutcome, ClaimError> {
        validate_claim_input(user_id, coupon_name)?;

        let work = self.claim_locked(user_id, coupon_name);
        let result = match self.deadline {
            // Dropping the in-flight transaction on expiry rolls it back.
            Some(deadline) => match tokio::time::timeout(deadline, work).await {
                Ok(result) => result,
                Err(_) => Err(ClaimError::Timeout(deadline)),
            },
            None => work.await,
        };

        match &result {
            Ok(ClaimOutcome::Admitted(claim)) => {
                tracing::info!(
                    coupon_name,
                    user_id,
                    coupon_id = claim.coupon_id,
                    claim_id = claim.id,
                    "Claim admitted",
                );
            }
            Ok(ClaimOutcome::Rejected(reason)) => {
                tracing::debug!(coupon_name, user_id, reason = ?reason, "Claim rejected");
            }
            Err(ClaimError::InvalidInput(_)) => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    coupon_name,
                    user_id,
                    operation = "claim",
                    "Claim failed",
                );
            }
        }

        result
    }

    /// The locked unit of work. Every rejection path rolls back explicitly.
    async fn claim_locked(&self, user_id: &str, coupon_name: &str) -> Result<ClaimOutcome, ClaimError> {
        let mut tx = self.pool.begin().await?;

        if let Some(deadline) = self.deadline {
            // Bound the wait for the row lock as well, so an expired claim
            // does not leave a backend queued behind the lock holder.
            let set_timeout = format!("SET LOCAL lock_timeout = {}", deadline.as_millis().max(1));
            sqlx::query(&set_timeout)
                .execute(&mut *tx)
                .await
                .map_err(|e| self.classify_store_error(e))?;
        }

        let coupon = match CouponRepo::find_by_name_for_update(&mut tx, coupon_name).await {
            Ok(Some(coupon)) => coupon,
            Ok(None) => {
                tx.rollback().await?;
                return Ok(ClaimOutcome::Rejected(ClaimRejection::CouponNotFound));
            }
            Err(e) => return Err(self.classify_store_error(e)),
        };

        if !coupon.is_active {
            tx.rollback().await?;
            return Ok(ClaimOutcome::Rejected(ClaimRejection::CouponInactive));
        }

        if CouponClaimRepo::exists(&mut *tx, coupon.id, user_id).await? {
            tx.rollback().await?;
            return Ok(ClaimOutcome::Rejected(ClaimRejection::AlreadyClaimed));
        }

        if !coupon.has_capacity() {
            tx.rollback().await?;
            return Ok(ClaimOutcome::Rejected(ClaimRejection::CapacityExhausted));
        }

        let claim = match CouponClaimRepo::insert(&mut tx, coupon.id, user_id).await {
            Ok(claim) => claim,
            Err(e) if is_duplicate_claim(&e) => {
                tx.rollback().await?;
                return Ok(ClaimOutcome::Rejected(ClaimRejection::AlreadyClaimed));
            }
            Err(e) => return Err(e.into()),
        };

        if !CouponRepo::increment_consumed(&mut tx, coupon.id).await? {
            tx.rollback().await?;
            return Ok(ClaimOutcome::Rejected(ClaimRejection::CapacityExhausted));
        }

        tx.commit().await?;
        Ok(ClaimOutcome::Admitted(claim))
    }

    /// Report lock and statement timeouts as [`ClaimError::Timeout`].
    fn classify_store_error(&self, err: sqlx::Error) -> ClaimError {
        if let sqlx::Error::Database(db_err) = &err {
            let code = db_err.code();
            if matches!(
                code.as_deref(),
                Some(SQLSTATE_LOCK_NOT_AVAILABLE) | Some(SQLSTATE_QUERY_CANCELED)
            ) {
                return ClaimError::Timeout(self.deadline.unwrap_or_default());
            }
        }
        ClaimError::Store(err)
    }
}

/// Whether `err` is the structural duplicate-claim guard firing.
fn is_duplicate_claim(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(SQLSTATE_UNIQUE_VIOLATION)
                && db_err.constraint() == Some(UNIQUE_USER_COUPON)
        }
        _ => false,
    }
}
