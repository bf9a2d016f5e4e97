//! Handlers for the `/coupons` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use coupon_core::coupon::is_storable_name;
use coupon_core::error::{rejection_to_core_error, CoreError};
use coupon_db::engine::ClaimOutcome;
use coupon_db::models::coupon::{Coupon, CouponDetails, CreateCoupon, UpdateCoupon};
use coupon_db::models::coupon_claim::{ClaimCoupon, CouponClaim};
use coupon_db::query::CouponQuery;
use coupon_db::repositories::{CouponRepo, UpdateOutcome};

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A path name no coupon can carry (e.g. a decoded `%00`) is simply unknown.
fn ensure_storable_name(name: &str) -> AppResult<()> {
    if is_storable_name(name) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::coupon_not_found(name)))
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/coupons
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateCoupon>,
) -> AppResult<(StatusCode, Json<Coupon>)> {
    let coupon = CouponRepo::create(&state.pool, &input).await?;
    tracing::info!(coupon_id = coupon.id, coupon_name = %coupon.name, capacity = coupon.capacity, "Coupon created");
    Ok((StatusCode::CREATED, Json(coupon)))
}

/// POST /api/coupons/claim
///
/// Business rejections are mapped through the claim classification table:
/// not found → 404, inactive/exhausted → 400, duplicate → 409.
pub async fn claim(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<ClaimCoupon>,
) -> AppResult<(StatusCode, Json<CouponClaim>)> {
    match state.claim_engine.claim(&input.user_id, &input.name).await? {
        ClaimOutcome::Admitted(claim) => Ok((StatusCode::CREATED, Json(claim))),
        ClaimOutcome::Rejected(reason) => {
            Err(AppError::Core(rejection_to_core_error(reason, &input.name)))
        }
    }
}

/// GET /api/coupons/{name}
pub async fn get_details(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<CouponDetails>> {
    ensure_storable_name(&name)?;
    let details = CouponQuery::details(&state.pool, &name)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::coupon_not_found(&name)))?;
    Ok(Json(details))
}

/// GET /api/coupons?limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Coupon>>>> {
    let coupons = CouponQuery::list(&state.pool, params.limit(), params.offset()).await?;
    Ok(Json(DataResponse { data: coupons }))
}

/// PUT /api/coupons/{name}
///
/// Edit capacity and/or activation. Capacity may not drop below the number
/// of claims already admitted.
pub async fn update(
    State(state): State<AppState>,
    Path(name): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateCoupon>,
) -> AppResult<Json<DataResponse<Coupon>>> {
    ensure_storable_name(&name)?;
    match CouponRepo::update(&state.pool, &name, &input).await? {
        UpdateOutcome::Updated(coupon) => {
            tracing::info!(
                coupon_id = coupon.id,
                coupon_name = %coupon.name,
                capacity = coupon.capacity,
                is_active = coupon.is_active,
                "Coupon updated",
            );
            Ok(Json(DataResponse { data: coupon }))
        }
        UpdateOutcome::NotFound => Err(AppError::Core(CoreError::coupon_not_found(&name))),
        UpdateOutcome::Invalid(err) => Err(AppError::Core(err)),
    }
}

/// DELETE /api/coupons/{name}
pub async fn delete(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<StatusCode> {
    ensure_storable_name(&name)?;
    if CouponRepo::delete(&state.pool, &name).await? {
        tracing::info!(coupon_name = %name, "Coupon deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::coupon_not_found(&name)))
    }
}
