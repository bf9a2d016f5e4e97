//! Integration tests for the coupon and claim stores.
//!
//! Exercises the repository layer against a real database:
//! - Coupon create / find / list / update / delete
//! - Unique name constraint
//! - Conditional increment stopping at capacity
//! - Claim insert, existence check and claimant ordering

use assert_matches::assert_matches;
use coupon_core::error::CoreError;
use coupon_db::models::coupon::{CreateCoupon, UpdateCoupon};
use coupon_db::repositories::{CouponClaimRepo, CouponRepo, UpdateOutcome};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_coupon(name: &str, capacity: i32) -> CreateCoupon {
    CreateCoupon {
        name: name.to_string(),
        capacity,
    }
}

// ---------------------------------------------------------------------------
// Test: create initializes counters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_coupon_defaults(pool: PgPool) {
    let coupon = CouponRepo::create(&pool, &new_coupon("SAVE10", 5)).await.unwrap();

    assert_eq!(coupon.name, "SAVE10");
    assert_eq!(coupon.capacity, 5);
    assert_eq!(coupon.consumed_count, 0);
    assert!(coupon.is_active);
    assert_eq!(coupon.remaining(), 5);

    let found = CouponRepo::find_by_name(&pool, "SAVE10").await.unwrap().unwrap();
    assert_eq!(found.id, coupon.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_missing_coupon_returns_none(pool: PgPool) {
    let found = CouponRepo::find_by_name(&pool, "NOPE").await.unwrap();
    assert!(found.is_none());
}

// ---------------------------------------------------------------------------
// Test: duplicate names violate uq_coupons_name
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_name_rejected(pool: PgPool) {
    CouponRepo::create(&pool, &new_coupon("SAVE10", 1)).await.unwrap();
    let err = CouponRepo::create(&pool, &new_coupon("SAVE10", 3)).await.unwrap_err();

    let db_err = err.as_database_error().expect("should be a database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_coupons_name"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_zero_capacity_violates_check(pool: PgPool) {
    let err = CouponRepo::create(&pool, &new_coupon("EMPTY", 0)).await.unwrap_err();
    let db_err = err.as_database_error().expect("should be a database error");
    assert_eq!(db_err.code().as_deref(), Some("23514"));
}

// ---------------------------------------------------------------------------
// Test: conditional increment
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_increment_consumed_stops_at_capacity(pool: PgPool) {
    let coupon = CouponRepo::create(&pool, &new_coupon("TWICE", 2)).await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    assert!(CouponRepo::increment_consumed(&mut tx, coupon.id).await.unwrap());
    assert!(CouponRepo::increment_consumed(&mut tx, coupon.id).await.unwrap());
    assert!(!CouponRepo::increment_consumed(&mut tx, coupon.id).await.unwrap());
    tx.commit().await.unwrap();

    let after = CouponRepo::find_by_name(&pool, "TWICE").await.unwrap().unwrap();
    assert_eq!(after.consumed_count, 2);
    assert!(!after.has_capacity());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_increment_rolled_back_with_transaction(pool: PgPool) {
    let coupon = CouponRepo::create(&pool, &new_coupon("ROLLBACK", 3)).await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    assert!(CouponRepo::increment_consumed(&mut tx, coupon.id).await.unwrap());
    tx.rollback().await.unwrap();

    let after = CouponRepo::find_by_name(&pool, "ROLLBACK").await.unwrap().unwrap();
    assert_eq!(after.consumed_count, 0);
}

// ---------------------------------------------------------------------------
// Test: list ordering and paging
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_newest_first(pool: PgPool) {
    for name in ["FIRST", "SECOND", "THIRD"] {
        CouponRepo::create(&pool, &new_coupon(name, 1)).await.unwrap();
    }

    let all = CouponRepo::list(&pool, 10, 0).await.unwrap();
    let names: Vec<_> = all.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["THIRD", "SECOND", "FIRST"]);

    let page = CouponRepo::list(&pool, 1, 1).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].name, "SECOND");
}

// ---------------------------------------------------------------------------
// Test: administrative update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_capacity_and_activation(pool: PgPool) {
    CouponRepo::create(&pool, &new_coupon("EDIT", 2)).await.unwrap();

    let outcome = CouponRepo::update(
        &pool,
        "EDIT",
        &UpdateCoupon {
            capacity: Some(7),
            is_active: Some(false),
        },
    )
    .await
    .unwrap();

    let coupon = assert_matches!(outcome, UpdateOutcome::Updated(c) => c);
    assert_eq!(coupon.capacity, 7);
    assert!(!coupon.is_active);
    assert_eq!(coupon.consumed_count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_capacity_below_consumed_rejected(pool: PgPool) {
    let coupon = CouponRepo::create(&pool, &new_coupon("SHRINK", 3)).await.unwrap();
    let mut tx = pool.begin().await.unwrap();
    CouponRepo::increment_consumed(&mut tx, coupon.id).await.unwrap();
    CouponRepo::increment_consumed(&mut tx, coupon.id).await.unwrap();
    tx.commit().await.unwrap();

    let outcome = CouponRepo::update(
        &pool,
        "SHRINK",
        &UpdateCoupon {
            capacity: Some(1),
            is_active: None,
        },
    )
    .await
    .unwrap();
    assert_matches!(outcome, UpdateOutcome::Invalid(CoreError::Validation(_)));

    let after = CouponRepo::find_by_name(&pool, "SHRINK").await.unwrap().unwrap();
    assert_eq!(after.capacity, 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_coupon(pool: PgPool) {
    let outcome = CouponRepo::update(&pool, "GHOST", &UpdateCoupon::default())
        .await
        .unwrap();
    assert_matches!(outcome, UpdateOutcome::NotFound);
}

// ---------------------------------------------------------------------------
// Test: delete cascades to claims
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_cascades_claims(pool: PgPool) {
    let coupon = CouponRepo::create(&pool, &new_coupon("GONE", 2)).await.unwrap();
    let mut tx = pool.begin().await.unwrap();
    CouponClaimRepo::insert(&mut tx, coupon.id, "alice").await.unwrap();
    tx.commit().await.unwrap();

    assert!(CouponRepo::delete(&pool, "GONE").await.unwrap());
    assert!(!CouponRepo::delete(&pool, "GONE").await.unwrap());
    assert_eq!(CouponClaimRepo::count_for_coupon(&pool, coupon.id).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Test: claim store
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_claim_unique_per_user_and_coupon(pool: PgPool) {
    let coupon = CouponRepo::create(&pool, &new_coupon("ONCE", 5)).await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    CouponClaimRepo::insert(&mut tx, coupon.id, "alice").await.unwrap();
    tx.commit().await.unwrap();

    assert!(CouponClaimRepo::exists(&pool, coupon.id, "alice").await.unwrap());
    assert!(!CouponClaimRepo::exists(&pool, coupon.id, "bob").await.unwrap());

    let mut tx = pool.begin().await.unwrap();
    let err = CouponClaimRepo::insert(&mut tx, coupon.id, "alice").await.unwrap_err();
    let db_err = err.as_database_error().expect("should be a database error");
    assert_eq!(db_err.constraint(), Some("uq_coupon_claims_user_coupon"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_same_user_may_claim_different_coupons(pool: PgPool) {
    let a = CouponRepo::create(&pool, &new_coupon("COUPON_A", 1)).await.unwrap();
    let b = CouponRepo::create(&pool, &new_coupon("COUPON_B", 1)).await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    CouponClaimRepo::insert(&mut tx, a.id, "alice").await.unwrap();
    CouponClaimRepo::insert(&mut tx, b.id, "alice").await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(CouponClaimRepo::count_for_coupon(&pool, a.id).await.unwrap(), 1);
    assert_eq!(CouponClaimRepo::count_for_coupon(&pool, b.id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_claimants_in_claim_order(pool: PgPool) {
    let coupon = CouponRepo::create(&pool, &new_coupon("ORDERED", 5)).await.unwrap();

    for user in ["carol", "alice", "bob"] {
        let mut tx = pool.begin().await.unwrap();
        CouponClaimRepo::insert(&mut tx, coupon.id, user).await.unwrap();
        tx.commit().await.unwrap();
    }

    let claimants = CouponClaimRepo::list_claimants(&pool, coupon.id).await.unwrap();
    assert_eq!(claimants, ["carol", "alice", "bob"]);

    let rows = CouponClaimRepo::list_for_coupon(&pool, coupon.id).await.unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.coupon_id == coupon.id));
}
