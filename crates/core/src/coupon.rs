//! Coupon input rules and capacity arithmetic.
//!
//! Constants here back both the `validator` attributes on the request DTOs
//! and the precondition checks the allocation engine runs before it opens a
//! transaction.

use validator::ValidationError;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Minimum coupon name length in characters.
pub const MIN_NAME_LEN: u64 = 3;

/// Maximum coupon name length in characters (matches `VARCHAR(50)`).
pub const MAX_NAME_LEN: u64 = 50;

/// Maximum user identifier length in characters (matches `VARCHAR(100)`).
pub const MAX_USER_ID_LEN: u64 = 100;

/// Smallest capacity a coupon may be created or updated with.
pub const MIN_CAPACITY: i32 = 1;

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Validate the `(user_id, coupon_name)` pair handed to the allocation engine.
///
/// Both must be non-empty after trimming and free of NUL bytes, and `user_id`
/// must fit [`MAX_USER_ID_LEN`]. Coupon names are not length-checked here: a
/// name longer than [`MAX_NAME_LEN`] cannot exist and resolves to not-found.
pub fn validate_claim_input(user_id: &str, coupon_name: &str) -> Result<(), CoreError> {
    if user_id.trim().is_empty() {
        return Err(CoreError::Validation("user_id must not be empty".to_string()));
    }
    if user_id.chars().count() as u64 > MAX_USER_ID_LEN {
        return Err(CoreError::Validation(format!(
            "user_id must be at most {MAX_USER_ID_LEN} characters"
        )));
    }
    if user_id.contains('\0') {
        return Err(CoreError::Validation("user_id must not contain NUL bytes".to_string()));
    }
    if coupon_name.trim().is_empty() {
        return Err(CoreError::Validation("name must not be empty".to_string()));
    }
    if coupon_name.contains('\0') {
        return Err(CoreError::Validation("name must not contain NUL bytes".to_string()));
    }
    Ok(())
}

/// `validator` rule for text columns: PostgreSQL cannot store `\0`.
pub fn validate_no_nul(value: &str) -> Result<(), ValidationError> {
    if value.contains('\0') {
        let mut err = ValidationError::new("nul_byte");
        err.message = Some("must not contain NUL bytes".into());
        return Err(err);
    }
    Ok(())
}

/// Whether `name` could be stored as a coupon name at all.
///
/// Lookups by a name that fails this check are answered as not-found
/// without touching the store.
pub fn is_storable_name(name: &str) -> bool {
    !name.contains('\0')
}

/// Validate a capacity change against the number of claims already admitted.
///
/// Capacity can never drop below [`MIN_CAPACITY`] or below `consumed`.
pub fn validate_capacity_change(new_capacity: i32, consumed: i32) -> Result<(), CoreError> {
    if new_capacity < MIN_CAPACITY {
        return Err(CoreError::Validation(format!(
            "capacity must be >= {MIN_CAPACITY}, got {new_capacity}"
        )));
    }
    if new_capacity < consumed {
        return Err(CoreError::Validation(format!(
            "capacity {new_capacity} is below the {consumed} claims already admitted"
        )));
    }
    Ok(())
}

/// Remaining claimable units. Never negative.
pub fn remaining(capacity: i32, consumed: i32) -> i32 {
    (capacity - consumed).max(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
