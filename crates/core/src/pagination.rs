//! Pagination defaults and clamping helpers for list endpoints.
//!
//! Out-of-range values are normalized, never rejected.

/// Default page size for coupon listings.
pub const DEFAULT_LIST_LIMIT: i64 = 10;

/// Maximum page size for coupon listings.
pub const MAX_LIST_LIMIT: i64 = 100;

/// Clamp a user-provided limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    match limit {
        Some(l) if l > 0 => l.min(max),
        _ => default,
    }
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
