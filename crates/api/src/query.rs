//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Kept as raw strings so malformed values fall back to the defaults instead
/// of failing extraction; `CouponQuery::list` clamps whatever parses.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl PaginationParams {
    pub fn limit(&self) -> Option<i64> {
        parse_lenient(self.limit.as_deref())
    }

    pub fn offset(&self) -> Option<i64> {
        parse_lenient(self.offset.as_deref())
    }
}

fn parse_lenient(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse().ok())
}
