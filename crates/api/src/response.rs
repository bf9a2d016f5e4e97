//! Shared response envelope types for API handlers.
//!
//! Collection and admin endpoints use a `{ "data": ... }` envelope. The claim
//! and detail endpoints return bare objects to keep their wire format stable.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
