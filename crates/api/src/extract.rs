//! Request body extractor that deserializes and validates in one step.

use axum::extract::{FromRequest, Request};
use axum::Json;
use coupon_core::error::CoreError;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that has passed its `validator` rules.
///
/// Malformed JSON, missing fields and wrong types become `400 BAD_REQUEST`;
/// rule violations become `400 VALIDATION_ERROR`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        value.validate().map_err(CoreError::from)?;
        Ok(ValidatedJson(value))
    }
}
