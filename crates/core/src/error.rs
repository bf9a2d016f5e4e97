use crate::claim::{ClaimRejection, ErrorClass};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} '{key}'")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a missing coupon, looked up by name.
    pub fn coupon_not_found(name: &str) -> Self {
        CoreError::NotFound {
            entity: "Coupon",
            key: name.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::Validation(errors.to_string())
    }
}

/// Map a claim rejection onto the error taxonomy through its fixed
/// classification. The coupon name is only used for the not-found message.
///
/// No rejection is currently classified `Internal`; that arm only keeps the
/// match exhaustive over [`ErrorClass`].
pub fn rejection_to_core_error(rejection: ClaimRejection, coupon_name: &str) -> CoreError {
    match rejection.class() {
        ErrorClass::NotFound => CoreError::coupon_not_found(coupon_name),
        ErrorClass::PreconditionFailed => {
            CoreError::PreconditionFailed(rejection.message().to_string())
        }
        ErrorClass::Conflict => CoreError::Conflict(rejection.message().to_string()),
        ErrorClass::Internal => CoreError::Internal(rejection.message().to_string()),
    }
}
