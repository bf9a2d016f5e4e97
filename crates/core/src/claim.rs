//! Claim rejection reasons and their fixed classification.
//!
//! Every business rejection the allocation engine can produce is a variant of
//! [`ClaimRejection`]. The HTTP layer never inspects messages; it maps the
//! [`ErrorClass`] returned by [`ClaimRejection::class`] to a status code.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Error classes
// ---------------------------------------------------------------------------

/// Caller-facing classification of a claim result that is not an admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// The referenced entity does not exist.
    NotFound,
    /// A business rule rejected the request (inactive, exhausted).
    PreconditionFailed,
    /// The request collides with existing state (duplicate claim).
    Conflict,
    /// Infrastructure failure. Never produced by a [`ClaimRejection`].
    Internal,
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

/// Why a claim was not admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimRejection {
    CouponNotFound,
    CouponInactive,
    CapacityExhausted,
    AlreadyClaimed,
}

impl ClaimRejection {
    /// All rejection reasons, in table order.
    pub const ALL: [ClaimRejection; 4] = [
        ClaimRejection::CouponNotFound,
        ClaimRejection::CouponInactive,
        ClaimRejection::CapacityExhausted,
        ClaimRejection::AlreadyClaimed,
    ];

    /// Classification table.
    ///
    /// | Reason            | Class              |
    /// |-------------------|--------------------|
    /// | CouponNotFound    | NotFound           |
    /// | CouponInactive    | PreconditionFailed |
    /// | CapacityExhausted | PreconditionFailed |
    /// | AlreadyClaimed    | Conflict           |
    pub const fn class(self) -> ErrorClass {
        match self {
            ClaimRejection::CouponNotFound => ErrorClass::NotFound,
            ClaimRejection::CouponInactive => ErrorClass::PreconditionFailed,
            ClaimRejection::CapacityExhausted => ErrorClass::PreconditionFailed,
            ClaimRejection::AlreadyClaimed => ErrorClass::Conflict,
        }
    }

    /// Human-readable message returned to API callers.
    pub const fn message(self) -> &'static str {
        match self {
            ClaimRejection::CouponNotFound => "coupon not found",
            ClaimRejection::CouponInactive => "coupon is not active",
            ClaimRejection::CapacityExhausted => "coupon has no remaining amount",
            ClaimRejection::AlreadyClaimed => "user has already claimed this coupon",
        }
    }
}

impl std::fmt::Display for ClaimRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
