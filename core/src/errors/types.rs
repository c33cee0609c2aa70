//! Policy violation types raised during OTP issuance

use thiserror::Error;

/// Reasons a generation policy can refuse to issue an OTP
///
/// A violation is raised before any generator or distributor side effect, so
/// callers can treat the issuance as fully rolled back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("An active OTP already exists for this key and reason")]
    DuplicateActiveOtp,

    #[error("Maximum failed OTP attempts exceeded ({attempts}/{max_attempts})")]
    MaxFailedAttemptsExceeded { attempts: u32, max_attempts: u32 },

    #[error("Policy {policy} rejected issuance: {message}")]
    Custom { policy: String, message: String },
}

impl PolicyViolation {
    /// Stable error code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            PolicyViolation::DuplicateActiveOtp => "DUPLICATE_ACTIVE_OTP",
            PolicyViolation::MaxFailedAttemptsExceeded { .. } => "MAX_FAILED_ATTEMPTS_EXCEEDED",
            PolicyViolation::Custom { .. } => "POLICY_VIOLATION",
        }
    }
}
