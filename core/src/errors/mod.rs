//! Domain-specific error types and error handling.

mod types;

// Re-export all error types
pub use types::PolicyViolation;

use thiserror::Error;

/// Core domain errors
///
/// Verification outcomes are never errors: a wrong or missing code is a plain
/// `false`. Errors are reserved for issuance that could not go ahead.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("OTP generation failed: {message}")]
    Generation { message: String },

    #[error("OTP distribution failed: {message}")]
    Distribution { message: String },

    // Bridge to policy violations raised before issuance
    #[error(transparent)]
    Policy(#[from] PolicyViolation),
}

impl DomainError {
    /// Stable error code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => "VALIDATION_ERROR",
            DomainError::Configuration { .. } => "CONFIGURATION_ERROR",
            DomainError::Generation { .. } => "GENERATION_FAILED",
            DomainError::Distribution { .. } => "DISTRIBUTION_FAILED",
            DomainError::Policy(violation) => violation.code(),
        }
    }

    /// Whether issuance was refused by a generation policy
    pub fn is_policy_violation(&self) -> bool {
        matches!(self, DomainError::Policy(_))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
