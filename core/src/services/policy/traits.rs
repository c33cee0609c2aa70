//! Trait for pluggable generation policies

use crate::domain::entities::OtpReason;
use crate::errors::PolicyViolation;
use crate::services::store::OtpStore;

/// A guard that can block OTP generation based on store state
pub trait GenerationPolicy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Pass silently or return the violation that blocks issuance
    fn check(
        &self,
        key: &str,
        reason: Option<OtpReason>,
        store: &dyn OtpStore,
    ) -> Result<(), PolicyViolation>;
}
