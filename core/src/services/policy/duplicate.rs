//! Policy refusing to replace a still-valid OTP

use chrono::Utc;

use crate::domain::entities::OtpReason;
use crate::errors::PolicyViolation;
use crate::services::store::OtpStore;

use super::traits::GenerationPolicy;

/// Blocks issuance while an active OTP exists for the same key and reason
///
/// Keeps a user's outstanding code from being silently overwritten.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreventDuplicateOtpPolicy;

impl PreventDuplicateOtpPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl GenerationPolicy for PreventDuplicateOtpPolicy {
    fn name(&self) -> &'static str {
        "prevent_duplicate_otp"
    }

    fn check(
        &self,
        key: &str,
        reason: Option<OtpReason>,
        store: &dyn OtpStore,
    ) -> Result<(), PolicyViolation> {
        match store.get_otp_entry(key, reason) {
            Some(entry) if entry.expires_at > Utc::now() => Err(PolicyViolation::DuplicateActiveOtp),
            _ => Ok(()),
        }
    }
}
