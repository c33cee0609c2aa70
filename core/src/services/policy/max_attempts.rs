//! Lockout policy based on failed verification attempts

use crate::domain::entities::OtpReason;
use crate::errors::PolicyViolation;
use crate::services::store::OtpStore;

use super::traits::GenerationPolicy;

/// Blocks issuance once the current entry has too many failed verifications
///
/// This is a lockout check, not an activity check: the entry's expiry is not
/// consulted here, only whatever the store still returns for the key.
#[derive(Debug, Clone, Copy)]
pub struct MaxFailedAttemptsPolicy {
    max_attempts: u32,
}

impl MaxFailedAttemptsPolicy {
    /// Create a policy that locks out at `max_attempts` failed verifications
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    /// Configured lockout threshold
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl GenerationPolicy for MaxFailedAttemptsPolicy {
    fn name(&self) -> &'static str {
        "max_failed_attempts"
    }

    fn check(
        &self,
        key: &str,
        reason: Option<OtpReason>,
        store: &dyn OtpStore,
    ) -> Result<(), PolicyViolation> {
        match store.get_otp_entry(key, reason) {
            Some(entry) if entry.failed_attempts >= self.max_attempts => {
                Err(PolicyViolation::MaxFailedAttemptsExceeded {
                    attempts: entry.failed_attempts,
                    max_attempts: self.max_attempts,
                })
            }
            _ => Ok(()),
        }
    }
}
