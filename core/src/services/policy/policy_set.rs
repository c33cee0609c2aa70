//! Ordered collection of generation policies

use otp_shared::config::OtpConfig;

use crate::domain::entities::{OtpReason, StoreKey};
use crate::errors::PolicyViolation;
use crate::services::store::OtpStore;

use super::{GenerationPolicy, MaxFailedAttemptsPolicy, PreventDuplicateOtpPolicy};

/// Policies evaluated in insertion order, stopping at the first violation
#[derive(Default)]
pub struct PolicySet {
    policies: Vec<Box<dyn GenerationPolicy>>,
}

impl PolicySet {
    pub fn new(policies: Vec<Box<dyn GenerationPolicy>>) -> Self {
        Self { policies }
    }

    /// Build the standard policy set described by the configuration
    ///
    /// Duplicate prevention runs first, then the failed-attempts lockout.
    pub fn from_config(config: &OtpConfig) -> Self {
        let mut set = Self::default();
        if config.prevent_duplicates {
            set.push(PreventDuplicateOtpPolicy::new());
        }
        if let Some(max_attempts) = config.max_failed_attempts {
            set.push(MaxFailedAttemptsPolicy::new(max_attempts));
        }
        set
    }

    /// Append a policy to the end of the evaluation order
    pub fn push<P: GenerationPolicy + 'static>(&mut self, policy: P) {
        self.policies.push(Box::new(policy));
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Names of the policies in evaluation order
    pub fn names(&self) -> Vec<&'static str> {
        self.policies.iter().map(|policy| policy.name()).collect()
    }

    /// Run every policy, returning the first violation
    pub fn check_all(
        &self,
        key: &str,
        reason: Option<OtpReason>,
        store: &dyn OtpStore,
    ) -> Result<(), PolicyViolation> {
        for policy in &self.policies {
            if let Err(violation) = policy.check(key, reason, store) {
                tracing::warn!(
                    key = %StoreKey::new(key, reason).masked(),
                    policy = policy.name(),
                    code = violation.code(),
                    event = "policy_violation",
                    "OTP generation refused by policy"
                );
                return Err(violation);
            }
        }
        Ok(())
    }
}

impl From<Vec<Box<dyn GenerationPolicy>>> for PolicySet {
    fn from(policies: Vec<Box<dyn GenerationPolicy>>) -> Self {
        Self::new(policies)
    }
}

impl std::fmt::Debug for PolicySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicySet")
            .field("policies", &self.names())
            .finish()
    }
}
