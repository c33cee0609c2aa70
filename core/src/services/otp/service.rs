//! Main OTP service implementation

use chrono::{Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use otp_shared::config::OtpConfig;

use crate::domain::entities::{OtpEntry, OtpReason, StoreKey};
use crate::errors::{DomainError, DomainResult};
use crate::services::distributor::OtpDistributor;
use crate::services::generator::{OtpGenerator, SecureOtpGenerator};
use crate::services::policy::PolicySet;
use crate::services::store::OtpStore;

use super::config::OtpServiceConfig;
use super::types::IssuedOtp;

/// OTP service sequencing policies, generation, storage and delivery
pub struct OtpService<S: OtpStore> {
    /// Generator for raw OTP values
    generator: Arc<dyn OtpGenerator>,
    /// Store holding hashed OTPs
    store: Arc<S>,
    /// Pre-issuance policies, in evaluation order
    policies: PolicySet,
    /// Issuance defaults
    config: OtpServiceConfig,
    /// Locks serializing policy checks and storage per composite key
    issuance_locks: DashMap<StoreKey, Arc<Mutex<()>>>,
}

impl<S: OtpStore> OtpService<S> {
    /// Create a service with the secure generator and no policies
    pub fn new(store: Arc<S>) -> Self {
        Self::with_policies(store, PolicySet::default())
    }

    /// Create a service with the secure generator and the given policies
    pub fn with_policies(store: Arc<S>, policies: PolicySet) -> Self {
        Self::with_generator(Arc::new(SecureOtpGenerator), store, policies)
    }

    /// Create a service from all of its collaborators
    ///
    /// # Arguments
    ///
    /// * `generator` - Source of raw OTP values
    /// * `store` - Store implementation
    /// * `policies` - Policies checked before every issuance
    pub fn with_generator(
        generator: Arc<dyn OtpGenerator>,
        store: Arc<S>,
        policies: PolicySet,
    ) -> Self {
        Self {
            generator,
            store,
            policies,
            config: OtpServiceConfig::default(),
            issuance_locks: DashMap::new(),
        }
    }

    /// Create a service from application configuration
    ///
    /// Invalid configuration is rejected here, at construction, rather than on
    /// the first issuance.
    pub fn from_config(store: Arc<S>, config: &OtpConfig) -> DomainResult<Self> {
        config
            .validate()
            .map_err(|message| DomainError::Configuration { message })?;

        let policies = PolicySet::from_config(config);
        tracing::info!(
            policies = ?policies.names(),
            code_length = config.code_length,
            ttl_seconds = config.ttl_seconds,
            "OTP service configured"
        );

        Ok(Self::with_policies(store, policies).with_config(OtpServiceConfig::from(config)))
    }

    /// Replace the issuance defaults
    pub fn with_config(mut self, config: OtpServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Store backing this service
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Policies checked before every issuance
    pub fn policies(&self) -> &PolicySet {
        &self.policies
    }

    /// Issuance defaults
    pub fn config(&self) -> &OtpServiceConfig {
        &self.config
    }

    /// Issue an OTP with the default length and validity (6 digits, 5 minutes)
    pub async fn generate_otp(
        &self,
        key: &str,
        reason: Option<OtpReason>,
        distributor: &dyn OtpDistributor,
    ) -> DomainResult<IssuedOtp> {
        self.generate_otp_with(key, reason, self.config.code_length, self.config.ttl, distributor)
            .await
    }

    /// Issue an OTP
    ///
    /// This method:
    /// 1. Validates the request
    /// 2. Runs every policy; the first violation aborts with nothing stored
    /// 3. Generates a raw OTP of `length` digits
    /// 4. Stores its hash with the given validity
    /// 5. Hands the raw OTP to the distributor
    ///
    /// Steps 2 to 4 hold a lock on the `(key, reason)` pair, so concurrent
    /// issuances for one pair see each other's stored entry. Delivery runs
    /// after the lock is released.
    ///
    /// A distributor failure is returned as `DomainError::Distribution`; the
    /// stored entry is left in place.
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedOtp)` - Receipt for the issuance
    /// * `Err(DomainError)` - If validation, a policy, generation or delivery fails
    pub async fn generate_otp_with(
        &self,
        key: &str,
        reason: Option<OtpReason>,
        length: usize,
        ttl: Duration,
        distributor: &dyn OtpDistributor,
    ) -> DomainResult<IssuedOtp> {
        let store_key = StoreKey::new(key, reason);

        if key.is_empty() {
            return Err(DomainError::Validation {
                message: "OTP key must not be empty".to_string(),
            });
        }
        if length == 0 {
            return Err(DomainError::Validation {
                message: "OTP length must be positive".to_string(),
            });
        }
        if ttl <= Duration::zero() {
            return Err(DomainError::Validation {
                message: format!("OTP ttl must be positive, got {}", ttl),
            });
        }

        let session_id = Uuid::new_v4();
        let issued_at = Utc::now();

        // Concurrent issuances for one key must not both pass the policies
        let lock = self.issuance_lock(&store_key);
        let stored = {
            let _guard = lock.lock().await;
            self.check_and_store(&store_key, length, ttl)
        };
        drop(lock);
        self.release_issuance_lock(&store_key);
        let otp = stored?;

        tracing::info!(
            key = %store_key.masked(),
            session_id = %session_id,
            length = length,
            ttl_seconds = ttl.num_seconds(),
            event = "otp_generated",
            "Generated and stored new OTP"
        );

        distributor.send(key, &otp).await.map_err(|e| {
            tracing::error!(
                key = %store_key.masked(),
                session_id = %session_id,
                error = %e,
                event = "otp_distribution_failed",
                "Failed to deliver OTP"
            );
            DomainError::Distribution { message: e }
        })?;

        Ok(IssuedOtp {
            session_id,
            key: key.to_string(),
            reason,
            length,
            issued_at,
            ttl,
        })
    }

    // Runs under the key's issuance lock
    fn check_and_store(
        &self,
        store_key: &StoreKey,
        length: usize,
        ttl: Duration,
    ) -> DomainResult<String> {
        let key = store_key.key.as_str();
        let reason = store_key.reason;

        self.policies.check_all(key, reason, self.store.as_ref())?;

        let otp = self.generator.generate_otp(length);
        if otp.len() != length || !otp.chars().all(|c| c.is_ascii_digit()) {
            tracing::error!(
                key = %store_key.masked(),
                expected_length = length,
                actual_length = otp.len(),
                event = "otp_generation_failed",
                "Generator returned a malformed OTP"
            );
            return Err(DomainError::Generation {
                message: format!("expected {} digits, got {} characters", length, otp.len()),
            });
        }

        self.store.store_otp(key, reason, &otp, ttl);
        Ok(otp)
    }

    fn issuance_lock(&self, store_key: &StoreKey) -> Arc<Mutex<()>> {
        Arc::clone(
            &self
                .issuance_locks
                .entry(store_key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    // Drops the table entry once no other issuance holds or awaits it
    fn release_issuance_lock(&self, store_key: &StoreKey) {
        self.issuance_locks
            .remove_if(store_key, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// Verify an OTP
    ///
    /// Wrong codes, expired codes and unknown keys all yield `false`; only the
    /// store's failed-attempt counter records the difference. A successful
    /// verification does not consume the OTP.
    pub fn verify_otp(&self, key: &str, reason: Option<OtpReason>, otp: &str) -> bool {
        let verified = self.store.verify_otp(key, reason, otp);
        let store_key = StoreKey::new(key, reason);

        if verified {
            tracing::info!(
                key = %store_key.masked(),
                event = "otp_verified_success",
                "OTP successfully verified"
            );
        } else {
            tracing::warn!(
                key = %store_key.masked(),
                event = "otp_verification_failed",
                "OTP verification failed"
            );
        }

        verified
    }

    /// Invalidate the OTP for a key and reason (no-op when absent)
    pub fn invalidate_otp(&self, key: &str, reason: Option<OtpReason>) {
        self.store.invalidate_otp(key, reason);
        tracing::info!(
            key = %StoreKey::new(key, reason).masked(),
            event = "otp_invalidated",
            "OTP invalidated"
        );
    }

    /// Snapshot of the active entry for a key and reason
    pub fn get_otp_entry(&self, key: &str, reason: Option<OtpReason>) -> Option<OtpEntry> {
        self.store.get_otp_entry(key, reason)
    }

    /// Sweep expired entries from the store
    pub fn cleanup_expired_otps(&self) -> usize {
        self.store.cleanup_expired_otps()
    }
}
