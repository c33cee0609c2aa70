//! Concurrent in-memory OTP store
//!
//! Entries live in a `DashMap` keyed by `StoreKey`, so every operation on one
//! composite key runs under that key's shard lock:
//! - Verification compares and bumps `failed_attempts` under one `get_mut` guard
//! - Expired entries are evicted lazily on read with `remove_if`
//! - A full sweep (`cleanup_expired_otps`) uses `retain`
//!
//! Only SHA-256 digests are held; the raw OTP never enters the map.

use chrono::{Duration, Utc};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use otp_core::domain::entities::{OtpEntry, OtpReason, StoreKey};
use otp_core::services::store::{CredentialHasher, OtpStore, Sha256CredentialHasher};

/// In-memory OTP store safe for concurrent use
pub struct InMemoryOtpStore {
    /// Entries by composite key
    entries: DashMap<StoreKey, OtpEntry>,
    /// Digest applied to OTPs before storage and comparison
    hasher: Arc<dyn CredentialHasher>,
}

impl InMemoryOtpStore {
    /// Create an empty store hashing with SHA-256
    pub fn new() -> Self {
        Self::with_hasher(Arc::new(Sha256CredentialHasher))
    }

    /// Create an empty store with a custom hasher
    pub fn with_hasher(hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            entries: DashMap::new(),
            hasher,
        }
    }

    /// Number of held entries, including expired ones not yet evicted
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of every active entry, keyed by its composite key
    ///
    /// Keys stay structured: `("u1:LOGIN", None)` and `("u1", Some(Login))`
    /// render alike but are distinct entries.
    pub fn snapshot(&self) -> HashMap<StoreKey, OtpEntry> {
        let now = Utc::now();
        self.entries
            .iter()
            .filter(|item| item.value().is_active_at(now))
            .map(|item| (item.key().clone(), item.value().clone()))
            .collect()
    }

    // Removes the entry only if it is still expired, so a concurrent
    // re-store is never lost.
    fn evict_if_expired(&self, store_key: &StoreKey) {
        let now = Utc::now();
        if self
            .entries
            .remove_if(store_key, |_, entry| !entry.is_active_at(now))
            .is_some()
        {
            debug!(key = %store_key.masked(), "Evicted expired OTP");
        }
    }
}

impl Default for InMemoryOtpStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OtpStore for InMemoryOtpStore {
    fn store_otp(&self, key: &str, reason: Option<OtpReason>, otp: &str, ttl: Duration) {
        let store_key = StoreKey::new(key, reason);
        let entry = OtpEntry::new(self.hasher.hash(otp), ttl, reason);

        debug!(
            key = %store_key.masked(),
            expires_at = %entry.expires_at,
            event = "otp_stored",
            "Stored OTP"
        );

        self.entries.insert(store_key, entry);
    }

    fn verify_otp(&self, key: &str, reason: Option<OtpReason>, otp: &str) -> bool {
        let store_key = StoreKey::new(key, reason);
        let now = Utc::now();

        // None: expired. Some(Ok(())): match. Some(Err(n)): mismatch, n failures.
        let outcome = match self.entries.get_mut(&store_key) {
            None => {
                debug!(key = %store_key.masked(), "No OTP found for key");
                return false;
            }
            Some(mut entry) => {
                if !entry.is_active_at(now) {
                    None
                } else if self.hasher.matches(&entry.credential_hash, otp) {
                    Some(Ok(()))
                } else {
                    Some(Err(entry.record_failed_attempt()))
                }
            }
        };

        match outcome {
            Some(Ok(())) => true,
            Some(Err(failed_attempts)) => {
                warn!(
                    key = %store_key.masked(),
                    failed_attempts = failed_attempts,
                    "OTP mismatch"
                );
                false
            }
            None => {
                self.evict_if_expired(&store_key);
                false
            }
        }
    }

    fn get_otp_entry(&self, key: &str, reason: Option<OtpReason>) -> Option<OtpEntry> {
        let store_key = StoreKey::new(key, reason);
        let entry = self.entries.get(&store_key).map(|entry| entry.value().clone())?;

        if entry.is_active() {
            Some(entry)
        } else {
            self.evict_if_expired(&store_key);
            None
        }
    }

    fn invalidate_otp(&self, key: &str, reason: Option<OtpReason>) {
        self.entries.remove(&StoreKey::new(key, reason));
    }

    fn cleanup_expired_otps(&self) -> usize {
        let now = Utc::now();
        let mut removed = 0;

        self.entries.retain(|_, entry| {
            let keep = entry.is_active_at(now);
            if !keep {
                removed += 1;
            }
            keep
        });

        removed
    }
}
