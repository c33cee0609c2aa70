//! Stored OTP credential and its composite store key.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use otp_shared::mask::mask_key;

use super::otp_reason::OtpReason;

/// Compute an absolute expiry from an issuance instant and a TTL
///
/// Saturates at the representable bounds instead of overflowing, so an
/// oversized TTL yields an entry that never expires in practice and a
/// hugely negative one yields an already-expired entry.
pub fn expiry_from(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    now.checked_add_signed(ttl).unwrap_or(if ttl < Duration::zero() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

/// A hashed OTP credential held by a store
///
/// The raw OTP is never part of the entry; only its digest is kept, so a
/// dump of the store cannot leak a usable code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpEntry {
    /// Digest of the OTP value
    pub credential_hash: String,

    /// Timestamp when the OTP was stored
    pub created_at: DateTime<Utc>,

    /// Timestamp after which the OTP is invalid
    pub expires_at: DateTime<Utc>,

    /// Number of failed verifications against this OTP
    pub failed_attempts: u32,

    /// Reason the OTP was issued for
    pub reason: Option<OtpReason>,
}

impl OtpEntry {
    /// Create a fresh entry with no failed attempts
    pub fn new(credential_hash: String, ttl: Duration, reason: Option<OtpReason>) -> Self {
        let now = Utc::now();
        Self {
            credential_hash,
            created_at: now,
            expires_at: expiry_from(now, ttl),
            failed_attempts: 0,
            reason,
        }
    }

    /// Whether the entry is still valid at `now`
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Whether the entry is still valid
    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }

    /// Whether the entry has expired
    pub fn is_expired(&self) -> bool {
        !self.is_active()
    }

    /// Record a failed verification and return the new count
    pub fn record_failed_attempt(&mut self) -> u32 {
        self.failed_attempts = self.failed_attempts.saturating_add(1);
        self.failed_attempts
    }

    /// Gets the time remaining until expiration, or zero if expired
    pub fn time_until_expiration(&self) -> Duration {
        let now = Utc::now();
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}

/// Composite address of a store entry: caller identity plus optional reason
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreKey {
    /// Caller-supplied identity (user id, e-mail address, ...)
    pub key: String,
    /// Purpose tag, `None` for the implicit single reason
    pub reason: Option<OtpReason>,
}

impl StoreKey {
    pub fn new(key: &str, reason: Option<OtpReason>) -> Self {
        Self {
            key: key.to_string(),
            reason,
        }
    }

    /// Flat rendering: `key:REASON`, or `key` alone without a reason
    pub fn cache_key(&self) -> String {
        self.to_string()
    }

    /// Rendering safe for log fields
    pub fn masked(&self) -> String {
        match self.reason {
            Some(reason) => format!("{}:{}", mask_key(&self.key), reason),
            None => mask_key(&self.key),
        }
    }
}

impl std::fmt::Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.reason {
            Some(reason) => write!(f, "{}:{}", self.key, reason),
            None => f.write_str(&self.key),
        }
    }
}
