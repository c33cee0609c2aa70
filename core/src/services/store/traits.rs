//! Trait for OTP store integration

use chrono::Duration;

use crate::domain::entities::{OtpEntry, OtpReason};

/// Concurrent, time-bounded storage for hashed OTP credentials
///
/// Every operation addresses one composite key `(key, reason)`. A `None`
/// reason is a single implicit reason, so callers that never tag their OTPs
/// get one entry per key.
///
/// Implementations must guarantee:
/// - at most one entry per composite key (`store_otp` overwrites),
/// - per-key atomicity of `store_otp`, `verify_otp` and `invalidate_otp`,
///   including the read-compare-increment sequence of a failed verification,
/// - expired entries are never observable, whether or not they have been
///   swept yet.
pub trait OtpStore: Send + Sync {
    /// Store a new OTP, replacing any entry for the same key and reason
    ///
    /// Only the hash of `otp` is kept. The failed-attempt counter starts at 0.
    fn store_otp(&self, key: &str, reason: Option<OtpReason>, otp: &str, ttl: Duration);

    /// Verify a candidate OTP
    ///
    /// Returns `false` when no active entry exists. A mismatch increments the
    /// entry's failed-attempt counter. A match leaves the entry in place;
    /// callers wanting single-use semantics invalidate explicitly.
    fn verify_otp(&self, key: &str, reason: Option<OtpReason>, otp: &str) -> bool;

    /// Snapshot of the active entry for a key and reason, if any
    fn get_otp_entry(&self, key: &str, reason: Option<OtpReason>) -> Option<OtpEntry>;

    /// Remove the entry for a key and reason (no-op when absent)
    fn invalidate_otp(&self, key: &str, reason: Option<OtpReason>);

    /// Remove every expired entry and return how many were removed
    ///
    /// Stores backed by a self-expiring cache may return 0 here as long as
    /// reads keep filtering expired entries.
    fn cleanup_expired_otps(&self) -> usize;
}
