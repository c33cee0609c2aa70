//! Types for OTP service results

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::OtpReason;

/// Receipt for a successful issuance
///
/// Carries no trace of the OTP value itself; the only copy leaves through
/// the distributor.
#[derive(Debug, Clone)]
pub struct IssuedOtp {
    /// Correlation id for logs of this issuance
    pub session_id: Uuid,
    /// Caller-supplied identity
    pub key: String,
    /// Reason the OTP was issued for
    pub reason: Option<OtpReason>,
    /// Number of digits generated
    pub length: usize,
    /// When the OTP was handed to the store
    pub issued_at: DateTime<Utc>,
    /// Requested validity
    pub ttl: Duration,
}
