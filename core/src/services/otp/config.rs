//! Configuration for the OTP service

use chrono::Duration;

use otp_shared::config::otp::{OtpConfig, DEFAULT_CODE_LENGTH, DEFAULT_TTL_SECONDS};

// Largest second count chrono can represent
const MAX_DURATION_SECONDS: u64 = (i64::MAX / 1_000) as u64;

/// Defaults applied by `OtpService::generate_otp`
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// Number of digits in a generated OTP
    pub code_length: usize,
    /// Validity of a freshly issued OTP
    pub ttl: Duration,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            ttl: Duration::seconds(DEFAULT_TTL_SECONDS as i64),
        }
    }
}

impl From<&OtpConfig> for OtpServiceConfig {
    fn from(config: &OtpConfig) -> Self {
        Self {
            code_length: config.code_length,
            ttl: Duration::seconds(config.ttl_seconds.min(MAX_DURATION_SECONDS) as i64),
        }
    }
}
