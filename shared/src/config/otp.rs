//! OTP issuance configuration module

use serde::{Deserialize, Serialize};
use std::env;

use super::environment::{Environment, LoggingConfig};

/// Default number of digits in a generated OTP
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Default OTP validity (5 minutes)
pub const DEFAULT_TTL_SECONDS: u64 = 300;

/// Default lockout threshold for failed verifications
pub const DEFAULT_MAX_FAILED_ATTEMPTS: u32 = 3;

/// Longest OTP the generator is asked for
pub const MAX_CODE_LENGTH: usize = 32;

/// Longest accepted validity (24 hours)
pub const MAX_TTL_SECONDS: u64 = 86_400;

/// OTP issuance, policy and cleanup configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Runtime environment
    #[serde(default)]
    pub environment: Environment,

    /// Number of digits in a generated OTP
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Seconds a freshly issued OTP stays valid
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,

    /// Failed verifications that lock out new issuance (`None` disables the policy)
    #[serde(default = "default_max_failed_attempts")]
    pub max_failed_attempts: Option<u32>,

    /// Refuse issuance while an active OTP exists for the same key and reason
    #[serde(default = "default_true")]
    pub prevent_duplicates: bool,

    /// Seconds between background sweeps of expired entries
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,

    /// Run the background sweep
    #[serde(default = "default_true")]
    pub cleanup_enabled: bool,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            code_length: DEFAULT_CODE_LENGTH,
            ttl_seconds: DEFAULT_TTL_SECONDS,
            max_failed_attempts: Some(DEFAULT_MAX_FAILED_ATTEMPTS),
            prevent_duplicates: true,
            cleanup_interval_seconds: default_cleanup_interval(),
            cleanup_enabled: true,
            logging: LoggingConfig::default(),
        }
    }
}

impl OtpConfig {
    /// Create from environment variables
    ///
    /// Unparseable values fall back to their defaults. `OTP_MAX_FAILED_ATTEMPTS=0`
    /// disables the lockout policy.
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        let defaults = Self::default();

        let max_failed_attempts = match env::var("OTP_MAX_FAILED_ATTEMPTS") {
            Ok(raw) => match raw.parse::<u32>() {
                Ok(0) => None,
                Ok(n) => Some(n),
                Err(_) => defaults.max_failed_attempts,
            },
            Err(_) => defaults.max_failed_attempts,
        };

        Self {
            environment,
            code_length: parse_env("OTP_CODE_LENGTH", defaults.code_length),
            ttl_seconds: parse_env("OTP_TTL_SECONDS", defaults.ttl_seconds),
            max_failed_attempts,
            prevent_duplicates: parse_env("OTP_PREVENT_DUPLICATES", defaults.prevent_duplicates),
            cleanup_interval_seconds: parse_env(
                "OTP_CLEANUP_INTERVAL_SECONDS",
                defaults.cleanup_interval_seconds,
            ),
            cleanup_enabled: parse_env("OTP_CLEANUP_ENABLED", defaults.cleanup_enabled),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Check the configuration for values the service cannot run with
    pub fn validate(&self) -> Result<(), String> {
        if self.code_length == 0 || self.code_length > MAX_CODE_LENGTH {
            return Err(format!(
                "code_length must be between 1 and {}, got {}",
                MAX_CODE_LENGTH, self.code_length
            ));
        }
        if self.ttl_seconds == 0 || self.ttl_seconds > MAX_TTL_SECONDS {
            return Err(format!(
                "ttl_seconds must be between 1 and {}, got {}",
                MAX_TTL_SECONDS, self.ttl_seconds
            ));
        }
        if self.max_failed_attempts == Some(0) {
            return Err("max_failed_attempts must be positive when set".to_string());
        }
        if self.cleanup_enabled && self.cleanup_interval_seconds == 0 {
            return Err("cleanup_interval_seconds must be positive when cleanup is enabled".to_string());
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

fn default_code_length() -> usize {
    DEFAULT_CODE_LENGTH
}

fn default_ttl_seconds() -> u64 {
    DEFAULT_TTL_SECONDS
}

fn default_max_failed_attempts() -> Option<u32> {
    Some(DEFAULT_MAX_FAILED_ATTEMPTS)
}

fn default_cleanup_interval() -> u64 {
    60
}

fn default_true() -> bool {
    true
}
