//! Configuration module
//!
//! - `environment` - Environment detection and logging configuration
//! - `otp` - OTP issuance, policy and cleanup settings

pub mod environment;
pub mod otp;

// Re-export commonly used types
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use otp::OtpConfig;
