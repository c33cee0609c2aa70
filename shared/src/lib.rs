//! Shared utilities and common types for the OTP service
//!
//! This crate provides common functionality used across all workspace crates:
//! - Configuration types (OTP issuance, environment, logging)
//! - Log-masking helpers for caller-supplied identities

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{Environment, LogFormat, LoggingConfig, OtpConfig};
pub use utils::mask;
