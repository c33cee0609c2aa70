//! OTP issuance orchestration
//!
//! This module sequences the issuance workflow:
//! - Generation policy checks (any violation aborts)
//! - Raw OTP generation
//! - Hashed storage with expiry
//! - Hand-off to the distributor
//!
//! Verification and invalidation delegate straight to the store.

mod config;
mod service;
mod types;


pub use config::OtpServiceConfig;
pub use service::OtpService;
pub use types::IssuedOtp;
