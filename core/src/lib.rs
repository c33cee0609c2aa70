//! # OTP Core
//!
//! Core domain layer for one-time passcode issuance.
//! This crate contains the domain entities, the store, generator, distributor
//! and policy interfaces, the issuance orchestrator, and error types.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
