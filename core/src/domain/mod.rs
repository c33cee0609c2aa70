//! Domain layer containing OTP entities and value types.

pub mod entities;

// Re-export commonly used domain types
pub use entities::*;
