//! Domain entities representing stored OTP state.

pub mod otp_entry;
pub mod otp_reason;

// Re-export commonly used types
pub use otp_entry::{expiry_from, OtpEntry, StoreKey};
pub use otp_reason::OtpReason;
