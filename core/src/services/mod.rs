//! Business services containing the OTP issuance and verification logic.

pub mod cleanup;
pub mod distributor;
pub mod generator;
pub mod otp;
pub mod policy;
pub mod store;

// Re-export commonly used types
pub use cleanup::{CleanupResult, OtpCleanupConfig, OtpCleanupService};
pub use distributor::OtpDistributor;
pub use generator::{OtpGenerator, SecureOtpGenerator};
pub use otp::{IssuedOtp, OtpService, OtpServiceConfig};
pub use policy::{
    GenerationPolicy, MaxFailedAttemptsPolicy, PolicySet, PreventDuplicateOtpPolicy,
};
pub use store::{CredentialHasher, OtpStore, Sha256CredentialHasher};
