//! Trait for OTP delivery integration

use async_trait::async_trait;

/// Delivers a freshly issued OTP to its owner (SMS, e-mail, push, ...)
///
/// Called exactly once per successful issuance, after the OTP is stored and
/// outside any store lock.
#[async_trait]
pub trait OtpDistributor: Send + Sync {
    /// Send the OTP to the owner of `key`
    async fn send(&self, key: &str, otp: &str) -> Result<(), String>;
}
