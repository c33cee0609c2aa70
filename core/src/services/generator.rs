//! OTP value generation

use rand::{rngs::OsRng, Rng};

/// Produces raw OTP values
pub trait OtpGenerator: Send + Sync {
    /// Generate an OTP of exactly `length` decimal digits
    fn generate_otp(&self, length: usize) -> String;
}

/// Generator drawing each digit uniformly from the OS CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureOtpGenerator;

impl OtpGenerator for SecureOtpGenerator {
    fn generate_otp(&self, length: usize) -> String {
        let mut rng = OsRng;
        (0..length)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }
}
