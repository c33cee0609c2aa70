//! One-way hashing of OTP credentials

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use constant_time_eq::constant_time_eq;
use sha2::{Digest, Sha256};

/// One-way digest used to keep OTPs out of the store in clear text
pub trait CredentialHasher: Send + Sync {
    /// Hash an OTP value
    fn hash(&self, otp: &str) -> String;

    /// Compare a stored hash with the hash of a candidate in constant time
    fn matches(&self, stored_hash: &str, candidate: &str) -> bool {
        let candidate_hash = self.hash(candidate);
        constant_time_eq(stored_hash.as_bytes(), candidate_hash.as_bytes())
    }
}

/// SHA-256 digest rendered as standard base64
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256CredentialHasher;

impl CredentialHasher for Sha256CredentialHasher {
    fn hash(&self, otp: &str) -> String {
        let digest = Sha256::digest(otp.as_bytes());
        BASE64.encode(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        let hasher = Sha256CredentialHasher;
        // SHA-256("123456")
        assert_eq!(
            hasher.hash("123456"),
            "jZae727K08KaOmKSgOaGzww/XVqGr/PKEgIMkjrcbJI="
        );
    }

    #[test]
    fn test_hash_never_contains_raw_value() {
        let hasher = Sha256CredentialHasher;
        let hash = hasher.hash("987654");
        assert!(!hash.contains("987654"));
        assert_eq!(hash.len(), 44);
    }

    #[test]
    fn test_matches() {
        let hasher = Sha256CredentialHasher;
        let stored = hasher.hash("123456");

        assert!(hasher.matches(&stored, "123456"));
        assert!(!hasher.matches(&stored, "123457"));
        assert!(!hasher.matches(&stored, ""));
        assert!(!hasher.matches("", "123456"));
    }
}
