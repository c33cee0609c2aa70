//! OTP store interface and credential hashing
//!
//! The store holds hashed credentials keyed by `(key, reason)`. Concrete
//! stores live in the infrastructure crate; this module only defines the
//! contract every backend honours.

mod hashing;
mod traits;

pub use hashing::{CredentialHasher, Sha256CredentialHasher};
pub use traits::OtpStore;
