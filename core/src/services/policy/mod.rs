//! Pre-issuance generation policies
//!
//! Policies inspect the store before an OTP is generated and can refuse the
//! issuance. They run in caller-supplied order and the first violation aborts
//! the whole issuance before any side effect.

mod duplicate;
mod max_attempts;
mod policy_set;
mod traits;


pub use duplicate::PreventDuplicateOtpPolicy;
pub use max_attempts::MaxFailedAttemptsPolicy;
pub use policy_set::PolicySet;
pub use traits::GenerationPolicy;
