//! Purpose tag attached to an issued OTP.

use serde::{Deserialize, Serialize};

/// Reason an OTP was issued
///
/// The reason is part of the entry's identity: a user can hold several active
/// OTPs at once as long as each was issued for a different reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OtpReason {
    /// User login
    Login,
    /// New user signup
    Signup,
    /// Password reset
    ResetPassword,
    /// Re-sending a previously requested OTP
    Resend,
}

impl OtpReason {
    /// Canonical upper-case name used in composite store keys
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpReason::Login => "LOGIN",
            OtpReason::Signup => "SIGNUP",
            OtpReason::ResetPassword => "RESET_PASSWORD",
            OtpReason::Resend => "RESEND",
        }
    }
}

impl std::fmt::Display for OtpReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OtpReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "LOGIN" => Ok(OtpReason::Login),
            "SIGNUP" => Ok(OtpReason::Signup),
            "RESET_PASSWORD" => Ok(OtpReason::ResetPassword),
            "RESEND" => Ok(OtpReason::Resend),
            _ => Err(format!("Invalid OTP reason: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_names() {
        assert_eq!(OtpReason::Login.to_string(), "LOGIN");
        assert_eq!(OtpReason::ResetPassword.as_str(), "RESET_PASSWORD");
        assert_eq!("reset-password".parse::<OtpReason>().unwrap(), OtpReason::ResetPassword);
        assert_eq!("signup".parse::<OtpReason>().unwrap(), OtpReason::Signup);
        assert!("logout".parse::<OtpReason>().is_err());
    }

    #[test]
    fn test_serde_uses_canonical_names() {
        let json = serde_json::to_string(&OtpReason::ResetPassword).unwrap();
        assert_eq!(json, "\"RESET_PASSWORD\"");
    }
}
