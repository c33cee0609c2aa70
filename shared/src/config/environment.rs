//! Runtime environment and logging settings

use serde::{Deserialize, Serialize};
use std::env;

/// Variables consulted, in order, to detect the runtime environment
pub const ENVIRONMENT_VARIABLES: [&str; 3] = ["ENVIRONMENT", "ENV", "RUST_ENV"];

/// Deployment environment the OTP service runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Lower-case name, as used in settings file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// Detect the environment from the first set variable in
    /// `ENVIRONMENT_VARIABLES`, defaulting to development
    ///
    /// An unrecognised value also yields development.
    pub fn from_env() -> Self {
        ENVIRONMENT_VARIABLES
            .iter()
            .find_map(|name| env::var(name).ok())
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Environment-specific settings file (`otp.<environment>.toml`)
    pub fn config_file(&self) -> &'static str {
        match self {
            Environment::Development => "otp.development.toml",
            Environment::Staging => "otp.staging.toml",
            Environment::Production => "otp.production.toml",
        }
    }

    /// Most verbose level logged by default in this environment
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Environment::Development => "debug",
            Environment::Staging => "info",
            Environment::Production => "warn",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "staging" | "stage" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event
    Json,
    /// Multi-line, human-oriented
    #[default]
    Pretty,
    /// Single-line, human-oriented
    Compact,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
            LogFormat::Compact => "compact",
        }
    }
}

/// Tracing subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Filter directive (`info`, `otp_core=debug,warn`, ...); `RUST_LOG` overrides it
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    /// ANSI colours (ignored by the JSON format)
    #[serde(default = "default_colored")]
    pub colored: bool,

    /// Include file and line of each event
    #[serde(default)]
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            colored: default_colored(),
            source_location: false,
        }
    }
}

impl LoggingConfig {
    /// Defaults for an environment: readable and verbose in development,
    /// JSON elsewhere
    pub fn for_environment(environment: Environment) -> Self {
        let development = environment.is_development();
        Self {
            level: environment.default_log_level().to_string(),
            format: if development {
                LogFormat::Pretty
            } else {
                LogFormat::Json
            },
            colored: development,
            source_location: development,
        }
    }
}

fn default_level() -> String {
    String::from("info")
}

fn default_colored() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_environment_aliases() {
        let cases = [
            ("dev", Environment::Development),
            ("Local", Environment::Development),
            ("staging", Environment::Staging),
            ("test", Environment::Staging),
            (" PROD ", Environment::Production),
        ];

        for (raw, expected) in cases {
            assert_eq!(raw.parse::<Environment>(), Ok(expected), "Failed for: {:?}", raw);
        }
        assert!("qa".parse::<Environment>().is_err());
    }

    #[test]
    fn test_environment_names() {
        assert_eq!(Environment::default(), Environment::Development);
        assert_eq!(Environment::Staging.to_string(), "staging");
        assert_eq!(Environment::Production.config_file(), "otp.production.toml");
        assert!(Environment::Production.is_production());
        assert!(!Environment::Staging.is_development());
    }

    #[test]
    fn test_logging_defaults_follow_environment() {
        let dev = LoggingConfig::for_environment(Environment::Development);
        assert_eq!(dev.level, "debug");
        assert_eq!(dev.format, LogFormat::Pretty);
        assert!(dev.colored && dev.source_location);

        let staging = LoggingConfig::for_environment(Environment::Staging);
        assert_eq!(staging.level, "info");
        assert_eq!(staging.format, LogFormat::Json);
        assert!(!staging.colored);

        assert_eq!(
            LoggingConfig::for_environment(Environment::Production).level,
            "warn"
        );
    }

    #[test]
    fn test_partial_logging_document() {
        let config: LoggingConfig = serde_json::from_str(r#"{"format": "compact"}"#).unwrap();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.colored);
        assert_eq!(config.format.as_str(), "compact");
    }
}
