//! Layered settings loading
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults, with logging defaults chosen by the environment
//! 2. `otp.toml`, then the environment file (`otp.<environment>.toml`), both optional
//! 3. `OTP_*` variables; nested keys use `__` (`OTP_LOGGING__LEVEL=debug`)

use config::{Config, File};
use std::path::Path;

use otp_core::errors::DomainError;
use otp_shared::config::{Environment, LoggingConfig, OtpConfig};

use crate::InfrastructureError;

/// Base settings file, looked up in the working directory
pub const BASE_SETTINGS_FILE: &str = "otp.toml";

/// Load settings for the current process
///
/// Reads `.env` first, detects the environment from `ENVIRONMENT`/`ENV`/`RUST_ENV`
/// and layers the settings files and `OTP_*` variables on top of the defaults.
pub fn load_settings() -> Result<OtpConfig, InfrastructureError> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env();
    load_settings_for(
        environment,
        &[
            Path::new(BASE_SETTINGS_FILE),
            Path::new(environment.config_file()),
        ],
    )
}

/// Load settings for an environment from the given optional files
///
/// Missing files are skipped. The result is validated; `max_failed_attempts = 0`
/// disables the lockout policy.
pub fn load_settings_for(
    environment: Environment,
    files: &[&Path],
) -> Result<OtpConfig, InfrastructureError> {
    let logging = LoggingConfig::for_environment(environment);

    let mut builder = Config::builder()
        .set_default("environment", environment.to_string())?
        .set_default("logging.level", logging.level.clone())?
        .set_default("logging.format", logging.format.as_str())?
        .set_default("logging.colored", logging.colored)?
        .set_default("logging.source_location", logging.source_location)?;

    for file in files {
        builder = builder.add_source(File::from(*file).required(false));
    }

    let mut settings: OtpConfig = builder
        .add_source(
            config::Environment::with_prefix("OTP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    if settings.max_failed_attempts == Some(0) {
        settings.max_failed_attempts = None;
    }

    settings
        .validate()
        .map_err(|message| DomainError::Configuration { message })?;

    tracing::debug!(
        environment = %settings.environment,
        code_length = settings.code_length,
        ttl_seconds = settings.ttl_seconds,
        "Settings loaded"
    );

    Ok(settings)
}
