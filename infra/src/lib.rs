//! # Infrastructure Layer
//!
//! Concrete implementations behind the OTP core traits, plus process wiring.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Cache**: concurrent in-memory OTP store backed by `DashMap`
//! - **Distributor**: logging and channel-based OTP delivery
//! - **Settings**: layered configuration (`otp.toml`, `OTP_*` environment)
//! - **Telemetry**: `tracing-subscriber` initialization

use std::sync::Arc;
use tokio::task::JoinHandle;

use otp_core::services::{OtpCleanupConfig, OtpCleanupService, OtpService};
use otp_shared::config::OtpConfig;

// Re-export core types for convenience
pub use otp_core::errors::*;

/// Cache module - in-memory OTP storage
pub mod cache;

/// Distributor module - OTP delivery implementations
pub mod distributor;

/// Settings module - configuration loading
pub mod settings;

/// Telemetry module - tracing subscriber setup
pub mod telemetry;

pub use cache::InMemoryOtpStore;
pub use distributor::{ChannelDistributor, DeliveredOtp, LoggingDistributor};
pub use settings::{load_settings, load_settings_for};
pub use telemetry::init_tracing;

/// Wired OTP components sharing one store
pub struct OtpInfrastructure {
    /// Effective configuration
    pub config: OtpConfig,
    /// Shared in-memory store
    pub store: Arc<InMemoryOtpStore>,
    /// Issuance and verification service
    pub service: Arc<OtpService<InMemoryOtpStore>>,
    /// Expired-entry sweeper
    pub cleanup: Arc<OtpCleanupService<InMemoryOtpStore>>,
}

impl OtpInfrastructure {
    /// Wire the components for a configuration
    pub fn build(config: OtpConfig) -> Result<Self, InfrastructureError> {
        let store = Arc::new(InMemoryOtpStore::new());
        let service = Arc::new(OtpService::from_config(store.clone(), &config)?);
        let cleanup = Arc::new(OtpCleanupService::new(
            store.clone(),
            OtpCleanupConfig::from(&config),
        ));

        Ok(Self {
            config,
            store,
            service,
            cleanup,
        })
    }

    /// Spawn the periodic cleanup task, if enabled
    pub fn start_cleanup(&self) -> Option<JoinHandle<()>> {
        self.cleanup.clone().start_background_task()
    }
}

/// Initialize infrastructure services with async runtime
///
/// This function:
/// - Loads settings from `.env`, `otp.toml` and `OTP_*` variables
/// - Installs the tracing subscriber
/// - Wires the store, service and cleanup service
/// - Starts the background cleanup task
pub async fn initialize() -> Result<(OtpInfrastructure, Option<JoinHandle<()>>), InfrastructureError> {
    let config = load_settings()?;
    init_tracing(&config.logging)?;

    tracing::info!(environment = %config.environment, "Initializing OTP infrastructure...");

    let infrastructure = OtpInfrastructure::build(config)?;
    let cleanup_task = infrastructure.start_cleanup();

    tracing::info!("OTP infrastructure initialized successfully");

    Ok((infrastructure, cleanup_task))
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Configuration source or deserialization error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Tracing subscriber installation error
    #[error("Logging error: {0}")]
    Logging(String),

    /// Domain error raised while wiring services
    #[error(transparent)]
    Domain(#[from] DomainError),
}
