//! Periodic sweep of expired OTP entries
//!
//! Reads already hide expired entries, so the sweep only bounds memory held by
//! entries nobody asks about again.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use otp_shared::config::OtpConfig;

use crate::services::store::OtpStore;

/// Configuration for the OTP cleanup service
#[derive(Debug, Clone)]
pub struct OtpCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for OtpCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 60,
            enabled: true,
        }
    }
}

impl From<&OtpConfig> for OtpCleanupConfig {
    fn from(config: &OtpConfig) -> Self {
        Self {
            interval_seconds: config.cleanup_interval_seconds,
            enabled: config.cleanup_enabled,
        }
    }
}

/// Service removing expired entries from an OTP store
pub struct OtpCleanupService<S: OtpStore + 'static> {
    store: Arc<S>,
    config: OtpCleanupConfig,
}

impl<S: OtpStore> OtpCleanupService<S> {
    /// Create a new cleanup service
    pub fn new(store: Arc<S>, config: OtpCleanupConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &OtpCleanupConfig {
        &self.config
    }

    /// Run a single cleanup cycle
    pub fn run_cleanup(&self) -> CleanupResult {
        if !self.config.enabled {
            return CleanupResult::default();
        }

        let result = CleanupResult {
            expired_removed: self.store.cleanup_expired_otps(),
        };

        info!(
            expired_removed = result.expired_removed,
            event = "otp_cleanup",
            "OTP cleanup completed"
        );

        result
    }

    /// Start the cleanup service as a background task
    ///
    /// Spawns a tokio task running a cleanup cycle every `interval_seconds`,
    /// the first one immediately. Returns `None` without spawning when
    /// cleanup is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("OTP cleanup service is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds.max(1));

        Some(tokio::spawn(async move {
            info!(
                interval_seconds = self.config.interval_seconds,
                "OTP cleanup service started"
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;
                self.run_cleanup();
            }
        }))
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupResult {
    /// Number of expired entries removed
    pub expired_removed: usize,
}
