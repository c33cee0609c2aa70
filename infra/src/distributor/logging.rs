//! Logging OTP distributor for development and testing
//!
//! Records each delivery with a masked key and a running message count.
//! The OTP value itself is never written to the log.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use otp_core::services::OtpDistributor;
use otp_shared::mask::mask_key;

/// Distributor that only logs deliveries
#[derive(Clone, Debug, Default)]
pub struct LoggingDistributor {
    /// Counter for tracking number of deliveries
    delivery_count: Arc<AtomicU64>,
    /// Whether to simulate failures (for testing)
    simulate_failure: bool,
}

impl LoggingDistributor {
    /// Create a new logging distributor
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a distributor that rejects every delivery
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Get the total number of deliveries
    pub fn delivery_count(&self) -> u64 {
        self.delivery_count.load(Ordering::SeqCst)
    }

    /// Reset the delivery counter
    pub fn reset_counter(&self) {
        self.delivery_count.store(0, Ordering::SeqCst);
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&mut self, simulate: bool) {
        self.simulate_failure = simulate;
    }
}

#[async_trait]
impl OtpDistributor for LoggingDistributor {
    async fn send(&self, key: &str, _otp: &str) -> Result<(), String> {
        let masked_key = mask_key(key);

        if self.simulate_failure {
            warn!(
                target: "otp_distributor",
                key = %masked_key,
                "Logging distributor simulating failure"
            );
            return Err("Simulated OTP delivery failure".to_string());
        }

        let count = self.delivery_count.fetch_add(1, Ordering::SeqCst) + 1;

        info!(
            target: "otp_distributor",
            provider = "logging",
            key = %masked_key,
            delivery = count,
            event = "otp_distributed",
            "OTP delivered"
        );

        Ok(())
    }
}
