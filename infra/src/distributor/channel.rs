//! Channel-backed OTP distributor
//!
//! Hands each issued OTP to an in-process consumer (a mailer task, a test)
//! over an unbounded tokio channel.

use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error};

use otp_core::services::OtpDistributor;
use otp_shared::mask::mask_key;

/// One delivered OTP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredOtp {
    pub key: String,
    pub otp: String,
}

/// Distributor pushing OTPs onto a channel
#[derive(Debug, Clone)]
pub struct ChannelDistributor {
    sender: UnboundedSender<DeliveredOtp>,
}

impl ChannelDistributor {
    /// Create a distributor and the receiving half of its channel
    pub fn new() -> (Self, UnboundedReceiver<DeliveredOtp>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl OtpDistributor for ChannelDistributor {
    async fn send(&self, key: &str, otp: &str) -> Result<(), String> {
        let delivery = DeliveredOtp {
            key: key.to_string(),
            otp: otp.to_string(),
        };

        self.sender.send(delivery).map_err(|_| {
            error!(key = %mask_key(key), "OTP delivery channel closed");
            "OTP delivery channel closed".to_string()
        })?;

        debug!(key = %mask_key(key), "OTP queued for delivery");
        Ok(())
    }
}
