//! OTP distributor implementations
//!
//! - `LoggingDistributor`: records deliveries in the log only, for development
//! - `ChannelDistributor`: forwards OTPs over a tokio channel to an in-process consumer

pub mod channel;
pub mod logging;

pub use channel::{ChannelDistributor, DeliveredOtp};
pub use logging::LoggingDistributor;
