//! Cache module for in-memory OTP storage

pub mod memory_store;


pub use memory_store::InMemoryOtpStore;
