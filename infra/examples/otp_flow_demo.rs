//! Example walking through OTP issuance, verification and lockout
//!
//! Run with: cargo run --example otp_flow_demo

use anyhow::Context;

use otp_core::domain::entities::OtpReason;
use otp_infra::ChannelDistributor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Settings, tracing, store, service and cleanup task
    let (infrastructure, cleanup_task) = otp_infra::initialize().await?;
    let service = infrastructure.service.clone();

    let (distributor, mut deliveries) = ChannelDistributor::new();
    let user = "alice@example.com";

    println!("\n=== Issuing a login OTP ===");
    let issued = service
        .generate_otp(user, Some(OtpReason::Login), &distributor)
        .await?;
    let delivered = deliveries
        .recv()
        .await
        .context("delivery channel closed")?;
    println!(
        "Session {}: {} digits, valid for {} seconds",
        issued.session_id,
        issued.length,
        issued.ttl.num_seconds()
    );
    println!("Delivered to {}: {}", delivered.key, delivered.otp);

    println!("\n=== Verifying ===");
    println!("Wrong code accepted: {}", service.verify_otp(user, Some(OtpReason::Login), "000000"));
    println!(
        "Right code accepted: {}",
        service.verify_otp(user, Some(OtpReason::Login), &delivered.otp)
    );
    if let Some(entry) = service.get_otp_entry(user, Some(OtpReason::Login)) {
        println!("Failed attempts so far: {}", entry.failed_attempts);
    }

    println!("\n=== Requesting again while the first is active ===");
    match service
        .generate_otp(user, Some(OtpReason::Login), &distributor)
        .await
    {
        Ok(_) => println!("Issued a second OTP"),
        Err(e) => println!("Refused: {} ({})", e, e.code()),
    }

    println!("\n=== Invalidating and re-issuing ===");
    service.invalidate_otp(user, Some(OtpReason::Login));
    service
        .generate_otp(user, Some(OtpReason::Login), &distributor)
        .await?;
    println!("Issued a fresh OTP after invalidation");

    println!("\nRemoved {} expired entries", service.cleanup_expired_otps());

    if let Some(task) = cleanup_task {
        task.abort();
    }

    Ok(())
}
