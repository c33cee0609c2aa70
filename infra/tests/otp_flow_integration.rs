//! Integration tests for the full OTP flow over the in-memory store

use chrono::Duration;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use otp_core::domain::entities::OtpReason;
use otp_core::errors::{DomainError, PolicyViolation};
use otp_core::services::{
    MaxFailedAttemptsPolicy, OtpService, OtpStore, PolicySet, PreventDuplicateOtpPolicy,
};
use otp_infra::{ChannelDistributor, InMemoryOtpStore, LoggingDistributor, OtpInfrastructure};
use otp_shared::config::OtpConfig;

fn service_with_policies(
    store: Arc<InMemoryOtpStore>,
    max_attempts: u32,
) -> OtpService<InMemoryOtpStore> {
    let mut policies = PolicySet::default();
    policies.push(PreventDuplicateOtpPolicy::new());
    policies.push(MaxFailedAttemptsPolicy::new(max_attempts));
    OtpService::with_policies(store, policies)
}

#[tokio::test]
async fn test_issue_deliver_and_verify() {
    let store = Arc::new(InMemoryOtpStore::new());
    let service = service_with_policies(store.clone(), 3);
    let (distributor, mut deliveries) = ChannelDistributor::new();

    let issued = service
        .generate_otp("alice@example.com", Some(OtpReason::Login), &distributor)
        .await
        .unwrap();
    let delivered = deliveries.recv().await.unwrap();

    assert_eq!(delivered.key, "alice@example.com");
    assert_eq!(delivered.otp.len(), issued.length);
    assert!(delivered.otp.chars().all(|c| c.is_ascii_digit()));

    assert!(!service.verify_otp("alice@example.com", Some(OtpReason::Signup), &delivered.otp));
    assert!(service.verify_otp("alice@example.com", Some(OtpReason::Login), &delivered.otp));

    // Only the digest is held
    let entry = store.get_otp_entry("alice@example.com", Some(OtpReason::Login)).unwrap();
    assert_ne!(entry.credential_hash, delivered.otp);
}

#[tokio::test]
async fn test_lockout_after_failed_attempts() {
    let store = Arc::new(InMemoryOtpStore::new());
    let service = service_with_policies(store.clone(), 3);
    let (distributor, mut deliveries) = ChannelDistributor::new();

    service
        .generate_otp_with("u1", None, 6, Duration::milliseconds(100), &distributor)
        .await
        .unwrap();
    let first = deliveries.recv().await.unwrap();

    for _ in 0..3 {
        assert!(!service.verify_otp("u1", None, "not-it"));
    }

    // Still active: the duplicate policy answers first
    let error = service.generate_otp("u1", None, &distributor).await.unwrap_err();
    assert!(matches!(
        error,
        DomainError::Policy(PolicyViolation::DuplicateActiveOtp)
    ));

    tokio::time::sleep(StdDuration::from_millis(150)).await;

    // Once expired the store no longer returns the entry, so issuance resumes
    service.generate_otp("u1", None, &distributor).await.unwrap();
    let second = deliveries.recv().await.unwrap();

    assert_eq!(store.get_otp_entry("u1", None).unwrap().failed_attempts, 0);
    assert!(service.verify_otp("u1", None, &second.otp));
    if first.otp != second.otp {
        assert!(!service.verify_otp("u1", None, &first.otp));
    }
}

#[tokio::test]
async fn test_lockout_blocks_reissue_without_duplicate_policy() {
    let store = Arc::new(InMemoryOtpStore::new());
    let mut policies = PolicySet::default();
    policies.push(MaxFailedAttemptsPolicy::new(2));
    let service = OtpService::with_policies(store.clone(), policies);
    let distributor = LoggingDistributor::new();

    service.generate_otp("u1", None, &distributor).await.unwrap();
    assert!(!service.verify_otp("u1", None, "x"));
    assert!(!service.verify_otp("u1", None, "y"));

    let error = service.generate_otp("u1", None, &distributor).await.unwrap_err();
    assert_eq!(error.code(), "MAX_FAILED_ATTEMPTS_EXCEEDED");
    assert_eq!(distributor.delivery_count(), 1);

    // Explicit invalidation lifts the lockout
    service.invalidate_otp("u1", None);
    service.generate_otp("u1", None, &distributor).await.unwrap();
    assert_eq!(distributor.delivery_count(), 2);
}

#[tokio::test]
async fn test_failed_delivery_leaves_otp_stored() {
    let store = Arc::new(InMemoryOtpStore::new());
    let service = OtpService::new(store.clone());
    let distributor = LoggingDistributor::failing();

    let error = service
        .generate_otp("u1", Some(OtpReason::ResetPassword), &distributor)
        .await
        .unwrap_err();

    assert_eq!(error.code(), "DISTRIBUTION_FAILED");
    assert!(store
        .get_otp_entry("u1", Some(OtpReason::ResetPassword))
        .is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_failed_verifications_across_tasks() {
    const TASKS: usize = 16;
    const ATTEMPTS_PER_TASK: usize = 25;

    let store = Arc::new(InMemoryOtpStore::new());
    store.store_otp("u1", Some(OtpReason::Login), "123456", Duration::minutes(5));

    let mut handles = Vec::new();
    for _ in 0..TASKS {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..ATTEMPTS_PER_TASK {
                store.verify_otp("u1", Some(OtpReason::Login), "000000");
                tokio::task::yield_now().await;
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let entry = store.get_otp_entry("u1", Some(OtpReason::Login)).unwrap();
    assert_eq!(entry.failed_attempts, (TASKS * ATTEMPTS_PER_TASK) as u32);
    assert!(store.verify_otp("u1", Some(OtpReason::Login), "123456"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_issuance_for_distinct_keys() {
    let store = Arc::new(InMemoryOtpStore::new());
    let service = Arc::new(service_with_policies(store.clone(), 3));
    let distributor = Arc::new(LoggingDistributor::new());

    let mut handles = Vec::new();
    for i in 0..32 {
        let service = service.clone();
        let distributor = distributor.clone();
        handles.push(tokio::spawn(async move {
            service
                .generate_otp(&format!("user-{}", i), Some(OtpReason::Signup), distributor.as_ref())
                .await
                .map(|_| ())
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.len(), 32);
    assert_eq!(distributor.delivery_count(), 32);
}

#[tokio::test]
async fn test_wired_infrastructure_with_background_cleanup() {
    let config = OtpConfig {
        cleanup_interval_seconds: 1,
        ..OtpConfig::default()
    };
    let infrastructure = OtpInfrastructure::build(config).unwrap();

    infrastructure
        .store
        .store_otp("stale", None, "111111", Duration::milliseconds(-1));
    let (distributor, mut deliveries) = ChannelDistributor::new();
    infrastructure
        .service
        .generate_otp("fresh", None, &distributor)
        .await
        .unwrap();
    let delivered = deliveries.recv().await.unwrap();
    assert_eq!(infrastructure.store.len(), 2);

    let task = infrastructure.start_cleanup().unwrap();
    tokio::time::sleep(StdDuration::from_millis(100)).await;

    assert_eq!(infrastructure.store.len(), 1);
    assert!(infrastructure
        .service
        .verify_otp("fresh", None, &delivered.otp));

    task.abort();
}
