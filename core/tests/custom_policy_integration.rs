//! Integration tests plugging caller-defined collaborators into the OTP service

use async_trait::async_trait;
use chrono::Duration;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use otp_core::domain::entities::{OtpEntry, OtpReason, StoreKey};
use otp_core::errors::{DomainError, PolicyViolation};
use otp_core::services::{
    CredentialHasher, GenerationPolicy, OtpDistributor, OtpGenerator, OtpService, OtpStore,
    PolicySet, PreventDuplicateOtpPolicy, Sha256CredentialHasher,
};

// Minimal store: expired entries are filtered on read but never evicted
#[derive(Default)]
struct SimpleStore {
    entries: Mutex<HashMap<StoreKey, OtpEntry>>,
}

impl OtpStore for SimpleStore {
    fn store_otp(&self, key: &str, reason: Option<OtpReason>, otp: &str, ttl: Duration) {
        let entry = OtpEntry::new(Sha256CredentialHasher.hash(otp), ttl, reason);
        self.entries
            .lock()
            .unwrap()
            .insert(StoreKey::new(key, reason), entry);
    }

    fn verify_otp(&self, key: &str, reason: Option<OtpReason>, otp: &str) -> bool {
        let mut entries = self.entries.lock().unwrap();
        match entries.get_mut(&StoreKey::new(key, reason)) {
            Some(entry) if entry.is_active() => {
                let ok = Sha256CredentialHasher.matches(&entry.credential_hash, otp);
                if !ok {
                    entry.record_failed_attempt();
                }
                ok
            }
            _ => false,
        }
    }

    fn get_otp_entry(&self, key: &str, reason: Option<OtpReason>) -> Option<OtpEntry> {
        self.entries
            .lock()
            .unwrap()
            .get(&StoreKey::new(key, reason))
            .filter(|entry| entry.is_active())
            .cloned()
    }

    fn invalidate_otp(&self, key: &str, reason: Option<OtpReason>) {
        self.entries.lock().unwrap().remove(&StoreKey::new(key, reason));
    }

    fn cleanup_expired_otps(&self) -> usize {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_active());
        before - entries.len()
    }
}

// Refuses issuance for blocked keys
struct BlockedKeysPolicy {
    blocked: HashSet<String>,
}

impl GenerationPolicy for BlockedKeysPolicy {
    fn name(&self) -> &'static str {
        "blocked_keys"
    }

    fn check(
        &self,
        key: &str,
        _reason: Option<OtpReason>,
        _store: &dyn OtpStore,
    ) -> Result<(), PolicyViolation> {
        if self.blocked.contains(key) {
            return Err(PolicyViolation::Custom {
                policy: self.name().to_string(),
                message: "key is blocked".to_string(),
            });
        }
        Ok(())
    }
}

struct SequenceGenerator {
    next: Mutex<u32>,
}

impl OtpGenerator for SequenceGenerator {
    fn generate_otp(&self, length: usize) -> String {
        let mut next = self.next.lock().unwrap();
        *next += 1;
        format!("{:0width$}", *next, width = length)
    }
}

#[derive(Default)]
struct Outbox {
    messages: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl OtpDistributor for Outbox {
    async fn send(&self, key: &str, otp: &str) -> Result<(), String> {
        self.messages
            .lock()
            .unwrap()
            .push((key.to_string(), otp.to_string()));
        Ok(())
    }
}

fn build_service(store: Arc<SimpleStore>) -> OtpService<SimpleStore> {
    let mut policies = PolicySet::default();
    policies.push(BlockedKeysPolicy {
        blocked: ["mallory".to_string()].into_iter().collect(),
    });
    policies.push(PreventDuplicateOtpPolicy::new());

    OtpService::with_generator(
        Arc::new(SequenceGenerator {
            next: Mutex::new(0),
        }),
        store,
        policies,
    )
}

#[tokio::test]
async fn test_custom_policy_refuses_issuance() {
    let store = Arc::new(SimpleStore::default());
    let service = build_service(store.clone());
    let outbox = Outbox::default();

    let error = service
        .generate_otp("mallory", Some(OtpReason::Login), &outbox)
        .await
        .unwrap_err();

    match &error {
        DomainError::Policy(PolicyViolation::Custom { policy, message }) => {
            assert_eq!(policy, "blocked_keys");
            assert_eq!(message, "key is blocked");
        }
        other => panic!("Expected custom violation, got {:?}", other),
    }
    assert_eq!(error.code(), "POLICY_VIOLATION");
    assert!(outbox.messages.lock().unwrap().is_empty());
    assert!(store.get_otp_entry("mallory", Some(OtpReason::Login)).is_none());
}

#[tokio::test]
async fn test_custom_generator_and_distributor_round_trip() {
    let store = Arc::new(SimpleStore::default());
    let service = build_service(store);
    let outbox = Outbox::default();

    service
        .generate_otp("alice", Some(OtpReason::Login), &outbox)
        .await
        .unwrap();
    service
        .generate_otp_with("bob", None, 4, Duration::minutes(1), &outbox)
        .await
        .unwrap();

    let messages = outbox.messages.lock().unwrap().clone();
    assert_eq!(
        messages,
        vec![
            ("alice".to_string(), "000001".to_string()),
            ("bob".to_string(), "0002".to_string()),
        ]
    );

    assert!(service.verify_otp("alice", Some(OtpReason::Login), "000001"));
    assert!(service.verify_otp("bob", None, "0002"));
    assert!(!service.verify_otp("bob", None, "000001"));
}
