//! Ephemeral one-time-password state, keyed by email.
//!
//! Each entry carries its own time-to-live: a freshly issued code lives for
//! `OTP_TTL_SECONDS`, the verified marker that replaces it lives for
//! `OTP_VERIFIED_TTL_SECONDS`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::{Expiry, future::Cache};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpState {
    /// A code was mailed and has not been confirmed yet.
    Pending { code: String },
    /// The code was confirmed; a password change is allowed.
    Verified,
}

#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Insert or replace the state for `email`, expiring after `ttl`.
    async fn put(&self, email: &str, state: OtpState, ttl: Duration);

    /// Current state for `email`, `None` once expired.
    async fn get(&self, email: &str) -> Option<OtpState>;

    async fn remove(&self, email: &str);
}

#[derive(Debug, Clone)]
struct OtpEntry {
    state: OtpState,
    ttl: Duration,
}

struct PerEntryTtl;

impl Expiry<String, OtpEntry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, value: &OtpEntry, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &OtpEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process store backed by a moka cache.
pub struct MokaOtpStore {
    cache: Cache<String, OtpEntry>,
}

impl MokaOtpStore {
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { cache }
    }
}

impl Default for MokaOtpStore {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl OtpStore for MokaOtpStore {
    async fn put(&self, email: &str, state: OtpState, ttl: Duration) {
        self.cache
            .insert(email.to_owned(), OtpEntry { state, ttl })
            .await;
    }

    async fn get(&self, email: &str) -> Option<OtpState> {
        self.cache.get(email).await.map(|entry| entry.state)
    }

    async fn remove(&self, email: &str) {
        self.cache.invalidate(email).await;
    }
}

/// Six decimal digits, never starting with zero.
pub fn generate_code() -> String {
    use rand::Rng;
    rand::thread_rng().gen_range(100_000..1_000_000).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stored_state_is_returned_until_removed() {
        let store = MokaOtpStore::default();
        let pending = OtpState::Pending {
            code: "123456".into(),
        };
        store
            .put("a@example.com", pending.clone(), Duration::from_secs(60))
            .await;
        assert_eq!(store.get("a@example.com").await, Some(pending));
        assert_eq!(store.get("b@example.com").await, None);

        store.remove("a@example.com").await;
        assert_eq!(store.get("a@example.com").await, None);
    }

    #[tokio::test]
    async fn entries_expire_after_their_own_ttl() {
        let store = MokaOtpStore::default();
        store
            .put(
                "short@example.com",
                OtpState::Pending { code: "111111".into() },
                Duration::from_millis(50),
            )
            .await;
        store
            .put("long@example.com", OtpState::Verified, Duration::from_secs(60))
            .await;

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(store.get("short@example.com").await, None);
        assert_eq!(store.get("long@example.com").await, Some(OtpState::Verified));
    }

    #[tokio::test]
    async fn replacing_an_entry_resets_its_ttl() {
        let store = MokaOtpStore::default();
        store
            .put(
                "c@example.com",
                OtpState::Pending { code: "222222".into() },
                Duration::from_millis(50),
            )
            .await;
        store
            .put("c@example.com", OtpState::Verified, Duration::from_secs(60))
            .await;

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(store.get("c@example.com").await, Some(OtpState::Verified));
    }

    #[test]
    fn codes_have_six_digits() {
        for _ in 0..200 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert!(!code.starts_with('0'));
        }
    }
}
