//! In-memory store binding short-lived, single-use auth codes to tokens.
//!
//! Redemption is an atomic map removal, so concurrent exchanges of the same
//! code have exactly one winner. Codes also age out after the configured
//! TTL; expired entries are swept on every insert.

use core::time::Duration;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

use gatekeep_common::generate_secret;
use tracing::debug;

struct PendingExchange {
    token: String,
    bound_at: Instant,
}

pub struct AuthCodeStore {
    codes: Mutex<HashMap<String, PendingExchange>>,
    ttl: Duration,
}

impl AuthCodeStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            codes: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Binds a freshly issued token to a new auth code and returns the code.
    #[must_use]
    pub fn bind(&self, token: String) -> String {
        let code = generate_secret();
        let mut codes = self.codes.lock().expect("auth code lock poisoned");
        let ttl = self.ttl;
        codes.retain(|_, pending| pending.bound_at.elapsed() < ttl);
        codes.insert(
            code.clone(),
            PendingExchange {
                token,
                bound_at: Instant::now(),
            },
        );
        code
    }

    /// Redeems a code for its bound token, removing it in the same step.
    ///
    /// Returns `None` for unknown, already-redeemed and expired codes alike.
    #[must_use]
    pub fn redeem(&self, code: &str) -> Option<String> {
        let pending = self
            .codes
            .lock()
            .expect("auth code lock poisoned")
            .remove(code)?;
        if pending.bound_at.elapsed() >= self.ttl {
            debug!("auth code expired before redemption");
            return None;
        }
        Some(pending.token)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn store() -> AuthCodeStore {
        AuthCodeStore::new(Duration::from_secs(60))
    }

    #[test]
    fn code_redeems_exactly_once() {
        let store = store();
        let code = store.bind("token-a".to_string());
        assert_eq!(store.redeem(&code), Some("token-a".to_string()));
        assert_eq!(store.redeem(&code), None);
    }

    #[test]
    fn unknown_code_redeems_to_nothing() {
        assert_eq!(store().redeem("nope"), None);
    }

    #[test]
    fn expired_code_is_rejected() {
        let store = AuthCodeStore::new(Duration::ZERO);
        let code = store.bind("token-a".to_string());
        assert_eq!(store.redeem(&code), None);
    }

    #[test]
    fn codes_are_distinct_per_binding() {
        let store = store();
        let first = store.bind("token-a".to_string());
        let second = store.bind("token-b".to_string());
        assert_ne!(first, second);
        assert_eq!(store.redeem(&second), Some("token-b".to_string()));
        assert_eq!(store.redeem(&first), Some("token-a".to_string()));
    }

    #[tokio::test]
    async fn concurrent_redeems_have_exactly_one_winner() {
        let store = Arc::new(store());
        let code = store.bind("token-a".to_string());

        let mut handles = Vec::new();
        for _ in 0..32 {
            let store = store.clone();
            let code = code.clone();
            handles.push(tokio::spawn(async move { store.redeem(&code) }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.expect("task panicked").is_some() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
