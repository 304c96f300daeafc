//! Process-wide session credential.
//!
//! The store holds at most one credential. Writes replace the slot
//! wholesale; readers clone an `Arc` out of it, so a reader never observes a
//! half-written value and never holds the lock across an await.

use crate::error::GatewayError;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Opaque platform session token (the cookie header blob).
///
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(Arc<str>);

impl Credential {
    /// The raw credential, for handing to the platform client.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Length of the credential in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a stored credential; empty values are never stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<{} bytes>)", self.0.len())
    }
}

/// Presence report that never exposes the credential itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CredentialStatus {
    /// Whether a credential is currently set.
    pub has_cookies: bool,
    /// Its length, 0 when absent.
    pub cookies_length: usize,
}

/// Single-slot, thread-safe credential holder.
///
/// Shared as `Arc<CredentialStore>` between both facades.
#[derive(Debug, Default)]
pub struct CredentialStore {
    slot: RwLock<Option<Credential>>,
}

impl CredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `value` (ignored when empty).
    #[must_use]
    pub fn seeded(value: Option<String>) -> Self {
        let store = Self::new();
        if let Some(value) = value {
            store.set(value);
        }
        store
    }

    /// Overwrite the current credential.
    ///
    /// No validation is performed. Setting an empty string clears the slot,
    /// so later reads fail with [`GatewayError::CredentialMissing`].
    pub fn set(&self, value: impl Into<String>) {
        let value: String = value.into();
        let next = if value.is_empty() {
            None
        } else {
            Some(Credential(Arc::from(value)))
        };

        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = next;
        drop(slot);

        tracing::info!(present = self.status().has_cookies, "credential replaced");
    }

    /// Read the current credential.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::CredentialMissing`] when nothing is set.
    pub fn get(&self) -> Result<Credential, GatewayError> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(GatewayError::CredentialMissing)
    }

    /// Presence and length of the current credential.
    #[must_use]
    pub fn status(&self) -> CredentialStatus {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        CredentialStatus {
            has_cookies: slot.is_some(),
            cookies_length: slot.as_ref().map_or(0, Credential::len),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_get_fails_before_any_set() {
        let store = CredentialStore::new();
        assert!(matches!(store.get(), Err(GatewayError::CredentialMissing)));
        assert_eq!(
            store.status(),
            CredentialStatus {
                has_cookies: false,
                cookies_length: 0
            }
        );
    }

    #[test]
    fn test_set_then_get() {
        let store = CredentialStore::new();
        store.set("a1=xyz; web_session=abc");
        assert_eq!(store.get().unwrap().expose(), "a1=xyz; web_session=abc");
        assert_eq!(store.status().cookies_length, 23);
    }

    #[test]
    fn test_overwrite_to_empty_clears() {
        let store = CredentialStore::new();
        store.set("first");
        store.set("");
        assert!(matches!(store.get(), Err(GatewayError::CredentialMissing)));
        assert!(!store.status().has_cookies);
    }

    #[test]
    fn test_overwrite_replaces_wholesale() {
        let store = CredentialStore::new();
        store.set("first");
        let held = store.get().unwrap();
        store.set("second");
        // Readers keep the value they already took.
        assert_eq!(held.expose(), "first");
        assert_eq!(store.get().unwrap().expose(), "second");
    }

    #[test]
    fn test_seeded() {
        assert!(CredentialStore::seeded(None).get().is_err());
        assert!(CredentialStore::seeded(Some(String::new())).get().is_err());
        assert_eq!(
            CredentialStore::seeded(Some("c".to_string()))
                .get()
                .unwrap()
                .expose(),
            "c"
        );
    }

    #[test]
    fn test_debug_redacts_value() {
        let store = CredentialStore::new();
        store.set("secret-token");
        let printed = format!("{:?}", store.get().unwrap());
        assert!(!printed.contains("secret"));
        assert_eq!(printed, "Credential(<12 bytes>)");
    }

    #[test]
    fn test_concurrent_readers_see_whole_values() {
        let store = Arc::new(CredentialStore::new());
        store.set("aaaa");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        if i % 2 == 0 {
                            store.set(if i % 4 == 0 { "aaaa" } else { "bbbbbbbb" });
                        } else {
                            let value = store.get().unwrap();
                            assert!(value.expose() == "aaaa" || value.expose() == "bbbbbbbb");
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
