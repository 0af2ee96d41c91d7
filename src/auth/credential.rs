//! Bearer credential and its shared store.

use arc_swap::ArcSwapOption;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::error::TransportError;

/// Access token with its absolute expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    expires_at: SystemTime,
}

impl Credential {
    pub fn new(token: impl Into<String>, expires_at: SystemTime) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    pub fn expires_at(&self) -> SystemTime {
        self.expires_at
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(SystemTime::now())
    }

    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        now >= self.expires_at
    }

    /// Time to wait from `now` until a refresh is due, `margin` before expiry.
    pub fn refresh_delay_at(&self, now: SystemTime, margin: Duration) -> Duration {
        self.expires_at
            .duration_since(now)
            .unwrap_or(Duration::ZERO)
            .saturating_sub(margin)
    }

    pub fn refresh_delay(&self, margin: Duration) -> Duration {
        self.refresh_delay_at(SystemTime::now(), margin)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Current credential, shared between the refresh task and request paths.
///
/// Readers get an immutable snapshot; a refresh swaps the whole value.
#[derive(Clone)]
pub struct CredentialStore {
    current: Arc<ArcSwapOption<Credential>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self {
            current: Arc::new(ArcSwapOption::empty()),
        }
    }

    pub fn replace(&self, credential: Credential) {
        self.current.store(Some(Arc::new(credential)));
    }

    pub fn current(&self) -> Option<Arc<Credential>> {
        self.current.load_full()
    }

    pub fn clear(&self) {
        self.current.store(None);
    }

    /// Header value for an authenticated call. Never hands out an expired token.
    pub fn authorization(&self) -> Result<String, TransportError> {
        match self.current() {
            None => Err(TransportError::Unauthenticated(
                "no credential installed".to_string(),
            )),
            Some(credential) if credential.is_expired() => Err(TransportError::Unauthenticated(
                "access token expired".to_string(),
            )),
            Some(credential) => Ok(credential.bearer()),
        }
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("current", &self.current())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_delay_respects_margin() {
        let now = SystemTime::now();
        let credential = Credential::new("t", now + Duration::from_secs(20));
        assert_eq!(
            credential.refresh_delay_at(now, Duration::from_secs(15)),
            Duration::from_secs(5)
        );

        let almost = Credential::new("t", now + Duration::from_secs(10));
        assert_eq!(almost.refresh_delay_at(now, Duration::from_secs(15)), Duration::ZERO);

        let past = Credential::new("t", now - Duration::from_secs(1));
        assert_eq!(past.refresh_delay_at(now, Duration::from_secs(15)), Duration::ZERO);
    }

    #[test]
    fn test_store_authorization() {
        let store = CredentialStore::new();
        assert!(matches!(
            store.authorization(),
            Err(TransportError::Unauthenticated(_))
        ));

        store.replace(Credential::new(
            "abc",
            SystemTime::now() + Duration::from_secs(60),
        ));
        assert_eq!(store.authorization().unwrap(), "Bearer abc");

        store.replace(Credential::new("old", SystemTime::now() - Duration::from_secs(1)));
        assert!(store.authorization().is_err());

        store.clear();
        assert!(store.current().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let store = CredentialStore::new();
        let reader = store.clone();
        store.replace(Credential::new("x", SystemTime::now() + Duration::from_secs(60)));
        assert!(reader.current().is_some());
    }

    #[test]
    fn test_debug_redacts_token() {
        let credential = Credential::new("super-secret", SystemTime::now());
        assert!(!format!("{:?}", credential).contains("super-secret"));
    }
}
