use crate::domain::auth::CredentialPair;

/// Names of the two persisted credential entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKey {
    AccessToken,
    RefreshToken,
}

impl CredentialKey {
    /// Storage key, as the console persists it
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialKey::AccessToken => "accessToken",
            CredentialKey::RefreshToken => "refreshToken",
        }
    }
}

/// Durable holder of the current credential pair.
///
/// Implementations are responsible for:
/// - Persisting every mutation immediately (no buffering)
/// - Never failing a read; a missing or unreadable entry is simply absent
/// - Making `set_pair` and `clear_all` atomic for concurrent readers
///
/// Only the refresh coordinator and the session operations of the gateway
/// write to the store. The coordinator calls `get`, `set_pair` and `clear_all`
/// while holding its state lock, from inside async tasks: implementations must
/// be fast and non-async, and must never wait on the coordinator.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: CredentialKey) -> Option<String>;

    fn set(&self, key: CredentialKey, value: &str);

    fn clear(&self, key: CredentialKey);

    /// Replace both entries at once
    fn set_pair(&self, pair: &CredentialPair) {
        self.set(CredentialKey::AccessToken, &pair.access_token);
        self.set(CredentialKey::RefreshToken, &pair.refresh_token);
    }

    /// Remove both entries at once
    fn clear_all(&self) {
        self.clear(CredentialKey::AccessToken);
        self.clear(CredentialKey::RefreshToken);
    }

    /// Current pair, if both entries are present
    fn pair(&self) -> Option<CredentialPair> {
        let access_token = self.get(CredentialKey::AccessToken)?;
        let refresh_token = self.get(CredentialKey::RefreshToken)?;
        Some(CredentialPair {
            access_token,
            refresh_token,
        })
    }
}
