use parking_lot::RwLock;
use std::collections::HashMap;

use super::credential_store::{CredentialKey, CredentialStore};
use crate::domain::auth::CredentialPair;

/// In-process credential store. Lost on restart.
#[derive(Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<HashMap<CredentialKey, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pair(pair: &CredentialPair) -> Self {
        let store = Self::new();
        store.set_pair(pair);
        store
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: CredentialKey) -> Option<String> {
        self.entries.read().get(&key).cloned()
    }

    fn set(&self, key: CredentialKey, value: &str) {
        self.entries.write().insert(key, value.to_string());
    }

    fn clear(&self, key: CredentialKey) {
        self.entries.write().remove(&key);
    }

    fn set_pair(&self, pair: &CredentialPair) {
        let mut entries = self.entries.write();
        entries.insert(CredentialKey::AccessToken, pair.access_token.clone());
        entries.insert(CredentialKey::RefreshToken, pair.refresh_token.clone());
    }

    fn clear_all(&self) {
        self.entries.write().clear();
    }

    fn pair(&self) -> Option<CredentialPair> {
        let entries = self.entries.read();
        Some(CredentialPair {
            access_token: entries.get(&CredentialKey::AccessToken)?.clone(),
            refresh_token: entries.get(&CredentialKey::RefreshToken)?.clone(),
        })
    }
}
