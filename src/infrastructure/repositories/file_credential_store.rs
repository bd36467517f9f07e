use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::credential_store::{CredentialKey, CredentialStore};
use crate::domain::auth::CredentialPair;

/// Credential store mirrored to a JSON file so the session survives restarts.
///
/// The file holds a flat object keyed by [`CredentialKey::as_str`]. Every
/// mutation rewrites it while the write lock is held, so concurrent readers
/// never observe a half-replaced pair. The rewrite goes through a temp file
/// and a rename, so the file on disk is always a complete snapshot.
pub struct FileCredentialStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileCredentialStore {
    /// Open the store, loading whatever the file holds.
    ///
    /// A missing or unreadable file starts logged out.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);

        tracing::debug!(
            path = %path.display(),
            entries = entries.len(),
            "Credential store opened"
        );

        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    fn persist(&self, entries: &BTreeMap<String, String>) {
        let bytes = match serde_json::to_vec_pretty(entries) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize credentials");
                return;
            }
        };

        if let Err(e) = write_atomically(&self.path, &bytes) {
            tracing::error!(
                error = %e,
                path = %self.path.display(),
                "Failed to persist credentials"
            );
        }
    }
}

/// Write to a sibling temp file, then rename it over `path`, so a crash
/// mid-write leaves the previous contents intact.
fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut file = NamedTempFile::new_in(parent)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn load_entries(path: &Path) -> BTreeMap<String, String> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "Failed to read credential store");
            return BTreeMap::new();
        }
    };

    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        tracing::warn!(error = %e, path = %path.display(), "Corrupt credential store, ignoring");
        BTreeMap::new()
    })
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: CredentialKey) -> Option<String> {
        self.entries.read().get(key.as_str()).cloned()
    }

    fn set(&self, key: CredentialKey, value: &str) {
        let mut entries = self.entries.write();
        entries.insert(key.as_str().to_string(), value.to_string());
        self.persist(&entries);
    }

    fn clear(&self, key: CredentialKey) {
        let mut entries = self.entries.write();
        if entries.remove(key.as_str()).is_some() {
            self.persist(&entries);
        }
    }

    fn set_pair(&self, pair: &CredentialPair) {
        let mut entries = self.entries.write();
        entries.insert(
            CredentialKey::AccessToken.as_str().to_string(),
            pair.access_token.clone(),
        );
        entries.insert(
            CredentialKey::RefreshToken.as_str().to_string(),
            pair.refresh_token.clone(),
        );
        self.persist(&entries);
    }

    fn clear_all(&self) {
        let mut entries = self.entries.write();
        entries.clear();
        self.persist(&entries);
    }
}
