pub mod credential_store;
pub mod file_credential_store;
pub mod memory_credential_store;

pub use credential_store::{CredentialKey, CredentialStore};
pub use file_credential_store::FileCredentialStore;
pub use memory_credential_store::MemoryCredentialStore;
