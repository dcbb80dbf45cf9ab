//! API key storage in the OS keychain.
//!
//! Keys are stored per user-chosen name ("main account", "alt"), so a shell
//! can manage several accounts. Only the key material lives in the keychain;
//! which name was last used is ordinary config.

use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "gw2view";

/// Expected API key length: five UUID groups plus a trailing 20-hex-digit
/// group, dashes included.
const API_KEY_LENGTH: usize = 72;

pub struct CredentialStore;

impl CredentialStore {
    /// Store an API key under a name in the OS keychain
    pub fn store(name: &str, api_key: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, name).context("Failed to create keyring entry")?;
        entry
            .set_password(api_key)
            .context("Failed to store API key in keychain")?;
        Ok(())
    }

    /// Retrieve the API key stored under a name
    pub fn get(name: &str) -> Result<String> {
        let entry = Entry::new(SERVICE_NAME, name).context("Failed to create keyring entry")?;
        entry
            .get_password()
            .context("Failed to retrieve API key from keychain")
    }

    /// Delete the stored API key for a name
    pub fn delete(name: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, name).context("Failed to create keyring entry")?;
        entry
            .delete_credential()
            .context("Failed to delete API key from keychain")?;
        Ok(())
    }

    /// Check if an API key exists under a name
    pub fn has_key(name: &str) -> bool {
        if let Ok(entry) = Entry::new(SERVICE_NAME, name) {
            entry.get_password().is_ok()
        } else {
            false
        }
    }

    /// Validate that a string looks like an API key before storing it.
    /// Keys are 72 characters of hex digits in dash-separated groups.
    pub fn looks_like_api_key(s: &str) -> bool {
        if s.len() != API_KEY_LENGTH {
            return false;
        }
        s.chars()
            .all(|c| c.is_ascii_hexdigit() || c == '-')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_api_key() {
        let valid = "564F181A-F0FC-114A-A55D-3C1DCD45F3767AF3848F-AB29-4EBF-9594-F91E6A75E015";
        assert_eq!(valid.len(), 72);
        assert!(CredentialStore::looks_like_api_key(valid));

        assert!(!CredentialStore::looks_like_api_key(""));
        assert!(!CredentialStore::looks_like_api_key("demo"));
        assert!(!CredentialStore::looks_like_api_key(&valid[..71]));
        assert!(!CredentialStore::looks_like_api_key(
            &valid.replace('A', "Z")
        ));
    }
}
