// ── Durable token stores ──
//
// Both stores keep exactly one value per profile under the `token` key.
// Errors surface as `CoreError::Storage` so the auth context can report
// them without knowing which backend is in use.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use coursely_core::{CoreError, TOKEN_KEY, TokenStore};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use tracing::debug;

use crate::ConfigError;

/// Keyring service name.
pub const KEYRING_SERVICE: &str = "coursely";

fn storage(message: impl Into<String>) -> CoreError {
    CoreError::Storage {
        message: message.into(),
    }
}

// ── File store ──────────────────────────────────────────────────────

/// Token kept in a small JSON document: `{"token": "..."}`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/sessions/<profile>.json`
    pub fn for_profile(profile: &str) -> Self {
        Self::new(
            crate::data_dir()
                .join("sessions")
                .join(format!("{profile}.json")),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, contents: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
            // `mode` only applies on creation; a file left by an older
            // version may still be group or world readable.
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)?;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
            file.write_all(contents.as_bytes())?;
        }
        #[cfg(not(unix))]
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<SecretString>, CoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage(format!("{}: {e}", self.path.display()))),
        };

        let doc: Map<String, Value> = serde_json::from_str(&raw)
            .map_err(|e| storage(format!("{} is not valid JSON: {e}", self.path.display())))?;

        Ok(doc
            .get(TOKEN_KEY)
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(|t| SecretString::from(t.to_owned())))
    }

    fn save(&self, token: &SecretString) -> Result<(), CoreError> {
        let mut doc = Map::new();
        doc.insert(TOKEN_KEY.into(), Value::String(token.expose_secret().to_owned()));
        let contents = serde_json::to_string(&doc).map_err(|e| storage(e.to_string()))?;
        self.write(&contents)
            .map_err(|e| storage(format!("{}: {e}", self.path.display())))?;
        debug!(path = %self.path.display(), "token saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "token removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage(format!("{}: {e}", self.path.display()))),
        }
    }
}

// ── Keyring store ───────────────────────────────────────────────────

/// Token kept in the OS keyring as `coursely` / `<profile>/token`.
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    user: String,
}

impl KeyringTokenStore {
    /// Validates that an entry can be built for `profile`.
    pub fn new(profile: &str) -> Result<Self, ConfigError> {
        let user = format!("{profile}/{TOKEN_KEY}");
        keyring::Entry::new(KEYRING_SERVICE, &user)?;
        Ok(Self { user })
    }

    fn entry(&self) -> Result<keyring::Entry, CoreError> {
        keyring::Entry::new(KEYRING_SERVICE, &self.user)
            .map_err(|e| storage(format!("keyring: {e}")))
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<SecretString>, CoreError> {
        match self.entry()?.get_password() {
            Ok(token) if token.is_empty() => Ok(None),
            Ok(token) => Ok(Some(SecretString::from(token))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(storage(format!("keyring: {e}"))),
        }
    }

    fn save(&self, token: &SecretString) -> Result<(), CoreError> {
        self.entry()?
            .set_password(token.expose_secret())
            .map_err(|e| storage(format!("keyring: {e}")))
    }

    fn clear(&self) -> Result<(), CoreError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(storage(format!("keyring: {e}"))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, FileTokenStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("sessions").join("default.json"));
        (dir, store)
    }

    #[test]
    fn missing_file_loads_as_none() {
        let (_dir, store) = store();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_load_clear() {
        let (_dir, store) = store();
        store.save(&SecretString::from("jwt-abc".to_string())).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, r#"{"token":"jwt-abc"}"#);
        assert_eq!(store.load().unwrap().unwrap().expose_secret(), "jwt-abc");

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let (_dir, store) = store();
        store.save(&SecretString::from("t".to_string())).unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn readable_token_file_is_tightened_before_write() {
        use std::os::unix::fs::PermissionsExt;
        let (_dir, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"token":"old"}"#).unwrap();
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();

        store.save(&SecretString::from("new".to_string())).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().unwrap().unwrap().expose_secret(), "new");
    }

    #[test]
    fn corrupt_file_is_storage_error() {
        let (_dir, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "not json").unwrap();
        assert!(matches!(store.load(), Err(CoreError::Storage { .. })));
    }

    #[test]
    fn empty_token_loads_as_none() {
        let (_dir, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"token":""}"#).unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
