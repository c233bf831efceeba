#![allow(clippy::unwrap_used)]
// A file-backed token restored by a fresh auth context.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use coursely_config::FileTokenStore;
use coursely_core::{AuthContext, ClientConfig, DEFAULT_API_URL, TokenStore};

fn context(store: FileTokenStore) -> AuthContext {
    let client = ClientConfig::parse(DEFAULT_API_URL)
        .unwrap()
        .build_client()
        .unwrap();
    AuthContext::new(client, Arc::new(store))
}

#[test]
fn test_file_token_restores_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("default.json");

    FileTokenStore::new(&path)
        .save(&SecretString::from("jwt-persisted".to_string()))
        .unwrap();

    let auth = context(FileTokenStore::new(&path));
    assert!(auth.is_authenticated());
    assert_eq!(auth.token().unwrap().expose_secret(), "jwt-persisted");
    assert!(auth.identity().is_none());
}

#[test]
fn test_logout_removes_token_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("default.json");
    FileTokenStore::new(&path)
        .save(&SecretString::from("jwt".to_string()))
        .unwrap();

    let auth = context(FileTokenStore::new(&path));
    auth.logout().unwrap();

    assert!(!path.exists());
    assert!(!context(FileTokenStore::new(&path)).is_authenticated());
}
