//! Read-only lookup of the signed-in user's bearer token.
//!
//! The view never reaches for ambient storage; it is handed a
//! [`CredentialStore`] and asks it for [`TOKEN_KEY`].

use order_service::BearerToken;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Key under which the bearer token is stored.
pub const TOKEN_KEY: &str = "token";

/// Stringified `undefined` left behind by clients that stored a missing token.
const UNDEFINED_PLACEHOLDER: &str = "undefined";

#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("Failed to read credential store {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(
        "Credential store {} is not a JSON object of strings: {source}",
        .path.display()
    )]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Synchronous key-value lookup. Implementations never write.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialStoreError>;
}

/// Look up the bearer token, treating absent, empty and `"undefined"` values
/// as "not signed in".
pub fn resolve_bearer_token(
    store: &dyn CredentialStore,
) -> Result<Option<BearerToken>, CredentialStoreError> {
    let token = store.get(TOKEN_KEY)?;

    Ok(token
        .filter(|token| !token.is_empty() && token != UNDEFINED_PLACEHOLDER)
        .map(BearerToken::new))
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    entries: HashMap<String, String>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let mut store = Self::new();
        store.insert(TOKEN_KEY, token);
        store
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialStoreError> {
        Ok(self.entries.get(key).cloned())
    }
}

/// JSON object of string keys to string values on disk, e.g.
/// `{"token": "eyJhbGciOi..."}`. Re-read on every lookup; a missing file is an
/// empty store.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<HashMap<String, String>, CredentialStoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(
                    "Credential store {} does not exist, treating as empty",
                    self.path.display()
                );
                return Ok(HashMap::new());
            }
            Err(source) => {
                return Err(CredentialStoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&contents).map_err(|source| CredentialStoreError::Json {
            path: self.path.clone(),
            source,
        })
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialStoreError> {
        Ok(self.load()?.remove(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_store(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_resolve_bearer_token_present() {
        let store = InMemoryCredentialStore::with_token("abc.def.ghi");

        let token = resolve_bearer_token(&store).unwrap().unwrap();
        assert_eq!(token.as_str(), "abc.def.ghi");
    }

    #[test]
    fn test_resolve_bearer_token_absent() {
        let store = InMemoryCredentialStore::new();

        assert!(resolve_bearer_token(&store).unwrap().is_none());
    }

    #[test]
    fn test_resolve_bearer_token_undefined_placeholder() {
        let store = InMemoryCredentialStore::with_token("undefined");

        assert!(resolve_bearer_token(&store).unwrap().is_none());
    }

    #[test]
    fn test_resolve_bearer_token_empty() {
        let store = InMemoryCredentialStore::with_token("");

        assert!(resolve_bearer_token(&store).unwrap().is_none());
    }

    #[test]
    fn test_resolve_bearer_token_only_reads_token_key() {
        let mut store = InMemoryCredentialStore::new();
        store.insert("refreshToken", "not-the-one");

        assert!(resolve_bearer_token(&store).unwrap().is_none());
    }

    #[test]
    fn test_file_store_reads_token() {
        let file = write_store(r#"{"token": "from-disk", "theme": "dark"}"#);
        let store = FileCredentialStore::new(file.path());

        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("from-disk"));
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));

        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_rereads_on_every_lookup() {
        let file = write_store(r#"{"token": "first"}"#);
        let store = FileCredentialStore::new(file.path());
        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("first"));

        std::fs::write(file.path(), r#"{"token": "second"}"#).unwrap();

        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let file = write_store("token=abc");
        let store = FileCredentialStore::new(file.path());

        let result = store.get(TOKEN_KEY);
        assert!(matches!(
            result.unwrap_err(),
            CredentialStoreError::Json { path, .. } if path == file.path()
        ));
    }

    #[test]
    fn test_file_store_non_string_values_are_rejected() {
        let file = write_store(r#"{"token": 42}"#);
        let store = FileCredentialStore::new(file.path());

        assert!(matches!(
            store.get(TOKEN_KEY).unwrap_err(),
            CredentialStoreError::Json { .. }
        ));
    }

    #[test]
    fn test_file_store_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path());

        assert!(matches!(
            store.get(TOKEN_KEY).unwrap_err(),
            CredentialStoreError::Io { .. }
        ));
    }
}
