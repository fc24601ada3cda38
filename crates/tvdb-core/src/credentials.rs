//! Credential file handling
//!
//! The account file holds the username, password and the cookies of the last
//! successful login. Every write replaces the whole file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, warn};

use crate::error::{Result, TvdbError};
use crate::types::Credentials;

/// Why the credential file has to be filled in before a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupReason {
    /// No file existed, a template was created
    Missing,
    /// File was not valid JSON, it was replaced by a template
    Corrupt,
}

/// Result of reading the credential file
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Credentials are usable
    Loaded(Credentials),
    /// A fresh template was written and must be filled in
    NeedsSetup(SetupReason),
    /// Username or password is blank; the file was left untouched
    Incomplete,
    /// File is JSON but not an account object; the file was left untouched
    Invalid(String),
}

impl LoadOutcome {
    /// Turn anything but `Loaded` into the matching error
    pub fn into_credentials(self, path: &Path) -> Result<Credentials> {
        match self {
            Self::Loaded(credentials) => Ok(credentials),
            Self::NeedsSetup(_) => Err(TvdbError::CredentialsNeedSetup(path.to_path_buf())),
            Self::Incomplete => Err(TvdbError::IncompleteCredentials(path.to_path_buf())),
            Self::Invalid(reason) => Err(TvdbError::InvalidCredentials(reason)),
        }
    }
}

/// Reads and writes the JSON credential file
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Create a store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the credential file.
    ///
    /// A missing or corrupt file is replaced by an empty template. Blank
    /// credentials never cause the file to be rewritten.
    ///
    /// # Errors
    /// Returns `TvdbError::Io` if the file cannot be read, removed or written.
    pub fn load(&self) -> Result<LoadOutcome> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    "Account file '{}' not found. Creating a new one.",
                    self.path.display()
                );
                if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                self.write_template()?;
                return Ok(LoadOutcome::NeedsSetup(SetupReason::Missing));
            }
            Err(e) => return Err(e.into()),
        };

        let mut value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    "'{}' is corrupt ({e}). Deleting and creating a new template.",
                    self.path.display()
                );
                fs::remove_file(&self.path)?;
                self.write_template()?;
                return Ok(LoadOutcome::NeedsSetup(SetupReason::Corrupt));
            }
        };

        let Some(object) = value.as_object_mut() else {
            return Ok(LoadOutcome::Invalid(format!(
                "'{}' must contain a JSON object",
                self.path.display()
            )));
        };

        if !object.contains_key("cookies") {
            if let Some(legacy) = object.remove("Cookies") {
                object.insert("cookies".to_string(), legacy);
            }
        }
        // null reads the same as an absent key
        for key in ["username", "password", "cookies"] {
            if object.get(key).is_some_and(Value::is_null) {
                object.remove(key);
            }
        }

        let credentials: Credentials = match serde_json::from_value(value) {
            Ok(credentials) => credentials,
            Err(e) => return Ok(LoadOutcome::Invalid(e.to_string())),
        };

        if !credentials.is_complete() {
            warn!(
                "'username' or 'password' is missing or empty in '{}'.",
                self.path.display()
            );
            return Ok(LoadOutcome::Incomplete);
        }

        Ok(LoadOutcome::Loaded(credentials))
    }

    /// Overwrite the file with the given credentials.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, credentials: &Credentials) -> Result<()> {
        self.write_json(credentials)
    }

    fn write_template(&self) -> Result<()> {
        self.write_json(&Credentials::default())
    }

    fn write_json<T: serde::Serialize>(&self, value: &T) -> Result<()> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        value.serialize(&mut serializer)?;
        fs::write(&self.path, buffer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> CredentialStore {
        CredentialStore::new(dir.path().join("config").join("account.json"))
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_load_missing_file_writes_template() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = store_in(&dir);

        let outcome = store.load().unwrap();
        assert_eq!(outcome, LoadOutcome::NeedsSetup(SetupReason::Missing));
        assert_eq!(
            read_json(store.path()),
            serde_json::json!({"username": "", "password": "", "cookies": {}})
        );
    }

    #[test]
    fn test_load_corrupt_file_is_replaced_by_template() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ this is not json").unwrap();

        let outcome = store.load().unwrap();
        assert_eq!(outcome, LoadOutcome::NeedsSetup(SetupReason::Corrupt));
        assert_eq!(
            read_json(store.path()),
            serde_json::json!({"username": "", "password": "", "cookies": {}})
        );
    }

    #[test]
    fn test_template_uses_four_space_indent() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = store_in(&dir);
        store.load().unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\n    \"username\": \"\""));
    }

    #[test]
    fn test_load_incomplete_leaves_file_untouched() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();

        for raw in [
            r#"{"username": "", "password": "secret", "cookies": {}}"#,
            r#"{"username": "me@example.com", "password": ""}"#,
            r#"{"password": "secret"}"#,
            r#"{"username": "me@example.com", "password": null}"#,
        ] {
            fs::write(store.path(), raw).unwrap();
            assert_eq!(store.load().unwrap(), LoadOutcome::Incomplete);
            assert_eq!(fs::read_to_string(store.path()).unwrap(), raw);
        }
    }

    #[test]
    fn test_load_wrong_shape_is_invalid() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "[1, 2, 3]").unwrap();

        assert!(matches!(store.load().unwrap(), LoadOutcome::Invalid(_)));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[1, 2, 3]");
    }

    #[test]
    fn test_load_normalizes_legacy_cookies_key() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(
            store.path(),
            r#"{"username": "u", "password": "p", "Cookies": {"TVDB_AUTHENTICATED": "1"}}"#,
        )
        .unwrap();

        let LoadOutcome::Loaded(credentials) = store.load().unwrap() else {
            panic!("Expected loaded credentials");
        };
        assert_eq!(
            credentials.cookies.get("TVDB_AUTHENTICATED").map(String::as_str),
            Some("1")
        );
        assert!(!credentials.extra.contains_key("Cookies"));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();

        let mut credentials = Credentials::new("me@example.com", "hunter2");
        credentials
            .cookies
            .insert("TVDB_AUTHENTICATED".to_string(), "yes".to_string());
        credentials
            .cookies
            .insert("laravel_session".to_string(), "abc".to_string());
        store.save(&credentials).unwrap();

        let loaded = store.load().unwrap().into_credentials(store.path()).unwrap();
        assert_eq!(loaded, credentials);
    }

    #[test]
    fn test_into_credentials_maps_errors() {
        let path = Path::new("account.json");
        assert!(matches!(
            LoadOutcome::NeedsSetup(SetupReason::Missing).into_credentials(path),
            Err(TvdbError::CredentialsNeedSetup(_))
        ));
        assert!(matches!(
            LoadOutcome::Incomplete.into_credentials(path),
            Err(TvdbError::IncompleteCredentials(_))
        ));
        assert!(matches!(
            LoadOutcome::Invalid("bad".to_string()).into_credentials(path),
            Err(TvdbError::InvalidCredentials(_))
        ));
    }
}
