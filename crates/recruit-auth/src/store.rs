//! Token storage
//!
//! Holds exactly two named secrets, the access token and the refresh token.
//! The store is backed by one of three storage areas:
//!
//! - a JSON file on disk (durable across runs, written atomically, 0600)
//! - process memory (lost at exit)
//! - nothing at all, for contexts with no storage area; every read returns
//!   absent and every write is a no-op
//!
//! Storage failures are never surfaced to callers. A token that cannot be
//! read is simply absent and the user re-authenticates.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use common::Secret;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

enum Area {
    Unavailable,
    Memory,
    File(PathBuf),
}

#[derive(Default)]
struct Slots {
    access: Option<Secret<String>>,
    refresh: Option<Secret<String>>,
}

/// On-disk layout. Field names are the storage keys.
#[derive(Serialize)]
struct PersistedRef<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<&'a str>,
}

#[derive(Deserialize)]
struct Persisted {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Synchronous storage for the access/refresh token pair.
///
/// Reads take the lock briefly and clone the token out. Writes hold the lock
/// for the in-memory update and the file write, so concurrent writers never
/// interleave and a reader never sees half of a `set_pair`.
pub struct TokenStore {
    area: Area,
    slots: RwLock<Slots>,
}

impl TokenStore {
    /// Open a file-backed store, loading whatever tokens the file holds.
    ///
    /// A missing file is an empty store. An unreadable or corrupt file is
    /// logged and also treated as empty.
    pub fn file(path: PathBuf) -> Self {
        let slots = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Persisted>(&contents) {
                Ok(persisted) => {
                    info!(path = %path.display(), "loaded stored tokens");
                    Slots {
                        access: persisted.access_token.map(Secret::new),
                        refresh: persisted.refresh_token.map(Secret::new),
                    }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "token file is corrupt, ignoring it");
                    Slots::default()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no token file yet");
                Slots::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read token file");
                Slots::default()
            }
        };

        Self {
            area: Area::File(path),
            slots: RwLock::new(slots),
        }
    }

    /// Store that lives only as long as the process.
    pub fn memory() -> Self {
        Self {
            area: Area::Memory,
            slots: RwLock::new(Slots::default()),
        }
    }

    /// Store with no storage area behind it.
    pub fn unavailable() -> Self {
        Self {
            area: Area::Unavailable,
            slots: RwLock::new(Slots::default()),
        }
    }

    /// Whether this store can hold tokens at all.
    pub fn is_available(&self) -> bool {
        !matches!(self.area, Area::Unavailable)
    }

    pub fn access(&self) -> Option<String> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.access.as_ref().map(|t| t.expose().clone())
    }

    pub fn refresh(&self) -> Option<String> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.refresh.as_ref().map(|t| t.expose().clone())
    }

    /// Whether either token is present.
    pub fn has_tokens(&self) -> bool {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.access.is_some() || slots.refresh.is_some()
    }

    pub fn set_access(&self, token: impl Into<String>) {
        self.update(|slots| slots.access = Some(Secret::new(token.into())));
    }

    pub fn set_refresh(&self, token: impl Into<String>) {
        self.update(|slots| slots.refresh = Some(Secret::new(token.into())));
    }

    /// Replace both tokens in one step.
    pub fn set_pair(&self, access: impl Into<String>, refresh: impl Into<String>) {
        self.update(|slots| {
            slots.access = Some(Secret::new(access.into()));
            slots.refresh = Some(Secret::new(refresh.into()));
        });
    }

    /// Remove both tokens. Safe to call on an empty store.
    pub fn clear(&self) {
        if !self.is_available() {
            return;
        }
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        slots.access = None;
        slots.refresh = None;
        if let Area::File(path) = &self.area {
            match std::fs::remove_file(path) {
                Ok(()) => debug!(path = %path.display(), "removed token file"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "failed to remove token file"),
            }
        }
    }

    fn update(&self, apply: impl FnOnce(&mut Slots)) {
        if !self.is_available() {
            return;
        }
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        apply(&mut slots);
        if let Area::File(path) = &self.area {
            if let Err(e) = write_atomic(path, &slots) {
                warn!(path = %path.display(), error = %e, "failed to persist tokens");
            }
        }
    }
}

/// Write the token file atomically.
///
/// Writes a temp file next to the target, restricts it to 0600 (unix only)
/// and renames it over the target.
fn write_atomic(path: &Path, slots: &Slots) -> std::io::Result<()> {
    let persisted = PersistedRef {
        access_token: slots.access.as_ref().map(|t| t.expose().as_str()),
        refresh_token: slots.refresh.as_ref().map(|t| t.expose().as_str()),
    };
    let json = serde_json::to_string_pretty(&persisted).map_err(std::io::Error::other)?;

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let tmp_path = dir.join(format!(".tokens.tmp.{}", std::process::id()));
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;
    debug!(path = %path.display(), "persisted tokens");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

    #[test]
    fn empty_store_has_no_tokens() {
        let store = TokenStore::memory();
        assert!(store.access().is_none());
        assert!(store.refresh().is_none());
        assert!(!store.has_tokens());
    }

    #[test]
    fn set_overwrites_unconditionally() {
        let store = TokenStore::memory();
        store.set_access("at_1");
        store.set_access("at_2");
        store.set_refresh("rt_1");
        assert_eq!(store.access().as_deref(), Some("at_2"));
        assert_eq!(store.refresh().as_deref(), Some("rt_1"));
    }

    #[test]
    fn set_pair_supersedes_both() {
        let store = TokenStore::memory();
        store.set_pair("at_old", "rt_old");
        store.set_pair("at_new", "rt_new");
        assert_eq!(store.access().as_deref(), Some("at_new"));
        assert_eq!(store.refresh().as_deref(), Some("rt_new"));
    }

    #[test]
    fn clear_on_empty_store_is_noop() {
        let store = TokenStore::memory();
        store.clear();
        store.clear();
        assert!(store.access().is_none());
        assert!(store.refresh().is_none());
    }

    #[test]
    fn clear_removes_both() {
        let store = TokenStore::memory();
        store.set_pair("at", "rt");
        store.clear();
        assert!(!store.has_tokens());
    }

    #[test]
    fn unavailable_store_ignores_writes() {
        let store = TokenStore::unavailable();
        assert!(!store.is_available());
        store.set_pair("at", "rt");
        store.set_access("at_2");
        assert!(store.access().is_none());
        assert!(store.refresh().is_none());
        store.clear();
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let store = TokenStore::file(path.clone());
        store.set_pair("at_1", "rt_1");
        drop(store);

        let reopened = TokenStore::file(path);
        assert_eq!(reopened.access().as_deref(), Some("at_1"));
        assert_eq!(reopened.refresh().as_deref(), Some("rt_1"));
    }

    #[test]
    fn file_uses_storage_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        TokenStore::file(path.clone()).set_pair("at_1", "rt_1");

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json[ACCESS_TOKEN_KEY], "at_1");
        assert_eq!(json[REFRESH_TOKEN_KEY], "rt_1");
    }

    #[test]
    fn missing_file_is_empty_and_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let store = TokenStore::file(path.clone());
        assert!(!store.has_tokens());
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_file_is_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = TokenStore::file(path);
        assert!(store.access().is_none());
    }

    #[test]
    fn clear_removes_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let store = TokenStore::file(path.clone());
        store.set_pair("at", "rt");
        assert!(path.exists());

        store.clear();
        assert!(!path.exists());
        store.clear();
        assert!(TokenStore::file(path).access().is_none());
    }

    #[test]
    fn creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tokens.json");

        TokenStore::file(path.clone()).set_access("at");
        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_0600() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        TokenStore::file(path.clone()).set_pair("at", "rt");

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "token file must be 0600, got {mode:o}");
    }

    #[test]
    fn concurrent_writers_leave_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        let store = std::sync::Arc::new(TokenStore::file(path.clone()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || store.set_pair(format!("at_{i}"), format!("rt_{i}")))
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let reopened = TokenStore::file(path);
        let access = reopened.access().unwrap();
        let refresh = reopened.refresh().unwrap();
        assert_eq!(
            access.trim_start_matches("at_"),
            refresh.trim_start_matches("rt_"),
            "access and refresh must come from the same set_pair call"
        );
    }
}
