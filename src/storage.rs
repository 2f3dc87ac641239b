//! Key-value persistence for the client session.
//!
//! The [`api::Client`](crate::api::Client) mirrors its session into a [`SessionStore`] so
//! that a restarted application picks up where it left off. Two stores ship with the crate:
//!
//! - [`MemoryStore`]: concurrent in-memory map, the default and the one to use in tests
//! - [`FileStore`]: a JSON object on disk, rewritten on every change
//!
//! Any other backend (OS keychain, browser storage behind wasm bindings, a database row)
//! only needs to implement the three methods of [`SessionStore`].

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use dashmap::DashMap;

use crate::Result;

/// Minimal string key-value store used to persist the session.
pub trait SessionStore: Send + Sync + 'static {
    /// Returns the stored value, or `None` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Applies a batch of changes as a unit: `Some` values are stored, `None` keys removed.
    ///
    /// Either every change lands or the store is left as it was. The default applies the
    /// changes one at a time and, when one fails, restores the keys already changed before
    /// returning the error. Stores that can commit a batch at once should override it.
    fn apply(&self, changes: &[(&str, Option<&str>)]) -> Result<()> {
        let mut applied: Vec<(&str, Option<String>)> = Vec::with_capacity(changes.len());

        for &(key, value) in changes {
            let result = self.get(key).and_then(|previous| {
                match value {
                    Some(value) => self.set(key, value),
                    None => self.remove(key),
                }
                .map(|()| previous)
            });

            let previous = match result {
                Ok(previous) => previous,
                Err(e) => {
                    for (key, previous) in applied.into_iter().rev() {
                        let restored: Result<()> = match previous {
                            Some(value) => self.set(key, &value),
                            None => self.remove(key),
                        };

                        if let Err(restore_err) = restored {
                            #[cfg(feature = "tracing")]
                            tracing::error!(key, error = %restore_err, "failed to restore session key");
                            #[cfg(not(feature = "tracing"))]
                            let _: crate::error::Error = restore_err;
                        }
                    }

                    return Err(e);
                }
            };

            applied.push((key, previous));
        }

        Ok(())
    }
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn apply(&self, changes: &[(&str, Option<&str>)]) -> Result<()> {
        (**self).apply(changes)
    }
}

/// In-memory [`SessionStore`]. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// [`SessionStore`] backed by a single JSON object file.
///
/// The file is read once by [`FileStore::open`]; every `set`, `remove` and `apply` rewrites
/// it. Rewrites go to a sibling `.tmp` file that is then renamed over the original, so the
/// file on disk always holds either the previous or the new contents.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is treated as an empty store and is only
    /// created on the first write.
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::Storage`](crate::error::Kind::Storage) error if the file exists but
    /// cannot be read, or [`Kind::Internal`](crate::error::Kind::Internal) if it is not a JSON
    /// object of strings.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = match fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        PathBuf::from(temp)
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp = self.temp_path();
        fs::write(&temp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        // A poisoned map is still a complete map; the last successful write is on disk.
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.apply(&[(key, Some(value))])
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.apply(&[(key, None)])
    }

    fn apply(&self, changes: &[(&str, Option<&str>)]) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        let mut next = entries.clone();
        for &(key, value) in changes {
            match value {
                Some(value) => next.insert(key.to_owned(), value.to_owned()),
                None => next.remove(key),
            };
        }

        // The map only changes once the new contents are on disk.
        if next != *entries {
            self.flush(&next)?;
            *entries = next;
        }
        Ok(())
    }
}
