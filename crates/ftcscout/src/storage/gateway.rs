//! Namespaced persistence of users and scouting entries.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::{KeyValueStore, SqliteStore};
use crate::entry::{ScoutingEntry, User};
use crate::error::{Error, Result};

/// Key of the singleton "current user" slot.
pub const CURRENT_USER_KEY: &str = "ftc_scout_current_user";

/// Prefix of every per-observer entry list key.
pub const ENTRIES_PREFIX: &str = "ftc_scout_entries_";

/// The key holding `user_name`'s entry list.
#[must_use]
pub fn entries_key(user_name: &str) -> String {
    format!("{ENTRIES_PREFIX}{user_name}")
}

/// Result of scanning every entry namespace while tolerating bad data.
#[derive(Debug, Default)]
pub struct EntryScan {
    /// Entries from every namespace that decoded cleanly.
    pub entries: Vec<ScoutingEntry>,
    /// Namespaces whose stored value failed to decode, with the reason.
    pub corrupt: Vec<Error>,
}

impl EntryScan {
    /// Check whether every namespace decoded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.corrupt.is_empty()
    }
}

/// Gateway between scouting records and a [`KeyValueStore`].
///
/// Every mutation is a read-modify-write of one observer's full list. Two
/// writers working on the same observer at once can lose an update.
#[derive(Debug)]
pub struct ScoutStore<K = SqliteStore> {
    backend: K,
}

impl ScoutStore<SqliteStore> {
    /// Open a `SQLite`-backed store at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(SqliteStore::open(path)?))
    }

    /// Open an in-memory store.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(SqliteStore::open_in_memory()?))
    }
}

impl<K: KeyValueStore> ScoutStore<K> {
    /// Wrap a key-value backend.
    pub fn new(backend: K) -> Self {
        Self { backend }
    }

    /// The underlying backend.
    pub fn backend(&self) -> &K {
        &self.backend
    }

    /// Read the current user slot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptRecord`] if the slot holds something other than a user.
    pub fn current_user(&self) -> Result<Option<User>> {
        self.read(CURRENT_USER_KEY)
    }

    /// Point the current user slot at `user`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    pub fn set_current_user(&self, user: &User) -> Result<()> {
        self.backend
            .set(CURRENT_USER_KEY, &serde_json::to_string(user)?)
    }

    /// Empty the current user slot. Entries are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    pub fn clear_current_user(&self) -> Result<()> {
        self.backend.remove(CURRENT_USER_KEY)?;
        Ok(())
    }

    /// The stored entries of `user_name`, in insertion order.
    ///
    /// A namespace that was never written reads as an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptRecord`] if the stored list does not decode.
    pub fn entries(&self, user_name: &str) -> Result<Vec<ScoutingEntry>> {
        Ok(self.read(&entries_key(user_name))?.unwrap_or_default())
    }

    /// Replace the whole entry list of `user_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    pub fn save_entries(&self, user_name: &str, entries: &[ScoutingEntry]) -> Result<()> {
        let key = entries_key(user_name);
        self.backend.set(&key, &serde_json::to_string(entries)?)?;
        debug!("Saved {} entries under {key}", entries.len());
        Ok(())
    }

    /// Append `entry` to the list of `user_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be read or written.
    pub fn add_entry(&self, user_name: &str, entry: ScoutingEntry) -> Result<()> {
        let mut entries = self.entries(user_name)?;
        info!("Adding entry {} for team {}", entry.id, entry.team_name);
        entries.push(entry);
        self.save_entries(user_name, &entries)
    }

    /// Replace the entry with the same id as `entry`, keeping its position.
    ///
    /// Returns `false` and leaves the list untouched if no entry has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be read or written.
    pub fn update_entry(&self, user_name: &str, entry: ScoutingEntry) -> Result<bool> {
        let mut entries = self.entries(user_name)?;
        let Some(slot) = entries.iter_mut().find(|existing| existing.id == entry.id) else {
            debug!("No entry {} for {user_name}; update skipped", entry.id);
            return Ok(false);
        };
        info!("Updating entry {}", entry.id);
        *slot = entry;
        self.save_entries(user_name, &entries)?;
        Ok(true)
    }

    /// Remove the entry with `entry_id`, keeping the order of the rest.
    ///
    /// Returns `false` if no entry has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be read or written.
    pub fn delete_entry(&self, user_name: &str, entry_id: &str) -> Result<bool> {
        let mut entries = self.entries(user_name)?;
        let before = entries.len();
        entries.retain(|entry| entry.id != entry_id);
        if entries.len() == before {
            debug!("No entry {entry_id} for {user_name}; delete skipped");
            return Ok(false);
        }
        info!("Deleted entry {entry_id}");
        self.save_entries(user_name, &entries)?;
        Ok(true)
    }

    /// Every stored entry of every observer.
    ///
    /// Cost grows with the total amount of stored data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptRecord`] for the first namespace that does not decode.
    pub fn all_entries(&self) -> Result<Vec<ScoutingEntry>> {
        let mut all = Vec::new();
        for key in self.backend.keys_with_prefix(ENTRIES_PREFIX)? {
            let entries: Option<Vec<ScoutingEntry>> = self.read(&key)?;
            all.extend(entries.unwrap_or_default());
        }
        Ok(all)
    }

    /// Like [`all_entries`](Self::all_entries), but collects undecodable
    /// namespaces into the report instead of failing.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backend itself cannot be read.
    pub fn scan_entries(&self) -> Result<EntryScan> {
        let mut scan = EntryScan::default();
        for key in self.backend.keys_with_prefix(ENTRIES_PREFIX)? {
            match self.read::<Vec<ScoutingEntry>>(&key) {
                Ok(entries) => scan.entries.extend(entries.unwrap_or_default()),
                Err(err) if err.is_corrupt_record() => {
                    warn!("Skipping {err}");
                    scan.corrupt.push(err);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(scan)
    }

    /// Names of every observer with an entry namespace, in key order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn observers(&self) -> Result<Vec<String>> {
        Ok(self
            .backend
            .keys_with_prefix(ENTRIES_PREFIX)?
            .into_iter()
            .filter_map(|key| key.strip_prefix(ENTRIES_PREFIX).map(str::to_string))
            .collect())
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.backend.get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| Error::corrupt_record(key, source)),
            None => Ok(None),
        }
    }
}
