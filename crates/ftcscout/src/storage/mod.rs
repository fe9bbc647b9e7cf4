//! Storage layer for ftcscout.
//!
//! Scouting data lives in a flat string key-value store. [`KeyValueStore`]
//! is the backend seam, [`SqliteStore`] the durable backend, and
//! [`ScoutStore`] the gateway that lays users and entries out over the keys:
//!
//! - `ftc_scout_current_user` holds the active [`User`](crate::User) as JSON.
//! - `ftc_scout_entries_<name>` holds that observer's ordered entry list.

mod gateway;
pub mod migrations;
pub mod schema;
mod sqlite;

pub use gateway::{entries_key, EntryScan, ScoutStore, CURRENT_USER_KEY, ENTRIES_PREFIX};
pub use sqlite::{SqliteStore, StorageStats};

use crate::error::Result;

/// A durable map from string keys to string values.
///
/// Every call is a single synchronous write or read; there are no
/// transactions spanning calls.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Returns `true` if it was present.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<bool>;

    /// All keys starting with `prefix`, in key order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;
}
