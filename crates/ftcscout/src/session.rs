//! The active observer and their cached entries.
//!
//! A [`Session`] is either logged out or logged in as one [`User`]. While
//! logged in it holds that user's entries as last read from storage, and
//! every write goes through the store before the cache is reloaded.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::entry::{EntryEdit, EntryForm, ScoutingEntry, User};
use crate::error::{Error, Result};
use crate::storage::{KeyValueStore, ScoutStore, SqliteStore};

/// Where a session currently stands.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    /// No observer; the cache is empty.
    #[default]
    LoggedOut,
    /// An observer is active.
    LoggedIn {
        /// The active observer.
        user: User,
        /// Their entries, in stored order.
        entries: Vec<ScoutingEntry>,
    },
}

/// An observer session bound to a store.
#[derive(Debug)]
pub struct Session<K = SqliteStore> {
    store: ScoutStore<K>,
    state: SessionState,
}

impl<K: KeyValueStore> Session<K> {
    /// Start a logged-out session over `store`.
    pub fn new(store: ScoutStore<K>) -> Self {
        Self {
            store,
            state: SessionState::LoggedOut,
        }
    }

    /// Restore whichever observer was logged in when the store was last used.
    ///
    /// # Errors
    ///
    /// Returns an error if the current user pointer or their entries cannot be read.
    pub fn resume(store: ScoutStore<K>) -> Result<Self> {
        let mut session = Self::new(store);
        if let Some(user) = session.store.current_user()? {
            debug!("Resuming session for {}", user.name);
            let entries = session.store.entries(&user.name)?;
            session.state = SessionState::LoggedIn { user, entries };
        }
        Ok(session)
    }

    /// Log in as `name` on `team`, replacing any current observer.
    ///
    /// Surrounding whitespace is trimmed from both values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLogin`] if either value is blank, or an error
    /// if the pointer cannot be written or the entries read.
    pub fn login(&mut self, name: &str, team: &str) -> Result<()> {
        let (name, team) = (name.trim(), team.trim());
        if name.is_empty() {
            return Err(Error::invalid_login("observer name must not be blank"));
        }
        if team.is_empty() {
            return Err(Error::invalid_login("team must not be blank"));
        }
        let user = User::new(name, team);
        self.store.set_current_user(&user)?;
        let entries = self.store.entries(&user.name)?;
        info!("{} logged in with {} entries", user.name, entries.len());
        self.state = SessionState::LoggedIn { user, entries };
        Ok(())
    }

    /// Clear the current observer. Stored entries are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the pointer cannot be cleared.
    pub fn logout(&mut self) -> Result<()> {
        self.store.clear_current_user()?;
        if let SessionState::LoggedIn { user, .. } = &self.state {
            info!("{} logged out", user.name);
        }
        self.state = SessionState::LoggedOut;
        Ok(())
    }

    /// The session state.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The active observer, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        match &self.state {
            SessionState::LoggedIn { user, .. } => Some(user),
            SessionState::LoggedOut => None,
        }
    }

    /// Check whether an observer is active.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.current_user().is_some()
    }

    /// The active observer's cached entries; empty when logged out.
    #[must_use]
    pub fn entries(&self) -> &[ScoutingEntry] {
        match &self.state {
            SessionState::LoggedIn { entries, .. } => entries,
            SessionState::LoggedOut => &[],
        }
    }

    /// Look up one of the active observer's entries by id.
    #[must_use]
    pub fn find_entry(&self, id: &str) -> Option<&ScoutingEntry> {
        self.entries().iter().find(|entry| entry.id == id)
    }

    /// Stamp `form` as a new entry created at `now` and store it.
    ///
    /// The id is the creation time in milliseconds, bumped forward past any
    /// id the observer already uses. Returns `None` when logged out.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be updated.
    pub fn record(
        &mut self,
        form: EntryForm,
        now: DateTime<Utc>,
    ) -> Result<Option<ScoutingEntry>> {
        let Some(user) = self.current_user() else {
            return Ok(None);
        };
        let mut created_at = now;
        while self.find_entry(&created_at.timestamp_millis().to_string()).is_some() {
            created_at += Duration::milliseconds(1);
        }
        let entry = ScoutingEntry::from_form(form, user.name.clone(), created_at);
        self.add_entry(entry)
    }

    /// Store `entry` under the active observer and return the stored form.
    ///
    /// The entry is re-owned by the active observer and its points are
    /// recomputed. Returns `None` when logged out.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be updated.
    pub fn add_entry(&mut self, entry: ScoutingEntry) -> Result<Option<ScoutingEntry>> {
        let Some(entry) = self.owned(entry) else {
            return Ok(None);
        };
        self.store.add_entry(&entry.user_name, entry.clone())?;
        self.refresh()?;
        Ok(Some(entry))
    }

    /// Replace the active observer's entry with the same id.
    ///
    /// Returns `false` when logged out or when no entry has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be updated.
    pub fn update_entry(&mut self, entry: ScoutingEntry) -> Result<bool> {
        let Some(entry) = self.owned(entry) else {
            return Ok(false);
        };
        let user_name = entry.user_name.clone();
        let replaced = self.store.update_entry(&user_name, entry)?;
        self.refresh()?;
        Ok(replaced)
    }

    /// Apply `edit` to the entry with `id` and store the result.
    ///
    /// Returns the replacement, or `None` when logged out or the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be updated.
    pub fn edit_entry(&mut self, id: &str, edit: EntryEdit) -> Result<Option<ScoutingEntry>> {
        let Some(next) = self.find_entry(id).map(|entry| entry.with_edit(edit)) else {
            return Ok(None);
        };
        if self.update_entry(next.clone())? {
            Ok(Some(next))
        } else {
            Ok(None)
        }
    }

    /// Delete the active observer's entry with `id`.
    ///
    /// Returns `false` when logged out or when no entry has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be updated.
    pub fn delete_entry(&mut self, id: &str) -> Result<bool> {
        let Some(user_name) = self.current_user().map(|user| user.name.clone()) else {
            return Ok(false);
        };
        let removed = self.store.delete_entry(&user_name, id)?;
        self.refresh()?;
        Ok(removed)
    }

    /// Reload the active observer's entries from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the entries cannot be read.
    pub fn refresh(&mut self) -> Result<()> {
        if let SessionState::LoggedIn { user, entries } = &mut self.state {
            *entries = self.store.entries(&user.name)?;
            debug!("Cache for {} holds {} entries", user.name, entries.len());
        }
        Ok(())
    }

    /// Every observer's entries, read fresh from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if any namespace cannot be read or decoded.
    pub fn all_entries(&self) -> Result<Vec<ScoutingEntry>> {
        self.store.all_entries()
    }

    /// The store this session writes to.
    #[must_use]
    pub fn store(&self) -> &ScoutStore<K> {
        &self.store
    }

    fn owned(&self, mut entry: ScoutingEntry) -> Option<ScoutingEntry> {
        let user = self.current_user()?;
        entry.user_name.clone_from(&user.name);
        entry.recompute_points();
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn create_test_session() -> Session {
        Session::new(ScoutStore::open_in_memory().expect("failed to create test store"))
    }

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    fn form(team: &str, auto: i64, artifacts: i64) -> EntryForm {
        EntryForm {
            team_name: team.to_string(),
            autonomous_total: auto,
            artifacts_scored: artifacts,
            cycle_time: 6.0,
            ..EntryForm::default()
        }
    }

    #[test]
    fn test_new_session_is_logged_out() {
        let session = create_test_session();
        assert!(!session.is_logged_in());
        assert!(session.entries().is_empty());
        assert_eq!(session.state(), &SessionState::LoggedOut);
    }

    #[test]
    fn test_login_persists_pointer() {
        let mut session = create_test_session();
        session.login("Alice", "118").unwrap();

        let user = User::new("Alice", "118");
        assert_eq!(session.current_user(), Some(&user));
        assert_eq!(session.store().current_user().unwrap(), Some(user));
    }

    #[test]
    fn test_login_rejects_blank_values() {
        let mut session = create_test_session();

        let err = session.login("", "   ").unwrap_err();
        assert!(matches!(err, Error::InvalidLogin { .. }));
        assert!(session.login("Alice", "\t").is_err());
        assert!(!session.is_logged_in());
        assert!(session.store().current_user().unwrap().is_none());
    }

    #[test]
    fn test_login_trims_values() {
        let mut session = create_test_session();
        session.login(" Alice ", " 118 ").unwrap();
        session.record(form("118", 1, 1), at(1_000)).unwrap();

        assert_eq!(session.current_user(), Some(&User::new("Alice", "118")));
        assert_eq!(session.store().observers().unwrap(), vec!["Alice"]);
    }

    #[test]
    fn test_record_huge_counts_saturates_points() {
        let mut session = create_test_session();
        session.login("Alice", "118").unwrap();

        let entry = session
            .record(form("118", 0, i64::MAX), at(1_000))
            .unwrap()
            .unwrap();
        assert_eq!(entry.calculated_points, i64::MAX);
        assert!(entry.points_consistent());
    }

    #[test]
    fn test_logged_out_writes_are_noops() {
        let mut session = create_test_session();

        assert!(session.record(form("118", 1, 1), at(1_000)).unwrap().is_none());
        let entry = ScoutingEntry::from_form(form("118", 1, 1), "Alice", at(1_000));
        assert!(session.add_entry(entry.clone()).unwrap().is_none());
        assert!(!session.update_entry(entry).unwrap());
        assert!(!session.delete_entry("1000").unwrap());
        assert!(session.edit_entry("1000", EntryEdit::default()).unwrap().is_none());

        assert!(session.all_entries().unwrap().is_empty());
    }

    #[test]
    fn test_record_stamps_and_caches() {
        let mut session = create_test_session();
        session.login("Alice", "118").unwrap();

        let entry = session.record(form("118", 10, 5), at(5_000)).unwrap().unwrap();
        assert_eq!(entry.id, "5000");
        assert_eq!(entry.user_name, "Alice");
        assert_eq!(entry.calculated_points, 25);
        assert_eq!(session.entries(), &[entry]);
    }

    #[test]
    fn test_record_ids_are_unique_within_same_millisecond() {
        let mut session = create_test_session();
        session.login("Alice", "118").unwrap();

        let first = session.record(form("118", 1, 0), at(5_000)).unwrap().unwrap();
        let second = session.record(form("254", 2, 0), at(5_000)).unwrap().unwrap();

        assert_eq!(first.id, "5000");
        assert_eq!(second.id, "5001");
        assert_eq!(second.timestamp, at(5_001));
    }

    #[test]
    fn test_add_entry_forces_owner_and_points() {
        let mut session = create_test_session();
        session.login("Alice", "118").unwrap();

        let mut foreign = ScoutingEntry::from_form(form("118", 4, 4), "Mallory", at(1_000));
        foreign.calculated_points = 999;

        let stored = session.add_entry(foreign).unwrap().unwrap();
        assert_eq!(stored.user_name, "Alice");
        assert_eq!(stored.calculated_points, 16);
        assert!(session.store().entries("Mallory").unwrap().is_empty());
    }

    #[test]
    fn test_edit_entry_recomputes() {
        let mut session = create_test_session();
        session.login("Alice", "118").unwrap();
        session.record(form("118", 10, 5), at(1_000)).unwrap();

        let edited = session
            .edit_entry(
                "1000",
                EntryEdit {
                    artifacts_scored: Some(1),
                    ..EntryEdit::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(edited.calculated_points, 13);
        assert_eq!(session.find_entry("1000"), Some(&edited));
        assert!(session.edit_entry("nope", EntryEdit::default()).unwrap().is_none());
    }

    #[test]
    fn test_update_unknown_id_reports_false() {
        let mut session = create_test_session();
        session.login("Alice", "118").unwrap();
        session.record(form("118", 10, 5), at(1_000)).unwrap();

        let stranger = ScoutingEntry::from_form(form("999", 0, 0), "Alice", at(9_000));
        assert!(!session.update_entry(stranger).unwrap());
        assert_eq!(session.entries().len(), 1);
    }

    #[test]
    fn test_delete_entry() {
        let mut session = create_test_session();
        session.login("Alice", "118").unwrap();
        session.record(form("118", 1, 1), at(1_000)).unwrap();
        session.record(form("254", 1, 1), at(2_000)).unwrap();

        assert!(session.delete_entry("1000").unwrap());
        assert!(!session.delete_entry("1000").unwrap());
        assert_eq!(session.entries().len(), 1);
        assert_eq!(session.entries()[0].team_name, "254");
    }

    #[test]
    fn test_logout_keeps_entries() {
        let mut session = create_test_session();
        session.login("Alice", "118").unwrap();
        session.record(form("118", 1, 1), at(1_000)).unwrap();

        session.logout().unwrap();
        assert!(!session.is_logged_in());
        assert!(session.entries().is_empty());
        assert!(session.store().current_user().unwrap().is_none());
        assert_eq!(session.store().entries("Alice").unwrap().len(), 1);

        session.login("Alice", "118").unwrap();
        assert_eq!(session.entries().len(), 1);
    }

    #[test]
    fn test_resume_restores_logged_in_state() {
        let store = ScoutStore::open_in_memory().unwrap();
        let mut session = Session::new(store);
        session.login("Bob", "254").unwrap();
        session.record(form("254", 3, 3), at(1_000)).unwrap();

        let resumed = Session::resume(session.store).unwrap();
        assert_eq!(resumed.current_user(), Some(&User::new("Bob", "254")));
        assert_eq!(resumed.entries().len(), 1);
    }

    #[test]
    fn test_resume_without_pointer_is_logged_out() {
        let resumed = Session::resume(ScoutStore::open_in_memory().unwrap()).unwrap();
        assert!(!resumed.is_logged_in());
    }

    #[test]
    fn test_all_entries_spans_observers() {
        let mut session = create_test_session();
        session.login("Alice", "118").unwrap();
        session.record(form("118", 1, 1), at(1_000)).unwrap();
        session.login("Bob", "254").unwrap();
        session.record(form("118", 2, 2), at(2_000)).unwrap();

        assert_eq!(session.entries().len(), 1);
        assert_eq!(session.all_entries().unwrap().len(), 2);
    }
}
