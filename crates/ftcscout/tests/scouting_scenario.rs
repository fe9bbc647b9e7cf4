//! End-to-end scouting flow over a file-backed store.

use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use ftcscout::export::to_csv_string;
use ftcscout::storage::entries_key;
use ftcscout::{
    team_averages, unique_teams, user_averages, EntryForm, KeyValueStore, ScoutStore, Session,
};

struct TempDb {
    dir: PathBuf,
}

impl TempDb {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("ftcscout_{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        Self { dir }
    }

    fn path(&self) -> PathBuf {
        self.dir.join("scouting.db")
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

fn form(team: &str, auto: i64, artifacts: i64, cycle: f64) -> EntryForm {
    EntryForm {
        team_name: team.to_string(),
        autonomous_total: auto,
        artifacts_scored: artifacts,
        cycle_time: cycle,
        ..EntryForm::default()
    }
}

#[test]
fn test_alice_scouts_team_118() {
    let db = TempDb::new("scenario");
    let mut session = Session::new(ScoutStore::open(db.path()).unwrap());
    session.login("Alice", "118").unwrap();

    let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
    let first = session.record(form("118", 10, 5, 8.0), t0).unwrap().unwrap();
    let second = session.record(form("118", 0, 2, 12.0), t0).unwrap().unwrap();

    assert_eq!(first.calculated_points, 25);
    assert_eq!(second.calculated_points, 6);
    assert_ne!(first.id, second.id);

    let all = session.all_entries().unwrap();
    let averages = team_averages("118", &all);
    assert_eq!(averages.entry_count, 2);
    assert!((averages.avg_points - 15.5).abs() < 1e-9);
    assert!((averages.avg_cycle_time - 10.0).abs() < 1e-9);

    let mine = user_averages("Alice", session.entries());
    assert_eq!(mine.entry_count, 2);

    let empty = team_averages("9999", &all);
    assert_eq!(empty.entry_count, 0);
    assert!(empty.avg_points.abs() < f64::EPSILON);
}

#[test]
fn test_session_survives_reopen() {
    let db = TempDb::new("reopen");
    {
        let mut session = Session::new(ScoutStore::open(db.path()).unwrap());
        session.login("Bob", "254").unwrap();
        session
            .record(form("7236", 3, 4, 5.5), Utc::now())
            .unwrap()
            .unwrap();
    }

    let resumed = Session::resume(ScoutStore::open(db.path()).unwrap()).unwrap();
    let user = resumed.current_user().unwrap();
    assert_eq!(user.name, "Bob");
    assert_eq!(user.current_team, "254");
    assert_eq!(resumed.entries().len(), 1);
    assert_eq!(resumed.entries()[0].calculated_points, 15);
}

#[test]
fn test_two_observers_share_team_statistics() {
    let db = TempDb::new("observers");
    let mut session = Session::new(ScoutStore::open(db.path()).unwrap());

    session.login("Alice", "118").unwrap();
    session
        .record(form("118", 10, 5, 8.0), Utc::now())
        .unwrap();
    session.logout().unwrap();

    session.login("Bob", "254").unwrap();
    session.record(form("118", 4, 2, 9.0), Utc::now()).unwrap();
    session.record(form("254", 0, 1, 7.0), Utc::now()).unwrap();

    let all = session.all_entries().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(unique_teams(&all), vec!["118", "254"]);
    assert_eq!(team_averages("118", &all).entry_count, 2);
    assert_eq!(session.store().observers().unwrap(), vec!["Alice", "Bob"]);

    let csv = to_csv_string(&all).unwrap();
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.starts_with("Team,User,Timestamp,"));
}

#[test]
fn test_corrupt_observer_is_skipped_by_scan() {
    let db = TempDb::new("corrupt");
    let store = ScoutStore::open(db.path()).unwrap();
    store
        .backend()
        .set(&entries_key("Mallory"), "definitely not json")
        .unwrap();

    let mut session = Session::new(store);
    session.login("Alice", "118").unwrap();
    session.record(form("118", 1, 1, 1.0), Utc::now()).unwrap();

    assert!(session.all_entries().unwrap_err().is_corrupt_record());

    let scan = session.store().scan_entries().unwrap();
    assert_eq!(scan.entries.len(), 1);
    assert_eq!(scan.corrupt.len(), 1);
}
