//! `ftcscout` - Scouting records for FTC robotics competitions
//!
//! Observers record per-team robot performance observations. Entries are
//! persisted per observer in a local key-value store, and the aggregation
//! functions compute per-team and per-observer averages across everyone's
//! entries.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod entry;
pub mod error;
pub mod export;
pub mod logging;
pub mod scoring;
pub mod session;
pub mod sketch;
pub mod stats;
pub mod storage;

pub use config::Config;
pub use entry::{EntryEdit, EntryForm, ScoutingEntry, User};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use scoring::{calculate_points, PointInputs};
pub use session::{Session, SessionState};
pub use stats::{
    all_team_averages, all_user_averages, team_averages, unique_teams, unique_users,
    user_averages, Averages, TeamAverages, UserAverages,
};
pub use storage::{EntryScan, KeyValueStore, ScoutStore, SqliteStore, StorageStats};
