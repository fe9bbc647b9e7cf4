//! Aggregate statistics over scouting entries.
//!
//! Everything here is recomputed from the full entry list on each call.
//! Scouting volumes are small enough that no running totals are kept.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::entry::ScoutingEntry;

/// Mean performance figures for one team or one observer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Averages {
    /// The team or observer name the figures were filtered by.
    pub name: String,
    /// Mean autonomous total.
    pub avg_autonomous: f64,
    /// Mean artifacts scored.
    pub avg_artifacts: f64,
    /// Mean cycle time in seconds.
    pub avg_cycle_time: f64,
    /// Mean calculated points.
    pub avg_points: f64,
    /// Number of entries that matched.
    pub entry_count: usize,
}

/// Averages keyed by team name.
pub type TeamAverages = Averages;

/// Averages keyed by observer name.
pub type UserAverages = Averages;

impl Averages {
    /// An all-zero summary for a name with no matching entries.
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Check whether any entry contributed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }
}

#[derive(Default)]
struct Totals {
    autonomous: f64,
    artifacts: f64,
    cycle_time: f64,
    points: f64,
    count: usize,
}

impl Totals {
    #[allow(clippy::cast_precision_loss)]
    fn add(&mut self, entry: &ScoutingEntry) {
        self.autonomous += entry.autonomous_total as f64;
        self.artifacts += entry.artifacts_scored as f64;
        self.cycle_time += entry.cycle_time;
        self.points += entry.calculated_points as f64;
        self.count += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    fn into_averages(self, name: &str) -> Averages {
        if self.count == 0 {
            return Averages::empty(name);
        }
        let count = self.count as f64;
        Averages {
            name: name.to_string(),
            avg_autonomous: self.autonomous / count,
            avg_artifacts: self.artifacts / count,
            avg_cycle_time: self.cycle_time / count,
            avg_points: self.points / count,
            entry_count: self.count,
        }
    }
}

fn averages_where(
    name: &str,
    entries: &[ScoutingEntry],
    key: impl Fn(&ScoutingEntry) -> &str,
) -> Averages {
    let mut totals = Totals::default();
    for entry in entries {
        if key(entry) == name {
            totals.add(entry);
        }
    }
    totals.into_averages(name)
}

/// Averages over every entry whose team name equals `team_name`.
#[must_use]
pub fn team_averages(team_name: &str, entries: &[ScoutingEntry]) -> TeamAverages {
    averages_where(team_name, entries, |entry| entry.team_name.as_str())
}

/// Averages over every entry recorded by `user_name`.
#[must_use]
pub fn user_averages(user_name: &str, entries: &[ScoutingEntry]) -> UserAverages {
    averages_where(user_name, entries, |entry| entry.user_name.as_str())
}

/// Distinct team names, sorted.
#[must_use]
pub fn unique_teams(entries: &[ScoutingEntry]) -> Vec<String> {
    distinct(entries, |entry| entry.team_name.as_str())
}

/// Distinct observer names, sorted.
#[must_use]
pub fn unique_users(entries: &[ScoutingEntry]) -> Vec<String> {
    distinct(entries, |entry| entry.user_name.as_str())
}

fn distinct(entries: &[ScoutingEntry], key: impl Fn(&ScoutingEntry) -> &str) -> Vec<String> {
    entries
        .iter()
        .map(key)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// One summary per distinct team, in team name order.
#[must_use]
pub fn all_team_averages(entries: &[ScoutingEntry]) -> Vec<TeamAverages> {
    unique_teams(entries)
        .iter()
        .map(|team| team_averages(team, entries))
        .collect()
}

/// One summary per distinct observer, in observer name order.
#[must_use]
pub fn all_user_averages(entries: &[ScoutingEntry]) -> Vec<UserAverages> {
    unique_users(entries)
        .iter()
        .map(|user| user_averages(user, entries))
        .collect()
}

/// Entries sorted newest first, grouped by observer.
///
/// Groups appear in the order their newest entry appears.
#[must_use]
pub fn group_by_user(entries: &[ScoutingEntry]) -> Vec<(String, Vec<&ScoutingEntry>)> {
    let mut sorted: Vec<&ScoutingEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let mut groups: Vec<(String, Vec<&ScoutingEntry>)> = Vec::new();
    for entry in sorted {
        match groups.iter_mut().find(|(name, _)| *name == entry.user_name) {
            Some((_, group)) => group.push(entry),
            None => groups.push((entry.user_name.clone(), vec![entry])),
        }
    }
    groups
}
