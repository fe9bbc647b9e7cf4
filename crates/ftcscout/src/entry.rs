//! Core scouting record types.
//!
//! Field names serialize in camelCase so stored values keep the layout
//! `{"teamName": ..., "calculatedPoints": ...}` used by existing scouting data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{calculate_points, PointInputs};

/// The observer currently recording entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Observer name; also the storage namespace for their entries.
    pub name: String,
    /// The team the observer belongs to.
    pub current_team: String,
}

impl User {
    /// Create a new user.
    #[must_use]
    pub fn new(name: impl Into<String>, current_team: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            current_team: current_team.into(),
        }
    }
}

/// One observer's recorded performance data for one team.
///
/// Records are replaced whole on edit; nothing mutates a stored entry in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoutingEntry {
    /// Time-based identifier (creation time in epoch milliseconds).
    pub id: String,
    /// The team being observed.
    pub team_name: String,
    /// The observer who recorded this entry.
    pub user_name: String,
    /// When the entry was created.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    // Autonomous
    /// Autonomous period total.
    pub autonomous_total: i64,
    /// Whether the robot left its starting zone.
    pub autonomous_leave: bool,
    /// Free-text classification tag.
    pub classification: String,
    /// Free-text overflow notes.
    pub overflow: String,
    /// Freehand path sketch as a `data:` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_path_image: Option<String>,

    // Tele-op
    /// Artifacts scored during tele-op.
    pub artifacts_scored: i64,
    /// Average cycle time in seconds.
    pub cycle_time: f64,
    /// Free-text play style tag.
    pub play_style: String,
    /// Free-text top/bottom position tag.
    pub top_bot: String,

    /// `artifacts_scored * 3 + autonomous_total`.
    pub calculated_points: i64,
}

/// Observations captured by the entry form, before an entry is stamped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryForm {
    /// The team being observed.
    pub team_name: String,
    /// Autonomous period total.
    pub autonomous_total: i64,
    /// Whether the robot left its starting zone.
    pub autonomous_leave: bool,
    /// Free-text classification tag.
    pub classification: String,
    /// Free-text overflow notes.
    pub overflow: String,
    /// Path sketch as a `data:` URL.
    pub auto_path_image: Option<String>,
    /// Artifacts scored during tele-op.
    pub artifacts_scored: i64,
    /// Average cycle time in seconds.
    pub cycle_time: f64,
    /// Free-text play style tag.
    pub play_style: String,
    /// Free-text top/bottom position tag.
    pub top_bot: String,
}

/// A partial change to an existing entry. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
#[allow(missing_docs)]
pub struct EntryEdit {
    pub team_name: Option<String>,
    pub autonomous_total: Option<i64>,
    pub autonomous_leave: Option<bool>,
    pub classification: Option<String>,
    pub overflow: Option<String>,
    /// Replacement sketch. Applied after `clear_auto_path_image`.
    pub auto_path_image: Option<String>,
    /// Drop the attached sketch.
    pub clear_auto_path_image: bool,
    pub artifacts_scored: Option<i64>,
    pub cycle_time: Option<f64>,
    pub play_style: Option<String>,
    pub top_bot: Option<String>,
}

impl EntryEdit {
    /// Check whether the edit would change anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl ScoutingEntry {
    /// Stamp a form submission as a new entry owned by `user_name`.
    ///
    /// The id is derived from `created_at`, and points are computed from the
    /// form's autonomous total and artifact count.
    #[must_use]
    pub fn from_form(
        form: EntryForm,
        user_name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut entry = Self {
            id: created_at.timestamp_millis().to_string(),
            team_name: form.team_name,
            user_name: user_name.into(),
            timestamp: created_at,
            autonomous_total: form.autonomous_total,
            autonomous_leave: form.autonomous_leave,
            classification: form.classification,
            overflow: form.overflow,
            auto_path_image: form.auto_path_image,
            artifacts_scored: form.artifacts_scored,
            cycle_time: form.cycle_time,
            play_style: form.play_style,
            top_bot: form.top_bot,
            calculated_points: 0,
        };
        entry.recompute_points();
        entry
    }

    /// Produce the replacement record for an edit, with points recomputed.
    #[must_use]
    pub fn with_edit(&self, edit: EntryEdit) -> Self {
        let mut next = self.clone();
        if let Some(team_name) = edit.team_name {
            next.team_name = team_name;
        }
        if let Some(total) = edit.autonomous_total {
            next.autonomous_total = total;
        }
        if let Some(leave) = edit.autonomous_leave {
            next.autonomous_leave = leave;
        }
        if let Some(classification) = edit.classification {
            next.classification = classification;
        }
        if let Some(overflow) = edit.overflow {
            next.overflow = overflow;
        }
        if edit.clear_auto_path_image {
            next.auto_path_image = None;
        }
        if let Some(image) = edit.auto_path_image {
            next.auto_path_image = Some(image);
        }
        if let Some(artifacts) = edit.artifacts_scored {
            next.artifacts_scored = artifacts;
        }
        if let Some(cycle_time) = edit.cycle_time {
            next.cycle_time = cycle_time;
        }
        if let Some(play_style) = edit.play_style {
            next.play_style = play_style;
        }
        if let Some(top_bot) = edit.top_bot {
            next.top_bot = top_bot;
        }
        next.recompute_points();
        next
    }

    /// Reset `calculated_points` from the current field values.
    pub fn recompute_points(&mut self) {
        self.calculated_points = calculate_points(PointInputs::from(&*self));
    }

    /// Check that `calculated_points` matches the scoring formula.
    #[must_use]
    pub fn points_consistent(&self) -> bool {
        self.calculated_points == calculate_points(PointInputs::from(self))
    }

    /// Check whether a path sketch is attached.
    #[must_use]
    pub fn has_sketch(&self) -> bool {
        self.auto_path_image
            .as_deref()
            .is_some_and(|image| !image.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample_form() -> EntryForm {
        EntryForm {
            team_name: "118".to_string(),
            autonomous_total: 10,
            autonomous_leave: true,
            classification: "Level 1".to_string(),
            overflow: String::new(),
            auto_path_image: None,
            artifacts_scored: 5,
            cycle_time: 8.5,
            play_style: "Offense".to_string(),
            top_bot: "Top".to_string(),
        }
    }

    fn created_at() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_709_287_200_123).unwrap()
    }

    #[test]
    fn test_from_form_stamps_entry() {
        let entry = ScoutingEntry::from_form(sample_form(), "Alice", created_at());

        assert_eq!(entry.id, "1709287200123");
        assert_eq!(entry.user_name, "Alice");
        assert_eq!(entry.team_name, "118");
        assert_eq!(entry.timestamp, created_at());
        assert_eq!(entry.calculated_points, 25);
        assert!(entry.points_consistent());
    }

    #[test]
    fn test_with_edit_recomputes_points() {
        let entry = ScoutingEntry::from_form(sample_form(), "Alice", created_at());
        let edited = entry.with_edit(EntryEdit {
            artifacts_scored: Some(2),
            autonomous_total: Some(0),
            ..EntryEdit::default()
        });

        assert_eq!(edited.calculated_points, 6);
        assert_eq!(edited.id, entry.id);
        assert_eq!(edited.timestamp, entry.timestamp);
        assert_eq!(edited.play_style, entry.play_style);
    }

    #[test]
    fn test_with_edit_clears_sketch() {
        let mut form = sample_form();
        form.auto_path_image = Some("data:image/png;base64,AAAA".to_string());
        let entry = ScoutingEntry::from_form(form, "Alice", created_at());
        assert!(entry.has_sketch());

        let edited = entry.with_edit(EntryEdit {
            clear_auto_path_image: true,
            ..EntryEdit::default()
        });
        assert!(!edited.has_sketch());
    }

    #[test]
    fn test_points_consistent_detects_drift() {
        let mut entry = ScoutingEntry::from_form(sample_form(), "Alice", created_at());
        entry.artifacts_scored = 9;
        assert!(!entry.points_consistent());

        entry.recompute_points();
        assert!(entry.points_consistent());
        assert_eq!(entry.calculated_points, 37);
    }

    #[test]
    fn test_empty_sketch_is_not_a_sketch() {
        let mut form = sample_form();
        form.auto_path_image = Some(String::new());
        let entry = ScoutingEntry::from_form(form, "Alice", created_at());
        assert!(!entry.has_sketch());
    }

    #[test]
    fn test_edit_is_empty() {
        assert!(EntryEdit::default().is_empty());
        let edit = EntryEdit {
            top_bot: Some("Bot".to_string()),
            ..EntryEdit::default()
        };
        assert!(!edit.is_empty());
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let entry = ScoutingEntry::from_form(sample_form(), "Alice", created_at());
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["teamName"], "118");
        assert_eq!(json["userName"], "Alice");
        assert_eq!(json["timestamp"], 1_709_287_200_123_i64);
        assert_eq!(json["calculatedPoints"], 25);
        assert_eq!(json["autonomousLeave"], true);
        assert!(json.get("autoPathImage").is_none());
    }

    #[test]
    fn test_entry_deserializes_stored_record() {
        let stored = r#"{
            "id": "1709287200123",
            "teamName": "7236",
            "userName": "Bob",
            "timestamp": 1709287200123,
            "autonomousTotal": 4,
            "autonomousLeave": false,
            "classification": "",
            "overflow": "",
            "autoPathImage": "",
            "artifactsScored": 3,
            "cycleTime": 12,
            "playStyle": "Defense",
            "topBot": "Bot",
            "calculatedPoints": 13
        }"#;
        let entry: ScoutingEntry = serde_json::from_str(stored).unwrap();

        assert_eq!(entry.team_name, "7236");
        assert!((entry.cycle_time - 12.0).abs() < f64::EPSILON);
        assert_eq!(entry.auto_path_image.as_deref(), Some(""));
        assert!(entry.points_consistent());
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let user = User::new("Alice", "118");
        let json = serde_json::to_string(&user).unwrap();
        assert_eq!(json, r#"{"name":"Alice","currentTeam":"118"}"#);
    }
}
