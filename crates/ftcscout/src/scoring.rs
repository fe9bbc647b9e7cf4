//! Point calculation for scouting entries.

use serde::{Deserialize, Serialize};

use crate::entry::ScoutingEntry;

/// Points awarded for each artifact scored during tele-op.
pub const POINTS_PER_ARTIFACT: i64 = 3;

/// The point-bearing fields of an entry, any of which may be missing.
///
/// Used to preview a total while a form is still being filled in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointInputs {
    /// Artifacts scored during tele-op.
    #[serde(default)]
    pub artifacts_scored: Option<i64>,
    /// Autonomous period total.
    #[serde(default)]
    pub autonomous_total: Option<i64>,
}

impl PointInputs {
    /// Inputs with both fields present.
    #[must_use]
    pub fn new(artifacts_scored: i64, autonomous_total: i64) -> Self {
        Self {
            artifacts_scored: Some(artifacts_scored),
            autonomous_total: Some(autonomous_total),
        }
    }
}

impl From<&ScoutingEntry> for PointInputs {
    fn from(entry: &ScoutingEntry) -> Self {
        Self::new(entry.artifacts_scored, entry.autonomous_total)
    }
}

/// Total points: three per artifact plus the autonomous total.
///
/// Missing fields count as zero. Negative inputs produce negative totals;
/// results beyond the `i64` range saturate.
#[must_use]
pub fn calculate_points(inputs: PointInputs) -> i64 {
    let artifact_points = inputs
        .artifacts_scored
        .unwrap_or(0)
        .saturating_mul(POINTS_PER_ARTIFACT);
    let auto_points = inputs.autonomous_total.unwrap_or(0);
    artifact_points.saturating_add(auto_points)
}
