//! CSV export of scouting entries.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::info;

use crate::entry::ScoutingEntry;
use crate::error::{Error, Result};

/// Column headers, in output order.
pub const CSV_HEADER: [&str; 12] = [
    "Team",
    "User",
    "Timestamp",
    "Auto Total",
    "Auto Leave",
    "Classification",
    "Overflow",
    "Artifacts",
    "Cycle Time",
    "Play Style",
    "Top/Bot",
    "Points",
];

/// Render a timestamp as an ISO-8601 UTC instant with millisecond precision.
#[must_use]
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn row(entry: &ScoutingEntry) -> [String; 12] {
    [
        entry.team_name.clone(),
        entry.user_name.clone(),
        format_timestamp(&entry.timestamp),
        entry.autonomous_total.to_string(),
        entry.autonomous_leave.to_string(),
        entry.classification.clone(),
        entry.overflow.clone(),
        entry.artifacts_scored.to_string(),
        entry.cycle_time.to_string(),
        entry.play_style.clone(),
        entry.top_bot.clone(),
        entry.calculated_points.to_string(),
    ]
}

/// Write `entries` as CSV, header first, one row per entry.
///
/// Path sketches are not exported.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_csv<W: Write>(writer: W, entries: &[ScoutingEntry]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    for entry in entries {
        csv.write_record(row(entry))?;
    }
    csv.flush()?;
    Ok(())
}

/// Render `entries` as a CSV document.
///
/// # Errors
///
/// Returns an error if the rows cannot be encoded.
pub fn to_csv_string(entries: &[ScoutingEntry]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, entries)?;
    String::from_utf8(buffer).map_err(|err| Error::Io(std::io::Error::other(err)))
}

/// Write `entries` to a CSV file at `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created or written.
pub fn export_to_path(path: &Path, entries: &[ScoutingEntry]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    let file = std::fs::File::create(path)?;
    write_csv(file, entries)?;
    info!("Exported {} entries to {}", entries.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::entry::EntryForm;

    fn sample_entry() -> ScoutingEntry {
        let form = EntryForm {
            team_name: "118".to_string(),
            autonomous_total: 10,
            autonomous_leave: true,
            classification: "Level 1".to_string(),
            overflow: String::new(),
            auto_path_image: Some("data:image/png;base64,AAAA".to_string()),
            artifacts_scored: 5,
            cycle_time: 8.5,
            play_style: "Offense".to_string(),
            top_bot: "Top".to_string(),
        };
        ScoutingEntry::from_form(
            form,
            "Alice",
            Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_format_timestamp() {
        let ts = Utc.timestamp_millis_opt(1_709_287_200_123).unwrap();
        assert_eq!(format_timestamp(&ts), "2024-03-01T10:00:00.123Z");
    }

    #[test]
    fn test_header_only_for_no_entries() {
        let csv = to_csv_string(&[]).unwrap();
        assert_eq!(
            csv,
            "Team,User,Timestamp,Auto Total,Auto Leave,Classification,Overflow,Artifacts,Cycle Time,Play Style,Top/Bot,Points\n"
        );
    }

    #[test]
    fn test_row_rendering() {
        let csv = to_csv_string(&[sample_entry()]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "118,Alice,2024-03-01T10:00:00.000Z,10,true,Level 1,,5,8.5,Offense,Top,25"
        );
    }

    #[test]
    fn test_fields_with_delimiters_are_quoted() {
        let mut entry = sample_entry();
        entry.overflow = "jammed, then \"recovered\"".to_string();
        entry.autonomous_leave = false;

        let csv = to_csv_string(&[entry]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains(",false,"));
        assert!(row.contains("\"jammed, then \"\"recovered\"\"\""));
    }

    #[test]
    fn test_export_to_path_creates_dirs() {
        let root = std::env::temp_dir().join(format!("ftcscout_export_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        let path = root.join("out/ftc-scout-data-1.csv");

        export_to_path(&path, &[sample_entry()]).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Team,User,Timestamp"));
        assert_eq!(written.lines().count(), 2);

        let _ = std::fs::remove_dir_all(&root);
    }
}
