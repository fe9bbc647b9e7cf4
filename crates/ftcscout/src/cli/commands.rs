//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::entry::{EntryEdit, EntryForm};

/// Largest autonomous total or artifact count accepted on the command line.
pub const MAX_COUNT: i64 = 4_294_967_295;

/// Login command arguments.
#[derive(Debug, Args)]
pub struct LoginCommand {
    /// Observer name
    #[arg(value_parser = non_blank)]
    pub name: String,

    /// The team the observer belongs to
    #[arg(short, long, value_parser = non_blank)]
    pub team: String,
}

/// Observations for a new entry.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Team being observed
    #[arg(short, long, value_parser = non_blank)]
    pub team: String,

    /// Autonomous period total
    #[arg(long = "auto", default_value_t = 0, value_parser = count_parser())]
    pub autonomous_total: i64,

    /// The robot left its starting zone
    #[arg(long = "leave")]
    pub autonomous_leave: bool,

    /// Classification tag
    #[arg(long, default_value = "")]
    pub classification: String,

    /// Overflow notes
    #[arg(long, default_value = "")]
    pub overflow: String,

    /// Artifacts scored in tele-op
    #[arg(long = "artifacts", default_value_t = 0, value_parser = count_parser())]
    pub artifacts_scored: i64,

    /// Average cycle time in seconds
    #[arg(long, default_value_t = 0.0, value_parser = non_negative_seconds)]
    pub cycle_time: f64,

    /// Play style (e.g. Offensive, Defensive, Balanced)
    #[arg(long, default_value = "")]
    pub play_style: String,

    /// Scoring position (e.g. Top, Bottom, Both)
    #[arg(long, default_value = "")]
    pub top_bot: String,

    /// Image file with the autonomous path sketch
    #[arg(long, value_name = "FILE")]
    pub sketch: Option<PathBuf>,
}

impl AddCommand {
    /// Build the entry form; the sketch is attached separately.
    #[must_use]
    pub fn to_form(&self) -> EntryForm {
        EntryForm {
            team_name: self.team.clone(),
            autonomous_total: self.autonomous_total,
            autonomous_leave: self.autonomous_leave,
            classification: self.classification.clone(),
            overflow: self.overflow.clone(),
            auto_path_image: None,
            artifacts_scored: self.artifacts_scored,
            cycle_time: self.cycle_time,
            play_style: self.play_style.clone(),
            top_bot: self.top_bot.clone(),
        }
    }
}

/// Changes to an existing entry. Omitted options keep their value.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Id of the entry to edit
    pub id: String,

    /// Team being observed
    #[arg(short, long, value_parser = non_blank)]
    pub team: Option<String>,

    /// Autonomous period total
    #[arg(long = "auto", value_parser = count_parser())]
    pub autonomous_total: Option<i64>,

    /// Whether the robot left its starting zone
    #[arg(long = "leave")]
    pub autonomous_leave: Option<bool>,

    /// Classification tag
    #[arg(long)]
    pub classification: Option<String>,

    /// Overflow notes
    #[arg(long)]
    pub overflow: Option<String>,

    /// Artifacts scored in tele-op
    #[arg(long = "artifacts", value_parser = count_parser())]
    pub artifacts_scored: Option<i64>,

    /// Average cycle time in seconds
    #[arg(long, value_parser = non_negative_seconds)]
    pub cycle_time: Option<f64>,

    /// Play style
    #[arg(long)]
    pub play_style: Option<String>,

    /// Scoring position
    #[arg(long)]
    pub top_bot: Option<String>,

    /// Replace the sketch with this image file
    #[arg(long, value_name = "FILE", conflicts_with = "clear_sketch")]
    pub sketch: Option<PathBuf>,

    /// Remove the attached sketch
    #[arg(long)]
    pub clear_sketch: bool,
}

impl EditCommand {
    /// Build the edit; a replacement sketch is attached separately.
    #[must_use]
    pub fn to_edit(&self) -> EntryEdit {
        EntryEdit {
            team_name: self.team.clone(),
            autonomous_total: self.autonomous_total,
            autonomous_leave: self.autonomous_leave,
            classification: self.classification.clone(),
            overflow: self.overflow.clone(),
            auto_path_image: None,
            clear_auto_path_image: self.clear_sketch,
            artifacts_scored: self.artifacts_scored,
            cycle_time: self.cycle_time,
            play_style: self.play_style.clone(),
            top_bot: self.top_bot.clone(),
        }
    }
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Id of the entry to delete
    pub id: String,

    /// Confirm the deletion
    #[arg(short, long)]
    pub yes: bool,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Include every observer's entries
    #[arg(short, long)]
    pub all: bool,

    /// Only entries for this team
    #[arg(short, long)]
    pub team: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Id of the entry to show
    pub id: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Write the sketch image to this file
    #[arg(long, value_name = "FILE")]
    pub save_sketch: Option<PathBuf>,
}

/// Averages commands.
#[derive(Debug, Subcommand)]
pub enum AveragesCommand {
    /// Averages for one team across all observers
    Team {
        /// Team name (defaults to the current observer's team)
        name: Option<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Averages for one observer's own entries
    User {
        /// Observer name (defaults to the current observer)
        name: Option<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Averages for every team
    Teams {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Averages for every observer
    Users {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Output file (defaults to the configured export directory)
    #[arg(short, long, value_name = "FILE", conflicts_with = "stdout")]
    pub out: Option<PathBuf>,

    /// Write CSV to standard output
    #[arg(long)]
    pub stdout: bool,
}

/// Status and whoami command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

fn count_parser() -> clap::builder::RangedI64ValueParser<i64> {
    clap::value_parser!(i64).range(0..=MAX_COUNT)
}

fn non_blank(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err("must not be empty".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

fn non_negative_seconds(value: &str) -> Result<f64, String> {
    let seconds: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if seconds.is_finite() && seconds >= 0.0 {
        Ok(seconds)
    } else {
        Err("must be a non-negative number of seconds".to_string())
    }
}
