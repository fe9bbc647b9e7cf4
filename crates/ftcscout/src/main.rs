//! `ftcscout` - CLI for recording and comparing scouting entries
//!
//! This binary provides the command-line interface for logging in as an
//! observer, recording entries, and computing averages and exports.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;

use ftcscout::cli::{
    AddCommand, AveragesCommand, Cli, Command, ConfigCommand, DeleteCommand, EditCommand,
    ExportCommand, ListCommand, OutputFormat, ShowCommand,
};
use ftcscout::export::{self, format_timestamp};
use ftcscout::sketch::{load_sketch, save_sketch};
use ftcscout::stats::{self, Averages};
use ftcscout::{init_logging, Config, Error, ScoutStore, ScoutingEntry, Session, User};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    run(cli.config, cli.command)
}

fn run(config_path: Option<PathBuf>, command: Command) -> anyhow::Result<()> {
    let open = || open_session(config_path.clone());

    match command {
        Command::Config(cmd) => handle_config(config_path.clone(), cmd),
        Command::Login(cmd) => {
            let (_, mut session) = open()?;
            session.login(&cmd.name, &cmd.team)?;
            let user = require_user(&session)?;
            println!("Logged in as {} (team {})", user.name, user.current_team);
            println!("{} existing entries", session.entries().len());
            Ok(())
        }
        Command::Logout => handle_logout(&mut open()?.1),
        Command::Whoami(cmd) => handle_whoami(&open()?.1, cmd.json),
        Command::Add(cmd) => handle_add(&mut open()?.1, &cmd),
        Command::Edit(cmd) => handle_edit(&mut open()?.1, &cmd),
        Command::Delete(cmd) => handle_delete(&mut open()?.1, &cmd),
        Command::List(cmd) => handle_list(&open()?.1, &cmd),
        Command::Show(cmd) => handle_show(&open()?.1, &cmd),
        Command::Averages(cmd) => {
            let (config, session) = open()?;
            handle_averages(&session, &config, cmd)
        }
        Command::Export(cmd) => {
            let (config, session) = open()?;
            handle_export(&session, &config, &cmd)
        }
        Command::Status(cmd) => {
            let (config, session) = open()?;
            handle_status(&session, &config, cmd.json)
        }
    }
}

fn open_session(config_path: Option<PathBuf>) -> anyhow::Result<(Config, Session)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    let path = config.database_path();
    let store = ScoutStore::open(&path)
        .with_context(|| format!("failed to open scouting data at {}", path.display()))?;
    let session = Session::resume(store)?;
    Ok((config, session))
}

fn require_user(session: &Session) -> ftcscout::Result<&User> {
    session.current_user().ok_or(Error::NotLoggedIn)
}

/// Every observer's entries, skipping namespaces that fail to decode.
fn load_all_entries(session: &Session) -> anyhow::Result<Vec<ScoutingEntry>> {
    let scan = session.store().scan_entries()?;
    if !scan.is_clean() {
        eprintln!(
            "warning: skipped {} unreadable observer record(s)",
            scan.corrupt.len()
        );
    }
    Ok(scan.entries)
}

fn handle_logout(session: &mut Session) -> anyhow::Result<()> {
    let name = session.current_user().map(|user| user.name.clone());
    session.logout()?;
    match name {
        Some(name) => println!("Logged out {name}"),
        None => println!("Nobody is logged in"),
    }
    Ok(())
}

fn handle_whoami(session: &Session, json: bool) -> anyhow::Result<()> {
    let user = session.current_user();
    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else if let Some(user) = user {
        println!("{} (team {})", user.name, user.current_team);
    } else {
        println!("Not logged in");
    }
    Ok(())
}

fn handle_add(session: &mut Session, cmd: &AddCommand) -> anyhow::Result<()> {
    require_user(session)?;
    let mut form = cmd.to_form();
    if let Some(path) = &cmd.sketch {
        let sketch = load_sketch(path)
            .with_context(|| format!("failed to attach sketch {}", path.display()))?;
        form.auto_path_image = Some(sketch.to_data_url());
    }

    let Some(entry) = session.record(form, Utc::now())? else {
        return Err(Error::NotLoggedIn.into());
    };
    println!(
        "Saved entry {} for team {}: {} points",
        entry.id, entry.team_name, entry.calculated_points
    );
    Ok(())
}

fn handle_edit(session: &mut Session, cmd: &EditCommand) -> anyhow::Result<()> {
    require_user(session)?;
    let mut edit = cmd.to_edit();
    if let Some(path) = &cmd.sketch {
        let sketch = load_sketch(path)
            .with_context(|| format!("failed to attach sketch {}", path.display()))?;
        edit.auto_path_image = Some(sketch.to_data_url());
    }
    if edit.is_empty() {
        bail!("nothing to change; pass at least one field option");
    }

    match session.edit_entry(&cmd.id, edit)? {
        Some(entry) => println!(
            "Updated entry {} for team {}: {} points",
            entry.id, entry.team_name, entry.calculated_points
        ),
        None => bail!("no entry with id {}", cmd.id),
    }
    Ok(())
}

fn handle_delete(session: &mut Session, cmd: &DeleteCommand) -> anyhow::Result<()> {
    require_user(session)?;
    let Some(entry) = session.find_entry(&cmd.id) else {
        bail!("no entry with id {}", cmd.id);
    };
    if !cmd.yes {
        println!(
            "Entry {} for team {} recorded {} will be deleted.",
            entry.id,
            entry.team_name,
            format_timestamp(&entry.timestamp)
        );
        println!("Use --yes to confirm.");
        return Ok(());
    }

    if session.delete_entry(&cmd.id)? {
        println!("Deleted entry {}", cmd.id);
    } else {
        bail!("no entry with id {}", cmd.id);
    }
    Ok(())
}

fn handle_list(session: &Session, cmd: &ListCommand) -> anyhow::Result<()> {
    let mut entries = if cmd.all {
        load_all_entries(session)?
    } else {
        require_user(session)?;
        session.entries().to_vec()
    };
    if let Some(team) = &cmd.team {
        entries.retain(|entry| &entry.team_name == team);
    }
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Table if cmd.all && !entries.is_empty() => {
            for (user, group) in stats::group_by_user(&entries) {
                println!("{user} ({} entries)", group.len());
                print_entry_table(&group);
                println!();
            }
        }
        OutputFormat::Table => print_entry_table(&entries.iter().collect::<Vec<_>>()),
        OutputFormat::Plain => {
            for entry in &entries {
                println!(
                    "{} {} {} {} {}",
                    entry.id,
                    entry.team_name,
                    entry.user_name,
                    format_timestamp(&entry.timestamp),
                    entry.calculated_points
                );
            }
        }
    }
    Ok(())
}

fn print_entry_table(entries: &[&ScoutingEntry]) {
    if entries.is_empty() {
        println!("No entries");
        return;
    }
    println!(
        "{:<14} {:<10} {:<12} {:<24} {:>5} {:>9} {:>6} {:>6}",
        "ID", "Team", "User", "Recorded", "Auto", "Artifacts", "Cycle", "Points"
    );
    for entry in entries {
        println!(
            "{:<14} {:<10} {:<12} {:<24} {:>5} {:>9} {:>6} {:>6}",
            entry.id,
            entry.team_name,
            entry.user_name,
            format_timestamp(&entry.timestamp),
            entry.autonomous_total,
            entry.artifacts_scored,
            entry.cycle_time,
            entry.calculated_points
        );
    }
}

fn handle_show(session: &Session, cmd: &ShowCommand) -> anyhow::Result<()> {
    require_user(session)?;
    let Some(entry) = session.find_entry(&cmd.id) else {
        bail!("no entry with id {}", cmd.id);
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(entry)?);
    } else {
        println!("Entry {}", entry.id);
        println!("=====================");
        println!("  Team:            {}", entry.team_name);
        println!("  Observer:        {}", entry.user_name);
        println!("  Recorded:        {}", format_timestamp(&entry.timestamp));
        println!();
        println!("[Autonomous]");
        println!("  Total:           {}", entry.autonomous_total);
        println!("  Leave:           {}", yes_no(entry.autonomous_leave));
        println!("  Classification:  {}", or_dash(&entry.classification));
        println!("  Overflow:        {}", or_dash(&entry.overflow));
        println!("  Path sketch:     {}", yes_no(entry.has_sketch()));
        println!();
        println!("[Tele-op]");
        println!("  Artifacts:       {}", entry.artifacts_scored);
        println!("  Cycle time (s):  {}", entry.cycle_time);
        println!("  Play style:      {}", or_dash(&entry.play_style));
        println!("  Top/Bot:         {}", or_dash(&entry.top_bot));
        println!();
        println!("Points:            {}", entry.calculated_points);
    }

    if let Some(path) = &cmd.save_sketch {
        let Some(url) = entry.auto_path_image.as_deref().filter(|url| !url.is_empty()) else {
            bail!("entry {} has no path sketch", entry.id);
        };
        save_sketch(url, path)
            .with_context(|| format!("failed to write sketch to {}", path.display()))?;
        eprintln!("Sketch written to {}", path.display());
    }
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn handle_averages(
    session: &Session,
    config: &Config,
    cmd: AveragesCommand,
) -> anyhow::Result<()> {
    let precision = config.display.precision;
    let entries = load_all_entries(session)?;

    match cmd {
        AveragesCommand::Team { name, json } => {
            let name = match name {
                Some(name) => name,
                None => require_user(session)?.current_team.clone(),
            };
            print_averages(&stats::team_averages(&name, &entries), json, precision)?;
        }
        AveragesCommand::User { name, json } => {
            let name = match name {
                Some(name) => name,
                None => require_user(session)?.name.clone(),
            };
            print_averages(&stats::user_averages(&name, &entries), json, precision)?;
        }
        AveragesCommand::Teams { format } => {
            print_averages_list(&stats::all_team_averages(&entries), "Team", format, precision)?;
        }
        AveragesCommand::Users { format } => {
            print_averages_list(&stats::all_user_averages(&entries), "User", format, precision)?;
        }
    }
    Ok(())
}

fn print_averages(averages: &Averages, json: bool, precision: usize) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(averages)?);
        return Ok(());
    }
    println!("{}", averages.name);
    if averages.is_empty() {
        println!("  No entries");
        return Ok(());
    }
    println!("  Entries:         {}", averages.entry_count);
    println!("  Avg autonomous:  {:.precision$}", averages.avg_autonomous);
    println!("  Avg artifacts:   {:.precision$}", averages.avg_artifacts);
    println!("  Avg cycle time:  {:.precision$}s", averages.avg_cycle_time);
    println!("  Avg points:      {:.precision$}", averages.avg_points);
    Ok(())
}

fn print_averages_list(
    rows: &[Averages],
    label: &str,
    format: OutputFormat,
    precision: usize,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        OutputFormat::Plain => {
            for row in rows {
                println!(
                    "{} {} {:.precision$}",
                    row.name, row.entry_count, row.avg_points
                );
            }
        }
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("No entries");
                return Ok(());
            }
            println!(
                "{label:<14} {:>7} {:>8} {:>10} {:>8} {:>8}",
                "Entries", "Auto", "Artifacts", "Cycle", "Points"
            );
            for row in rows {
                println!(
                    "{:<14} {:>7} {:>8.precision$} {:>10.precision$} {:>8.precision$} {:>8.precision$}",
                    row.name,
                    row.entry_count,
                    row.avg_autonomous,
                    row.avg_artifacts,
                    row.avg_cycle_time,
                    row.avg_points
                );
            }
        }
    }
    Ok(())
}

fn handle_export(session: &Session, config: &Config, cmd: &ExportCommand) -> anyhow::Result<()> {
    let entries = load_all_entries(session)?;

    if cmd.stdout {
        export::write_csv(std::io::stdout().lock(), &entries)?;
        return Ok(());
    }

    let path = cmd
        .out
        .clone()
        .unwrap_or_else(|| config.export_path(Utc::now().timestamp_millis()));
    export::export_to_path(&path, &entries)
        .with_context(|| format!("failed to export to {}", path.display()))?;
    println!("Exported {} entries to {}", entries.len(), path.display());
    Ok(())
}

fn handle_status(session: &Session, config: &Config, json: bool) -> anyhow::Result<()> {
    let storage = session.store().backend().stats()?;
    let observers = session.store().observers()?;
    let scan = session.store().scan_entries()?;
    let user = session.current_user();

    if json {
        let status = serde_json::json!({
            "database_path": config.database_path(),
            "database_size_bytes": storage.db_size_bytes,
            "current_user": user,
            "observers": observers,
            "total_entries": scan.entries.len(),
            "unreadable_records": scan.corrupt.len(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("ftcscout status");
        println!("---------------");
        println!("Database:      {}", config.database_path().display());
        println!("Size:          {} bytes", storage.db_size_bytes);
        match user {
            Some(user) => println!("Observer:      {} (team {})", user.name, user.current_team),
            None => println!("Observer:      not logged in"),
        }
        println!("Observers:     {}", observers.len());
        println!("Entries:       {}", scan.entries.len());
        println!("Teams:         {}", stats::unique_teams(&scan.entries).len());
        if !scan.is_clean() {
            println!("Unreadable:    {}", scan.corrupt.len());
        }
    }
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path).context("failed to load configuration")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Export]");
                println!("  Directory:          {}", config.export.directory.display());
                println!("  File prefix:        {}", config.export.file_prefix);
                println!();
                println!("[Display]");
                println!("  Precision:          {}", config.display.precision);
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => bail!("configuration error: {e}"),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftcscout::cli::StatusCommand;

    #[test]
    fn test_session_commands_use_config_file() {
        let dir = std::env::temp_dir().join(format!("ftcscout_main_config_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let db = dir.join("custom").join("scouting.db");
        let config_file = dir.join("config.toml");
        std::fs::write(
            &config_file,
            format!("[storage]\ndatabase_path = {:?}\n", db.display().to_string()),
        )
        .unwrap();

        run(
            Some(config_file),
            Command::Status(StatusCommand { json: true }),
        )
        .unwrap();
        assert!(db.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
