//! The sync command.
//!
//! Phases, in order:
//! 1. Validate formats, resolve the SSO key
//! 2. Check the login
//! 3. Check the work directory is writable, load the watermark
//! 4. Fetch the workout list since the watermark
//! 5. Export every workout in every format
//! 6. Persist the new watermark

use crate::config::Config;
use crate::credentials::resolve_credentials;
use crate::error::SyncError;
use crate::formats::{describe_formats, parse_formats, ExportFormat};
use crate::state::{self, Watermark};
use crate::sync::{parse_workout_list, ExportOutcome, VeloHeroClient, Workout};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::BufReader;
use std::time::Duration;
use tracing::{debug, info, warn};

/// What a sync run did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    /// Workouts in the fetched list
    pub workouts: usize,
    pub downloaded: usize,
    /// Files that already existed
    pub skipped: usize,
    pub failed: usize,
    /// Persisted watermark, `None` when nothing was listed
    pub watermark: Option<Watermark>,
}

/// Spinner for slow requests
fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Create and remove a test file in the work directory
fn ensure_writable(config: &Config) -> Result<(), SyncError> {
    let test_file = config.write_test_path();
    if let Err(e) = fs::write(&test_file, b"test") {
        debug!("Write test {} failed: {}", test_file.display(), e);
        return Err(SyncError::DirectoryNotWritable(config.work_dir.clone()));
    }
    if let Err(e) = fs::remove_file(&test_file) {
        warn!("Cannot remove {}: {}", test_file.display(), e);
    }
    Ok(())
}

/// Export one workout in all formats, printing one line per file
fn export_workout(
    client: &VeloHeroClient,
    config: &Config,
    workout: &Workout,
    formats: &[ExportFormat],
    summary: &mut SyncSummary,
) {
    for &format in formats {
        let file_name = format!("{}.{}", workout.id, format);

        match client.export_activity(workout, format, config.work_dir()) {
            ExportOutcome::Skipped { .. } => {
                println!("  {} {}", "Exists:".dimmed(), file_name.dimmed());
                summary.skipped += 1;
            }
            ExportOutcome::Downloaded { bytes, .. } => {
                println!(
                    "  {} {} {}",
                    "✓".green(),
                    file_name,
                    format!("({} bytes)", bytes).dimmed()
                );
                summary.downloaded += 1;
            }
            ExportOutcome::DownloadFailed { .. } => {
                println!(
                    "  {}",
                    format!(
                        "Failed to download workout {} in format {}",
                        workout.id, format
                    )
                    .red()
                );
                summary.failed += 1;
            }
            ExportOutcome::WriteFailed { path, error } => {
                println!(
                    "  {} {}: {:#}",
                    "Error writing file".red(),
                    path.display(),
                    error
                );
                summary.failed += 1;
            }
        }
    }
}

/// Run one incremental export.
///
/// `prompt` is only called when no credential file exists.
pub fn sync<F>(
    config: &Config,
    format_args: &[String],
    prompt: F,
) -> Result<SyncSummary, SyncError>
where
    F: FnOnce() -> Result<String, SyncError>,
{
    let formats = parse_formats(format_args)?;
    let sso_key = resolve_credentials(&config.credentials_path(), prompt)?;
    let client = VeloHeroClient::new(config, sso_key)?;

    let checking = spinner("Checking login...");
    let logged_in = client.check_login();
    checking.finish_and_clear();
    if !logged_in {
        return Err(SyncError::LoginFailed);
    }

    ensure_writable(config)?;

    println!(
        "{}",
        format!("Will export data to {}...", describe_formats(&formats)).cyan()
    );

    let state_path = config.state_path();
    let watermark = state::load_or_init(&state_path).map_err(|e| {
        warn!("{:#}", e);
        SyncError::StateBootstrap(state_path.clone())
    })?;

    println!(
        "Get list of workouts since {}. Please wait...",
        watermark.current_local()
    );
    let fetching = spinner("Downloading workout list...");
    let list_file = client.download_workout_list(watermark.current, &config.list_path());
    fetching.finish_and_clear();
    let list_file = list_file.map_err(SyncError::ListFetch)?;

    let workouts =
        parse_workout_list(BufReader::new(list_file.as_file())).map_err(SyncError::ListParse)?;
    info!("{} workouts changed since {}", workouts.len(), watermark.current);

    let mut summary = SyncSummary {
        workouts: workouts.len(),
        ..SyncSummary::default()
    };

    if workouts.is_empty() {
        remove_list_file(list_file);
        println!("\n{}", "Done. No new files.".green());
        return Ok(summary);
    }

    for (idx, workout) in workouts.iter().enumerate() {
        println!(
            "Downloading file {} of {} with ID {} ({} {}). Please wait...",
            (idx + 1).to_string().cyan(),
            workouts.len(),
            workout.id.white().bold(),
            workout.date,
            workout.start_time
        );
        export_workout(&client, config, workout, &formats, &mut summary);
        println!();
    }

    let next = watermark.advance(state::now_timestamp());
    state::save(&state_path, next).map_err(|e| {
        warn!("{:#}", e);
        SyncError::StatePersist(state_path.clone())
    })?;
    summary.watermark = Some(next);
    remove_list_file(list_file);

    if summary.failed == 0 {
        println!("{}", "Done. All downloaded.".green());
    } else {
        warn!(
            "Watermark advanced to {} although {} file(s) failed",
            next.current, summary.failed
        );
        println!(
            "{}",
            format!("Done. {} file(s) could not be downloaded.", summary.failed).yellow()
        );
    }

    Ok(summary)
}

fn remove_list_file(list_file: tempfile::NamedTempFile) {
    let path = list_file.path().to_path_buf();
    if let Err(e) = list_file.close() {
        warn!("Cannot remove {}: {}", path.display(), e);
    }
}
