//! HTTP client for the Velo Hero export API.
//!
//! Every call is a blocking `multipart/form-data` POST carrying the SSO key.
//! Only HTTP 200 counts as success; transport errors and other statuses are
//! treated alike.

use super::retry::{retry, RetryPolicy};
use super::workouts::Workout;
use crate::config::{Config, USER_AGENT};
use crate::credentials::SsoKey;
use crate::formats::ExportFormat;
use anyhow::{bail, Context, Result};
use reqwest::blocking::multipart::Form;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::{NamedTempFile, TempPath};
use tracing::{debug, info, warn};

const SSO_PATH: &str = "/sso";
const WORKOUT_LIST_PATH: &str = "/export/workouts/csv";

/// Result of exporting one workout in one format
#[derive(Debug)]
pub enum ExportOutcome {
    /// Target file already existed
    Skipped { path: PathBuf },
    Downloaded { path: PathBuf, bytes: u64 },
    /// Every attempt failed; no file was written
    DownloadFailed { attempts: u32, error: anyhow::Error },
    /// Download worked but the local file could not be written
    WriteFailed { path: PathBuf, error: anyhow::Error },
}

pub struct VeloHeroClient {
    client: Client,
    base_url: String,
    sso_key: SsoKey,
    retry_policy: RetryPolicy,
    courtesy_pause: Duration,
    sleep: Box<dyn Fn(Duration)>,
}

impl VeloHeroClient {
    pub fn new(config: &Config, sso_key: SsoKey) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            sso_key,
            retry_policy: RetryPolicy {
                attempts: config.download_attempts,
                pause: config.retry_pause,
            },
            courtesy_pause: config.courtesy_pause,
            sleep: Box::new(std::thread::sleep),
        })
    }

    /// Replace how the client pauses, `std::thread::sleep` by default.
    ///
    /// Used for both the retry pause and the pause after a download.
    pub fn with_sleep(mut self, sleep: impl Fn(Duration) + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn sso_form(&self) -> Form {
        Form::new().text("sso", self.sso_key.as_str().to_string())
    }

    /// POST `form` to `url`; anything but 200 is an error and the response
    /// is dropped.
    fn post(&self, url: &str, form: Form) -> Result<Response> {
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .with_context(|| format!("Cannot connect to {}", url))?;

        let status = response.status();
        if status != StatusCode::OK {
            bail!("{} returned {}", url, status);
        }
        Ok(response)
    }

    /// Check the session once. `false` on any failure.
    pub fn check_login(&self) -> bool {
        let url = self.url(SSO_PATH);
        let form = self.sso_form().text("view", "json");

        match self.post(&url, form) {
            Ok(_) => true,
            Err(e) => {
                warn!("Login check failed: {:#}", e);
                false
            }
        }
    }

    /// Download the list of workouts changed since `since` (UNIX seconds)
    /// into `path`.
    ///
    /// A list left behind by an interrupted run is truncated first. The file
    /// is removed when the returned handle is dropped, on error too. Its
    /// cursor is rewound to the start.
    pub fn download_workout_list(&self, since: i64, path: &Path) -> Result<NamedTempFile> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("Cannot create list file {}", path.display()))?;
        let mut list_file = NamedTempFile::from_parts(file, TempPath::from_path(path));

        let url = self.url(WORKOUT_LIST_PATH);
        let form = self
            .sso_form()
            .text("last_change_epoch", since.to_string());

        let mut response = self.post(&url, form)?;

        let bytes = response
            .copy_to(&mut list_file)
            .context("Cannot read workout list")?;
        list_file.write_all(b"\n")?;
        list_file.flush()?;
        list_file.seek(SeekFrom::Start(0))?;

        info!("Workout list: {} bytes in {}", bytes, path.display());
        Ok(list_file)
    }

    /// Make sure `<dir>/<id>.<format>` exists.
    ///
    /// Existing files are never downloaded again. On success the body is
    /// written to a temp file and renamed into place, then the client pauses
    /// before the next request.
    pub fn export_activity(
        &self,
        workout: &Workout,
        format: ExportFormat,
        dir: &Path,
    ) -> ExportOutcome {
        let path = dir.join(format!("{}.{}", workout.id, format));
        if path.exists() {
            debug!("{} exists, skipping", path.display());
            return ExportOutcome::Skipped { path };
        }

        let url = self.url(&format!("/export/activity/{}/{}", format, workout.id));

        let result = retry(self.retry_policy, |pause| (self.sleep)(pause), |attempt| {
            debug!("Exporting {} as {} (attempt {})", workout.id, format, attempt);
            self.post(&url, self.sso_form())
        });

        let response = match result {
            Ok(response) => response,
            Err(exhausted) => {
                warn!(
                    "Export {} {} failed after {} attempts: {:#}",
                    workout.id, format, exhausted.attempts, exhausted.last_error
                );
                return ExportOutcome::DownloadFailed {
                    attempts: exhausted.attempts,
                    error: exhausted.last_error,
                };
            }
        };

        match write_response(response, &path) {
            Ok(bytes) => {
                (self.sleep)(self.courtesy_pause);
                ExportOutcome::Downloaded { path, bytes }
            }
            Err(error) => ExportOutcome::WriteFailed { path, error },
        }
    }
}

/// Stream `response` into a temp file next to `path`, then rename it.
///
/// Nothing is left under `path` if anything fails.
fn write_response(mut response: Response, path: &Path) -> Result<u64> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Error creating file in {}", dir.display()))?;

    let bytes = response
        .copy_to(&mut temp)
        .context("Error writing to file")?;
    temp.flush().context("Error writing to file")?;
    temp.persist(path)
        .with_context(|| format!("Error creating file {}", path.display()))?;

    Ok(bytes)
}
