//! Run configuration for veloherodown.
//!
//! Everything a sync run needs besides the SSO key: where the service lives,
//! where files go, and how patient to be with it. All state files live in
//! the work directory, next to the exported workouts.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Velo Hero web app
pub const DEFAULT_BASE_URL: &str = "https://app.velohero.com";

/// Client identification sent with every request
pub const USER_AGENT: &str = "veloherodown/2.0";

/// Credential file (`VELOHERO_SSO_KEY=...`)
pub const CREDENTIALS_FILE_NAME: &str = ".veloherorc";

/// Watermark file, survives between runs
pub const STATE_FILE_NAME: &str = ".velohero_last_export.do_not_remove";

/// Transient workout list, overwritten by every run
pub const LIST_FILE_NAME: &str = ".velohero_export_workouts.csv";

/// Scratch file for the writability check
pub const WRITE_TEST_FILE_NAME: &str = ".write_test";

/// Attempts per export file
pub const DEFAULT_DOWNLOAD_ATTEMPTS: u32 = 3;

/// Pause between attempts, and after each successful download
pub const DEFAULT_BREAK_TIME: Duration = Duration::from_secs(1);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound for a whole request, body included
const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

/// Configuration of one sync run
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the service, without trailing slash
    pub base_url: String,

    /// Directory for credentials, state and exported files
    pub work_dir: PathBuf,

    /// Maximum attempts per export file (at least 1)
    pub download_attempts: u32,

    /// Pause after a failed attempt when another one follows
    pub retry_pause: Duration,

    /// Pause after each successful download
    pub courtesy_pause: Duration,

    pub connect_timeout: Duration,

    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            work_dir: PathBuf::from("."),
            download_attempts: DEFAULT_DOWNLOAD_ATTEMPTS,
            retry_pause: DEFAULT_BREAK_TIME,
            courtesy_pause: DEFAULT_BREAK_TIME,
            connect_timeout: CONNECT_TIMEOUT,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

impl Config {
    /// Default config operating in `work_dir`
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_download_attempts(mut self, attempts: u32) -> Self {
        self.download_attempts = attempts.max(1);
        self
    }

    /// Set both the retry pause and the courtesy pause
    pub fn with_pauses(mut self, pause: Duration) -> Self {
        self.retry_pause = pause;
        self.courtesy_pause = pause;
        self
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.work_dir.join(CREDENTIALS_FILE_NAME)
    }

    pub fn state_path(&self) -> PathBuf {
        self.work_dir.join(STATE_FILE_NAME)
    }

    pub fn list_path(&self) -> PathBuf {
        self.work_dir.join(LIST_FILE_NAME)
    }

    pub fn write_test_path(&self) -> PathBuf {
        self.work_dir.join(WRITE_TEST_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://app.velohero.com");
        assert_eq!(config.download_attempts, 3);
        assert_eq!(config.retry_pause, Duration::from_secs(1));
        assert_eq!(config.courtesy_pause, Duration::from_secs(1));
        assert_eq!(config.work_dir(), Path::new("."));
    }

    #[test]
    fn test_paths_follow_work_dir() {
        let config = Config::new("/tmp/rides");
        assert_eq!(
            config.credentials_path(),
            PathBuf::from("/tmp/rides/.veloherorc")
        );
        assert_eq!(
            config.state_path(),
            PathBuf::from("/tmp/rides/.velohero_last_export.do_not_remove")
        );
        assert_eq!(
            config.list_path(),
            PathBuf::from("/tmp/rides/.velohero_export_workouts.csv")
        );
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let config = Config::default().with_base_url("http://127.0.0.1:8080/");
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_attempts_never_zero() {
        let config = Config::default().with_download_attempts(0);
        assert_eq!(config.download_attempts, 1);
    }
}
