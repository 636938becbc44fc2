//! Fatal errors of a sync run.
//!
//! Per-file export failures are not errors at this level: they are reported
//! and skipped inside the export loop. Everything here terminates the run.

use std::path::PathBuf;
use thiserror::Error;

/// Exit code when the SSO key is missing or empty.
pub const EXIT_MISSING_CREDENTIAL: i32 = 1;

/// Exit code for every other fatal error.
pub const EXIT_FAILURE: i32 = 9;

#[derive(Debug, Error)]
pub enum SyncError {
    /// No key in the credential file, or an empty key was entered
    #[error("Single sign-on key is missing")]
    MissingCredential,

    #[error("Could not read configuration file '{}': {source}", .path.display())]
    CredentialRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to save SSO key to '{}': {source}", .path.display())]
    CredentialWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not read SSO key from terminal: {0}")]
    Prompt(std::io::Error),

    #[error("Unknown format '{0}'. Known formats are 'json', 'pwx', 'csv', 'gpx', 'kml' and 'tcx'.")]
    UnknownFormat(String),

    #[error("Login failed! Single Sign-on key not found or expired. Please get a new one.")]
    LoginFailed,

    #[error("Can not write to directory '{}'. Please correct this.", .0.display())]
    DirectoryNotWritable(PathBuf),

    #[error("Can not write file '{}'. The last download will be noted in this file.", .0.display())]
    StateBootstrap(PathBuf),

    #[error("Can not download list of files to be exported: {0:#}")]
    ListFetch(anyhow::Error),

    #[error("Error parsing workout list: {0}")]
    ListParse(std::io::Error),

    #[error("Could not write to file '{}'", .0.display())]
    StatePersist(PathBuf),

    #[error("Cannot create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl SyncError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingCredential => EXIT_MISSING_CREDENTIAL,
            _ => EXIT_FAILURE,
        }
    }
}
