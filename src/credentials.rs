//! SSO key storage in `.veloherorc`.
//!
//! The file holds one `VELOHERO_SSO_KEY=<key>` line. When it does not exist
//! the operator is asked for the key once and the answer is saved for the
//! next runs.

use crate::error::SyncError;
use colored::Colorize;
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::Path;
use tracing::debug;

const SSO_KEY_PREFIX: &str = "VELOHERO_SSO_KEY=";

/// Where operators get their key
pub const SSO_URL: &str = "https://app.velohero.com/sso";

/// Single sign-on key
#[derive(Clone, PartialEq, Eq)]
pub struct SsoKey(String);

impl SsoKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Never print the key itself
impl std::fmt::Debug for SsoKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SsoKey").field(&"***").finish()
    }
}

/// Parse the contents of a credential file. The last key line wins.
pub fn parse_credentials(content: &str) -> SsoKey {
    let key = content
        .lines()
        .filter_map(|line| line.strip_prefix(SSO_KEY_PREFIX))
        .last()
        .map(str::trim)
        .unwrap_or_default();
    SsoKey::new(key)
}

/// Load the key from `path`. `Ok(None)` when the file does not exist.
pub fn load_credentials(path: &Path) -> Result<Option<SsoKey>, SyncError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(parse_credentials(&content))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(SyncError::CredentialRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub fn save_credentials(key: &SsoKey, path: &Path) -> Result<(), SyncError> {
    let content = format!("{}{}\n", SSO_KEY_PREFIX, key.as_str());
    fs::write(path, content).map_err(|source| SyncError::CredentialWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Return the stored key, or ask via `prompt` and store the answer.
///
/// An empty key, stored or entered, is [`SyncError::MissingCredential`].
pub fn resolve_credentials<F>(path: &Path, prompt: F) -> Result<SsoKey, SyncError>
where
    F: FnOnce() -> Result<String, SyncError>,
{
    let key = match load_credentials(path)? {
        Some(key) => {
            debug!("Loaded SSO key from {}", path.display());
            key
        }
        None => {
            let key = SsoKey::new(prompt()?.trim());
            save_credentials(&key, path)?;
            debug!("Saved SSO key to {}", path.display());
            key
        }
    };

    if key.is_empty() {
        return Err(SyncError::MissingCredential);
    }
    Ok(key)
}

/// Ask the operator for the key without echoing it
pub fn prompt_sso_key() -> Result<String, SyncError> {
    println!("No configuration file found.");
    println!(
        "Please go to {} to get your single sign-on key.",
        SSO_URL.cyan()
    );
    print!("Enter your Velo Hero SSO key: ");
    io::stdout().flush().map_err(SyncError::Prompt)?;

    rpassword::read_password().map_err(SyncError::Prompt)
}

/// How to get a key and what `.veloherorc` must look like
pub fn sso_key_help(program: &str) -> String {
    format!(
        "\nTo use '{program}', please go to {SSO_URL}\n\
         and get yourself a private single sign-on key. That's the long string.\n\
         \n\
         Then create a file '.veloherorc' in the current directory containing\n\
         \n\
         ----- snip -------------------------------------------------------------\n\
         \n\
         {SSO_KEY_PREFIX}insert your own\n\
         \n\
         ----- snap -------------------------------------------------------------\n\
         \n\
         Important: Do not use spaces!\n"
    )
}
