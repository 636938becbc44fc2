//! Watermark of the last export.
//!
//! `.velohero_last_export.do_not_remove` holds two lines:
//!
//! ```text
//! VELOHERO_PREV_TIMESTAMP=1700000000
//! VELOHERO_LAST_TIMESTAMP=1700086400
//! ```
//!
//! Only `LAST` is read back; `PREV` is kept for the operator.

use anyhow::{Context, Result};
use chrono::{Local, TimeZone, Utc};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

const PREV_PREFIX: &str = "VELOHERO_PREV_TIMESTAMP=";
const LAST_PREFIX: &str = "VELOHERO_LAST_TIMESTAMP=";

/// Persisted sync boundary, UNIX seconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Watermark {
    pub previous: i64,
    pub current: i64,
}

impl Watermark {
    /// Parse file contents. Unparsable or missing values count as 0.
    pub fn parse(content: &str) -> Self {
        let mut watermark = Self::default();
        for line in content.lines().map(str::trim) {
            if let Some(value) = line.strip_prefix(LAST_PREFIX) {
                watermark.current = parse_timestamp(value);
            } else if let Some(value) = line.strip_prefix(PREV_PREFIX) {
                watermark.previous = parse_timestamp(value);
            }
        }
        watermark
    }

    /// Next watermark after a run that ended at `now`.
    ///
    /// Never moves backwards, even if the clock did.
    pub fn advance(self, now: i64) -> Self {
        Self {
            previous: self.current,
            current: now.max(self.current),
        }
    }

    pub fn to_file_content(self) -> String {
        format!(
            "{}{}\n{}{}\n",
            PREV_PREFIX, self.previous, LAST_PREFIX, self.current
        )
    }

    /// `current` as local time, e.g. `2024-01-01 08:00:00`
    pub fn current_local(self) -> String {
        Local
            .timestamp_opt(self.current, 0)
            .single()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| self.current.to_string())
    }
}

fn parse_timestamp(value: &str) -> i64 {
    value.trim().parse().unwrap_or_else(|_| {
        warn!("Ignoring invalid timestamp '{}' in state file", value);
        0
    })
}

/// Current wall-clock time, UNIX seconds
pub fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Read the watermark, creating the file with `LAST=0` if it is missing.
pub fn load_or_init(path: &Path) -> Result<Watermark> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        let watermark = Watermark::parse(&content);
        debug!("Last export at {} ({})", watermark.current, path.display());
        return Ok(watermark);
    }

    fs::write(path, format!("{}0\n", LAST_PREFIX))
        .with_context(|| format!("Cannot create {}", path.display()))?;
    debug!("Created {}", path.display());
    Ok(Watermark::default())
}

/// Replace the state file atomically
pub fn save(path: &Path, watermark: Watermark) -> Result<()> {
    write_atomic(path, watermark.to_file_content().as_bytes())
}

/// Write into a temp file next to `path`, then rename over it
fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Cannot create temp file in {}", dir.display()))?;
    temp.write_all(data)?;
    temp.flush()?;
    temp.persist(path)
        .with_context(|| format!("Cannot replace {}", path.display()))?;
    Ok(())
}
