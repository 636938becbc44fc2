//! Export formats understood by the Velo Hero export endpoint.

use crate::error::SyncError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Velo Hero generic JSON (all details)
    Json,
    /// Training Peaks PWX with laps
    #[default]
    Pwx,
    Csv,
    /// Geo coordinates only
    Gpx,
    /// Google Earth
    Kml,
    /// Garmin TCX
    Tcx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 6] = [
        Self::Json,
        Self::Pwx,
        Self::Csv,
        Self::Gpx,
        Self::Kml,
        Self::Tcx,
    ];

    /// Name as used in URLs and file extensions
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pwx => "pwx",
            Self::Csv => "csv",
            Self::Gpx => "gpx",
            Self::Kml => "kml",
            Self::Tcx => "tcx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = SyncError;

    /// Exact, case-sensitive match
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| SyncError::UnknownFormat(s.to_string()))
    }
}

/// Parse command-line format arguments.
///
/// Duplicates collapse to their first occurrence. No arguments means the
/// default format. The first unknown argument aborts with
/// [`SyncError::UnknownFormat`].
pub fn parse_formats<S: AsRef<str>>(args: &[S]) -> Result<Vec<ExportFormat>, SyncError> {
    let mut formats: Vec<ExportFormat> = Vec::with_capacity(args.len());

    for arg in args {
        let format: ExportFormat = arg.as_ref().parse()?;
        if !formats.contains(&format) {
            formats.push(format);
        }
    }

    if formats.is_empty() {
        formats.push(ExportFormat::default());
    }

    Ok(formats)
}

/// "format 'pwx'" or "formats 'json, pwx'"
pub fn describe_formats(formats: &[ExportFormat]) -> String {
    let names: Vec<&str> = formats.iter().map(|f| f.as_str()).collect();
    let noun = if formats.len() > 1 { "formats" } else { "format" };
    format!("{} '{}'", noun, names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_known_formats_accepted() {
        for name in ["json", "pwx", "csv", "gpx", "kml", "tcx"] {
            let format: ExportFormat = name.parse().unwrap();
            assert_eq!(format.as_str(), name);
        }
    }

    #[test]
    fn test_unknown_format_rejected() {
        for name in ["fit", "PWX", "Json", "", " pwx"] {
            let err = name.parse::<ExportFormat>().unwrap_err();
            assert!(matches!(err, SyncError::UnknownFormat(ref s) if s == name));
        }
    }

    #[test]
    fn test_duplicates_keep_first_seen_order() {
        let formats = parse_formats(&["pwx", "json", "pwx"]).unwrap();
        assert_eq!(formats, vec![ExportFormat::Pwx, ExportFormat::Json]);
    }

    #[test]
    fn test_no_arguments_defaults_to_pwx() {
        let formats = parse_formats::<&str>(&[]).unwrap();
        assert_eq!(formats, vec![ExportFormat::Pwx]);
    }

    #[test]
    fn test_one_bad_argument_fails_everything() {
        let err = parse_formats(&["json", "fit", "gpx"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown format 'fit'. Known formats are 'json', 'pwx', 'csv', 'gpx', 'kml' and 'tcx'."
        );
    }

    #[test]
    fn test_describe_formats() {
        assert_eq!(describe_formats(&[ExportFormat::Pwx]), "format 'pwx'");
        assert_eq!(
            describe_formats(&[ExportFormat::Json, ExportFormat::Gpx]),
            "formats 'json, gpx'"
        );
    }
}
