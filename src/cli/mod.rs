//! CLI definitions and the sync command for veloherodown.

pub mod commands;

use clap::Parser;

const AFTER_HELP: &str = "\
FORMATS:
  json           Velo Hero generic JSON format (with all details)
  pwx            Training Peaks PWX file with laps (can be processed by Golden Cheetah)
  csv            Comma-Separated Values CSV file
  gpx            GPX file (only the geo coordinates)
  kml            Google Earth KML file
  tcx            Garmin TCX file

If no format is specified, 'pwx' is used by default.
Multiple formats can be specified to download in several formats.

Examples:
  veloherodown             Download in PWX format
  veloherodown json        Download in JSON format
  veloherodown json pwx    Download in both JSON and PWX formats

The first time all files are downloaded.
For further calls only changes and new files are downloaded.
All files are saved in the current working directory.

Configuration:
  The program looks for a '.veloherorc' file in the current directory.
  If not found, it will prompt you to enter your SSO key.
  You can get your SSO key at https://app.velohero.com/sso";

/// veloherodown - Download your Velo Hero data
#[derive(Debug, Parser)]
#[command(name = "veloherodown")]
#[command(version, about = "Download your Velo Hero data", long_about = None)]
#[command(after_help = AFTER_HELP)]
pub struct Cli {
    /// Formats to export (json, pwx, csv, gpx, kml, tcx)
    #[arg(value_name = "FORMAT")]
    pub formats: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_positional_formats() {
        let cli = Cli::try_parse_from(["veloherodown", "json", "pwx", "json"]).unwrap();
        assert_eq!(cli.formats, vec!["json", "pwx", "json"]);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_no_arguments() {
        let cli = Cli::try_parse_from(["veloherodown"]).unwrap();
        assert!(cli.formats.is_empty());
    }

    #[test]
    fn test_unknown_format_is_left_to_validation() {
        // Format validation happens in the sync command so the message can
        // name the valid set.
        let cli = Cli::try_parse_from(["veloherodown", "fit"]).unwrap();
        assert_eq!(cli.formats, vec!["fit"]);
    }

    #[test]
    fn test_help_short_circuits() {
        for flag in ["--help", "-h"] {
            let err = Cli::try_parse_from(["veloherodown", "pwx", flag]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        }
    }

    #[test]
    fn test_verbose_flag() {
        let cli = Cli::try_parse_from(["veloherodown", "-v", "gpx"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.formats, vec!["gpx"]);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
