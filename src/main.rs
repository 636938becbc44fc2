//! veloherodown CLI - Download your Velo Hero data

use clap::error::ErrorKind;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;
use veloherodown::cli::{commands, Cli};
use veloherodown::credentials::{prompt_sso_key, sso_key_help};
use veloherodown::error::EXIT_FAILURE;
use veloherodown::{Config, SyncError};

fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("veloherodown={}", log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(EXIT_FAILURE);
        }
    };

    init_logging(cli.verbose);

    let config = Config::default();
    match commands::sync(&config, &cli.formats, prompt_sso_key) {
        Ok(_) => {}
        Err(SyncError::MissingCredential) => {
            println!("{}", sso_key_help("veloherodown"));
            std::process::exit(SyncError::MissingCredential.exit_code());
        }
        Err(e) => {
            println!();
            println!("{} {}", "FAILURE:".red().bold(), e);
            println!();
            std::process::exit(e.exit_code());
        }
    }
}
