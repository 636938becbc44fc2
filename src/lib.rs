//! veloherodown - Download your Velo Hero data
//!
//! Incremental export of workouts from Velo Hero into the working directory.
//! Formats are passed through byte for byte; nothing is transformed.

pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod formats;
pub mod state;
pub mod sync;

pub use config::Config;
pub use error::SyncError;
