//! Sync module - Incremental export from Velo Hero.
//!
//! This module contains:
//! - HTTP client for the login check, the workout list and activity exports
//! - Parser for the workout list
//! - Fixed-pause retry loop

pub mod client;
pub mod retry;
pub mod workouts;

pub use client::{ExportOutcome, VeloHeroClient};
pub use workouts::{parse_workout_list, Workout};
