//! Workout list returned by `/export/workouts/csv`.
//!
//! One workout per line, fields separated by `;`:
//! `id;date;start time;duration[;...]`. The header shape is not guaranteed,
//! so every line whose first field is not a plain number is skipped.

use std::io::{self, BufRead};
use tracing::debug;

pub const FIELD_DELIMITER: char = ';';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workout {
    /// Numeric id, kept as text (used verbatim in URLs and file names)
    pub id: String,
    pub date: String,
    pub start_time: String,
    pub duration: String,
}

impl Workout {
    /// Parse one list line, `None` for headers, blanks and malformed rows
    pub fn from_line(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut fields = line.split(FIELD_DELIMITER);

        let id = fields.next()?;
        if !is_workout_id(id) {
            return None;
        }

        let date = fields.next()?;
        let start_time = fields.next()?;
        let duration = fields.next()?;

        Some(Self {
            id: id.to_string(),
            date: date.to_string(),
            start_time: start_time.to_string(),
            duration: duration.to_string(),
        })
    }
}

/// One or more ASCII digits, nothing else
fn is_workout_id(field: &str) -> bool {
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit())
}

/// Read all accepted workouts from a list payload
pub fn parse_workout_list<R: BufRead>(reader: R) -> io::Result<Vec<Workout>> {
    let mut workouts = Vec::new();

    for (index, line) in reader.split(b'\n').enumerate() {
        let line = line?;
        let line = String::from_utf8_lossy(&line);

        match Workout::from_line(&line) {
            Some(workout) => workouts.push(workout),
            None if line.trim().is_empty() => {}
            None => debug!("Skipping list line {}: {:?}", index + 1, line),
        }
    }

    Ok(workouts)
}
