use chrono::{DateTime, Local};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::time_series::TimeSeriesPoint;

/// Reserved username for anonymous sessions. Guest results are kept as
/// history rows but never update an aggregate stats row.
pub const GUEST_USER: &str = "guest";

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Serialize, Deserialize, strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TestMode {
    /// type until a fixed number of seconds has elapsed
    Time,
    /// type a fixed number of words
    Words,
    /// type a whole paragraph for the chosen difficulty
    Paragraph,
    /// type caller-supplied text
    Custom,
}

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Serialize, Deserialize, strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Immutable parameters for one test, fixed at session start.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub mode: TestMode,
    /// Seconds for time mode, word count for words mode. Unused otherwise.
    pub target_value: Option<i64>,
    pub difficulty: Difficulty,
    /// Pass-through prompt for custom mode.
    pub custom_text: Option<String>,
}

/// Lifecycle of a test. Transitions are monotonic:
/// Pending -> Active -> (Completed | Cancelled).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Pending,
    Active,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Cancelled)
    }
}

/// Emitted exactly once per completed test. Immutable after creation.
#[derive(Debug, Clone)]
pub struct SessionResult {
    pub mode: TestMode,
    pub difficulty: Difficulty,
    pub wpm: f64,
    pub accuracy: f64,
    pub errors: usize,
    pub correct_chars: usize,
    pub total_chars: usize,
    pub duration_secs: f64,
    pub wpm_over_time: Vec<TimeSeriesPoint>,
    pub timestamp: DateTime<Local>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_display_is_lowercase() {
        assert_eq!(TestMode::Time.to_string(), "time");
        assert_eq!(TestMode::Paragraph.to_string(), "paragraph");
        assert_eq!(Difficulty::Intermediate.to_string(), "intermediate");
    }

    #[test]
    fn terminal_states() {
        assert!(!SessionStatus::Pending.is_terminal());
        assert!(!SessionStatus::Active.is_terminal());
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::Cancelled.is_terminal());
    }
}
