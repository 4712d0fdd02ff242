use itertools::Itertools;

use crate::error::{Error, Result};
use crate::session::SessionResult;
use crate::store::{LeaderboardRow, ProgressRow};
use crate::util::mean;

/// Running per-user aggregate, updated incrementally on every recorded
/// result. Never recomputed from full history.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UserStats {
    pub tests_completed: i64,
    pub avg_wpm: f64,
    pub avg_accuracy: f64,
}

/// Snapshot derived from a user's full progress history.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub tests_completed: usize,
    pub avg_wpm: f64,
    pub max_wpm: f64,
    /// Timestamp of the first session that hit `max_wpm`.
    pub best_wpm_at: String,
    pub avg_accuracy: f64,
    pub max_accuracy: f64,
}

/// Folds one result into the running averages.
pub fn update_user_stats(current: &UserStats, result: &SessionResult) -> UserStats {
    let n = current.tests_completed;
    let n1 = n + 1;
    UserStats {
        tests_completed: n1,
        avg_wpm: (current.avg_wpm * n as f64 + result.wpm) / n1 as f64,
        avg_accuracy: (current.avg_accuracy * n as f64 + result.accuracy) / n1 as f64,
    }
}

/// Ranks results by WPM descending. Ties break deterministically on the
/// earliest timestamp; the store's SQL query orders the same way.
pub fn leaderboard(rows: &[LeaderboardRow], limit: usize) -> Vec<LeaderboardRow> {
    rows.iter()
        .cloned()
        .sorted_by(|a, b| {
            b.wpm
                .partial_cmp(&a.wpm)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.timestamp.cmp(&b.timestamp))
        })
        .take(limit)
        .collect()
}

/// Ordinary least-squares slope of `values` against their 0-based index.
/// Undefined below two points.
pub fn trend_slope(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let n_f = n as f64;
    let x_mean = (n_f - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n_f;

    let mut num = 0.0;
    let mut den = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        num += dx * (y - y_mean);
        den += dx * dx;
    }

    Some(num / den)
}

/// Aggregates one user's progress rows (oldest first). Callers must check
/// for history before asking: zero rows is `Error::EmptyHistory`.
pub fn summary(rows: &[ProgressRow]) -> Result<UserSummary> {
    if rows.is_empty() {
        return Err(Error::EmptyHistory);
    }

    let wpm_values: Vec<f64> = rows.iter().map(|r| r.wpm).collect();
    let accuracy_values: Vec<f64> = rows.iter().map(|r| r.accuracy).collect();

    // first occurrence of the max wins the best-performance timestamp
    let mut best_idx = 0;
    for (i, wpm) in wpm_values.iter().enumerate() {
        if *wpm > wpm_values[best_idx] {
            best_idx = i;
        }
    }

    Ok(UserSummary {
        tests_completed: rows.len(),
        avg_wpm: mean(&wpm_values).unwrap_or(0.0),
        max_wpm: wpm_values[best_idx],
        best_wpm_at: rows[best_idx].timestamp.clone(),
        avg_accuracy: mean(&accuracy_values).unwrap_or(0.0),
        max_accuracy: accuracy_values.iter().cloned().fold(f64::MIN, f64::max),
    })
}
