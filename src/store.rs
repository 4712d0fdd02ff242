use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

use crate::analytics::{update_user_stats, UserStats};
use crate::app_dirs::AppDirs;
use crate::error::Result;
use crate::session::{SessionResult, GUEST_USER};

/// Timestamp column format, shared by inserts, queries, and the CSV export.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One history entry as persisted, newest first from `load_history`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub mode: String,
    pub difficulty: String,
    pub wpm: f64,
    pub accuracy: f64,
    pub errors: i64,
    pub duration_secs: f64,
    pub timestamp: String,
}

/// Per-session WPM/accuracy pair, oldest first from `load_progress`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressRow {
    pub wpm: f64,
    pub accuracy: f64,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRow {
    pub username: String,
    pub wpm: f64,
    pub accuracy: f64,
    pub mode: String,
    pub difficulty: String,
    pub timestamp: String,
}

/// Local result history and per-user aggregates over SQLite.
#[derive(Debug)]
pub struct ResultStore {
    conn: Connection,
}

impl ResultStore {
    /// Opens (or creates) the store at the default state path.
    pub fn open_default() -> Result<Self> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("typespeed.db"));
        Self::open(&db_path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                mode TEXT NOT NULL,
                difficulty TEXT NOT NULL,
                wpm REAL NOT NULL,
                accuracy REAL NOT NULL,
                errors INTEGER NOT NULL,
                correct_chars INTEGER NOT NULL,
                total_chars INTEGER NOT NULL,
                duration_secs REAL NOT NULL,
                timestamp TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                username TEXT PRIMARY KEY,
                tests_completed INTEGER DEFAULT 0,
                avg_wpm REAL DEFAULT 0,
                avg_accuracy REAL DEFAULT 0
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_results_username ON results(username)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_results_wpm ON results(wpm)",
            [],
        )?;

        Ok(())
    }

    /// Inserts a history row and, for non-guest users, folds the result into
    /// their running averages. Returns the new row id.
    pub fn save_result(&self, username: &str, result: &SessionResult) -> Result<i64> {
        self.conn.execute(
            r#"
            INSERT INTO results
            (username, mode, difficulty, wpm, accuracy, errors, correct_chars, total_chars, duration_secs, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                username,
                result.mode.to_string(),
                result.difficulty.to_string(),
                result.wpm,
                result.accuracy,
                result.errors as i64,
                result.correct_chars as i64,
                result.total_chars as i64,
                result.duration_secs,
                result.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            ],
        )?;
        let result_id = self.conn.last_insert_rowid();

        if username != GUEST_USER {
            let current = self.user_stats(username)?.unwrap_or_default();
            let updated = update_user_stats(&current, result);
            self.conn.execute(
                r#"
                INSERT INTO users (username, tests_completed, avg_wpm, avg_accuracy)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(username) DO UPDATE SET
                    tests_completed = excluded.tests_completed,
                    avg_wpm = excluded.avg_wpm,
                    avg_accuracy = excluded.avg_accuracy
                "#,
                params![
                    username,
                    updated.tests_completed,
                    updated.avg_wpm,
                    updated.avg_accuracy
                ],
            )?;
        }

        Ok(result_id)
    }

    pub fn user_stats(&self, username: &str) -> Result<Option<UserStats>> {
        let mut stmt = self.conn.prepare(
            "SELECT tests_completed, avg_wpm, avg_accuracy FROM users WHERE username = ?1",
        )?;
        let mut rows = stmt.query_map([username], |row| {
            Ok(UserStats {
                tests_completed: row.get(0)?,
                avg_wpm: row.get(1)?,
                avg_accuracy: row.get(2)?,
            })
        })?;
        rows.next().transpose().map_err(Into::into)
    }

    pub fn load_history(&self, username: &str) -> Result<Vec<HistoryRow>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT mode, difficulty, wpm, accuracy, errors, duration_secs, timestamp
            FROM results
            WHERE username = ?1
            ORDER BY timestamp DESC, id DESC
            "#,
        )?;
        let rows = stmt.query_map([username], |row| {
            Ok(HistoryRow {
                mode: row.get(0)?,
                difficulty: row.get(1)?,
                wpm: row.get(2)?,
                accuracy: row.get(3)?,
                errors: row.get(4)?,
                duration_secs: row.get(5)?,
                timestamp: row.get(6)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    pub fn load_progress(&self, username: &str) -> Result<Vec<ProgressRow>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT wpm, accuracy, timestamp
            FROM results
            WHERE username = ?1
            ORDER BY timestamp ASC, id ASC
            "#,
        )?;
        let rows = stmt.query_map([username], |row| {
            Ok(ProgressRow {
                wpm: row.get(0)?,
                accuracy: row.get(1)?,
                timestamp: row.get(2)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Top scores across all users. Ties on WPM rank the earlier session
    /// first, matching `analytics::leaderboard`.
    pub fn load_leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardRow>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT username, wpm, accuracy, mode, difficulty, timestamp
            FROM results
            ORDER BY wpm DESC, timestamp ASC
            LIMIT ?1
            "#,
        )?;
        let rows = stmt.query_map([limit as i64], |row| {
            Ok(LeaderboardRow {
                username: row.get(0)?,
                wpm: row.get(1)?,
                accuracy: row.get(2)?,
                mode: row.get(3)?,
                difficulty: row.get(4)?,
                timestamp: row.get(5)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Writes a user's history to CSV, newest first.
    pub fn export_history<P: AsRef<Path>>(&self, username: &str, path: P) -> Result<()> {
        let history = self.load_history(username)?;

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record([
            "Test Mode",
            "Difficulty",
            "WPM",
            "Accuracy (%)",
            "Errors",
            "Duration (s)",
            "Timestamp",
        ])?;
        for row in &history {
            writer.write_record([
                row.mode.clone(),
                row.difficulty.clone(),
                format!("{:.2}", row.wpm),
                format!("{:.2}", row.accuracy),
                row.errors.to_string(),
                format!("{:.2}", row.duration_secs),
                row.timestamp.clone(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}
