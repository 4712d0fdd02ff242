// Store-backed statistics: results recorded through the engine land in the
// database, roll into per-user aggregates, and come back out through
// history, leaderboard, summary, and CSV export.

use std::time::{Duration, SystemTime};

use chrono::{Local, TimeZone};
use tempfile::tempdir;

use typespeed::analytics::{summary, trend_slope};
use typespeed::engine::TypingTest;
use typespeed::session::{Difficulty, SessionConfig, SessionResult, GUEST_USER, TestMode};
use typespeed::store::ResultStore;
use typespeed::text::BuiltinTextProvider;

fn complete_session(text: &str, secs: u64) -> SessionResult {
    let config = SessionConfig {
        mode: TestMode::Custom,
        target_value: None,
        difficulty: Difficulty::Beginner,
        custom_text: Some(text.to_string()),
    };
    let mut test = TypingTest::start(config, &BuiltinTextProvider).unwrap();
    let t0 = SystemTime::now() - Duration::from_secs(secs);
    test.on_keystroke(false, t0);
    test.update_typed_text(text);
    test.complete(SystemTime::now()).unwrap()
}

fn stamped(mut result: SessionResult, ts: (i32, u32, u32)) -> SessionResult {
    let (y, m, d) = ts;
    result.timestamp = Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap();
    result
}

#[test]
fn engine_results_round_trip_through_a_file_backed_store() {
    let dir = tempdir().unwrap();
    let store = ResultStore::open(dir.path().join("results.db")).unwrap();

    let first = stamped(complete_session("the cat sat", 30), (2024, 5, 1));
    let second = stamped(complete_session("a longer line of text here", 30), (2024, 5, 2));
    store.save_result("alice", &first).unwrap();
    store.save_result("alice", &second).unwrap();

    let history = store.load_history("alice").unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].timestamp, "2024-05-02 12:00:00");
    assert_eq!(history[0].mode, "custom");
    assert_eq!(history[0].difficulty, "beginner");
    assert!((history[1].wpm - first.wpm).abs() < 1e-9);

    let stats = store.user_stats("alice").unwrap().unwrap();
    assert_eq!(stats.tests_completed, 2);
    assert!((stats.avg_wpm - (first.wpm + second.wpm) / 2.0).abs() < 1e-9);
}

#[test]
fn guest_sessions_record_history_but_no_aggregates() {
    let store = ResultStore::open_in_memory().unwrap();
    let result = complete_session("hello world", 20);
    store.save_result(GUEST_USER, &result).unwrap();
    store.save_result("bob", &result).unwrap();

    assert_eq!(store.load_history(GUEST_USER).unwrap().len(), 1);
    assert!(store.user_stats(GUEST_USER).unwrap().is_none());
    assert_eq!(store.user_stats("bob").unwrap().unwrap().tests_completed, 1);
}

#[test]
fn progress_feeds_summary_and_trend() {
    let store = ResultStore::open_in_memory().unwrap();
    for (i, wpm_secs) in [60u64, 40, 30].iter().enumerate() {
        // shorter sessions over the same text -> rising wpm
        let result = stamped(
            complete_session("steady improvement here", *wpm_secs),
            (2024, 6, i as u32 + 1),
        );
        store.save_result("carol", &result).unwrap();
    }

    let progress = store.load_progress("carol").unwrap();
    assert_eq!(progress.len(), 3);
    assert!(progress[0].wpm < progress[2].wpm);

    let wpm_values: Vec<f64> = progress.iter().map(|r| r.wpm).collect();
    let slope = trend_slope(&wpm_values).unwrap();
    assert!(slope > 0.0);

    let s = summary(&progress).unwrap();
    assert_eq!(s.tests_completed, 3);
    assert_eq!(s.max_wpm, wpm_values[2]);
    assert_eq!(s.best_wpm_at, "2024-06-03 12:00:00");
}

#[test]
fn csv_export_writes_the_fixed_header_and_rows() {
    let dir = tempdir().unwrap();
    let store = ResultStore::open_in_memory().unwrap();
    let result = stamped(complete_session("export me", 15), (2024, 7, 4));
    store.save_result("dana", &result).unwrap();

    let out = dir.path().join("typing_results.csv");
    store.export_history("dana", &out).unwrap();

    let contents = std::fs::read_to_string(&out).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Test Mode,Difficulty,WPM,Accuracy (%),Errors,Duration (s),Timestamp"
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("custom,beginner,"));
    assert!(row.ends_with("2024-07-04 12:00:00"));
    assert_eq!(lines.next(), None);
}
