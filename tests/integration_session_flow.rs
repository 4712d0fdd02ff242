// End-to-end session flows through the event driver: a session is armed by
// the first keystroke, rescored on every edit, and completed exactly once by
// the mode-specific trigger.

use std::time::{Duration, SystemTime};

use typespeed::engine::TypingTest;
use typespeed::runtime::{Driver, SessionEvent};
use typespeed::session::{Difficulty, SessionConfig, SessionStatus, TestMode};
use typespeed::text::BuiltinTextProvider;

fn start_driver(config: SessionConfig) -> Driver {
    Driver::new(TypingTest::start(config, &BuiltinTextProvider).unwrap())
}

#[test]
fn custom_session_with_mistakes_and_corrections() {
    let mut driver = start_driver(SessionConfig {
        mode: TestMode::Custom,
        target_value: None,
        difficulty: Difficulty::Beginner,
        custom_text: Some("the cat".to_string()),
    });

    let t0 = SystemTime::now();
    let mut clock = t0;
    let mut result = None;

    // "thx" then backspace then finish correctly, with >1s between some
    // keystrokes so live samples accumulate
    let script = [
        SessionEvent::Char('t'),
        SessionEvent::Char('h'),
        SessionEvent::Char('x'),
        SessionEvent::Backspace,
        SessionEvent::Char('e'),
        SessionEvent::Char(' '),
        SessionEvent::Char('c'),
        SessionEvent::Char('a'),
        SessionEvent::Char('t'),
    ];
    for ev in script {
        clock += Duration::from_millis(600);
        let emitted = driver.apply(ev, clock);
        if emitted.is_some() {
            result = emitted;
        }
    }

    let result = result.expect("typing the full text completes the session");
    assert_eq!(result.correct_chars, 7);
    assert_eq!(result.total_chars, 7);
    assert_eq!(result.errors, 0);
    assert_eq!(result.accuracy, 100.0);
    assert!(result.duration_secs > 0.0);
    assert!(!result.wpm_over_time.is_empty());
    // samples are ordered and at least a second apart
    for pair in result.wpm_over_time.windows(2) {
        assert!(pair[1].t - pair[0].t >= 1.0);
    }
}

#[test]
fn timed_session_ends_on_the_final_tick() {
    let mut driver = start_driver(SessionConfig {
        mode: TestMode::Time,
        target_value: Some(3),
        difficulty: Difficulty::Intermediate,
        custom_text: None,
    });

    let t0 = SystemTime::now();
    driver.apply(SessionEvent::Char('s'), t0);
    driver.apply(SessionEvent::Char('y'), t0 + Duration::from_millis(300));

    assert!(driver
        .apply(SessionEvent::Tick, t0 + Duration::from_secs(1))
        .is_none());
    assert!(driver
        .apply(SessionEvent::Tick, t0 + Duration::from_secs(2))
        .is_none());
    let result = driver
        .apply(SessionEvent::Tick, t0 + Duration::from_secs(3))
        .expect("countdown reaching zero completes the session");

    assert_eq!(result.mode, TestMode::Time);
    assert_eq!(result.total_chars, 2);
    assert!((result.duration_secs - 3.0).abs() < 0.1);
    // 2 chars over 3 seconds: (2/5) / (3/60) = 8 wpm
    assert!((result.wpm - 8.0).abs() < 0.5);

    // the session is terminal: no second result, no further typing
    assert!(driver
        .apply(SessionEvent::Tick, t0 + Duration::from_secs(4))
        .is_none());
    assert!(driver
        .apply(SessionEvent::Char('z'), t0 + Duration::from_secs(4))
        .is_none());
    assert_eq!(driver.test.typed_text, "sy");
}

#[test]
fn cancelled_session_emits_nothing_ever() {
    let mut driver = start_driver(SessionConfig {
        mode: TestMode::Paragraph,
        target_value: None,
        difficulty: Difficulty::Beginner,
        custom_text: None,
    });

    let now = SystemTime::now();
    driver.apply(SessionEvent::Char('T'), now);
    driver.apply(SessionEvent::Cancel, now);
    assert_eq!(driver.test.status, SessionStatus::Cancelled);

    // neither ticks nor keystrokes can resurrect it
    assert!(driver.apply(SessionEvent::Tick, now).is_none());
    assert!(driver.apply(SessionEvent::Char('h'), now).is_none());
    assert!(driver.test.complete(now).is_none());
}

#[test]
fn word_session_live_and_final_wpm_use_different_conventions() {
    let mut driver = start_driver(SessionConfig {
        mode: TestMode::Words,
        target_value: Some(2),
        difficulty: Difficulty::Beginner,
        custom_text: None,
    });

    let t0 = SystemTime::now();
    let mut clock = t0;
    let mut result = None;
    for c in "aa bb".chars() {
        clock += Duration::from_secs(6);
        let emitted = driver.apply(SessionEvent::Char(c), clock);
        if emitted.is_some() {
            result = emitted;
        }
    }
    let result = result.expect("second whitespace-delimited token completes the session");

    // completed at "aa b", 24s in: final = (4 chars / 5) / 0.4 min -> 2.0 wpm
    assert!((result.wpm - 2.0).abs() < 0.1);
    // live convention counts 2 tokens over the 30s clock -> 4.0 wpm
    let live = driver.test.live_wpm(clock);
    assert!((live - 4.0).abs() < 0.2);
}
