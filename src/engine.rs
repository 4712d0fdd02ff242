use chrono::Local;
use rand::seq::SliceRandom;
use std::time::SystemTime;

use crate::error::{Error, Result};
use crate::session::{SessionConfig, SessionResult, SessionStatus, TestMode};
use crate::text::{TextProvider, FALLBACK_WORDS};
use crate::time_series::TimeSeriesPoint;

/// Minimum wall-clock gap between consecutive live WPM samples.
const SAMPLE_INTERVAL_SECS: f64 = 1.0;

/// Scoring state machine for one typing test.
///
/// The engine never schedules anything itself: keystrokes, once-per-second
/// ticks, and the mode-specific completion checks are all driven by the
/// caller (see `runtime::Driver`). Stray events arriving in the wrong state
/// are silently ignored rather than errored, since a UI may race slightly
/// with state changes.
#[derive(Debug)]
pub struct TypingTest {
    pub config: SessionConfig,
    pub target_text: String,
    pub typed_text: String,
    pub status: SessionStatus,
    pub started_at: Option<SystemTime>,
    /// Countdown for time mode, decremented by `on_tick`. Display-only
    /// between ticks.
    pub remaining_secs: Option<f64>,
    pub correct_chars: usize,
    pub total_chars: usize,
    pub errors: usize,
    pub wpm_samples: Vec<TimeSeriesPoint>,
    last_sample_at: Option<SystemTime>,
    target_chars: Vec<char>,
}

impl TypingTest {
    /// Resolves the target text and returns a Pending test, or
    /// `Error::InvalidConfig` before any state exists.
    pub fn start(config: SessionConfig, provider: &dyn TextProvider) -> Result<Self> {
        let target_text = resolve_target_text(&config, provider)?;
        if target_text.is_empty() {
            return Err(Error::InvalidConfig("resolved target text is empty".into()));
        }

        let remaining_secs = match config.mode {
            TestMode::Time => config.target_value.map(|v| v as f64),
            _ => None,
        };
        let target_chars = target_text.chars().collect();

        Ok(Self {
            config,
            target_text,
            typed_text: String::new(),
            status: SessionStatus::Pending,
            started_at: None,
            remaining_secs,
            correct_chars: 0,
            total_chars: 0,
            errors: 0,
            wpm_samples: vec![],
            last_sample_at: None,
            target_chars,
        })
    }

    /// First non-modifier keystroke arms the test. No-op in any other state.
    pub fn on_keystroke(&mut self, modifier_key: bool, now: SystemTime) {
        if self.status == SessionStatus::Pending && !modifier_key {
            self.status = SessionStatus::Active;
            self.started_at = Some(now);
            self.last_sample_at = Some(now);
        }
    }

    /// Replaces the typed prefix and rescores it positionally from scratch,
    /// so backspace can reduce counts. Ignored unless the test is active.
    pub fn update_typed_text(&mut self, new_text: &str) {
        if self.status != SessionStatus::Active {
            return;
        }

        self.typed_text = new_text.to_string();
        self.correct_chars = 0;
        self.errors = 0;
        self.total_chars = 0;

        // Positions past the end of the target count toward total only.
        for (i, c) in self.typed_text.chars().enumerate() {
            self.total_chars += 1;
            if let Some(&expected) = self.target_chars.get(i) {
                if c == expected {
                    self.correct_chars += 1;
                } else {
                    self.errors += 1;
                }
            }
        }
    }

    /// Whitespace-token throughput of the typed text so far. Differs from
    /// the final result's 5-chars-per-word figure on purpose.
    pub fn live_wpm(&self, now: SystemTime) -> f64 {
        let Some(started_at) = self.started_at else {
            return 0.0;
        };
        let elapsed_mins = now
            .duration_since(started_at)
            .unwrap_or_default()
            .as_secs_f64()
            / 60.0;
        if elapsed_mins > 0.0 {
            self.words_typed() as f64 / elapsed_mins
        } else {
            0.0
        }
    }

    pub fn live_accuracy(&self) -> f64 {
        if self.total_chars > 0 {
            (self.correct_chars as f64 / self.total_chars as f64) * 100.0
        } else {
            100.0
        }
    }

    pub fn words_typed(&self) -> usize {
        self.typed_text.split_whitespace().count()
    }

    /// Appends a live WPM sample if at least a second has passed since the
    /// previous one. Called by the driver on every keystroke.
    pub fn sample_if_due(&mut self, now: SystemTime) {
        if self.status != SessionStatus::Active {
            return;
        }
        let (Some(started_at), Some(last)) = (self.started_at, self.last_sample_at) else {
            return;
        };
        let since_last = now.duration_since(last).unwrap_or_default().as_secs_f64();
        if since_last >= SAMPLE_INTERVAL_SECS {
            let elapsed = now
                .duration_since(started_at)
                .unwrap_or_default()
                .as_secs_f64();
            let wpm = self.live_wpm(now);
            self.wpm_samples.push(TimeSeriesPoint::new(elapsed, wpm));
            self.last_sample_at = Some(now);
        }
    }

    /// Once-per-second countdown for time mode, invoked by the external
    /// ticker while the test is active.
    pub fn on_tick(&mut self) {
        if self.status != SessionStatus::Active {
            return;
        }
        if let Some(remaining) = self.remaining_secs {
            self.remaining_secs = Some(remaining - 1.0);
        }
    }

    pub fn time_expired(&self) -> bool {
        matches!(self.remaining_secs, Some(remaining) if remaining <= 0.0)
    }

    /// Word-mode completion predicate; the caller checks this after every
    /// `update_typed_text`.
    pub fn word_target_reached(&self) -> bool {
        self.config.mode == TestMode::Words
            && matches!(self.config.target_value, Some(v) if self.words_typed() >= v as usize)
    }

    /// Paragraph/custom completion predicate: every target position typed.
    pub fn text_exhausted(&self) -> bool {
        self.typed_text.chars().count() >= self.target_chars.len()
    }

    /// Finalizes the test. Idempotent: terminal states yield nothing, so at
    /// most one result is ever emitted.
    ///
    /// Final WPM uses the 5-characters-per-word convention over everything
    /// typed, not the live token count.
    pub fn complete(&mut self, now: SystemTime) -> Option<SessionResult> {
        if self.status.is_terminal() {
            return None;
        }
        self.status = SessionStatus::Completed;

        let duration_secs = self
            .started_at
            .and_then(|s| now.duration_since(s).ok())
            .map_or(0.0, |d| d.as_secs_f64());

        let wpm = if duration_secs > 0.0 {
            (self.total_chars as f64 / 5.0) / (duration_secs / 60.0)
        } else {
            0.0
        };

        Some(SessionResult {
            mode: self.config.mode,
            difficulty: self.config.difficulty,
            wpm,
            accuracy: self.live_accuracy(),
            errors: self.errors,
            correct_chars: self.correct_chars,
            total_chars: self.total_chars,
            duration_secs,
            wpm_over_time: self.wpm_samples.clone(),
            timestamp: Local::now(),
        })
    }

    /// Abandons the test without emitting a result. Terminal states stay put.
    pub fn cancel(&mut self) {
        if !self.status.is_terminal() {
            self.status = SessionStatus::Cancelled;
        }
    }
}

fn resolve_target_text(config: &SessionConfig, provider: &dyn TextProvider) -> Result<String> {
    match config.mode {
        TestMode::Custom => config
            .custom_text
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::InvalidConfig("custom mode requires custom text".into())),
        TestMode::Paragraph => Ok(provider.get_paragraph(config.difficulty)),
        TestMode::Words | TestMode::Time => {
            let value = positive_target(config)?;
            let mut words = provider.get_words(config.difficulty);
            if words.is_empty() {
                words = FALLBACK_WORDS.iter().map(|w| w.to_string()).collect();
            }
            Ok(match config.mode {
                TestMode::Words => sample_exact(&words, value),
                _ => sample_for_duration(&words, value),
            })
        }
    }
}

fn positive_target(config: &SessionConfig) -> Result<usize> {
    match config.target_value {
        Some(v) if v > 0 => Ok(v as usize),
        Some(v) => Err(Error::InvalidConfig(format!(
            "target value must be positive, got {v}"
        ))),
        None => Err(Error::InvalidConfig(format!(
            "{} mode requires a target value",
            config.mode
        ))),
    }
}

/// Exactly `count` words: unique picks first, repeats to top up when the
/// list is shorter than the request.
fn sample_exact(words: &[String], count: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut selected: Vec<String> = words
        .choose_multiple(&mut rng, count.min(words.len()))
        .cloned()
        .collect();
    while selected.len() < count {
        if let Some(w) = words.choose(&mut rng) {
            selected.push(w.clone());
        }
    }
    selected.join(" ")
}

/// Time mode oversizes the prompt: roughly one word per second, times five,
/// capped at three passes over the list.
fn sample_for_duration(words: &[String], secs: usize) -> String {
    let mut rng = rand::thread_rng();
    let count = (secs * 5).min(words.len() * 3).max(1);
    (0..count)
        .filter_map(|_| words.choose(&mut rng).cloned())
        .collect::<Vec<_>>()
        .join(" ")
}
