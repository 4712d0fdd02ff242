use std::time::SystemTime;

use crate::engine::TypingTest;
use crate::session::{SessionResult, SessionStatus, TestMode};

/// Discrete external events driving one session. Everything runs on a
/// single logical thread of control; nothing here blocks.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// A printable character was typed.
    Char(char),
    Backspace,
    /// A pure modifier (shift, ctrl, alt) went down.
    Modifier,
    /// One second of wall clock elapsed (time-mode countdown).
    Tick,
    /// Abandon the session.
    Cancel,
}

/// Owns one `TypingTest` and the typed-text buffer, translating events into
/// engine calls and running the mode-specific completion checks the engine
/// does not self-monitor.
#[derive(Debug)]
pub struct Driver {
    pub test: TypingTest,
    buffer: String,
}

impl Driver {
    pub fn new(test: TypingTest) -> Self {
        Self {
            test,
            buffer: String::new(),
        }
    }

    /// Applies one event. Returns the terminal result when this event
    /// completed the session, which happens at most once.
    pub fn apply(&mut self, event: SessionEvent, now: SystemTime) -> Option<SessionResult> {
        match event {
            SessionEvent::Modifier => {
                self.test.on_keystroke(true, now);
                None
            }
            SessionEvent::Char(c) => {
                self.test.on_keystroke(false, now);
                if self.test.status != SessionStatus::Active {
                    return None;
                }
                self.buffer.push(c);
                self.test.update_typed_text(&self.buffer);
                self.test.sample_if_due(now);
                self.check_text_completion(now)
            }
            SessionEvent::Backspace => {
                if self.test.status != SessionStatus::Active {
                    return None;
                }
                self.buffer.pop();
                self.test.update_typed_text(&self.buffer);
                self.test.sample_if_due(now);
                None
            }
            SessionEvent::Tick => {
                self.test.on_tick();
                if self.test.time_expired() {
                    self.test.complete(now)
                } else {
                    None
                }
            }
            SessionEvent::Cancel => {
                self.test.cancel();
                None
            }
        }
    }

    fn check_text_completion(&mut self, now: SystemTime) -> Option<SessionResult> {
        let done = match self.test.config.mode {
            TestMode::Words => self.test.word_target_reached(),
            TestMode::Paragraph | TestMode::Custom => self.test.text_exhausted(),
            // time mode only ends on tick expiry
            TestMode::Time => false,
        };
        if done {
            self.test.complete(now)
        } else {
            None
        }
    }
}
