//! The open/close/record state machine shared by window modules.

use kardia_types::Timestamp;

use crate::evaluate::EvaluatedAction;
use crate::history::{History, HistoryEntry};

/// What to do when an open trigger arrives while a window is already open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReopenPolicy {
    /// Merge into the current window; for duration-bounded windows the
    /// scheduled close is pushed out from the new trigger.
    #[default]
    Extend,
    /// Drop the second trigger entirely.
    Ignore,
}

/// Whether an action landing exactly at the window's closing timestamp
/// counts as inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndOfWindowPolicy {
    /// Same-timestamp actions are inside, even when dispatched after the
    /// close trigger.
    #[default]
    SameTimestamp,
    /// The close trigger seals the window.
    Strict,
}

/// Converts open/close/record calls into a [`History`] of windows,
/// handling duration-bounded lazy closes and the end-of-window policy.
#[derive(Debug)]
pub struct WindowTracker {
    history: History<EvaluatedAction>,
    reopen: ReopenPolicy,
    end_policy: EndOfWindowPolicy,
    max_duration: Option<Timestamp>,
    /// Scheduled close for the current window, when duration-bounded.
    deadline: Option<Timestamp>,
}

impl WindowTracker {
    pub fn new(reopen: ReopenPolicy, end_policy: EndOfWindowPolicy) -> Self {
        Self {
            history: History::new(),
            reopen,
            end_policy,
            max_duration: None,
            deadline: None,
        }
    }

    /// Bound windows to a fixed duration; they close retroactively at the
    /// deadline once a later event shows the deadline has passed.
    pub fn with_max_duration(mut self, duration_ms: Timestamp) -> Self {
        self.max_duration = Some(duration_ms);
        self
    }

    /// Lazily close a duration-expired window before handling `ts`.
    fn advance(&mut self, ts: Timestamp) {
        if let Some(deadline) = self.deadline
            && self.history.current().is_some()
            && ts > deadline
        {
            self.history.close(deadline);
            self.deadline = None;
        }
    }

    pub fn open(&mut self, ts: Timestamp) {
        self.advance(ts);
        if self.history.open(ts) {
            self.deadline = self.max_duration.map(|d| ts + d);
        } else if self.reopen == ReopenPolicy::Extend
            && let Some(d) = self.max_duration
        {
            self.deadline = Some(ts + d);
        }
    }

    pub fn close(&mut self, ts: Timestamp) {
        self.advance(ts);
        if self.history.close(ts) {
            self.deadline = None;
        }
    }

    /// Record a tracked action. Appends to the open window, or, under the
    /// same-timestamp policy, to a window that just closed at `ts`.
    pub fn record(&mut self, ts: Timestamp, item: EvaluatedAction) {
        self.advance(ts);
        if self.history.append(item) {
            return;
        }
        if self.end_policy == EndOfWindowPolicy::SameTimestamp
            && let Some(last) = self.history.last_mut()
            && last.end == Some(ts)
        {
            last.data.push(item);
        }
    }

    /// Force-close any open window at the earlier of its deadline and `end`.
    pub fn close_all(&mut self, end: Timestamp) {
        if self.history.current().is_some() {
            let at = self.deadline.map(|d| d.min(end)).unwrap_or(end);
            self.history.close(at);
        }
        self.deadline = None;
    }

    pub fn is_open(&self) -> bool {
        self.history.current().is_some()
    }

    pub fn windows(&self) -> &[HistoryEntry<EvaluatedAction>] {
        self.history.entries()
    }
}
