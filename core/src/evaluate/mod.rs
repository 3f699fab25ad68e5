//! Window evaluators
//!
//! An evaluator judges a closed window's contents against an expectation.
//! Evaluators are pure: they read the window and the [`EvalContext`] and
//! produce table cells plus an optional aggregate suggestion/checklist
//! verdict; they never mutate the window.

pub mod action_groups;
pub mod expected_actions;
pub mod gcd_count;
pub mod notes;
pub mod overwrite;


pub use action_groups::{ActionGroup, ExpectedActionGroupsEvaluator};
pub use expected_actions::{ExpectedActionsEvaluator, TrackedAction};
pub use gcd_count::ExpectedGcdCountEvaluator;
pub use notes::NotesEvaluator;
pub use overwrite::RaidBuffOverwriteEvaluator;

use kardia_types::{
    ActionId, ActorId, ChecklistRule, Severity, StatusId, Suggestion, Timestamp, WindowCell,
};

use crate::data::{DataOverrides, GameData};
use crate::history::HistoryEntry;
use crate::pull::Pull;

/// One tracked action observed inside a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatedAction {
    pub timestamp: Timestamp,
    pub action: ActionId,
}

/// One application of a tracked status, recorded by the window module for
/// overwrite analysis (applications by anyone, to anyone).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusApplication {
    pub timestamp: Timestamp,
    pub source: ActorId,
    pub target: ActorId,
    pub status: StatusId,
}

/// Read-only inputs shared by every evaluator of one window module.
pub struct EvalContext<'a> {
    pub pull: &'a Pull,
    pub data: &'a GameData,
    pub overrides: &'a DataOverrides,
    /// The actor whose play is being analysed.
    pub analysed: ActorId,
    /// The tracked status, for buff-window modules.
    pub status: Option<StatusId>,
    /// Estimated GCD length in milliseconds (collaborator module's output).
    pub gcd_length: Timestamp,
    /// Closed downtime windows, for down-weighting.
    pub downtime: &'a [(Timestamp, Timestamp)],
    /// Every recorded application of the tracked status.
    pub applications: &'a [StatusApplication],
}

impl EvalContext<'_> {
    /// Milliseconds of `[start, end]` covered by downtime.
    pub fn downtime_overlap(&self, start: Timestamp, end: Timestamp) -> Timestamp {
        self.downtime
            .iter()
            .map(|&(dt_start, dt_end)| (end.min(dt_end) - start.max(dt_start)).max(0))
            .sum()
    }

    /// Whether a window touches any downtime period.
    pub fn in_downtime(&self, window: &HistoryEntry<EvaluatedAction>) -> bool {
        let end = window.end.unwrap_or(window.start);
        self.downtime_overlap(window.start, end) > 0
    }

    /// Effective duration of the tracked status, override-aware.
    pub fn status_duration(&self) -> Option<Timestamp> {
        self.status
            .and_then(|s| self.overrides.status_duration(self.data, s))
    }
}

/// A scoring unit attached to a window-producing module.
pub trait Evaluator {
    /// Table column headers this evaluator contributes.
    fn columns(&self, ctx: &EvalContext<'_>) -> Vec<String> {
        let _ = ctx;
        Vec::new()
    }

    /// One cell per column for a closed window.
    fn cells(&self, window: &HistoryEntry<EvaluatedAction>, ctx: &EvalContext<'_>) -> Vec<WindowCell> {
        let _ = (window, ctx);
        Vec::new()
    }

    /// Aggregate verdict across all windows, as a severity-tiered suggestion.
    fn suggest(
        &self,
        windows: &[HistoryEntry<EvaluatedAction>],
        ctx: &EvalContext<'_>,
    ) -> Option<Suggestion> {
        let _ = (windows, ctx);
        None
    }

    /// Aggregate verdict across all windows, as a checklist entry.
    fn checklist(
        &self,
        windows: &[HistoryEntry<EvaluatedAction>],
        ctx: &EvalContext<'_>,
    ) -> Option<ChecklistRule> {
        let _ = (windows, ctx);
        None
    }
}

/// Maps an aggregate shortfall to a severity: the chosen tier is the highest
/// key less than or equal to the value. Values below the lowest key map to
/// no severity (no suggestion).
#[derive(Debug, Clone)]
pub struct SeverityTiers {
    tiers: Vec<(u32, Severity)>,
}

impl SeverityTiers {
    pub fn new(tiers: impl IntoIterator<Item = (u32, Severity)>) -> Self {
        let mut tiers: Vec<_> = tiers.into_iter().collect();
        tiers.sort_by_key(|&(key, _)| key);
        debug_assert!(
            tiers.windows(2).all(|w| w[0].1 < w[1].1),
            "severity must strictly increase with tier key"
        );
        Self { tiers }
    }

    pub fn severity_for(&self, value: u32) -> Option<Severity> {
        self.tiers
            .iter()
            .rev()
            .find(|&&(key, _)| key <= value)
            .map(|&(_, severity)| severity)
    }
}

/// Classify an observed count against its expectation.
pub(crate) fn classify(actual: u32, expected: u32) -> kardia_types::Outcome {
    use kardia_types::Outcome;
    match actual.cmp(&expected) {
        std::cmp::Ordering::Less => Outcome::Under,
        std::cmp::Ordering::Equal => Outcome::Met,
        std::cmp::Ordering::Greater => Outcome::Over,
    }
}
