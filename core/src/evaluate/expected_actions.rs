//! Expected-use evaluation for individual actions inside windows.

use kardia_types::{ActionId, Suggestion, WindowCell};

use crate::history::HistoryEntry;

use super::{classify, EvalContext, EvaluatedAction, Evaluator, SeverityTiers};

/// One action with its per-window expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedAction {
    pub action: ActionId,
    pub expected_per_window: u32,
}

/// Caller-supplied adjustment of an expectation for one window, enabling
/// cross-action substitution rules ("N single-target casts reduce the
/// expected count of the AoE alternative by N").
pub type ExpectedAdjuster =
    Box<dyn Fn(&HistoryEntry<EvaluatedAction>, ActionId, u32) -> u32>;

/// Counts occurrences of each tracked action inside a window, compares to
/// the (possibly adjusted) expectation, and aggregates shortfalls into a
/// severity-tiered suggestion.
pub struct ExpectedActionsEvaluator {
    actions: Vec<TrackedAction>,
    suggestion_icon: String,
    suggestion_content: String,
    tiers: SeverityTiers,
    adjust: Option<ExpectedAdjuster>,
}

impl ExpectedActionsEvaluator {
    pub fn new(
        actions: Vec<TrackedAction>,
        suggestion_icon: impl Into<String>,
        suggestion_content: impl Into<String>,
        tiers: SeverityTiers,
    ) -> Self {
        Self {
            actions,
            suggestion_icon: suggestion_icon.into(),
            suggestion_content: suggestion_content.into(),
            tiers,
            adjust: None,
        }
    }

    /// Install a per-window expectation adjustment hook.
    pub fn with_adjuster(mut self, adjust: ExpectedAdjuster) -> Self {
        self.adjust = Some(adjust);
        self
    }

    fn expected_for(&self, window: &HistoryEntry<EvaluatedAction>, tracked: &TrackedAction) -> u32 {
        match &self.adjust {
            Some(adjust) => adjust(window, tracked.action, tracked.expected_per_window),
            None => tracked.expected_per_window,
        }
    }

    fn actual_for(window: &HistoryEntry<EvaluatedAction>, action: ActionId) -> u32 {
        window.data.iter().filter(|a| a.action == action).count() as u32
    }
}

impl Evaluator for ExpectedActionsEvaluator {
    fn columns(&self, ctx: &EvalContext<'_>) -> Vec<String> {
        self.actions
            .iter()
            .map(|t| ctx.data.action_name(t.action))
            .collect()
    }

    fn cells(&self, window: &HistoryEntry<EvaluatedAction>, _ctx: &EvalContext<'_>) -> Vec<WindowCell> {
        self.actions
            .iter()
            .map(|tracked| {
                let actual = Self::actual_for(window, tracked.action);
                let expected = self.expected_for(window, tracked);
                WindowCell::Count {
                    actual,
                    expected,
                    outcome: classify(actual, expected),
                }
            })
            .collect()
    }

    fn suggest(
        &self,
        windows: &[HistoryEntry<EvaluatedAction>],
        _ctx: &EvalContext<'_>,
    ) -> Option<Suggestion> {
        let shortfall: u32 = windows
            .iter()
            .flat_map(|window| {
                self.actions.iter().map(move |tracked| {
                    let actual = Self::actual_for(window, tracked.action);
                    self.expected_for(window, tracked).saturating_sub(actual)
                })
            })
            .sum();

        let severity = self.tiers.severity_for(shortfall)?;
        Some(Suggestion {
            icon: self.suggestion_icon.clone(),
            content: self.suggestion_content.clone(),
            why: format!(
                "{shortfall} expected cast{} missing across {} window{}.",
                if shortfall == 1 { "" } else { "s" },
                windows.len(),
                if windows.len() == 1 { "" } else { "s" },
            ),
            severity,
        })
    }
}
