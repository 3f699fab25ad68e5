//! GCD usage evaluation: did every global-cooldown opportunity inside the
//! window get used?

use hashbrown::HashMap;
use kardia_types::{ActionId, ChecklistRule, Requirement, Suggestion, WindowCell};

use crate::history::HistoryEntry;

use super::{classify, EvalContext, EvaluatedAction, Evaluator, SeverityTiers};

/// Counts on-GCD actions inside each window (optionally weighted, for
/// actions that consume several stacks per press) and compares against the
/// count the window's duration and the estimated GCD length allow. Downtime
/// overlap is subtracted from the duration before deriving the expectation.
pub struct ExpectedGcdCountEvaluator {
    /// Per-action GCD weight; unlisted actions count as 1.
    weights: HashMap<ActionId, u32>,
    checklist_name: String,
    checklist_description: String,
    checklist_target: f64,
    suggestion_icon: String,
    suggestion_content: String,
    tiers: SeverityTiers,
}

impl ExpectedGcdCountEvaluator {
    pub fn new(
        checklist_name: impl Into<String>,
        checklist_description: impl Into<String>,
        checklist_target: f64,
        suggestion_icon: impl Into<String>,
        suggestion_content: impl Into<String>,
        tiers: SeverityTiers,
    ) -> Self {
        Self {
            weights: HashMap::new(),
            checklist_name: checklist_name.into(),
            checklist_description: checklist_description.into(),
            checklist_target,
            suggestion_icon: suggestion_icon.into(),
            suggestion_content: suggestion_content.into(),
            tiers,
        }
    }

    /// Count an action as several GCDs per use.
    pub fn with_weight(mut self, action: ActionId, weight: u32) -> Self {
        self.weights.insert(action, weight);
        self
    }

    fn actual_for(&self, window: &HistoryEntry<EvaluatedAction>, ctx: &EvalContext<'_>) -> u32 {
        window
            .data
            .iter()
            .filter(|a| ctx.data.is_on_gcd(a.action))
            .map(|a| self.weights.get(&a.action).copied().unwrap_or(1))
            .sum()
    }

    fn expected_for(&self, window: &HistoryEntry<EvaluatedAction>, ctx: &EvalContext<'_>) -> u32 {
        let end = window.end.unwrap_or(window.start);
        let usable = (end - window.start) - ctx.downtime_overlap(window.start, end);
        (usable.max(0) / ctx.gcd_length.max(1)) as u32
    }

    fn totals(
        &self,
        windows: &[HistoryEntry<EvaluatedAction>],
        ctx: &EvalContext<'_>,
    ) -> (u32, u32) {
        windows.iter().fold((0, 0), |(actual, expected), window| {
            (
                actual + self.actual_for(window, ctx),
                expected + self.expected_for(window, ctx),
            )
        })
    }
}

impl Evaluator for ExpectedGcdCountEvaluator {
    fn columns(&self, _ctx: &EvalContext<'_>) -> Vec<String> {
        vec!["GCDs".to_string()]
    }

    fn cells(&self, window: &HistoryEntry<EvaluatedAction>, ctx: &EvalContext<'_>) -> Vec<WindowCell> {
        let actual = self.actual_for(window, ctx);
        let expected = self.expected_for(window, ctx);
        vec![WindowCell::Count {
            actual,
            expected,
            outcome: classify(actual, expected),
        }]
    }

    fn suggest(
        &self,
        windows: &[HistoryEntry<EvaluatedAction>],
        ctx: &EvalContext<'_>,
    ) -> Option<Suggestion> {
        let shortfall: u32 = windows
            .iter()
            .map(|w| self.expected_for(w, ctx).saturating_sub(self.actual_for(w, ctx)))
            .sum();

        let severity = self.tiers.severity_for(shortfall)?;
        Some(Suggestion {
            icon: self.suggestion_icon.clone(),
            content: self.suggestion_content.clone(),
            why: format!(
                "{shortfall} GCD{} went unused inside your windows.",
                if shortfall == 1 { "" } else { "s" },
            ),
            severity,
        })
    }

    fn checklist(
        &self,
        windows: &[HistoryEntry<EvaluatedAction>],
        ctx: &EvalContext<'_>,
    ) -> Option<ChecklistRule> {
        let (actual, expected) = self.totals(windows, ctx);
        if expected == 0 {
            return None;
        }
        let percent = (f64::from(actual) / f64::from(expected) * 100.0).min(100.0);
        Some(ChecklistRule {
            name: self.checklist_name.clone(),
            description: self.checklist_description.clone(),
            requirements: vec![Requirement {
                name: "GCDs used inside windows".to_string(),
                percent,
            }],
            target: self.checklist_target,
        })
    }
}
