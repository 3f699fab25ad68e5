//! Expected-use evaluation against unions of interchangeable actions.

use kardia_types::{ActionId, Suggestion, WindowCell};

use crate::history::HistoryEntry;

use super::{classify, EvalContext, EvaluatedAction, Evaluator, SeverityTiers};

/// A set of interchangeable actions sharing one expected-count target: any
/// member counts toward the group's expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionGroup {
    pub label: String,
    pub actions: Vec<ActionId>,
    pub expected_per_window: u32,
}

impl ActionGroup {
    fn actual_for(&self, window: &HistoryEntry<EvaluatedAction>) -> u32 {
        window
            .data
            .iter()
            .filter(|a| self.actions.contains(&a.action))
            .count() as u32
    }
}

/// Like [`ExpectedActionsEvaluator`](super::ExpectedActionsEvaluator), but
/// the expectation is against the union of a group's actions.
pub struct ExpectedActionGroupsEvaluator {
    groups: Vec<ActionGroup>,
    suggestion_icon: String,
    suggestion_content: String,
    tiers: SeverityTiers,
}

impl ExpectedActionGroupsEvaluator {
    pub fn new(
        groups: Vec<ActionGroup>,
        suggestion_icon: impl Into<String>,
        suggestion_content: impl Into<String>,
        tiers: SeverityTiers,
    ) -> Self {
        Self {
            groups,
            suggestion_icon: suggestion_icon.into(),
            suggestion_content: suggestion_content.into(),
            tiers,
        }
    }
}

impl Evaluator for ExpectedActionGroupsEvaluator {
    fn columns(&self, _ctx: &EvalContext<'_>) -> Vec<String> {
        self.groups.iter().map(|g| g.label.clone()).collect()
    }

    fn cells(&self, window: &HistoryEntry<EvaluatedAction>, _ctx: &EvalContext<'_>) -> Vec<WindowCell> {
        self.groups
            .iter()
            .map(|group| {
                let actual = group.actual_for(window);
                WindowCell::Count {
                    actual,
                    expected: group.expected_per_window,
                    outcome: classify(actual, group.expected_per_window),
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
                self.groups
                    .iter()
                    .map(move |group| group.expected_per_window.saturating_sub(group.actual_for(window)))
            })
            .sum();

        let severity = self.tiers.severity_for(shortfall)?;
        Some(Suggestion {
            icon: self.suggestion_icon.clone(),
            content: self.suggestion_content.clone(),
            why: format!(
                "{shortfall} expected use{} missing across {} window{}.",
                if shortfall == 1 { "" } else { "s" },
                windows.len(),
                if windows.len() == 1 { "" } else { "s" },
            ),
            severity,
        })
    }
}
