//! Raid buff interference detection
//!
//! Distinguishes "you overwrote someone else's application on a shared
//! target" from "someone else overwrote yours". The self-overwrite check
//! runs (and is reported) first: it looks back one buff-duration before the
//! window start. The overwritten-by-other check looks forward through the
//! window's actual, not nominal, span.

use kardia_types::{Suggestion, WindowCell};

use crate::history::HistoryEntry;

use super::{EvalContext, EvaluatedAction, Evaluator, SeverityTiers, StatusApplication};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interference<'a> {
    SelfOverwroteOther(&'a StatusApplication),
    OtherOverwroteSelf(&'a StatusApplication),
}

pub struct RaidBuffOverwriteEvaluator {
    suggestion_icon: String,
    tiers: SeverityTiers,
}

impl RaidBuffOverwriteEvaluator {
    pub fn new(suggestion_icon: impl Into<String>, tiers: SeverityTiers) -> Self {
        Self {
            suggestion_icon: suggestion_icon.into(),
            tiers,
        }
    }

    /// Classify one window. Precedence: self-overwrote-other wins.
    fn interference<'a>(
        &self,
        window: &HistoryEntry<EvaluatedAction>,
        ctx: &'a EvalContext<'_>,
    ) -> Option<Interference<'a>> {
        let status = ctx.status?;
        let duration = ctx.status_duration().unwrap_or(0);
        let end = window.end.unwrap_or(window.start);

        // The analysed actor's own application that opened this window.
        let own = ctx.applications.iter().find(|a| {
            a.status == status && a.source == ctx.analysed && a.timestamp == window.start
        })?;

        // Someone else applied to the same target within one buff-duration
        // before our application: we clipped theirs.
        let clipped = ctx.applications.iter().find(|a| {
            a.status == status
                && a.source != ctx.analysed
                && a.target == own.target
                && a.timestamp >= window.start - duration
                && a.timestamp < window.start
        });
        if let Some(theirs) = clipped {
            return Some(Interference::SelfOverwroteOther(theirs));
        }

        // Someone else applied to the same target during our window's actual
        // span: they clipped ours.
        let clipped_by = ctx.applications.iter().find(|a| {
            a.status == status
                && a.source != ctx.analysed
                && a.target == own.target
                && a.timestamp > window.start
                && a.timestamp <= end
        });
        clipped_by.map(Interference::OtherOverwroteSelf)
    }

    fn overwrite_count(
        &self,
        windows: &[HistoryEntry<EvaluatedAction>],
        ctx: &EvalContext<'_>,
    ) -> u32 {
        windows
            .iter()
            .filter(|w| matches!(self.interference(w, ctx), Some(Interference::SelfOverwroteOther(_))))
            .count() as u32
    }
}

impl Evaluator for RaidBuffOverwriteEvaluator {
    fn columns(&self, _ctx: &EvalContext<'_>) -> Vec<String> {
        vec!["Interference".to_string()]
    }

    fn cells(&self, window: &HistoryEntry<EvaluatedAction>, ctx: &EvalContext<'_>) -> Vec<WindowCell> {
        let status_name = ctx
            .status
            .map(|s| ctx.data.status_name(s))
            .unwrap_or_else(|| "buff".to_string());
        let cell = match self.interference(window, ctx) {
            Some(Interference::SelfOverwroteOther(theirs)) => WindowCell::Note {
                text: format!(
                    "Overwrote {}'s {status_name}",
                    ctx.pull.actor_name(theirs.source)
                ),
            },
            Some(Interference::OtherOverwroteSelf(theirs)) => WindowCell::Note {
                text: format!(
                    "{} overwrote your {status_name}",
                    ctx.pull.actor_name(theirs.source)
                ),
            },
            None => WindowCell::Empty,
        };
        vec![cell]
    }

    fn suggest(
        &self,
        windows: &[HistoryEntry<EvaluatedAction>],
        ctx: &EvalContext<'_>,
    ) -> Option<Suggestion> {
        let count = self.overwrite_count(windows, ctx);
        let severity = self.tiers.severity_for(count)?;
        let status_name = ctx
            .status
            .map(|s| ctx.data.status_name(s))
            .unwrap_or_else(|| "buff".to_string());
        Some(Suggestion {
            icon: self.suggestion_icon.clone(),
            content: format!("Coordinate {status_name} usage with your party."),
            why: format!(
                "{count} of your application{} overwrote an ally's active {status_name}.",
                if count == 1 { "" } else { "s" },
            ),
            severity,
        })
    }
}
