//! Window-producing modules
//!
//! Windows convert the raw stream into discrete spans (a buff's uptime, a
//! burst phase) with the analysed actor's casts collected inside each span.
//! The modules here are configured by value and compose a shared
//! [`WindowTracker`] state machine with a set of evaluators; closed windows
//! are judged during the completion phase.

pub mod action_window;
pub mod buff_window;
pub mod raid_buff;
pub mod tracker;

#[cfg(test)]
mod window_tests;

pub use action_window::{ActionWindowConfig, ActionWindowModule};
pub use buff_window::{BuffWindowConfig, BuffWindowModule};
pub use raid_buff::RaidBuffWindowModule;
pub use tracker::{EndOfWindowPolicy, ReopenPolicy, WindowTracker};

use kardia_types::{ModuleReport, Timestamp, WindowRow, WindowTable};

use crate::analyser::FinishContext;
use crate::downtime::Downtime;
use crate::evaluate::{EvalContext, EvaluatedAction, Evaluator};
use crate::gcd::{DEFAULT_GCD_MS, GlobalCooldown};
use crate::history::HistoryEntry;

/// Collaborator state window modules read during completion.
pub(crate) struct Collaborators {
    pub gcd_length: Timestamp,
    pub downtime: Vec<(Timestamp, Timestamp)>,
}

pub(crate) fn collaborators(ctx: &FinishContext<'_>) -> Collaborators {
    let gcd_length = ctx
        .deps()
        .get::<GlobalCooldown>(GlobalCooldown::HANDLE)
        .map(|gcd| gcd.estimate())
        .unwrap_or(DEFAULT_GCD_MS);
    let downtime = ctx
        .deps()
        .get::<Downtime>(Downtime::HANDLE)
        .map(|d| d.windows())
        .unwrap_or_default();
    Collaborators {
        gcd_length,
        downtime,
    }
}

/// Run every evaluator over every closed window, merging per-window cells
/// into one table row and collecting aggregate verdicts.
pub(crate) fn build_report(
    handle: &'static str,
    evaluators: &[Box<dyn Evaluator>],
    windows: &[HistoryEntry<EvaluatedAction>],
    ctx: &EvalContext<'_>,
) -> ModuleReport {
    let mut report = ModuleReport::new(handle);

    let mut table = WindowTable::default();
    for evaluator in evaluators {
        table.columns.extend(evaluator.columns(ctx));
    }
    for window in windows {
        let end = window.end.unwrap_or(window.start);
        let mut cells = Vec::new();
        for evaluator in evaluators {
            cells.extend(evaluator.cells(window, ctx));
        }
        table.rows.push(WindowRow {
            start: window.start,
            end,
            in_downtime: ctx.in_downtime(window),
            cells,
        });
    }
    if !(table.columns.is_empty() && table.rows.is_empty()) {
        report.table = Some(table);
    }

    for evaluator in evaluators {
        if let Some(suggestion) = evaluator.suggest(windows, ctx) {
            report.suggestions.push(suggestion);
        }
        if let Some(rule) = evaluator.checklist(windows, ctx) {
            report.checklist.push(rule);
        }
    }

    report
}
