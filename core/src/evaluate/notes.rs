//! Free-form annotation column.

use kardia_types::WindowCell;

use crate::history::HistoryEntry;

use super::{EvalContext, EvaluatedAction, Evaluator};

/// Annotation callback: `None` leaves the cell empty.
pub type NoteFn = Box<dyn Fn(&HistoryEntry<EvaluatedAction>, &EvalContext<'_>) -> Option<String>>;

/// Adds one caller-defined annotation column to the window table.
pub struct NotesEvaluator {
    column: String,
    note: NoteFn,
}

impl NotesEvaluator {
    pub fn new(column: impl Into<String>, note: NoteFn) -> Self {
        Self {
            column: column.into(),
            note,
        }
    }
}

impl Evaluator for NotesEvaluator {
    fn columns(&self, _ctx: &EvalContext<'_>) -> Vec<String> {
        vec![self.column.clone()]
    }

    fn cells(&self, window: &HistoryEntry<EvaluatedAction>, ctx: &EvalContext<'_>) -> Vec<WindowCell> {
        vec![match (self.note)(window, ctx) {
            Some(text) => WindowCell::Note { text },
            None => WindowCell::Empty,
        }]
    }
}
