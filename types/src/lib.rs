//! Shared analysis result types for Kardia
//!
//! This crate contains the serializable vocabulary that crosses the boundary
//! between the analysis core (kardia-core) and whatever frontend renders the
//! results: ids, timestamps, severities, suggestions, checklist rules, and
//! window result tables.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Ids & Time
// ─────────────────────────────────────────────────────────────────────────────

/// Milliseconds on the encounter's relative timeline (0 = pull start).
pub type Timestamp = i64;

/// An actor (player, pet, or enemy) participating in a pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub u32);

/// A castable action, keyed into the static action table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub u32);

/// A status effect (buff/debuff), keyed into the static status table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusId(pub u32);

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for StatusId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Format a relative timestamp as `m:ss` for display in suggestions and tables.
pub fn format_timestamp(ts: Timestamp) -> String {
    let total_secs = ts.max(0) / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

// ─────────────────────────────────────────────────────────────────────────────
// Severity & Suggestions
// ─────────────────────────────────────────────────────────────────────────────

/// How bad a finding is. Ordering is meaningful: `Minor < Medium < Major < Morbid`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Minor,
    Medium,
    Major,
    Morbid,
}

impl Severity {
    /// Display label for this severity tier.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Minor => "Minor",
            Self::Medium => "Medium",
            Self::Major => "Major",
            Self::Morbid => "Morbid",
        }
    }
}

/// A single piece of gameplay advice produced by an analysis module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Icon name for display (usually the icon of the action at fault).
    pub icon: String,
    /// What the player should do.
    pub content: String,
    /// Why it matters, with the observed numbers baked in.
    pub why: String,
    pub severity: Severity,
}

// ─────────────────────────────────────────────────────────────────────────────
// Checklist
// ─────────────────────────────────────────────────────────────────────────────

/// One measured component of a checklist rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub name: String,
    /// Achieved percentage, 0.0 - 100.0.
    pub percent: f64,
}

/// A pass/fail checklist entry with a percentage target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistRule {
    pub name: String,
    pub description: String,
    pub requirements: Vec<Requirement>,
    /// Percentage required to pass, 0.0 - 100.0.
    pub target: f64,
}

impl ChecklistRule {
    /// Overall achieved percentage (mean of requirement percentages).
    pub fn percent(&self) -> f64 {
        if self.requirements.is_empty() {
            return 0.0;
        }
        self.requirements.iter().map(|r| r.percent).sum::<f64>() / self.requirements.len() as f64
    }

    pub fn passed(&self) -> bool {
        self.percent() >= self.target
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Result Tables
// ─────────────────────────────────────────────────────────────────────────────

/// How an observed count compares to its expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Met,
    Under,
    Over,
}

/// One evaluator cell in a window result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum WindowCell {
    /// Observed vs expected count, classified.
    Count {
        actual: u32,
        expected: u32,
        outcome: Outcome,
    },
    /// Free-form annotation.
    Note { text: String },
    Empty,
}

/// One row of a window result table (one closed window).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRow {
    pub start: Timestamp,
    pub end: Timestamp,
    /// Whether the window overlapped a downtime/invulnerability period.
    pub in_downtime: bool,
    /// One cell per table column, in column order.
    pub cells: Vec<WindowCell>,
}

/// Per-window evaluation results for a window-producing module.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowTable {
    pub columns: Vec<String>,
    pub rows: Vec<WindowRow>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Module Reports
// ─────────────────────────────────────────────────────────────────────────────

/// Everything one analysis module produced for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleReport {
    /// The producing module's handle, for display keying/ordering.
    pub handle: String,
    pub suggestions: Vec<Suggestion>,
    pub checklist: Vec<ChecklistRule>,
    pub table: Option<WindowTable>,
}

impl ModuleReport {
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            suggestions: Vec::new(),
            checklist: Vec::new(),
            table: None,
        }
    }

    /// True when the module produced nothing a frontend would render.
    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty() && self.checklist.is_empty() && self.table.is_none()
    }
}

/// Aggregated output of one analysis run, module reports in dependency order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisResults {
    pub reports: Vec<ModuleReport>,
}

impl AnalysisResults {
    /// Look up one module's report by handle.
    pub fn report(&self, handle: &str) -> Option<&ModuleReport> {
        self.reports.iter().find(|r| r.handle == handle)
    }

    /// All suggestions across modules, in module order.
    pub fn suggestions(&self) -> impl Iterator<Item = &Suggestion> {
        self.reports.iter().flat_map(|r| r.suggestions.iter())
    }

    /// All checklist rules across modules, in module order.
    pub fn checklist(&self) -> impl Iterator<Item = &ChecklistRule> {
        self.reports.iter().flat_map(|r| r.checklist.iter())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Minor < Severity::Medium);
        assert!(Severity::Medium < Severity::Major);
        assert!(Severity::Major < Severity::Morbid);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "0:00");
        assert_eq!(format_timestamp(61_500), "1:01");
        assert_eq!(format_timestamp(754_000), "12:34");
    }

    #[test]
    fn test_checklist_percent_and_pass() {
        let rule = ChecklistRule {
            name: "Keep the buff window full".to_string(),
            description: String::new(),
            requirements: vec![
                Requirement {
                    name: "GCDs".to_string(),
                    percent: 90.0,
                },
                Requirement {
                    name: "Casts".to_string(),
                    percent: 100.0,
                },
            ],
            target: 95.0,
        };
        assert!((rule.percent() - 95.0).abs() < f64::EPSILON);
        assert!(rule.passed());
    }

    #[test]
    fn test_empty_checklist_is_zero_percent() {
        let rule = ChecklistRule {
            name: "Empty".to_string(),
            description: String::new(),
            requirements: Vec::new(),
            target: 50.0,
        };
        assert_eq!(rule.percent(), 0.0);
        assert!(!rule.passed());
    }
}
