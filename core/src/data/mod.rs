//! Static game data tables
//!
//! Actions and statuses are immutable lookup tables. Modules that need a
//! different value for a computation (trait-adjusted cooldowns, shortened
//! buff durations) build a narrow [`DataOverrides`] and pass it into their
//! own evaluators/gauges; the shared tables are never mutated.

pub mod actions;
pub mod statuses;

use hashbrown::HashMap;
use kardia_types::{ActionId, StatusId, Timestamp};

pub use actions::ActionInfo;
pub use statuses::StatusInfo;

/// Read-only handle over the static action/status tables.
#[derive(Debug, Clone, Copy)]
pub struct GameData {
    actions: &'static phf::Map<u32, ActionInfo>,
    statuses: &'static phf::Map<u32, StatusInfo>,
}

impl Default for GameData {
    fn default() -> Self {
        Self::new()
    }
}

impl GameData {
    /// The bundled baseline tables.
    pub fn new() -> Self {
        Self {
            actions: &actions::ACTIONS,
            statuses: &statuses::STATUSES,
        }
    }

    /// Caller-supplied tables (e.g. a different patch's data set).
    pub fn with_tables(
        actions: &'static phf::Map<u32, ActionInfo>,
        statuses: &'static phf::Map<u32, StatusInfo>,
    ) -> Self {
        Self { actions, statuses }
    }

    pub fn action(&self, id: ActionId) -> Option<&'static ActionInfo> {
        self.actions.get(&id.0)
    }

    pub fn status(&self, id: StatusId) -> Option<&'static StatusInfo> {
        self.statuses.get(&id.0)
    }

    /// Display name for an action, falling back to the raw id.
    pub fn action_name(&self, id: ActionId) -> String {
        self.action(id)
            .map(|a| a.name.to_string())
            .unwrap_or_else(|| format!("action #{id}"))
    }

    /// Display name for a status, falling back to the raw id.
    pub fn status_name(&self, id: StatusId) -> String {
        self.status(id)
            .map(|s| s.name.to_string())
            .unwrap_or_else(|| format!("status #{id}"))
    }

    /// True when the action rolls the global cooldown.
    pub fn is_on_gcd(&self, id: ActionId) -> bool {
        self.action(id).map(|a| a.on_gcd).unwrap_or(false)
    }
}

/// Narrow, explicit per-module overrides of static table fields.
///
/// An override map belongs to the module that built it; it is consulted
/// before the shared table and never written back.
#[derive(Debug, Clone, Default)]
pub struct DataOverrides {
    status_durations: HashMap<StatusId, Timestamp>,
    action_cooldowns: HashMap<ActionId, Timestamp>,
}

impl DataOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status_duration(mut self, status: StatusId, duration_ms: Timestamp) -> Self {
        self.status_durations.insert(status, duration_ms);
        self
    }

    pub fn with_action_cooldown(mut self, action: ActionId, cooldown_ms: Timestamp) -> Self {
        self.action_cooldowns.insert(action, cooldown_ms);
        self
    }

    /// Effective status duration: override first, then the static table.
    pub fn status_duration(&self, data: &GameData, status: StatusId) -> Option<Timestamp> {
        self.status_durations
            .get(&status)
            .copied()
            .or_else(|| data.status(status).map(|s| s.duration_ms))
    }

    /// Effective action cooldown: override first, then the static table.
    pub fn action_cooldown(&self, data: &GameData, action: ActionId) -> Option<Timestamp> {
        self.action_cooldowns
            .get(&action)
            .copied()
            .or_else(|| data.action(action).map(|a| a.cooldown_ms))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
