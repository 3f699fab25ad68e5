//! Downtime detection
//!
//! Derives invulnerability/downtime windows from configured invulnerability
//! statuses on enemies. Window modules depend on this to flag windows that
//! overlap a period where damage was impossible.

use std::any::Any;

use hashbrown::HashSet;

use kardia_types::{ActorId, StatusId, Timestamp};

use crate::analyser::{Analyser, EventContext, FinishContext, SetupContext};
use crate::dispatcher::{EventFilter, HookSlot};
use crate::error::ModuleError;
use crate::event::{Event, EventType};
use crate::history::History;

const SLOT_APPLY: HookSlot = HookSlot(0);
const SLOT_REMOVE: HookSlot = HookSlot(1);

pub struct Downtime {
    invuln_statuses: Vec<StatusId>,
    /// (target, status) pairs currently conferring invulnerability.
    active: HashSet<(ActorId, StatusId)>,
    history: History<()>,
}

impl Downtime {
    pub const HANDLE: &'static str = "downtime";

    pub fn new(invuln_statuses: Vec<StatusId>) -> Self {
        Self {
            invuln_statuses,
            active: HashSet::new(),
            history: History::new(),
        }
    }

    /// Closed downtime windows. Only complete after this module's own
    /// completion phase, which dependency ordering guarantees runs first.
    pub fn windows(&self) -> Vec<(Timestamp, Timestamp)> {
        self.history
            .entries()
            .iter()
            .map(|e| (e.start, e.end.unwrap_or(e.start)))
            .collect()
    }

    pub fn overlaps(&self, start: Timestamp, end: Timestamp) -> bool {
        self.overlap_amount(start, end) > 0
    }

    /// Milliseconds of `[start, end]` covered by downtime.
    pub fn overlap_amount(&self, start: Timestamp, end: Timestamp) -> Timestamp {
        self.windows()
            .iter()
            .map(|&(dt_start, dt_end)| (end.min(dt_end) - start.max(dt_start)).max(0))
            .sum()
    }
}

impl Analyser for Downtime {
    fn handle(&self) -> &'static str {
        Self::HANDLE
    }

    fn initialise(&mut self, ctx: &mut SetupContext<'_>) {
        let statuses = EventFilter::Statuses(self.invuln_statuses.clone());
        ctx.add_hook(
            EventFilter::typed(EventType::StatusApply).and(statuses.clone()),
            SLOT_APPLY,
        );
        ctx.add_hook(
            EventFilter::typed(EventType::StatusRemove).and(statuses),
            SLOT_REMOVE,
        );
    }

    fn on_event(
        &mut self,
        slot: HookSlot,
        event: &Event,
        _ctx: &mut EventContext<'_>,
    ) -> Result<(), ModuleError> {
        let (Some(target), Some(status)) = (event.kind.target(), event.kind.status()) else {
            return Ok(());
        };
        match slot {
            SLOT_APPLY => {
                if self.active.is_empty() {
                    self.history.open(event.timestamp);
                }
                self.active.insert((target, status));
            }
            SLOT_REMOVE => {
                // A removal with no matching application is absorbed here.
                if !self.active.remove(&(target, status)) {
                    tracing::debug!(
                        target_id = target.0,
                        status = status.0,
                        "invulnerability removal without matching application"
                    );
                }
                if self.active.is_empty() {
                    self.history.close(event.timestamp);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(
        &mut self,
        ctx: &mut FinishContext<'_>,
    ) -> Result<kardia_types::ModuleReport, ModuleError> {
        // Invulnerability running past the end of the pull.
        self.history.close(ctx.end());
        Ok(kardia_types::ModuleReport::new(Self::HANDLE))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn downtime_with_windows(windows: &[(Timestamp, Timestamp)]) -> Downtime {
        let mut downtime = Downtime::new(vec![StatusId(104)]);
        for &(start, end) in windows {
            downtime.history.open(start);
            downtime.history.close(end);
        }
        downtime
    }

    #[test]
    fn test_overlap_amount() {
        let downtime = downtime_with_windows(&[(10_000, 20_000)]);
        assert_eq!(downtime.overlap_amount(0, 5_000), 0);
        assert_eq!(downtime.overlap_amount(15_000, 25_000), 5_000);
        assert_eq!(downtime.overlap_amount(12_000, 13_000), 1_000);
        assert!(downtime.overlaps(19_999, 30_000));
        assert!(!downtime.overlaps(20_000, 30_000));
    }

    #[test]
    fn test_disjoint_windows_sum() {
        let downtime = downtime_with_windows(&[(0, 1_000), (5_000, 6_000)]);
        assert_eq!(downtime.overlap_amount(0, 10_000), 2_000);
    }
}
