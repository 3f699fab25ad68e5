//! Raid buff windows: the analysed actor's applications of a party-wide
//! status, with every application by anyone recorded for interference
//! analysis.

use std::any::Any;

use kardia_types::ModuleReport;

use crate::analyser::{Analyser, EventContext, FinishContext, SetupContext};
use crate::dispatcher::{EventFilter, HookSlot};
use crate::downtime::Downtime;
use crate::error::ModuleError;
use crate::evaluate::{EvalContext, EvaluatedAction, Evaluator, StatusApplication};
use crate::event::{Event, EventKind, EventType};
use crate::gcd::GlobalCooldown;

use super::buff_window::{BuffWindowConfig, SLOT_APPLY, SLOT_REMOVE, SLOT_TRACKED};
use super::{build_report, collaborators, WindowTracker};

/// Windows opened by the analysed actor's own application of the tracked
/// status to any target; closed by the first removal of that application
/// (from any target), or pull end. Applications by every source are
/// recorded so the overwrite evaluator can look outside the windows.
pub struct RaidBuffWindowModule {
    config: BuffWindowConfig,
    evaluators: Vec<Box<dyn Evaluator>>,
    dependencies: Vec<&'static str>,
    tracker: WindowTracker,
    applications: Vec<StatusApplication>,
}

impl RaidBuffWindowModule {
    pub fn new(config: BuffWindowConfig, evaluators: Vec<Box<dyn Evaluator>>) -> Self {
        let tracker = WindowTracker::new(config.reopen, config.end_policy);
        Self {
            config,
            evaluators,
            dependencies: vec![GlobalCooldown::HANDLE, Downtime::HANDLE],
            tracker,
            applications: Vec::new(),
        }
    }
}

impl Analyser for RaidBuffWindowModule {
    fn handle(&self) -> &'static str {
        self.config.handle
    }

    fn dependencies(&self) -> &[&'static str] {
        &self.dependencies
    }

    fn initialise(&mut self, ctx: &mut SetupContext<'_>) {
        // Applications by anyone, to anyone: needed for overwrite lookback.
        ctx.add_hook(
            EventFilter::typed(EventType::StatusApply)
                .and(EventFilter::status(self.config.status)),
            SLOT_APPLY,
        );
        // Only the analysed actor's application falling off closes windows.
        ctx.add_hook(
            EventFilter::typed(EventType::StatusRemove)
                .and(EventFilter::status(self.config.status))
                .and(EventFilter::source(self.config.actor)),
            SLOT_REMOVE,
        );
        ctx.add_hook(self.config.tracked_filter(), SLOT_TRACKED);
    }

    fn on_event(
        &mut self,
        slot: HookSlot,
        event: &Event,
        _ctx: &mut EventContext<'_>,
    ) -> Result<(), ModuleError> {
        match slot {
            SLOT_APPLY => {
                if let EventKind::StatusApply {
                    source,
                    target,
                    status,
                } = event.kind
                {
                    self.applications.push(StatusApplication {
                        timestamp: event.timestamp,
                        source,
                        target,
                        status,
                    });
                    if source == self.config.actor {
                        self.tracker.open(event.timestamp);
                    }
                }
            }
            SLOT_REMOVE => self.tracker.close(event.timestamp),
            SLOT_TRACKED => {
                if let Some(action) = event.kind.action() {
                    self.tracker.record(
                        event.timestamp,
                        EvaluatedAction {
                            timestamp: event.timestamp,
                            action,
                        },
                    );
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(&mut self, ctx: &mut FinishContext<'_>) -> Result<ModuleReport, ModuleError> {
        self.tracker.close_all(ctx.end());
        let collab = collaborators(ctx);
        let eval_ctx = EvalContext {
            pull: ctx.pull,
            data: ctx.data,
            overrides: &self.config.overrides,
            analysed: self.config.actor,
            status: Some(self.config.status),
            gcd_length: collab.gcd_length,
            downtime: &collab.downtime,
            applications: &self.applications,
        };
        Ok(build_report(
            self.config.handle,
            &self.evaluators,
            self.tracker.windows(),
            &eval_ctx,
        ))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
