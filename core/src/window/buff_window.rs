//! Buff windows: spans where a tracked status is active on the analysed
//! actor, with the casts landed inside each span.

use std::any::Any;

use kardia_types::{ActorId, ModuleReport, StatusId};

use crate::analyser::{Analyser, EventContext, FinishContext, SetupContext};
use crate::data::DataOverrides;
use crate::dispatcher::{EventFilter, HookSlot};
use crate::downtime::Downtime;
use crate::error::ModuleError;
use crate::evaluate::{EvalContext, EvaluatedAction, Evaluator};
use crate::event::{Event, EventType};
use crate::gcd::GlobalCooldown;

use super::{build_report, collaborators, EndOfWindowPolicy, ReopenPolicy, WindowTracker};

pub(crate) const SLOT_APPLY: HookSlot = HookSlot(0);
pub(crate) const SLOT_REMOVE: HookSlot = HookSlot(1);
pub(crate) const SLOT_TRACKED: HookSlot = HookSlot(2);

/// Configuration for a buff- or raid-buff-window module.
pub struct BuffWindowConfig {
    pub handle: &'static str,
    /// The actor whose play is being analysed.
    pub actor: ActorId,
    /// The status whose uptime defines the windows.
    pub status: StatusId,
    /// Which events to collect inside windows. Defaults to resolved casts
    /// by the analysed actor.
    pub tracked: Option<EventFilter>,
    pub reopen: ReopenPolicy,
    pub end_policy: EndOfWindowPolicy,
    pub overrides: DataOverrides,
}

impl BuffWindowConfig {
    pub fn new(handle: &'static str, actor: ActorId, status: StatusId) -> Self {
        Self {
            handle,
            actor,
            status,
            tracked: None,
            reopen: ReopenPolicy::default(),
            end_policy: EndOfWindowPolicy::default(),
            overrides: DataOverrides::new(),
        }
    }

    pub(crate) fn tracked_filter(&self) -> EventFilter {
        self.tracked
            .clone()
            .unwrap_or_else(|| EventFilter::actions_by(self.actor))
    }
}

/// Windows driven by the tracked status on the analysed actor:
/// `StatusApply` opens, `StatusRemove` (or pull end) closes.
pub struct BuffWindowModule {
    config: BuffWindowConfig,
    evaluators: Vec<Box<dyn Evaluator>>,
    dependencies: Vec<&'static str>,
    tracker: WindowTracker,
}

impl BuffWindowModule {
    pub fn new(config: BuffWindowConfig, evaluators: Vec<Box<dyn Evaluator>>) -> Self {
        let tracker = WindowTracker::new(config.reopen, config.end_policy);
        Self {
            config,
            evaluators,
            dependencies: vec![GlobalCooldown::HANDLE, Downtime::HANDLE],
            tracker,
        }
    }
}

impl Analyser for BuffWindowModule {
    fn handle(&self) -> &'static str {
        self.config.handle
    }

    fn dependencies(&self) -> &[&'static str] {
        &self.dependencies
    }

    fn initialise(&mut self, ctx: &mut SetupContext<'_>) {
        let on_self = EventFilter::status(self.config.status)
            .and(EventFilter::target(self.config.actor));
        ctx.add_hook(
            EventFilter::typed(EventType::StatusApply).and(on_self.clone()),
            SLOT_APPLY,
        );
        ctx.add_hook(
            EventFilter::typed(EventType::StatusRemove).and(on_self),
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
            SLOT_APPLY => self.tracker.open(event.timestamp),
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
            applications: &[],
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
