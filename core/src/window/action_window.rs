//! Action windows: spans opened and closed by specific casts of the
//! analysed actor, optionally bounded to a fixed duration.

use std::any::Any;

use kardia_types::{ActionId, ActorId, ModuleReport, Timestamp};

use crate::analyser::{Analyser, EventContext, FinishContext, SetupContext};
use crate::data::DataOverrides;
use crate::dispatcher::{EventFilter, HookSlot};
use crate::downtime::Downtime;
use crate::error::ModuleError;
use crate::evaluate::{EvalContext, EvaluatedAction, Evaluator};
use crate::event::Event;
use crate::gcd::GlobalCooldown;

use super::{build_report, collaborators, EndOfWindowPolicy, ReopenPolicy, WindowTracker};

const SLOT_OPEN: HookSlot = HookSlot(0);
const SLOT_CLOSE: HookSlot = HookSlot(1);
const SLOT_TRACKED: HookSlot = HookSlot(2);

/// Configuration for an action-triggered window module.
pub struct ActionWindowConfig {
    pub handle: &'static str,
    pub actor: ActorId,
    /// Cast that opens a window.
    pub open_action: ActionId,
    /// Cast that closes the window, where one exists.
    pub close_action: Option<ActionId>,
    /// Fixed window length; the window closes retroactively at the deadline
    /// once a later event shows it has passed.
    pub max_duration_ms: Option<Timestamp>,
    pub tracked: Option<EventFilter>,
    pub reopen: ReopenPolicy,
    pub end_policy: EndOfWindowPolicy,
    pub overrides: DataOverrides,
}

impl ActionWindowConfig {
    pub fn new(handle: &'static str, actor: ActorId, open_action: ActionId) -> Self {
        Self {
            handle,
            actor,
            open_action,
            close_action: None,
            max_duration_ms: None,
            tracked: None,
            reopen: ReopenPolicy::default(),
            end_policy: EndOfWindowPolicy::default(),
            overrides: DataOverrides::new(),
        }
    }

    fn tracked_filter(&self) -> EventFilter {
        self.tracked
            .clone()
            .unwrap_or_else(|| EventFilter::actions_by(self.actor))
    }
}

pub struct ActionWindowModule {
    config: ActionWindowConfig,
    evaluators: Vec<Box<dyn Evaluator>>,
    dependencies: Vec<&'static str>,
    tracker: WindowTracker,
}

impl ActionWindowModule {
    pub fn new(config: ActionWindowConfig, evaluators: Vec<Box<dyn Evaluator>>) -> Self {
        let mut tracker = WindowTracker::new(config.reopen, config.end_policy);
        if let Some(duration) = config.max_duration_ms {
            tracker = tracker.with_max_duration(duration);
        }
        Self {
            config,
            evaluators,
            dependencies: vec![GlobalCooldown::HANDLE, Downtime::HANDLE],
            tracker,
        }
    }
}

impl Analyser for ActionWindowModule {
    fn handle(&self) -> &'static str {
        self.config.handle
    }

    fn dependencies(&self) -> &[&'static str] {
        &self.dependencies
    }

    fn initialise(&mut self, ctx: &mut SetupContext<'_>) {
        let casts = EventFilter::actions_by(self.config.actor);
        ctx.add_hook(
            casts.clone().and(EventFilter::action(self.config.open_action)),
            SLOT_OPEN,
        );
        if let Some(close_action) = self.config.close_action {
            ctx.add_hook(casts.and(EventFilter::action(close_action)), SLOT_CLOSE);
        }
        // Registered after the open hook, so the opening cast itself is
        // recorded inside the window it opens.
        ctx.add_hook(self.config.tracked_filter(), SLOT_TRACKED);
    }

    fn on_event(
        &mut self,
        slot: HookSlot,
        event: &Event,
        _ctx: &mut EventContext<'_>,
    ) -> Result<(), ModuleError> {
        match slot {
            SLOT_OPEN => self.tracker.open(event.timestamp),
            SLOT_CLOSE => self.tracker.close(event.timestamp),
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
            status: None,
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
