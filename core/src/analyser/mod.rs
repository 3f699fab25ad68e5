//! Analysis modules and their dependency graph
//!
//! A module is a stateful unit with a unique handle, a declared dependency
//! set, and lifecycle hooks. The framework guarantees a module's declared
//! dependencies are initialised before it and finished before it, so a
//! module never observes a dependency's partially-built state.

pub mod context;
pub mod graph;


pub use context::{Dependencies, EventContext, FinishContext, SetupContext};
pub use graph::resolve_order;

use std::any::Any;

use kardia_types::ModuleReport;

use crate::dispatcher::HookSlot;
use crate::error::ModuleError;
use crate::event::Event;

/// One unit of analysis logic. Implementations are plain structs configured
/// by value; the orchestrator owns them for exactly one run.
pub trait Analyser: 'static {
    /// Unique handle identifying this module in the graph and in reports.
    fn handle(&self) -> &'static str;

    /// Handles of the modules this one reads. The framework initialises and
    /// finishes every listed module before this one; reading a module not
    /// listed here is refused at the access point.
    fn dependencies(&self) -> &[&'static str] {
        &[]
    }

    /// Hook registration phase. Runs once, in dependency order, before any
    /// event is dispatched.
    fn initialise(&mut self, ctx: &mut SetupContext<'_>);

    /// One of this module's hooks matched `event`. `slot` is whatever the
    /// module passed at registration. An error aborts the entire replay.
    fn on_event(
        &mut self,
        slot: HookSlot,
        event: &Event,
        ctx: &mut EventContext<'_>,
    ) -> Result<(), ModuleError> {
        let _ = (slot, event, ctx);
        Ok(())
    }

    /// Completion phase. Runs once per module after the stream is exhausted,
    /// in dependency order, so dependency state read here is final.
    fn finish(&mut self, ctx: &mut FinishContext<'_>) -> Result<ModuleReport, ModuleError> {
        let _ = ctx;
        Ok(ModuleReport::new(self.handle()))
    }

    /// Downcast support for dependency access.
    fn as_any(&self) -> &dyn Any;
}
