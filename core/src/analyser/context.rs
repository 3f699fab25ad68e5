//! Contexts handed to module lifecycle hooks
//!
//! Each phase sees exactly the capabilities it is allowed to use: hook
//! registration during setup, hook mutation plus dependency reads during
//! replay, dependency reads during completion.

use hashbrown::HashMap;
use kardia_types::Timestamp;

use crate::data::GameData;
use crate::dispatcher::{Dispatcher, EventFilter, HookId, HookSlot};
use crate::pull::Pull;

use super::Analyser;

/// Read access to previously-constructed modules, restricted to the declared
/// dependency set of the module currently executing.
pub struct Dependencies<'a> {
    slots: &'a [Option<Box<dyn Analyser>>],
    by_handle: &'a HashMap<&'static str, usize>,
    declared: &'a [&'static str],
    owner: &'static str,
}

impl<'a> Dependencies<'a> {
    pub(crate) fn new(
        slots: &'a [Option<Box<dyn Analyser>>],
        by_handle: &'a HashMap<&'static str, usize>,
        declared: &'a [&'static str],
        owner: &'static str,
    ) -> Self {
        Self {
            slots,
            by_handle,
            declared,
            owner,
        }
    }

    /// Fetch a dependency by handle, downcast to its concrete type.
    ///
    /// Returns `None` for handles outside the declared dependency set -- the
    /// graph only orders what was declared, so undeclared reads could observe
    /// partially-built state and are refused.
    pub fn get<T: Analyser>(&self, handle: &str) -> Option<&T> {
        if !self.declared.iter().any(|&d| d == handle) {
            tracing::warn!(
                module = self.owner,
                dependency = handle,
                "undeclared dependency access refused"
            );
            return None;
        }
        let idx = *self.by_handle.get(handle)?;
        self.slots[idx].as_ref()?.as_any().downcast_ref::<T>()
    }
}

/// Context for the hook registration phase.
pub struct SetupContext<'a> {
    pub pull: &'a Pull,
    pub data: &'a GameData,
    pub(crate) dispatcher: &'a mut Dispatcher,
    pub(crate) module: usize,
}

impl SetupContext<'_> {
    /// Register a hook owned by the initialising module.
    pub fn add_hook(&mut self, filter: EventFilter, slot: HookSlot) -> HookId {
        self.dispatcher.add_hook(filter, self.module, slot)
    }
}

/// Context for event delivery. Supports dynamic hook mutation; changes take
/// effect from the next event onward.
pub struct EventContext<'a> {
    pub pull: &'a Pull,
    pub data: &'a GameData,
    pub(crate) dispatcher: &'a mut Dispatcher,
    pub(crate) deps: Dependencies<'a>,
    pub(crate) module: usize,
    pub(crate) timestamp: Timestamp,
}

impl<'a> EventContext<'a> {
    /// Timestamp of the event being delivered, clamped into the pull.
    pub fn timestamp(&self) -> Timestamp {
        self.pull.clamp(self.timestamp)
    }

    pub fn add_hook(&mut self, filter: EventFilter, slot: HookSlot) -> HookId {
        self.dispatcher.add_hook(filter, self.module, slot)
    }

    pub fn remove_hook(&mut self, id: HookId) {
        self.dispatcher.remove_hook(id);
    }

    pub fn deps(&self) -> &Dependencies<'a> {
        &self.deps
    }
}

/// Context for the completion phase.
pub struct FinishContext<'a> {
    pub pull: &'a Pull,
    pub data: &'a GameData,
    pub(crate) deps: Dependencies<'a>,
}

impl<'a> FinishContext<'a> {
    /// The pull's final timestamp; open windows force-close here.
    pub fn end(&self) -> Timestamp {
        self.pull.duration
    }

    pub fn deps(&self) -> &Dependencies<'a> {
        &self.deps
    }
}
