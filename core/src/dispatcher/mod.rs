//! Event hook registry
//!
//! Maps filter predicates to module callbacks. Matching is a snapshot per
//! event: hooks added or removed while an event is being delivered take
//! effect from the next event onward, so a hook removing itself (or a
//! neighbour) mid-delivery never disturbs the in-flight match list.

pub mod filter;


pub use filter::EventFilter;

use crate::event::Event;

/// Opaque handle returned by hook registration, used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

/// Module-private discriminator telling a module which of its hooks fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookSlot(pub u32);

#[derive(Debug)]
struct HookEntry {
    id: HookId,
    filter: EventFilter,
    /// Arena index of the owning module.
    owner: usize,
    slot: HookSlot,
}

/// One matched delivery target for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookMatch {
    pub owner: usize,
    pub slot: HookSlot,
}

/// The hook registry. Hooks fire in registration order.
#[derive(Debug, Default)]
pub struct Dispatcher {
    hooks: Vec<HookEntry>,
    next_id: u64,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook for every future-dispatched event matching `filter`.
    pub fn add_hook(&mut self, filter: EventFilter, owner: usize, slot: HookSlot) -> HookId {
        let id = HookId(self.next_id);
        self.next_id += 1;
        tracing::debug!(hook = id.0, owner, slot = slot.0, "hook registered");
        self.hooks.push(HookEntry {
            id,
            filter,
            owner,
            slot,
        });
        id
    }

    /// Deregister a hook. Unknown ids are a no-op, so removing a hook twice
    /// (or from inside its own delivery) is safe.
    pub fn remove_hook(&mut self, id: HookId) {
        self.hooks.retain(|h| h.id != id);
    }

    /// Snapshot of every registered hook matching `event`, in registration
    /// order. The caller delivers against the snapshot, so registry
    /// mutations during delivery only affect subsequent events.
    pub fn matching(&self, event: &Event) -> Vec<HookMatch> {
        self.hooks
            .iter()
            .filter(|h| h.filter.matches(event))
            .map(|h| HookMatch {
                owner: h.owner,
                slot: h.slot,
            })
            .collect()
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }
}
