//! The analysis orchestrator
//!
//! Owns the pull, the static data, the dispatcher, and the module arena for
//! one run. A run is a single synchronous pass: normalise the stream,
//! initialise modules in dependency order, replay every event through the
//! dispatcher, then run each module's completion phase in the same order.
//! There is no suspension point and no mid-replay abort; dropping the
//! `Analysis` value is the only cancellation.


use hashbrown::HashMap;

use kardia_types::AnalysisResults;

use crate::analyser::context::{Dependencies, EventContext, FinishContext, SetupContext};
use crate::analyser::{Analyser, graph};
use crate::data::GameData;
use crate::dispatcher::Dispatcher;
use crate::error::{AnalysisError, GraphError};
use crate::event::Event;
use crate::normalise;
use crate::pull::Pull;

pub struct Analysis {
    pull: Pull,
    data: GameData,
    /// Module arena. A slot is `None` only while its module is executing a
    /// lifecycle hook, which keeps dependency reads borrow-safe.
    modules: Vec<Option<Box<dyn Analyser>>>,
    handles: Vec<&'static str>,
    deps_of: Vec<Vec<&'static str>>,
    by_handle: HashMap<&'static str, usize>,
    /// Construction = initialisation = completion order.
    order: Vec<usize>,
    dispatcher: Dispatcher,
}

impl std::fmt::Debug for Analysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analysis")
            .field("handles", &self.handles)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

impl Analysis {
    /// Resolve the module graph. Fails before any module is initialised when
    /// a dependency is missing, duplicated, or cyclic.
    pub fn new(
        pull: Pull,
        data: GameData,
        modules: Vec<Box<dyn Analyser>>,
    ) -> Result<Self, GraphError> {
        let handles: Vec<&'static str> = modules.iter().map(|m| m.handle()).collect();
        let deps_of: Vec<Vec<&'static str>> =
            modules.iter().map(|m| m.dependencies().to_vec()).collect();
        let order = graph::resolve_order(&handles, &deps_of)?;
        let by_handle = graph::index_handles(&handles)?;

        Ok(Self {
            pull,
            data,
            modules: modules.into_iter().map(Some).collect(),
            handles,
            deps_of,
            by_handle,
            order,
            dispatcher: Dispatcher::new(),
        })
    }

    /// Drive the single reporting pass over an already-sorted event stream.
    ///
    /// Any error from a module hook aborts the run; there are no partial
    /// results, because completion-phase reads assume a fully-replayed
    /// stream.
    pub fn run(mut self, mut events: Vec<Event>) -> Result<AnalysisResults, AnalysisError> {
        for index in 1..events.len() {
            if events[index].timestamp < events[index - 1].timestamp {
                return Err(AnalysisError::UnsortedEvents { index });
            }
        }

        // Adapter-side fix-ups happen strictly before modules see the stream.
        normalise::backfill_sequences(&mut events);

        for &idx in &self.order {
            let mut module = self.modules[idx].take().expect("module slot filled");
            let mut ctx = SetupContext {
                pull: &self.pull,
                data: &self.data,
                dispatcher: &mut self.dispatcher,
                module: idx,
            };
            module.initialise(&mut ctx);
            self.modules[idx] = Some(module);
        }

        for event in &events {
            // Snapshot the matches so hook mutation during delivery only
            // affects subsequent events.
            let matched = self.dispatcher.matching(event);
            for hook in matched {
                let Some(mut module) = self.modules[hook.owner].take() else {
                    continue;
                };
                let handle = self.handles[hook.owner];
                let mut ctx = EventContext {
                    pull: &self.pull,
                    data: &self.data,
                    dispatcher: &mut self.dispatcher,
                    deps: Dependencies::new(
                        &self.modules,
                        &self.by_handle,
                        &self.deps_of[hook.owner],
                        handle,
                    ),
                    module: hook.owner,
                    timestamp: event.timestamp,
                };
                let result = module.on_event(hook.slot, event, &mut ctx);
                self.modules[hook.owner] = Some(module);
                result.map_err(|source| AnalysisError::Hook {
                    module: handle,
                    source,
                })?;
            }
        }

        let mut results = AnalysisResults::default();
        for &idx in &self.order {
            let mut module = self.modules[idx].take().expect("module slot filled");
            let handle = self.handles[idx];
            let mut ctx = FinishContext {
                pull: &self.pull,
                data: &self.data,
                deps: Dependencies::new(&self.modules, &self.by_handle, &self.deps_of[idx], handle),
            };
            let report = module.finish(&mut ctx);
            self.modules[idx] = Some(module);
            results
                .reports
                .push(report.map_err(|source| AnalysisError::Completion {
                    module: handle,
                    source,
                })?);
        }

        Ok(results)
    }
}
