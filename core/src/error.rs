//! Error types for graph construction and replay

use thiserror::Error;

/// Errors produced by a module inside an event hook or completion phase.
/// Modules surface whatever error type they like; the orchestrator only
/// needs to attribute and propagate it.
pub type ModuleError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors while resolving the module dependency graph. All of these are
/// fatal before any event is dispatched.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("module '{module}' declares dependency '{dependency}', which is not registered")]
    MissingDependency {
        module: &'static str,
        dependency: &'static str,
    },

    #[error("cyclic module dependency involving: {}", .handles.join(", "))]
    CyclicDependency { handles: Vec<&'static str> },

    #[error("duplicate module handle '{handle}'")]
    DuplicateHandle { handle: &'static str },
}

/// Errors during an analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("event stream is not sorted: event at index {index} precedes its predecessor")]
    UnsortedEvents { index: usize },

    #[error("module '{module}' failed during replay")]
    Hook {
        module: &'static str,
        #[source]
        source: ModuleError,
    },

    #[error("module '{module}' failed during its completion phase")]
    Completion {
        module: &'static str,
        #[source]
        source: ModuleError,
    },
}
