pub mod analyser;
pub mod analysis;
pub mod data;
pub mod dispatcher;
pub mod downtime;
pub mod error;
pub mod evaluate;
pub mod event;
pub mod gauge;
pub mod gcd;
pub mod history;
pub mod pull;
pub mod window;

mod normalise;

// Re-exports for convenience
pub use kardia_types as types;

pub use analyser::{Analyser, Dependencies, EventContext, FinishContext, SetupContext};
pub use analysis::Analysis;
pub use data::{ActionInfo, DataOverrides, GameData, StatusInfo};
pub use dispatcher::{Dispatcher, EventFilter, HookId, HookSlot};
pub use downtime::Downtime;
pub use error::{AnalysisError, GraphError, ModuleError};
pub use evaluate::{
    ActionGroup, EvalContext, EvaluatedAction, Evaluator, ExpectedActionGroupsEvaluator,
    ExpectedActionsEvaluator, ExpectedGcdCountEvaluator, NotesEvaluator,
    RaidBuffOverwriteEvaluator, SeverityTiers, StatusApplication, TrackedAction,
};
pub use event::{Cause, Event, EventKind, EventType};
pub use gauge::{CounterGauge, GaugePoint, GaugeReason, SetGauge, SetGaugePoint};
pub use gcd::{DEFAULT_GCD_MS, GlobalCooldown};
pub use history::{History, HistoryEntry};
pub use pull::{Actor, ActorKind, Pull};
pub use window::{
    ActionWindowConfig, ActionWindowModule, BuffWindowConfig, BuffWindowModule,
    EndOfWindowPolicy, RaidBuffWindowModule, ReopenPolicy, WindowTracker,
};
