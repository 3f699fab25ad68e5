//! Composable event predicates for hook registration.

use kardia_types::{ActionId, ActorId, StatusId};

use crate::event::{Event, EventType};

/// A predicate over event fields. Leaf variants test one field; combinator
/// variants compose. `Any` matches everything.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EventFilter {
    #[default]
    Any,
    /// Event kind discriminant membership.
    Types(Vec<EventType>),
    /// Source actor membership.
    Sources(Vec<ActorId>),
    /// Target actor membership.
    Targets(Vec<ActorId>),
    /// Action id membership (cast or cause).
    Actions(Vec<ActionId>),
    /// Status id membership (applied/removed or cause).
    Statuses(Vec<StatusId>),
    /// Every inner filter must match.
    AllOf(Vec<EventFilter>),
    /// At least one inner filter must match.
    OneOf(Vec<EventFilter>),
    /// No inner filter may match.
    NoneOf(Vec<EventFilter>),
}

impl EventFilter {
    pub fn typed(ty: EventType) -> Self {
        Self::Types(vec![ty])
    }

    pub fn source(actor: ActorId) -> Self {
        Self::Sources(vec![actor])
    }

    pub fn target(actor: ActorId) -> Self {
        Self::Targets(vec![actor])
    }

    pub fn action(action: ActionId) -> Self {
        Self::Actions(vec![action])
    }

    pub fn status(status: StatusId) -> Self {
        Self::Statuses(vec![status])
    }

    /// Resolved casts by one actor: the default "what did the analysed
    /// player press" filter used by the windowing modules.
    pub fn actions_by(actor: ActorId) -> Self {
        Self::typed(EventType::Action).and(Self::source(actor))
    }

    /// Conjunction, flattening nested `AllOf`s.
    pub fn and(self, other: EventFilter) -> Self {
        match self {
            Self::AllOf(mut filters) => {
                filters.push(other);
                Self::AllOf(filters)
            }
            Self::Any => other,
            first => Self::AllOf(vec![first, other]),
        }
    }

    pub fn matches(&self, event: &Event) -> bool {
        match self {
            Self::Any => true,
            Self::Types(types) => types.contains(&event.kind.event_type()),
            Self::Sources(actors) => event
                .kind
                .source()
                .map(|a| actors.contains(&a))
                .unwrap_or(false),
            Self::Targets(actors) => event
                .kind
                .target()
                .map(|a| actors.contains(&a))
                .unwrap_or(false),
            Self::Actions(actions) => event
                .kind
                .action()
                .map(|a| actions.contains(&a))
                .unwrap_or(false),
            Self::Statuses(statuses) => event
                .kind
                .status()
                .map(|s| statuses.contains(&s))
                .unwrap_or(false),
            Self::AllOf(filters) => filters.iter().all(|f| f.matches(event)),
            Self::OneOf(filters) => filters.iter().any(|f| f.matches(event)),
            Self::NoneOf(filters) => !filters.iter().any(|f| f.matches(event)),
        }
    }
}
