//! The normalized combat event model
//!
//! Events arrive from an external log adapter as an already
//! timestamp-sorted stream; the core replays them exactly once.

use kardia_types::{ActionId, ActorId, StatusId, Timestamp};
use serde::{Deserialize, Serialize};

/// Discriminant for the event kinds, used by hook filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventType {
    Prepare,
    Action,
    Damage,
    Heal,
    StatusApply,
    StatusRemove,
    Death,
    Complete,
}

/// What produced a damage or heal: a direct action, or a ticking status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cause {
    Action(ActionId),
    Status(StatusId),
}

impl Cause {
    pub fn action(&self) -> Option<ActionId> {
        match self {
            Self::Action(id) => Some(*id),
            Self::Status(_) => None,
        }
    }

    pub fn status(&self) -> Option<StatusId> {
        match self {
            Self::Action(_) => None,
            Self::Status(id) => Some(*id),
        }
    }
}

/// One timestamped occurrence in the replayed timeline. Serializes to the
/// adapter wire shape: `{"timestamp": ..., "type": "...", ...fields}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: Timestamp,
    #[serde(flatten)]
    pub kind: EventKind,
}

/// Kind-specific payload of an [`Event`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventKind {
    /// Cast started (hard casts only; instants skip straight to `Action`).
    Prepare {
        source: ActorId,
        target: ActorId,
        action: ActionId,
    },
    /// Cast resolved.
    Action {
        source: ActorId,
        target: ActorId,
        action: ActionId,
    },
    Damage {
        source: ActorId,
        target: ActorId,
        cause: Cause,
        amount: u32,
        /// Correlation id linking split AoE hits back to one resolution.
        /// `None` entries are backfilled before dispatch.
        sequence: Option<i64>,
    },
    Heal {
        source: ActorId,
        target: ActorId,
        cause: Cause,
        amount: u32,
        overheal: u32,
        sequence: Option<i64>,
    },
    StatusApply {
        source: ActorId,
        target: ActorId,
        status: StatusId,
    },
    StatusRemove {
        source: ActorId,
        target: ActorId,
        status: StatusId,
    },
    Death {
        actor: ActorId,
    },
    /// Terminal marker emitted by the adapter after the last domain event.
    Complete,
}

impl EventKind {
    /// The filterable discriminant for this kind.
    pub fn event_type(&self) -> EventType {
        match self {
            Self::Prepare { .. } => EventType::Prepare,
            Self::Action { .. } => EventType::Action,
            Self::Damage { .. } => EventType::Damage,
            Self::Heal { .. } => EventType::Heal,
            Self::StatusApply { .. } => EventType::StatusApply,
            Self::StatusRemove { .. } => EventType::StatusRemove,
            Self::Death { .. } => EventType::Death,
            Self::Complete => EventType::Complete,
        }
    }

    /// The acting entity, where the kind has one.
    pub fn source(&self) -> Option<ActorId> {
        match self {
            Self::Prepare { source, .. }
            | Self::Action { source, .. }
            | Self::Damage { source, .. }
            | Self::Heal { source, .. }
            | Self::StatusApply { source, .. }
            | Self::StatusRemove { source, .. } => Some(*source),
            Self::Death { actor } => Some(*actor),
            Self::Complete => None,
        }
    }

    /// The affected entity, where the kind has one.
    pub fn target(&self) -> Option<ActorId> {
        match self {
            Self::Prepare { target, .. }
            | Self::Action { target, .. }
            | Self::Damage { target, .. }
            | Self::Heal { target, .. }
            | Self::StatusApply { target, .. }
            | Self::StatusRemove { target, .. } => Some(*target),
            Self::Death { actor } => Some(*actor),
            Self::Complete => None,
        }
    }

    /// The action involved: the cast for prepare/action events, the causing
    /// action for damage/heal events.
    pub fn action(&self) -> Option<ActionId> {
        match self {
            Self::Prepare { action, .. } | Self::Action { action, .. } => Some(*action),
            Self::Damage { cause, .. } | Self::Heal { cause, .. } => cause.action(),
            _ => None,
        }
    }

    /// The status involved: the applied/removed status, or the causing status
    /// for damage/heal ticks.
    pub fn status(&self) -> Option<StatusId> {
        match self {
            Self::StatusApply { status, .. } | Self::StatusRemove { status, .. } => Some(*status),
            Self::Damage { cause, .. } | Self::Heal { cause, .. } => cause.status(),
            _ => None,
        }
    }
}

impl Event {
    pub fn action(timestamp: Timestamp, source: ActorId, target: ActorId, action: ActionId) -> Self {
        Self {
            timestamp,
            kind: EventKind::Action {
                source,
                target,
                action,
            },
        }
    }

    pub fn prepare(
        timestamp: Timestamp,
        source: ActorId,
        target: ActorId,
        action: ActionId,
    ) -> Self {
        Self {
            timestamp,
            kind: EventKind::Prepare {
                source,
                target,
                action,
            },
        }
    }

    pub fn damage(
        timestamp: Timestamp,
        source: ActorId,
        target: ActorId,
        cause: Cause,
        amount: u32,
    ) -> Self {
        Self {
            timestamp,
            kind: EventKind::Damage {
                source,
                target,
                cause,
                amount,
                sequence: None,
            },
        }
    }

    pub fn damage_with_sequence(
        timestamp: Timestamp,
        source: ActorId,
        target: ActorId,
        cause: Cause,
        amount: u32,
        sequence: i64,
    ) -> Self {
        Self {
            timestamp,
            kind: EventKind::Damage {
                source,
                target,
                cause,
                amount,
                sequence: Some(sequence),
            },
        }
    }

    pub fn heal(
        timestamp: Timestamp,
        source: ActorId,
        target: ActorId,
        cause: Cause,
        amount: u32,
    ) -> Self {
        Self {
            timestamp,
            kind: EventKind::Heal {
                source,
                target,
                cause,
                amount,
                overheal: 0,
                sequence: None,
            },
        }
    }

    pub fn status_apply(
        timestamp: Timestamp,
        source: ActorId,
        target: ActorId,
        status: StatusId,
    ) -> Self {
        Self {
            timestamp,
            kind: EventKind::StatusApply {
                source,
                target,
                status,
            },
        }
    }

    pub fn status_remove(
        timestamp: Timestamp,
        source: ActorId,
        target: ActorId,
        status: StatusId,
    ) -> Self {
        Self {
            timestamp,
            kind: EventKind::StatusRemove {
                source,
                target,
                status,
            },
        }
    }

    pub fn death(timestamp: Timestamp, actor: ActorId) -> Self {
        Self {
            timestamp,
            kind: EventKind::Death { actor },
        }
    }

    pub fn complete(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            kind: EventKind::Complete,
        }
    }
}
