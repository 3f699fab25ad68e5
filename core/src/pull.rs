//! Pull metadata: the time/roster context for one analysis run.

use chrono::NaiveDateTime;
use kardia_types::{ActorId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    Player,
    Pet,
    Enemy,
}

/// One roster entry. Actors are immutable for the lifetime of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub kind: ActorKind,
    /// Job/class key, where the adapter knows it (players only).
    pub job: Option<String>,
}

impl Actor {
    pub fn player(id: ActorId, name: impl Into<String>, job: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: ActorKind::Player,
            job: Some(job.into()),
        }
    }

    pub fn enemy(id: ActorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: ActorKind::Enemy,
            job: None,
        }
    }

    pub fn is_player(&self) -> bool {
        self.kind == ActorKind::Player
    }

    pub fn is_enemy(&self) -> bool {
        self.kind == ActorKind::Enemy
    }
}

/// One attempt at an encounter. Created once per run, read-only thereafter.
///
/// The internal timeline is relative: events run from 0 to `duration`
/// milliseconds; `start` anchors that timeline to the wall clock.
#[derive(Debug, Clone, PartialEq)]
pub struct Pull {
    pub start: NaiveDateTime,
    pub duration: Timestamp,
    pub actors: Vec<Actor>,
}

impl Pull {
    pub fn new(start: NaiveDateTime, duration: Timestamp, actors: Vec<Actor>) -> Self {
        Self {
            start,
            duration,
            actors,
        }
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    /// Display name for an actor, falling back to the raw id for actors the
    /// roster never saw.
    pub fn actor_name(&self, id: ActorId) -> String {
        self.actor(id)
            .map(|a| a.name.clone())
            .unwrap_or_else(|| format!("#{id}"))
    }

    pub fn players(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter().filter(|a| a.is_player())
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter().filter(|a| a.is_enemy())
    }

    /// Wall-clock instant of a relative timestamp.
    pub fn wall_clock_at(&self, ts: Timestamp) -> NaiveDateTime {
        self.start + chrono::Duration::milliseconds(ts)
    }

    /// Clamp a timestamp into the pull's timeline.
    pub fn clamp(&self, ts: Timestamp) -> Timestamp {
        ts.clamp(0, self.duration)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn pull() -> Pull {
        let start = NaiveDateTime::parse_from_str("2026-02-14 20:31:07", "%Y-%m-%d %H:%M:%S")
            .expect("valid datetime");
        Pull::new(
            start,
            600_000,
            vec![
                Actor::player(ActorId(1), "Aria Vale", "ravager"),
                Actor::enemy(ActorId(100), "Voidgate Sentinel"),
            ],
        )
    }

    #[test]
    fn test_actor_lookup_and_name_fallback() {
        let pull = pull();
        assert_eq!(pull.actor(ActorId(1)).map(|a| a.name.as_str()), Some("Aria Vale"));
        assert_eq!(pull.actor_name(ActorId(42)), "#42");
    }

    #[test]
    fn test_wall_clock_at() {
        let pull = pull();
        let at = pull.wall_clock_at(61_000);
        assert_eq!(at.format("%H:%M:%S").to_string(), "20:32:08");
    }

    #[test]
    fn test_clamp() {
        let pull = pull();
        assert_eq!(pull.clamp(-5), 0);
        assert_eq!(pull.clamp(700_000), 600_000);
        assert_eq!(pull.clamp(1234), 1234);
    }
}
