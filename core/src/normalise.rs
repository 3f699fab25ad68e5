//! Pre-dispatch stream fix-ups
//!
//! AoE resolutions are split into one damage/heal event per target, all at
//! the same timestamp, sharing a sequence id that downstream correlation
//! logic keys on. Some log sources only stamp the first hit; the backfill
//! pass here patches the rest before any module sees the stream.

use hashbrown::HashMap;

use kardia_types::ActorId;

use crate::event::{Cause, Event, EventKind, EventType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GroupKey {
    ty: EventType,
    source: ActorId,
    cause: Cause,
}

/// Backfill missing sequence ids in-place.
///
/// Events sharing (timestamp, kind, source, cause) form a correlation group;
/// `None` sequences inherit the group's first concrete sequence in stream
/// order. A group with no concrete sequence at all gets a faux sequence
/// equal to its timestamp, so every damage/heal event leaves this pass with
/// a sequence.
pub(crate) fn backfill_sequences(events: &mut [Event]) {
    let mut i = 0;
    while i < events.len() {
        let ts = events[i].timestamp;
        let mut j = i;
        while j < events.len() && events[j].timestamp == ts {
            j += 1;
        }
        backfill_run(&mut events[i..j]);
        i = j;
    }
}

fn correlation(kind: &EventKind) -> Option<(GroupKey, Option<i64>)> {
    match kind {
        EventKind::Damage {
            source,
            cause,
            sequence,
            ..
        } => Some((
            GroupKey {
                ty: EventType::Damage,
                source: *source,
                cause: *cause,
            },
            *sequence,
        )),
        EventKind::Heal {
            source,
            cause,
            sequence,
            ..
        } => Some((
            GroupKey {
                ty: EventType::Heal,
                source: *source,
                cause: *cause,
            },
            *sequence,
        )),
        _ => None,
    }
}

fn backfill_run(run: &mut [Event]) {
    let mut first_seq: HashMap<GroupKey, i64> = HashMap::new();
    for event in run.iter() {
        if let Some((key, Some(seq))) = correlation(&event.kind) {
            first_seq.entry(key).or_insert(seq);
        }
    }

    for event in run.iter_mut() {
        let ts = event.timestamp;
        let Some((key, None)) = correlation(&event.kind) else {
            continue;
        };
        let resolved = first_seq.get(&key).copied().unwrap_or(ts);
        match &mut event.kind {
            EventKind::Damage { sequence, .. } | EventKind::Heal { sequence, .. } => {
                *sequence = Some(resolved);
            }
            _ => {}
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::actions;

    const PLAYER: ActorId = ActorId(1);
    const OTHER: ActorId = ActorId(2);
    const BOSS: ActorId = ActorId(100);

    fn sequences(events: &[Event]) -> Vec<Option<i64>> {
        events
            .iter()
            .filter_map(|e| match &e.kind {
                EventKind::Damage { sequence, .. } => Some(*sequence),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_split_hits_inherit_first_concrete_sequence() {
        let cause = Cause::Action(actions::CLEAVING_GALE);
        let mut events = vec![
            Event::damage_with_sequence(1000, PLAYER, BOSS, cause, 800, 5),
            Event::damage(1000, PLAYER, ActorId(101), cause, 800),
            Event::damage(1000, PLAYER, ActorId(102), cause, 800),
        ];
        backfill_sequences(&mut events);
        assert_eq!(sequences(&events), vec![Some(5), Some(5), Some(5)]);
    }

    #[test]
    fn test_unmatched_event_gets_faux_sequence_equal_to_timestamp() {
        let cause = Cause::Action(actions::STRIKE);
        let mut events = vec![Event::damage(4200, PLAYER, BOSS, cause, 500)];
        backfill_sequences(&mut events);
        assert_eq!(sequences(&events), vec![Some(4200)]);
    }

    #[test]
    fn test_groups_are_split_by_source_and_cause() {
        let gale = Cause::Action(actions::CLEAVING_GALE);
        let strike = Cause::Action(actions::STRIKE);
        let mut events = vec![
            Event::damage_with_sequence(1000, PLAYER, BOSS, gale, 800, 7),
            // Different cause: own group, faux sequence.
            Event::damage(1000, PLAYER, BOSS, strike, 500),
            // Different source: own group, faux sequence.
            Event::damage(1000, OTHER, BOSS, gale, 800),
        ];
        backfill_sequences(&mut events);
        assert_eq!(
            sequences(&events),
            vec![Some(7), Some(1000), Some(1000)]
        );
    }

    #[test]
    fn test_different_timestamps_never_share_sequences() {
        let cause = Cause::Action(actions::CLEAVING_GALE);
        let mut events = vec![
            Event::damage_with_sequence(1000, PLAYER, BOSS, cause, 800, 5),
            Event::damage(1100, PLAYER, BOSS, cause, 800),
        ];
        backfill_sequences(&mut events);
        assert_eq!(sequences(&events), vec![Some(5), Some(1100)]);
    }

    #[test]
    fn test_concrete_sequences_are_left_alone() {
        let cause = Cause::Action(actions::CLEAVING_GALE);
        let mut events = vec![
            Event::damage_with_sequence(1000, PLAYER, BOSS, cause, 800, 5),
            Event::damage_with_sequence(1000, PLAYER, ActorId(101), cause, 800, 9),
        ];
        backfill_sequences(&mut events);
        assert_eq!(sequences(&events), vec![Some(5), Some(9)]);
    }
}
