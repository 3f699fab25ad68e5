//! Global cooldown estimation
//!
//! Estimates the analysed actor's effective GCD length from the observed
//! spacing of consecutive on-GCD casts. Window evaluators consume the
//! estimate to derive how many GCDs a window could have held.

use std::any::Any;

use hashbrown::HashMap;

use kardia_types::{ActorId, Timestamp};

use crate::analyser::{Analyser, EventContext, SetupContext};
use crate::dispatcher::{EventFilter, HookSlot};
use crate::error::ModuleError;
use crate::event::Event;

/// Fallback estimate when the stream carries no usable signal.
pub const DEFAULT_GCD_MS: Timestamp = 2_500;

/// Deltas outside this range are idle gaps or latency artefacts, not GCDs.
const MIN_DELTA_MS: Timestamp = 1_500;
const MAX_DELTA_MS: Timestamp = 2_600;

/// Bucket size for the mode computation.
const BUCKET_MS: Timestamp = 10;

const SLOT_CAST: HookSlot = HookSlot(0);

pub struct GlobalCooldown {
    actor: ActorId,
    last_cast: Option<Timestamp>,
    deltas: Vec<Timestamp>,
}

impl GlobalCooldown {
    pub const HANDLE: &'static str = "gcd";

    pub fn new(actor: ActorId) -> Self {
        Self {
            actor,
            last_cast: None,
            deltas: Vec::new(),
        }
    }

    /// The most common plausible inter-cast delta, rounded to 10 ms.
    /// Ties resolve to the shorter delta.
    pub fn estimate(&self) -> Timestamp {
        let mut buckets: HashMap<Timestamp, u32> = HashMap::new();
        for &delta in &self.deltas {
            *buckets.entry(delta / BUCKET_MS * BUCKET_MS).or_insert(0) += 1;
        }
        buckets
            .into_iter()
            .max_by_key(|&(bucket, count)| (count, -bucket))
            .map(|(bucket, _)| bucket)
            .unwrap_or(DEFAULT_GCD_MS)
    }
}

impl Analyser for GlobalCooldown {
    fn handle(&self) -> &'static str {
        Self::HANDLE
    }

    fn initialise(&mut self, ctx: &mut SetupContext<'_>) {
        ctx.add_hook(EventFilter::actions_by(self.actor), SLOT_CAST);
    }

    fn on_event(
        &mut self,
        _slot: HookSlot,
        event: &Event,
        ctx: &mut EventContext<'_>,
    ) -> Result<(), ModuleError> {
        let Some(action) = event.kind.action() else {
            return Ok(());
        };
        if !ctx.data.is_on_gcd(action) {
            return Ok(());
        }
        if let Some(last) = self.last_cast {
            let delta = event.timestamp - last;
            if (MIN_DELTA_MS..=MAX_DELTA_MS).contains(&delta) {
                self.deltas.push(delta);
            }
        }
        self.last_cast = Some(event.timestamp);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn with_deltas(deltas: &[Timestamp]) -> GlobalCooldown {
        let mut gcd = GlobalCooldown::new(ActorId(1));
        gcd.deltas = deltas.to_vec();
        gcd
    }

    #[test]
    fn test_no_signal_falls_back_to_default() {
        assert_eq!(GlobalCooldown::new(ActorId(1)).estimate(), DEFAULT_GCD_MS);
    }

    #[test]
    fn test_mode_of_observed_deltas() {
        let gcd = with_deltas(&[2_500, 2_500, 2_480, 2_410, 2_500, 2_170]);
        assert_eq!(gcd.estimate(), 2_500);
    }

    #[test]
    fn test_haste_adjusted_gcd_detected() {
        let gcd = with_deltas(&[2_170, 2_170, 2_175, 2_500]);
        assert_eq!(gcd.estimate(), 2_170);
    }

    #[test]
    fn test_ties_resolve_to_shorter_delta() {
        let gcd = with_deltas(&[2_170, 2_500]);
        assert_eq!(gcd.estimate(), 2_170);
    }
}
