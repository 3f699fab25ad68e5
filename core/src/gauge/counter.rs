//! Bounded numeric resource gauge.

use kardia_types::Timestamp;

use super::GaugeReason;

/// One point in a counter gauge's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaugePoint {
    pub timestamp: Timestamp,
    pub value: i64,
    pub reason: GaugeReason,
}

/// A numeric resource clamped to `[0, maximum]`. Amounts clamped away are
/// tallied in `over_cap`/`under_flow` rather than raised as errors.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterGauge {
    maximum: i64,
    value: i64,
    over_cap: i64,
    under_flow: i64,
    history: Vec<GaugePoint>,
}

impl CounterGauge {
    pub fn new(maximum: i64) -> Self {
        Self {
            maximum,
            value: 0,
            over_cap: 0,
            under_flow: 0,
            history: Vec::new(),
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn maximum(&self) -> i64 {
        self.maximum
    }

    /// Total amount discarded by clamping at the cap.
    pub fn over_cap(&self) -> i64 {
        self.over_cap
    }

    /// Total amount discarded by clamping at zero.
    pub fn under_flow(&self) -> i64 {
        self.under_flow
    }

    pub fn history(&self) -> &[GaugePoint] {
        &self.history
    }

    /// Apply a delta at `ts`, clamping into `[0, maximum]`.
    pub fn modify(&mut self, ts: Timestamp, delta: i64) {
        self.apply(ts, self.value + delta, GaugeReason::Changed);
    }

    /// Absolute assignment through the same clamp/history path.
    pub fn set(&mut self, ts: Timestamp, value: i64) {
        self.apply(ts, value, GaugeReason::Changed);
    }

    /// Clear to zero, tagged for downstream display.
    pub fn reset(&mut self, ts: Timestamp) {
        self.apply(ts, 0, GaugeReason::Reset);
    }

    /// The value in effect at or before `ts`: the last history point at or
    /// before it, zero before the first point.
    pub fn value_at(&self, ts: Timestamp) -> i64 {
        self.history
            .iter()
            .rev()
            .find(|p| p.timestamp <= ts)
            .map(|p| p.value)
            .unwrap_or(0)
    }

    fn apply(&mut self, ts: Timestamp, requested: i64, reason: GaugeReason) {
        let clamped = requested.clamp(0, self.maximum);
        if requested > self.maximum {
            self.over_cap += requested - self.maximum;
            tracing::debug!(
                requested,
                maximum = self.maximum,
                "counter gauge overcapped"
            );
        }
        if requested < 0 {
            self.under_flow += -requested;
            tracing::debug!(requested, "counter gauge underflowed");
        }
        self.value = clamped;
        self.push(ts, clamped, reason);
    }

    /// Same-timestamp mutations collapse into the last value only.
    fn push(&mut self, ts: Timestamp, value: i64, reason: GaugeReason) {
        if let Some(last) = self.history.last_mut()
            && last.timestamp == ts
        {
            last.value = value;
            last.reason = reason;
            return;
        }
        self.history.push(GaugePoint {
            timestamp: ts,
            value,
            reason,
        });
    }
}
