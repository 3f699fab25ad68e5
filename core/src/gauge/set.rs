//! Membership resource gauge: a set of up to N discrete values held at once.

use kardia_types::Timestamp;

use super::GaugeReason;

/// One point in a set gauge's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetGaugePoint<V> {
    pub timestamp: Timestamp,
    pub values: Vec<V>,
    pub reason: GaugeReason,
}

/// An enum/membership resource (e.g. up to N discrete "cards" held at
/// once). Values outside the configured option set are ignored; duplicate
/// or over-capacity generates are tallied in `overcap`.
#[derive(Debug, Clone, PartialEq)]
pub struct SetGauge<V>
where
    V: Copy + PartialEq + std::fmt::Debug,
{
    options: Vec<V>,
    capacity: usize,
    correct_history: bool,
    held: Vec<V>,
    overcap: u32,
    history: Vec<SetGaugePoint<V>>,
}

impl<V> SetGauge<V>
where
    V: Copy + PartialEq + std::fmt::Debug,
{
    pub fn new(options: Vec<V>, capacity: usize) -> Self {
        Self {
            options,
            capacity,
            correct_history: false,
            held: Vec::new(),
            overcap: 0,
            history: Vec::new(),
        }
    }

    /// Opt into retroactive repair of spend-before-generate drift.
    ///
    /// The repair rewrites history as one atomic batch replace; anything
    /// that already read the old points is not re-notified. That is a
    /// documented limitation of the mode, not an oversight.
    pub fn with_correct_history(mut self) -> Self {
        self.correct_history = true;
        self
    }

    pub fn values(&self) -> &[V] {
        &self.held
    }

    pub fn holds(&self, value: V) -> bool {
        self.held.contains(&value)
    }

    pub fn is_full(&self) -> bool {
        self.held.len() >= self.capacity
    }

    pub fn overcap(&self) -> u32 {
        self.overcap
    }

    pub fn history(&self) -> &[SetGaugePoint<V>] {
        &self.history
    }

    /// Mark a known-empty state (pull start, gauge initialisation).
    pub fn init(&mut self, ts: Timestamp) {
        self.held.clear();
        self.push(ts, GaugeReason::Init);
    }

    /// Add `value` if it is a known option, not already held, and the set
    /// is not full; otherwise tally an overcap and do nothing.
    pub fn generate(&mut self, ts: Timestamp, value: V) {
        if !self.options.contains(&value) {
            tracing::warn!(?value, "generate with unknown gauge option ignored");
            return;
        }
        if self.holds(value) || self.is_full() {
            self.overcap += 1;
            return;
        }
        self.held.push(value);
        self.push(ts, GaugeReason::Changed);
    }

    /// Remove `value`. A spend with no matching generate is dropped -- or,
    /// with `correct_history` enabled, the history is first rewritten so the
    /// value appears held since the most recent init/reset marker, and the
    /// spend then proceeds against that corrected record.
    pub fn spend(&mut self, ts: Timestamp, value: V) {
        if let Some(pos) = self.held.iter().position(|&v| v == value) {
            self.held.remove(pos);
            self.push(ts, GaugeReason::Changed);
            return;
        }

        if self.correct_history {
            tracing::warn!(?value, "spend before generate, correcting gauge history");
            self.correct_gauge_history(value);
            self.push(ts, GaugeReason::Changed);
        } else {
            tracing::warn!(?value, "spend without matching generate dropped");
        }
    }

    /// Clear to empty, tagged `Reset`.
    pub fn reset(&mut self, ts: Timestamp) {
        self.held.clear();
        self.push(ts, GaugeReason::Reset);
    }

    /// Clear to empty, tagged `Init` (a fresh initialisation mid-run).
    pub fn raise(&mut self, ts: Timestamp) {
        self.held.clear();
        self.push(ts, GaugeReason::Init);
    }

    /// The membership in effect at or before `ts`, empty before the first
    /// point.
    pub fn values_at(&self, ts: Timestamp) -> &[V] {
        self.history
            .iter()
            .rev()
            .find(|p| p.timestamp <= ts)
            .map(|p| p.values.as_slice())
            .unwrap_or(&[])
    }

    /// Inject `value` into every history point from the most recent
    /// init/reset marker onward, as one atomic batch replace.
    fn correct_gauge_history(&mut self, value: V) {
        let marker = self
            .history
            .iter()
            .rposition(|p| matches!(p.reason, GaugeReason::Init | GaugeReason::Reset))
            .unwrap_or(0);

        let mut corrected = self.history.clone();
        for point in &mut corrected[marker..] {
            if !point.values.contains(&value) && point.values.len() < self.capacity {
                point.values.push(value);
            }
        }
        self.history = corrected;
    }

    /// Same-timestamp mutations collapse into the last state only.
    fn push(&mut self, ts: Timestamp, reason: GaugeReason) {
        if let Some(last) = self.history.last_mut()
            && last.timestamp == ts
        {
            last.values = self.held.clone();
            last.reason = reason;
            return;
        }
        self.history.push(SetGaugePoint {
            timestamp: ts,
            values: self.held.clone(),
            reason,
        });
    }
}
