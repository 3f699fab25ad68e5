//! Resource gauges
//!
//! Gauges reconstruct an in-game resource's value over time by replaying
//! modifier events. History is append-only: every mutation appends a new
//! point (collapsing same-timestamp points to the last value), and clamped
//! away amounts are tallied instead of raised as errors.

pub mod counter;
pub mod set;


pub use counter::{CounterGauge, GaugePoint};
pub use set::{SetGauge, SetGaugePoint};

/// Why a gauge history point exists, for downstream display and for
/// targeting the drift-correction pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeReason {
    /// Gauge (re)initialised to a known state.
    Init,
    /// An ordinary generate/spend/modify.
    Changed,
    /// Explicitly cleared.
    Reset,
}
