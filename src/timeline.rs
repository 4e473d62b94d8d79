//! Synthetic event timeline from cumulative flow durations
//!
//! The dataset has no capture timestamps, so event instants are synthesized:
//! prefix sums over `flow_duration` (seconds) in current row order, added to
//! a run-start instant captured once. The result is monotone in row index,
//! not in real time, because sampling randomizes row order.

use chrono::{DateTime, Duration, Utc};

/// Convert per-row durations (seconds) into event instants.
///
/// `out[i] = start + sum(durations[..=i])`, at millisecond resolution.
/// Negative durations are carried through as negative offsets, not clamped.
pub fn synthesize(durations: &[f64], start: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    let mut cumulative = 0.0_f64;
    durations
        .iter()
        .map(|&seconds| {
            cumulative += seconds;
            start + Duration::milliseconds((cumulative * 1000.0).round() as i64)
        })
        .collect()
}
