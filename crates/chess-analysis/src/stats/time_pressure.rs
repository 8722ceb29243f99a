//! Mistake rates bucketed by the mover's remaining clock time.

use serde::{Deserialize, Serialize};

use crate::analysis::Mistake;

/// Clock bins as (lower bound in seconds, label); each bin runs to the next
/// lower bound, the last one is unbounded.
pub const TIME_BINS: [(f64, &str); 5] = [
    (0.0, "<30s"),
    (30.0, "30-60s"),
    (60.0, "1-2m"),
    (120.0, "2-5m"),
    (300.0, "5m+"),
];

/// Mistakes and half-moves seen within one clock bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBinStat {
    pub label: String,
    pub mistakes: usize,
    /// Half-moves played in this bin, when known.
    pub moves: usize,
    /// Mistakes per hundred half-moves; 0 when `moves` is 0.
    pub rate: f64,
}

/// Index into [`TIME_BINS`] for a remaining clock time.
pub fn time_bin(clock: f64) -> Option<usize> {
    if clock.is_nan() || clock < 0.0 {
        return None;
    }
    TIME_BINS.iter().rposition(|(lower, _)| clock >= *lower)
}

/// Bins mistakes by clock time and computes a rate per bin.
///
/// `move_clocks` supplies the clock time of every half-move played, which
/// forms the denominator. Mistakes and moves without a clock are skipped.
/// No mistakes at all yields an empty report.
pub fn analyze_time_pressure<'a>(
    mistakes: impl IntoIterator<Item = &'a Mistake>,
    move_clocks: impl IntoIterator<Item = f64>,
) -> Vec<TimeBinStat> {
    let mut mistake_counts = [0usize; TIME_BINS.len()];
    let mut move_counts = [0usize; TIME_BINS.len()];
    let mut any = false;

    for m in mistakes {
        any = true;
        if let Some(bin) = m.clock().and_then(time_bin) {
            mistake_counts[bin] += 1;
        }
    }
    if !any {
        return Vec::new();
    }
    for clock in move_clocks {
        if let Some(bin) = time_bin(clock) {
            move_counts[bin] += 1;
        }
    }

    TIME_BINS
        .iter()
        .enumerate()
        .map(|(i, (_, label))| {
            let rate = if move_counts[i] > 0 {
                mistake_counts[i] as f64 / move_counts[i] as f64 * 100.0
            } else {
                0.0
            };
            TimeBinStat {
                label: (*label).to_string(),
                mistakes: mistake_counts[i],
                moves: move_counts[i],
                rate,
            }
        })
        .collect()
}
