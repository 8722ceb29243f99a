//! Detection of dense clusters of large mistakes.

use serde::{Deserialize, Serialize};

use crate::analysis::Mistake;

/// Window parameters for [`detect_critical_moments`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalityConfig {
    /// Number of consecutive mistakes per window.
    pub window: usize,
    /// Minimum fraction of the window filled by mistakes.
    pub min_density: f64,
    /// Average eval-diff the window must exceed.
    pub min_average_diff: f64,
}

impl Default for CriticalityConfig {
    fn default() -> Self {
        Self {
            window: 5,
            min_density: 0.6,
            min_average_diff: 100.0,
        }
    }
}

/// A run of consecutive mistakes with a high average swing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalMoment {
    pub start_move: u32,
    pub end_move: u32,
    pub average_diff: f64,
    pub mistake_count: usize,
}

/// Slides a window over the mistake sequence one mistake at a time.
///
/// Every qualifying window is reported; overlapping windows are not merged.
pub fn detect_critical_moments(
    mistakes: &[Mistake],
    config: &CriticalityConfig,
) -> Vec<CriticalMoment> {
    if config.window == 0 {
        return Vec::new();
    }

    mistakes
        .windows(config.window)
        .filter_map(|window| {
            // Windows are always full, so density is 1.0 here.
            let density = window.len() as f64 / config.window as f64;
            let total: u64 = window.iter().map(|m| u64::from(m.eval_diff())).sum();
            let average_diff = total as f64 / window.len() as f64;
            if density < config.min_density || average_diff <= config.min_average_diff {
                return None;
            }
            let first = window.first()?;
            let last = window.last()?;
            Some(CriticalMoment {
                start_move: first.move_number(),
                end_move: last.move_number(),
                average_diff,
                mistake_count: window.len(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::mistake;

    fn mistakes(diffs: &[(u32, u32)]) -> Vec<Mistake> {
        diffs.iter().map(|&(mv, diff)| mistake(mv, diff)).collect()
    }

    #[test]
    fn test_single_qualifying_window() {
        let seq = mistakes(&[(10, 110), (11, 120), (12, 130), (13, 140), (14, 150)]);
        let moments = detect_critical_moments(&seq, &CriticalityConfig::default());
        assert_eq!(
            moments,
            vec![CriticalMoment {
                start_move: 10,
                end_move: 14,
                average_diff: 130.0,
                mistake_count: 5,
            }]
        );
    }

    #[test]
    fn test_fewer_than_window_yields_nothing() {
        let seq = mistakes(&[(1, 900), (2, 900), (3, 900), (4, 900)]);
        assert!(detect_critical_moments(&seq, &CriticalityConfig::default()).is_empty());
        assert!(detect_critical_moments(&[], &CriticalityConfig::default()).is_empty());
    }

    #[test]
    fn test_average_must_strictly_exceed() {
        let seq = mistakes(&[(1, 100), (2, 100), (3, 100), (4, 100), (5, 100)]);
        assert!(detect_critical_moments(&seq, &CriticalityConfig::default()).is_empty());
    }

    #[test]
    fn test_overlapping_windows_all_reported() {
        let seq = mistakes(&[
            (3, 300),
            (5, 300),
            (8, 300),
            (9, 300),
            (12, 300),
            (15, 60),
            (20, 60),
        ]);
        let moments = detect_critical_moments(&seq, &CriticalityConfig::default());
        // Windows: avg 300, (1200+60)/5 = 252, (900+120)/5 = 204.
        assert_eq!(moments.len(), 3);
        assert_eq!((moments[0].start_move, moments[0].end_move), (3, 12));
        assert_eq!((moments[1].start_move, moments[1].end_move), (5, 15));
        assert_eq!((moments[2].start_move, moments[2].end_move), (8, 20));
        assert!((moments[2].average_diff - 204.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_window_is_empty() {
        let seq = mistakes(&[(1, 500)]);
        let config = CriticalityConfig {
            window: 0,
            ..CriticalityConfig::default()
        };
        assert!(detect_critical_moments(&seq, &config).is_empty());
    }
}
