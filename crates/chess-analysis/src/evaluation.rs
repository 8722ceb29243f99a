//! Chess position evaluation types.

use chess_board::Color;
use serde::{Deserialize, Serialize};

/// Magnitude substituted for any forced-mate evaluation.
pub const MATE_SCORE: i32 = 10_000;

/// A position evaluation, always from White's point of view.
///
/// Evaluations can be either centipawn scores (for normal positions)
/// or mate scores (when a forced mate is found).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Evaluation {
    /// Centipawn evaluation (positive = white advantage)
    Centipawns(i32),
    /// Forced mate for `winner` in `moves` moves (0 = already mated).
    Mate { winner: Color, moves: u32 },
}

impl Evaluation {
    /// Builds a mate score from a signed move count (positive = White mates).
    ///
    /// Returns `None` for zero, which carries no winner.
    pub fn mate_in(moves: i32) -> Option<Self> {
        let winner = match moves.signum() {
            1 => Color::White,
            -1 => Color::Black,
            _ => return None,
        };
        Some(Evaluation::Mate {
            winner,
            moves: moves.unsigned_abs(),
        })
    }

    /// The white-positive score in centipawns, with mates at ±[`MATE_SCORE`].
    pub fn centipawns(self) -> i32 {
        match self {
            Evaluation::Centipawns(cp) => cp,
            Evaluation::Mate {
                winner: Color::White,
                ..
            } => MATE_SCORE,
            Evaluation::Mate {
                winner: Color::Black,
                ..
            } => -MATE_SCORE,
        }
    }

    pub fn is_mate(self) -> bool {
        matches!(self, Evaluation::Mate { .. })
    }

    /// Absolute swing between two evaluations.
    pub fn diff(self, other: Evaluation) -> u32 {
        self.centipawns().abs_diff(other.centipawns())
    }
}

impl Default for Evaluation {
    fn default() -> Self {
        Evaluation::Centipawns(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mate_maps_to_fixed_magnitude() {
        assert_eq!(Evaluation::mate_in(3).unwrap().centipawns(), MATE_SCORE);
        assert_eq!(Evaluation::mate_in(-1).unwrap().centipawns(), -MATE_SCORE);
        assert!(Evaluation::mate_in(0).is_none());

        let mated = Evaluation::Mate {
            winner: Color::Black,
            moves: 0,
        };
        assert_eq!(mated.centipawns(), -MATE_SCORE);
        assert!(mated.is_mate());
        assert!(!Evaluation::Centipawns(MATE_SCORE).is_mate());
    }

    #[test]
    fn test_diff_is_symmetric_and_non_negative() {
        let a = Evaluation::Centipawns(0);
        let b = Evaluation::Centipawns(-250);
        assert_eq!(a.diff(b), 250);
        assert_eq!(b.diff(a), 250);
        assert_eq!(a.diff(a), 0);
        assert_eq!(
            Evaluation::mate_in(2).unwrap().diff(Evaluation::mate_in(-2).unwrap()),
            20_000
        );
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_string(&Evaluation::Centipawns(35)).unwrap();
        assert_eq!(json, r#"{"centipawns":35}"#);
        let json = serde_json::to_string(&Evaluation::mate_in(-4).unwrap()).unwrap();
        assert_eq!(json, r#"{"mate":{"winner":"black","moves":4}}"#);
    }
}
