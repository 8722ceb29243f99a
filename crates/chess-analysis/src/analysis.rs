//! Per-game analysis records and their assembly.

use chess_board::Color;
use serde::{Deserialize, Serialize};

use crate::criticality::{detect_critical_moments, CriticalMoment, CriticalityConfig};
use crate::evaluation::Evaluation;
use crate::oracle::SearchLimit;
use crate::quality::{Severity, Thresholds};

/// One half-move of a walked game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Full-move number, shared by White's and Black's half-moves.
    pub move_number: u32,
    pub mover: Color,
    pub fen_before: String,
    pub fen_after: String,
    pub san: String,
    /// Mover's remaining clock time in seconds, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock: Option<f64>,
}

/// A [`MoveRecord`] with the oracle's evaluations around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedMove {
    pub record: MoveRecord,
    pub eval_before: Evaluation,
    pub eval_after: Evaluation,
}

impl EvaluatedMove {
    pub fn eval_diff(&self) -> u32 {
        self.eval_after.diff(self.eval_before)
    }
}

/// A half-move whose evaluation swing crossed a severity threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mistake {
    #[serde(flatten)]
    record: MoveRecord,
    eval_before: Evaluation,
    eval_after: Evaluation,
    eval_diff: u32,
    severity: Severity,
}

impl Mistake {
    /// Returns a mistake if the move's swing classifies under `thresholds`.
    pub fn from_move(mv: EvaluatedMove, thresholds: &Thresholds) -> Option<Self> {
        let eval_diff = mv.eval_diff();
        let severity = thresholds.classify(eval_diff)?;
        Some(Self {
            record: mv.record,
            eval_before: mv.eval_before,
            eval_after: mv.eval_after,
            eval_diff,
            severity,
        })
    }

    pub fn record(&self) -> &MoveRecord {
        &self.record
    }

    pub fn move_number(&self) -> u32 {
        self.record.move_number
    }

    pub fn mover(&self) -> Color {
        self.record.mover
    }

    pub fn san(&self) -> &str {
        &self.record.san
    }

    pub fn fen_before(&self) -> &str {
        &self.record.fen_before
    }

    pub fn clock(&self) -> Option<f64> {
        self.record.clock
    }

    pub fn eval_before(&self) -> Evaluation {
        self.eval_before
    }

    pub fn eval_after(&self) -> Evaluation {
        self.eval_after
    }

    /// Absolute evaluation swing in centipawns.
    pub fn eval_diff(&self) -> u32 {
        self.eval_diff
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }
}

/// Per-game totals derived from the mistake sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub white_mistakes: usize,
    pub black_mistakes: usize,
    /// Largest swing; the earliest one on ties.
    pub worst_mistake: Option<Mistake>,
    pub critical_moments: Vec<CriticalMoment>,
}

/// The analysis of one game at one search limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameAnalysis {
    limit: SearchLimit,
    mistakes: Vec<Mistake>,
    summary: Summary,
}

impl GameAnalysis {
    /// Folds a completed walk into mistakes and a summary.
    pub fn assemble(
        moves: impl IntoIterator<Item = EvaluatedMove>,
        limit: SearchLimit,
        thresholds: &Thresholds,
        criticality: &CriticalityConfig,
    ) -> Self {
        let mut summary = Summary::default();
        let mut mistakes = Vec::new();

        for mv in moves {
            let Some(mistake) = Mistake::from_move(mv, thresholds) else {
                continue;
            };
            match mistake.mover() {
                Color::White => summary.white_mistakes += 1,
                Color::Black => summary.black_mistakes += 1,
            }
            mistakes.push(mistake);
        }

        summary.worst_mistake = mistakes
            .iter()
            .fold(None::<&Mistake>, |worst, m| match worst {
                Some(w) if w.eval_diff() >= m.eval_diff() => Some(w),
                _ => Some(m),
            })
            .cloned();
        summary.critical_moments = detect_critical_moments(&mistakes, criticality);

        Self {
            limit,
            mistakes,
            summary,
        }
    }

    /// The search limit every evaluation was made with.
    pub fn limit(&self) -> SearchLimit {
        self.limit
    }

    /// Mistakes in walk order.
    pub fn mistakes(&self) -> &[Mistake] {
        &self.mistakes
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Mistakes made on `color`'s moves.
    pub fn mistakes_by(&self, color: Color) -> impl Iterator<Item = &Mistake> {
        self.mistakes.iter().filter(move |m| m.mover() == color)
    }
}
