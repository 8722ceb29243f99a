//! Replays a game and evaluates the position before and after every half-move.

use chess_board::GameRecord;
use tracing::debug;

use crate::analysis::{EvaluatedMove, MoveRecord};
use crate::analyzer::AnalyzerError;
use crate::oracle::{Oracle, SearchLimit};

/// Walks a game's half-moves in order, querying the oracle twice per move.
#[derive(Debug, Clone, Copy)]
pub struct GameWalker {
    limit: SearchLimit,
}

impl GameWalker {
    pub fn new(limit: SearchLimit) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> SearchLimit {
        self.limit
    }

    /// Produces one [`EvaluatedMove`] per half-move.
    ///
    /// The first oracle failure aborts the walk; no partial sequence is
    /// returned. A game without moves yields an empty sequence.
    pub fn walk<O: Oracle + ?Sized>(
        &self,
        oracle: &mut O,
        record: &GameRecord,
    ) -> Result<Vec<EvaluatedMove>, AnalyzerError> {
        let limit = self.limit.validate()?;
        let plies = record
            .plies()
            .map_err(|e| AnalyzerError::InvalidGame(e.to_string()))?;
        if plies.is_empty() {
            return Ok(Vec::new());
        }

        oracle.new_game()?;
        let mut walked = Vec::with_capacity(plies.len());
        for ply in plies {
            let fen_before = ply.before.to_fen();
            let fen_after = ply.after.to_fen();
            let eval_before = oracle.evaluate(&fen_before, limit)?;
            let eval_after = oracle.evaluate(&fen_after, limit)?;
            debug!(
                move_number = ply.move_number,
                mover = %ply.mover,
                san = %ply.san,
                before = eval_before.centipawns(),
                after = eval_after.centipawns(),
                "evaluated half-move"
            );
            walked.push(EvaluatedMove {
                record: MoveRecord {
                    move_number: ply.move_number,
                    mover: ply.mover,
                    fen_before,
                    fen_after,
                    san: ply.san,
                    clock: ply.clock,
                },
                eval_before,
                eval_after,
            });
        }
        Ok(walked)
    }
}
