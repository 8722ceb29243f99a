//! Aggregate statistics over collections of analysed games.
//!
//! Every analyzer here is a pure function over already-materialised
//! [`AnalyzedGame`]s (or their mistakes); none of them touches an oracle.

mod distribution;
mod endgame;
mod openings;
mod rating_trend;
mod report;
mod review;
mod time_pressure;

pub use distribution::MistakeDistribution;
pub use endgame::{analyze_endgames, endgame_onset, EndgameStat, ENDGAME_MATERIAL};
pub use openings::{analyze_openings, classify_opening, OpeningStat, DEFAULT_OPENING_PLIES};
pub use rating_trend::{rating_trend, RatingTrendResult, Trend};
pub use report::{PlayerReport, COMMON_MISTAKE_LIMIT};
pub use review::{
    common_mistakes, reduced_fen, review_game, CommonMistake, GameReview, LearningOpportunity,
};
pub use time_pressure::{analyze_time_pressure, time_bin, TimeBinStat, TIME_BINS};

use chess_board::GameRecord;
use serde::{Deserialize, Serialize};

use crate::analysis::{GameAnalysis, Mistake};
use crate::analyzer::AnalysisStatus;

/// A game record paired with the outcome of analysing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedGame {
    pub record: GameRecord,
    pub status: AnalysisStatus,
}

impl AnalyzedGame {
    pub fn new(record: GameRecord, status: AnalysisStatus) -> Self {
        Self { record, status }
    }

    pub fn analysis(&self) -> Option<&GameAnalysis> {
        self.status.analysis()
    }

    /// Mistakes made on `player`'s own moves; empty if unanalysed or absent.
    pub fn player_mistakes<'a>(&'a self, player: &str) -> impl Iterator<Item = &'a Mistake> + 'a {
        let color = self.record.color_of(player);
        self.analysis()
            .into_iter()
            .flat_map(|a| a.mistakes())
            .filter(move |m| Some(m.mover()) == color)
    }
}
