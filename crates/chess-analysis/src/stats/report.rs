//! Per-player report combining every aggregate.

use std::collections::BTreeMap;

use chess_board::Color;
use chess_openings::OpeningDatabase;
use serde::{Deserialize, Serialize};

use super::{
    analyze_endgames, analyze_openings, analyze_time_pressure, common_mistakes, rating_trend,
    AnalyzedGame, CommonMistake, EndgameStat, MistakeDistribution, OpeningStat,
    RatingTrendResult, TimeBinStat,
};

/// Number of recurring positions listed in a report.
pub const COMMON_MISTAKE_LIMIT: usize = 5;

/// Every aggregate for one player over their games.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerReport {
    pub player: String,
    pub total_games: usize,
    pub analyzed_games: usize,
    pub distribution: MistakeDistribution,
    pub time_pressure: Vec<TimeBinStat>,
    pub openings: BTreeMap<String, OpeningStat>,
    pub rating_trend: Option<RatingTrendResult>,
    pub endgame: EndgameStat,
    pub common_mistakes: Vec<CommonMistake>,
}

impl PlayerReport {
    /// Builds the report from the games `player` took part in.
    ///
    /// Returns `None` when none of those games has been analysed.
    pub fn build(
        games: &[AnalyzedGame],
        player: &str,
        openings: &OpeningDatabase,
        opening_plies: usize,
    ) -> Option<Self> {
        let own: Vec<&AnalyzedGame> = games
            .iter()
            .filter(|g| g.record.color_of(player).is_some())
            .collect();
        let analyzed: Vec<&AnalyzedGame> =
            own.iter().copied().filter(|g| g.analysis().is_some()).collect();
        if analyzed.is_empty() {
            return None;
        }

        let mistakes: Vec<_> = analyzed
            .iter()
            .flat_map(|g| g.player_mistakes(player))
            .collect();
        let move_clocks = analyzed.iter().flat_map(|g| own_clocks(g, player));

        Some(Self {
            player: player.to_string(),
            total_games: own.len(),
            analyzed_games: analyzed.len(),
            distribution: MistakeDistribution::from_mistakes(mistakes.iter().copied()),
            time_pressure: analyze_time_pressure(mistakes.iter().copied(), move_clocks),
            openings: analyze_openings(own.iter().copied(), openings, opening_plies),
            rating_trend: rating_trend(own.iter().map(|g| &g.record), player),
            endgame: analyze_endgames(own.iter().copied(), player),
            common_mistakes: common_mistakes(mistakes.iter().copied(), COMMON_MISTAKE_LIMIT),
        })
    }
}

/// Clock readings on `player`'s own half-moves.
fn own_clocks<'a>(game: &'a AnalyzedGame, player: &str) -> impl Iterator<Item = f64> + 'a {
    let color = game.record.color_of(player);
    game.record
        .moves
        .iter()
        .enumerate()
        .filter(move |(ply, _)| {
            let mover = if ply % 2 == 0 { Color::White } else { Color::Black };
            Some(mover) == color
        })
        .filter_map(|(_, m)| m.clock)
}
