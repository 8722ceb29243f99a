//! Mistake totals per classified opening.

use std::collections::BTreeMap;

use chess_board::GameRecord;
use chess_openings::OpeningDatabase;
use serde::{Deserialize, Serialize};

use super::AnalyzedGame;

/// Half-moves considered when classifying an opening.
pub const DEFAULT_OPENING_PLIES: usize = 10;

/// Totals for every game classified into one opening.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpeningStat {
    pub games: usize,
    pub analyzed_games: usize,
    pub total_mistakes: usize,
    /// `total_mistakes / analyzed_games`, or 0 with no analysed games.
    pub average_mistakes: f64,
}

/// Names the opening of a game from its first `plies` half-moves.
pub fn classify_opening<'a>(record: &GameRecord, table: &'a OpeningDatabase, plies: usize) -> &'a str {
    let moves: Vec<&str> = record.san_moves().take(plies).collect();
    table.classify(moves.as_slice(), plies)
}

/// Groups games by opening and totals their mistakes.
pub fn analyze_openings<'a>(
    games: impl IntoIterator<Item = &'a AnalyzedGame>,
    table: &OpeningDatabase,
    plies: usize,
) -> BTreeMap<String, OpeningStat> {
    let mut stats: BTreeMap<String, OpeningStat> = BTreeMap::new();
    for game in games {
        let name = classify_opening(&game.record, table, plies);
        let stat = stats.entry(name.to_string()).or_default();
        stat.games += 1;
        if let Some(analysis) = game.analysis() {
            stat.analyzed_games += 1;
            stat.total_mistakes += analysis.mistakes().len();
        }
    }
    for stat in stats.values_mut() {
        if stat.analyzed_games > 0 {
            stat.average_mistakes = stat.total_mistakes as f64 / stat.analyzed_games as f64;
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{EvaluatedMove, GameAnalysis, MoveRecord};
    use crate::analyzer::AnalysisStatus;
    use crate::criticality::CriticalityConfig;
    use crate::evaluation::Evaluation;
    use crate::oracle::SearchLimit;
    use crate::quality::Thresholds;
    use chess_board::{Color, GameHeaders, RecordedMove};
    use chess_openings::builtin_database;

    fn record(moves: &str) -> GameRecord {
        let moves = moves
            .split_whitespace()
            .map(|san| RecordedMove::new(san, None))
            .collect();
        GameRecord::new(GameHeaders::default(), moves).unwrap()
    }

    fn analysis_with(mistakes: usize) -> AnalysisStatus {
        let moves = (0..mistakes).map(|i| EvaluatedMove {
            record: MoveRecord {
                move_number: i as u32 + 1,
                mover: Color::White,
                fen_before: String::new(),
                fen_after: String::new(),
                san: "e4".into(),
                clock: None,
            },
            eval_before: Evaluation::Centipawns(0),
            eval_after: Evaluation::Centipawns(300),
        });
        AnalysisStatus::Analyzed(GameAnalysis::assemble(
            moves,
            SearchLimit::Depth(10),
            &Thresholds::default(),
            &CriticalityConfig::default(),
        ))
    }

    #[test]
    fn test_sicilian_by_prefix() {
        let table = builtin_database();
        let game = record("e4 c5 Nf3 d6 d4 cxd4 Nxd4 Nf6 Nc3 a6 Be3 e5");
        assert_eq!(classify_opening(&game, &table, DEFAULT_OPENING_PLIES), "Sicilian Defense");
    }

    #[test]
    fn test_aggregate_counts_and_averages() {
        let table = builtin_database();
        let games = vec![
            AnalyzedGame::new(record("e4 c5 Nf3"), analysis_with(2)),
            AnalyzedGame::new(record("e4 c5 Nc3"), analysis_with(4)),
            AnalyzedGame::new(
                record("e4 c5 c3"),
                AnalysisStatus::NotAnalyzed {
                    reason: "engine closed".into(),
                },
            ),
            AnalyzedGame::new(record("b3 e5"), analysis_with(1)),
        ];
        let stats = analyze_openings(&games, &table, DEFAULT_OPENING_PLIES);

        let sicilian = &stats["Sicilian Defense"];
        assert_eq!(sicilian.games, 3);
        assert_eq!(sicilian.analyzed_games, 2);
        assert_eq!(sicilian.total_mistakes, 6);
        assert_eq!(sicilian.average_mistakes, 3.0);

        let unknown = &stats["Unknown Opening"];
        assert_eq!(unknown.games, 1);
        assert_eq!(unknown.average_mistakes, 1.0);
    }

    #[test]
    fn test_unanalysed_only_has_zero_average() {
        let table = builtin_database();
        let games = vec![AnalyzedGame::new(
            record("d4 d5 c4"),
            AnalysisStatus::NotAnalyzed {
                reason: "x".into(),
            },
        )];
        let stats = analyze_openings(&games, &table, DEFAULT_OPENING_PLIES);
        assert_eq!(stats["Queen's Gambit"].average_mistakes, 0.0);
        assert!(analyze_openings(&[], &table, DEFAULT_OPENING_PLIES).is_empty());
    }
}
