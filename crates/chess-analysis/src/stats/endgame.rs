//! Endgame results and mistakes for one player.

use chess_board::{Color, GameOutcome, GameRecord, PgnError, Ply};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::AnalyzedGame;

/// Material (P=1, N=B=3, R=5, Q=9) at or below which a side is in the endgame.
pub const ENDGAME_MATERIAL: u32 = 10;

/// Endgame totals across the games that reached one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndgameStat {
    pub games: usize,
    pub won: usize,
    pub lost: usize,
    pub drawn: usize,
    /// Mistakes made at or after the onset move.
    pub mistakes: usize,
}

/// Full-move number of the first position in which both sides have at most
/// [`ENDGAME_MATERIAL`], or `None` if the game never gets there.
///
/// A move played from an earlier position is never an endgame move, so when
/// Black's move reaches the endgame the onset is the following move number.
pub fn endgame_onset(record: &GameRecord) -> Result<Option<u32>, PgnError> {
    Ok(onset_in(&record.plies()?))
}

fn onset_in(plies: &[Ply]) -> Option<u32> {
    plies
        .iter()
        .find(|ply| {
            ply.after.material(Color::White) <= ENDGAME_MATERIAL
                && ply.after.material(Color::Black) <= ENDGAME_MATERIAL
        })
        .map(|ply| ply.after.fullmove_number)
}

/// Tallies endgame outcomes and mistakes for `player`.
///
/// Games are skipped when unanalysed, not involving `player`, or never
/// reaching the endgame. A game without a decisive or drawn result counts
/// as lost.
pub fn analyze_endgames<'a>(
    games: impl IntoIterator<Item = &'a AnalyzedGame>,
    player: &str,
) -> EndgameStat {
    tally(
        games.into_iter().map(|game| {
            let onset = match endgame_onset(&game.record) {
                Ok(onset) => onset,
                Err(e) => {
                    warn!(error = %e, "skipping game in endgame statistics");
                    None
                }
            };
            (game, onset)
        }),
        player,
    )
}

fn tally<'a>(
    games: impl IntoIterator<Item = (&'a AnalyzedGame, Option<u32>)>,
    player: &str,
) -> EndgameStat {
    let mut stat = EndgameStat::default();
    for (game, onset) in games {
        let (Some(analysis), Some(color), Some(onset)) =
            (game.analysis(), game.record.color_of(player), onset)
        else {
            continue;
        };
        match game.record.headers.result {
            GameOutcome::Draw => stat.drawn += 1,
            outcome if outcome.winner() == Some(color) => stat.won += 1,
            _ => stat.lost += 1,
        }
        stat.games += 1;
        stat.mistakes += analysis
            .mistakes()
            .iter()
            .filter(|m| m.move_number() >= onset)
            .count();
    }
    stat
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
    use chess_board::{GameHeaders, Position};

    fn ply(move_number: u32, mover: Color, after: &str) -> Ply {
        Ply {
            move_number,
            mover,
            san: "Kd2".into(),
            clock: None,
            before: Position::startpos(),
            after: Position::from_fen(after).unwrap(),
        }
    }

    fn game(white: &str, black: &str, result: GameOutcome, mistake_moves: &[u32]) -> AnalyzedGame {
        let headers = GameHeaders {
            white: white.into(),
            black: black.into(),
            result,
            ..GameHeaders::default()
        };
        let moves = mistake_moves.iter().map(|&n| EvaluatedMove {
            record: MoveRecord {
                move_number: n,
                mover: Color::White,
                fen_before: String::new(),
                fen_after: String::new(),
                san: "Kd2".into(),
                clock: None,
            },
            eval_before: Evaluation::Centipawns(0),
            eval_after: Evaluation::Centipawns(-120),
        });
        let analysis = GameAnalysis::assemble(
            moves,
            SearchLimit::Depth(10),
            &Thresholds::default(),
            &CriticalityConfig::default(),
        );
        AnalyzedGame::new(
            GameRecord::new(headers, Vec::new()).unwrap(),
            AnalysisStatus::Analyzed(analysis),
        )
    }

    #[test]
    fn test_onset_requires_both_sides_low() {
        let plies = vec![
            // White: R+P = 6, Black: Q+R+R = 19.
            ply(30, Color::White, "r2qk2r/8/8/8/8/8/4P3/4K2R b - - 0 30"),
            // Black down to a single rook: 6 and 5.
            ply(30, Color::Black, "4k2r/8/8/8/8/8/4P3/4K2R w - - 0 31"),
            ply(31, Color::White, "4k2r/8/8/8/8/8/4P3/3K3R b - - 1 31"),
        ];
        assert_eq!(onset_in(&plies[..1]), None);
        assert_eq!(onset_in(&plies), Some(31));
    }

    #[test]
    fn test_onset_after_white_move_keeps_move_number() {
        let plies = vec![
            ply(30, Color::Black, "r2qk2r/8/8/8/8/8/4P3/4K2R w - - 0 31"),
            // White takes the queen and a rook: 6 and 5.
            ply(31, Color::White, "4k2r/8/8/8/8/8/4P3/4K2R b - - 0 31"),
        ];
        assert_eq!(onset_in(&plies), Some(31));
    }

    #[test]
    fn test_white_move_before_black_reaches_endgame_is_excluded() {
        let plies = vec![
            ply(30, Color::White, "r2qk2r/8/8/8/8/8/4P3/4K2R b - - 0 30"),
            ply(30, Color::Black, "4k2r/8/8/8/8/8/4P3/4K2R w - - 0 31"),
        ];
        let onset = onset_in(&plies);
        let played = game("me", "x", GameOutcome::Draw, &[30, 31]);

        let stat = tally([(&played, onset)], "me");
        assert_eq!(stat.games, 1);
        assert_eq!(stat.mistakes, 1);
    }

    #[test]
    fn test_onset_none_for_short_game() {
        let record = GameRecord::new(
            GameHeaders::default(),
            ["e4", "e5", "Nf3"]
                .iter()
                .map(|s| chess_board::RecordedMove::new(*s, None))
                .collect(),
        )
        .unwrap();
        assert_eq!(endgame_onset(&record).unwrap(), None);
    }

    #[test]
    fn test_tally_outcomes_from_player_perspective() {
        let games = [
            game("me", "x", GameOutcome::WhiteWins, &[10, 35, 40]),
            game("x", "me", GameOutcome::WhiteWins, &[36]),
            game("me", "x", GameOutcome::Draw, &[]),
            game("x", "me", GameOutcome::BlackWins, &[50]),
        ];
        let stat = tally(games.iter().map(|g| (g, Some(35))), "me");
        assert_eq!(
            stat,
            EndgameStat {
                games: 4,
                won: 2,
                lost: 1,
                drawn: 1,
                mistakes: 4,
            }
        );
    }

    #[test]
    fn test_tally_unfinished_game_counts_as_lost() {
        let unfinished = game("me", "x", GameOutcome::Unfinished, &[40]);
        let stat = tally([(&unfinished, Some(30))], "me");
        assert_eq!(
            stat,
            EndgameStat {
                games: 1,
                won: 0,
                lost: 1,
                drawn: 0,
                mistakes: 1,
            }
        );
    }

    #[test]
    fn test_tally_exclusions() {
        let stranger = game("a", "b", GameOutcome::WhiteWins, &[40]);
        let no_endgame = game("me", "x", GameOutcome::WhiteWins, &[40]);
        let mut unanalysed = game("me", "x", GameOutcome::WhiteWins, &[40]);
        unanalysed.status = AnalysisStatus::NotAnalyzed {
            reason: "engine closed".into(),
        };

        let stat = tally(
            [
                (&stranger, Some(30)),
                (&no_endgame, None),
                (&unanalysed, Some(30)),
            ],
            "me",
        );
        assert_eq!(stat, EndgameStat::default());
    }

    #[test]
    fn test_analyze_skips_games_without_endgame() {
        let games = [game("me", "x", GameOutcome::WhiteWins, &[1])];
        assert_eq!(analyze_endgames(&games, "me"), EndgameStat::default());
    }
}
