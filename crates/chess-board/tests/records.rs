//! Cross-module tests: PGN reading on top of move generation and SAN.

use chess_board::{
    legal_moves, move_to_san, san_to_move, Color, GameOutcome, GameRecord, PgnError, Position,
};
use proptest::prelude::*;

const CLUB_FILE: &str = r#"[Event "Club Blitz"]
[White "alice"]
[Black "bob"]
[Date "2024.03.01"]
[Result "1-0"]
[WhiteElo "1510"]
[BlackElo "1492"]
[TimeControl "180+2"]

1. e4 {[%clk 0:03:00]} e5 {[%clk 0:03:00]} 2. Nf3 {[%clk 0:02:58]} Nc6 {[%clk 0:02:57]}
3. Bb5 a6 (3... Nf6 4. O-O) 4. Ba4 Nf6 5. O-O 1-0

[White "carol"]
[Black "alice"]
[Result "*"]

1. e4 e5 2. Ke2 Ke7 3. Kd5 *

[White "bob"]
[Black "alice"]
[Result "0-1"]

1. f3 e5 2. g4 Qh4# 0-1
"#;

#[test]
fn test_multi_game_file_keeps_good_games() {
    let results = GameRecord::parse_all(CLUB_FILE);
    assert_eq!(results.len(), 3);

    let first = results[0].as_ref().unwrap();
    assert_eq!(first.headers.event.as_deref(), Some("Club Blitz"));
    assert_eq!(first.headers.white_elo, Some(1510));
    assert_eq!(first.headers.time_control_label().as_deref(), Some("3+2"));
    assert_eq!(first.moves.len(), 9);
    assert_eq!(first.moves[3].clock, Some(177.0));
    assert_eq!(first.moves[8].san, "O-O");

    assert!(matches!(
        results[1],
        Err(PgnError::IllegalMove { ply: 5, .. })
    ));

    let third = results[2].as_ref().unwrap();
    assert_eq!(third.headers.result, GameOutcome::BlackWins);
    assert_eq!(third.color_of("alice"), Some(Color::Black));
    assert_eq!(third.moves.last().unwrap().san, "Qh4#");
}

#[test]
fn test_plies_number_moves_before_the_move() {
    let record = GameRecord::parse_all(CLUB_FILE).remove(2).unwrap();
    let plies = record.plies().unwrap();

    let numbers: Vec<(u32, Color)> = plies.iter().map(|p| (p.move_number, p.mover)).collect();
    assert_eq!(
        numbers,
        vec![
            (1, Color::White),
            (1, Color::Black),
            (2, Color::White),
            (2, Color::Black),
        ]
    );
    assert_eq!(plies[3].after.side_to_move, Color::White);
    assert!(legal_moves(&plies[3].after).is_empty());
}

proptest! {
    #[test]
    fn random_games_round_trip_san_and_fen(choices in prop::collection::vec(any::<prop::sample::Index>(), 0..60)) {
        let mut position = Position::startpos();
        for choice in choices {
            let moves = legal_moves(&position);
            if moves.is_empty() {
                break;
            }
            let mv = moves[choice.index(moves.len())];
            let san = move_to_san(&position, mv);
            prop_assert_eq!(san_to_move(&position, &san).unwrap(), mv);

            position = position.play(mv);
            let fen = position.to_fen();
            prop_assert_eq!(Position::from_fen(&fen).unwrap().to_fen(), fen);
        }
    }
}
