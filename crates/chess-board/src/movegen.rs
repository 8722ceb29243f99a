//! Legal move generation and move application.
//!
//! Moves are generated pseudo-legally from a mailbox board and filtered by
//! checking that the mover's king is not left in check.

use crate::{Color, Piece, Position, Square};

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Special handling a move requires beyond relocating a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Normal,
    DoublePush,
    EnPassant,
    CastleKingside,
    CastleQueenside,
}

/// A move on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
    pub kind: MoveKind,
}

impl Move {
    const fn new(from: Square, to: Square, kind: MoveKind) -> Self {
        Self {
            from,
            to,
            promotion: None,
            kind,
        }
    }

    /// UCI long algebraic form, e.g. `e2e4` or `e7e8q`.
    pub fn to_uci(&self) -> String {
        let mut s = format!("{}{}", self.from, self.to);
        if let Some(piece) = self.promotion {
            s.push(piece.to_fen_char(Color::Black));
        }
        s
    }
}

/// Returns true if `sq` is attacked by any piece of color `by`.
pub fn is_square_attacked(position: &Position, sq: Square, by: Color) -> bool {
    // A pawn of `by` attacks sq from one rank behind it, relative to its direction.
    let back = -by.pawn_direction();
    for df in [-1, 1] {
        if let Some(from) = sq.offset(df, back) {
            if position.piece_at(from) == Some((Piece::Pawn, by)) {
                return true;
            }
        }
    }

    let hits = |deltas: &[(i8, i8)], piece: Piece| {
        deltas.iter().any(|&(df, dr)| {
            sq.offset(df, dr)
                .is_some_and(|from| position.piece_at(from) == Some((piece, by)))
        })
    };
    if hits(&KNIGHT_DELTAS, Piece::Knight) || hits(&KING_DELTAS, Piece::King) {
        return true;
    }

    let slides = |dirs: &[(i8, i8)], slider: Piece| {
        dirs.iter().any(|&(df, dr)| {
            let mut cur = sq;
            while let Some(next) = cur.offset(df, dr) {
                if let Some((piece, color)) = position.piece_at(next) {
                    return color == by && (piece == slider || piece == Piece::Queen);
                }
                cur = next;
            }
            false
        })
    };
    slides(&DIAGONALS, Piece::Bishop) || slides(&ORTHOGONALS, Piece::Rook)
}

/// Returns true if the king of `color` is in check.
pub fn is_king_attacked(position: &Position, color: Color) -> bool {
    position
        .king_square(color)
        .is_some_and(|king| is_square_attacked(position, king, color.opposite()))
}

/// Generates all legal moves for the side to move.
pub fn legal_moves(position: &Position) -> Vec<Move> {
    let us = position.side_to_move;
    pseudo_legal_moves(position)
        .into_iter()
        .filter(|&mv| !is_king_attacked(&make_move(position, mv), us))
        .collect()
}

fn pseudo_legal_moves(position: &Position) -> Vec<Move> {
    let us = position.side_to_move;
    let mut moves = Vec::with_capacity(48);

    for from in Square::all() {
        let Some((piece, color)) = position.piece_at(from) else {
            continue;
        };
        if color != us {
            continue;
        }
        match piece {
            Piece::Pawn => pawn_moves(position, from, us, &mut moves),
            Piece::Knight => step_moves(position, from, us, &KNIGHT_DELTAS, &mut moves),
            Piece::Bishop => slide_moves(position, from, us, &DIAGONALS, &mut moves),
            Piece::Rook => slide_moves(position, from, us, &ORTHOGONALS, &mut moves),
            Piece::Queen => {
                slide_moves(position, from, us, &DIAGONALS, &mut moves);
                slide_moves(position, from, us, &ORTHOGONALS, &mut moves);
            }
            Piece::King => {
                step_moves(position, from, us, &KING_DELTAS, &mut moves);
                castling_moves(position, from, us, &mut moves);
            }
        }
    }
    moves
}

fn push_pawn_move(from: Square, to: Square, kind: MoveKind, us: Color, moves: &mut Vec<Move>) {
    let last_rank = us.opposite().back_rank();
    if to.rank() == last_rank {
        for piece in Piece::PROMOTIONS {
            moves.push(Move {
                promotion: Some(piece),
                ..Move::new(from, to, kind)
            });
        }
    } else {
        moves.push(Move::new(from, to, kind));
    }
}

fn pawn_moves(position: &Position, from: Square, us: Color, moves: &mut Vec<Move>) {
    let dir = us.pawn_direction();

    if let Some(one) = from.offset(0, dir) {
        if position.piece_at(one).is_none() {
            push_pawn_move(from, one, MoveKind::Normal, us, moves);
            let start_rank = match us {
                Color::White => 1,
                Color::Black => 6,
            };
            if from.rank() == start_rank {
                if let Some(two) = one.offset(0, dir) {
                    if position.piece_at(two).is_none() {
                        moves.push(Move::new(from, two, MoveKind::DoublePush));
                    }
                }
            }
        }
    }

    for df in [-1, 1] {
        let Some(to) = from.offset(df, dir) else {
            continue;
        };
        match position.piece_at(to) {
            Some((_, color)) if color != us => push_pawn_move(from, to, MoveKind::Normal, us, moves),
            None if position.en_passant == Some(to) => {
                moves.push(Move::new(from, to, MoveKind::EnPassant));
            }
            _ => {}
        }
    }
}

fn step_moves(
    position: &Position,
    from: Square,
    us: Color,
    deltas: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(df, dr) in deltas {
        if let Some(to) = from.offset(df, dr) {
            if !matches!(position.piece_at(to), Some((_, color)) if color == us) {
                moves.push(Move::new(from, to, MoveKind::Normal));
            }
        }
    }
}

fn slide_moves(
    position: &Position,
    from: Square,
    us: Color,
    dirs: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(df, dr) in dirs {
        let mut cur = from;
        while let Some(to) = cur.offset(df, dr) {
            match position.piece_at(to) {
                None => moves.push(Move::new(from, to, MoveKind::Normal)),
                Some((_, color)) => {
                    if color != us {
                        moves.push(Move::new(from, to, MoveKind::Normal));
                    }
                    break;
                }
            }
            cur = to;
        }
    }
}

fn castling_moves(position: &Position, from: Square, us: Color, moves: &mut Vec<Move>) {
    let rank = us.back_rank();
    if Square::new(4, rank) != Some(from) || is_king_attacked(position, us) {
        return;
    }
    let them = us.opposite();
    let empty = |files: &[u8]| {
        files
            .iter()
            .all(|&f| Square::new(f, rank).is_some_and(|sq| position.piece_at(sq).is_none()))
    };
    let safe = |files: &[u8]| {
        files.iter().all(|&f| {
            Square::new(f, rank).is_some_and(|sq| !is_square_attacked(position, sq, them))
        })
    };
    let rook_on = |file: u8| {
        Square::new(file, rank).and_then(|sq| position.piece_at(sq)) == Some((Piece::Rook, us))
    };

    if position.castling.has(us, true) && rook_on(7) && empty(&[5, 6]) && safe(&[5, 6]) {
        if let Some(to) = Square::new(6, rank) {
            moves.push(Move::new(from, to, MoveKind::CastleKingside));
        }
    }
    if position.castling.has(us, false) && rook_on(0) && empty(&[1, 2, 3]) && safe(&[2, 3]) {
        if let Some(to) = Square::new(2, rank) {
            moves.push(Move::new(from, to, MoveKind::CastleQueenside));
        }
    }
}

/// Applies a move, returning the resulting position.
///
/// The move is assumed to be pseudo-legal in `position`.
pub fn make_move(position: &Position, mv: Move) -> Position {
    let mut next = position.clone();
    let us = position.side_to_move;
    let moving = position.piece_at(mv.from);
    let captured = position.piece_at(mv.to);

    next.set_piece(mv.from, None);
    let placed = match (moving, mv.promotion) {
        (Some((_, color)), Some(promo)) => Some((promo, color)),
        _ => moving,
    };
    next.set_piece(mv.to, placed);

    match mv.kind {
        MoveKind::EnPassant => {
            if let Some(victim) = mv.to.offset(0, -us.pawn_direction()) {
                next.set_piece(victim, None);
            }
        }
        MoveKind::CastleKingside | MoveKind::CastleQueenside => {
            let rank = us.back_rank();
            let (rook_from, rook_to) = if mv.kind == MoveKind::CastleKingside {
                (7, 5)
            } else {
                (0, 3)
            };
            if let (Some(rf), Some(rt)) = (Square::new(rook_from, rank), Square::new(rook_to, rank))
            {
                let rook = next.piece_at(rf);
                next.set_piece(rf, None);
                next.set_piece(rt, rook);
            }
        }
        MoveKind::Normal | MoveKind::DoublePush => {}
    }

    if matches!(moving, Some((Piece::King, _))) {
        next.castling.remove_color(us);
    }
    for sq in [mv.from, mv.to] {
        for color in [Color::White, Color::Black] {
            let rank = color.back_rank();
            if Square::new(7, rank) == Some(sq) {
                next.castling.remove(color, true);
            }
            if Square::new(0, rank) == Some(sq) {
                next.castling.remove(color, false);
            }
        }
    }

    next.en_passant = if mv.kind == MoveKind::DoublePush {
        mv.from.offset(0, us.pawn_direction())
    } else {
        None
    };

    let is_pawn = matches!(moving, Some((Piece::Pawn, _)));
    if is_pawn || captured.is_some() || mv.kind == MoveKind::EnPassant {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock += 1;
    }
    if us == Color::Black {
        next.fullmove_number += 1;
    }
    next.side_to_move = us.opposite();
    next
}
