//! Board state with FEN (Forsyth-Edwards Notation) parsing and serialization.

use thiserror::Error;

use crate::movegen::{self, Move};
use crate::{Color, Piece, Square};

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 parts, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
}

/// Castling availability for both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    const WHITE_KINGSIDE: u8 = 1;
    const WHITE_QUEENSIDE: u8 = 2;
    const BLACK_KINGSIDE: u8 = 4;
    const BLACK_QUEENSIDE: u8 = 8;

    pub const ALL: CastlingRights = CastlingRights(15);

    const fn bit(color: Color, kingside: bool) -> u8 {
        match (color, kingside) {
            (Color::White, true) => Self::WHITE_KINGSIDE,
            (Color::White, false) => Self::WHITE_QUEENSIDE,
            (Color::Black, true) => Self::BLACK_KINGSIDE,
            (Color::Black, false) => Self::BLACK_QUEENSIDE,
        }
    }

    pub const fn has(self, color: Color, kingside: bool) -> bool {
        self.0 & Self::bit(color, kingside) != 0
    }

    pub fn remove(&mut self, color: Color, kingside: bool) {
        self.0 &= !Self::bit(color, kingside);
    }

    pub fn remove_color(&mut self, color: Color) {
        self.remove(color, true);
        self.remove(color, false);
    }

    fn set(&mut self, color: Color, kingside: bool) {
        self.0 |= Self::bit(color, kingside);
    }

    fn to_fen(self) -> String {
        let mut s = String::new();
        for (color, kingside, c) in [
            (Color::White, true, 'K'),
            (Color::White, false, 'Q'),
            (Color::Black, true, 'k'),
            (Color::Black, false, 'q'),
        ] {
            if self.has(color, kingside) {
                s.push(c);
            }
        }
        if s.is_empty() {
            s.push('-');
        }
        s
    }
}

/// Complete board state: placement, side to move, castling, en passant and clocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    board: [Option<(Piece, Color)>; 64],
    /// The side to move.
    pub side_to_move: Color,
    /// Castling availability.
    pub castling: CastlingRights,
    /// En passant target square, set after every double pawn push.
    pub en_passant: Option<Square>,
    /// Halfmove clock for the 50-move rule.
    pub halfmove_clock: u32,
    /// Fullmove number, starting at 1 and incremented after Black moves.
    pub fullmove_number: u32,
}

impl Position {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen(Self::STARTPOS).expect("STARTPOS is valid")
    }

    /// Parses a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() != 6 {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let board = Self::parse_placement(parts[0])?;

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let mut castling = CastlingRights::default();
        if parts[2] != "-" {
            for c in parts[2].chars() {
                match c {
                    'K' => castling.set(Color::White, true),
                    'Q' => castling.set(Color::White, false),
                    'k' => castling.set(Color::Black, true),
                    'q' => castling.set(Color::Black, false),
                    _ => {
                        return Err(FenError::InvalidCastlingRights(format!(
                            "invalid character '{}'",
                            c
                        )))
                    }
                }
            }
        }

        let en_passant = match parts[3] {
            "-" => None,
            ep => match Square::parse(ep) {
                Some(sq) if sq.rank() == 2 || sq.rank() == 5 => Some(sq),
                _ => return Err(FenError::InvalidEnPassantSquare(ep.to_string())),
            },
        };

        let halfmove_clock = parts[4]
            .parse::<u32>()
            .map_err(|_| FenError::InvalidHalfmoveClock(parts[4].to_string()))?;
        let fullmove_number = parts[5]
            .parse::<u32>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| FenError::InvalidFullmoveNumber(parts[5].to_string()))?;

        Ok(Position {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn parse_placement(placement: &str) -> Result<[Option<(Piece, Color)>; 64], FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut board = [None; 64];
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file: u8 = 0;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as u8;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    let sq = Square::new(file, rank).ok_or_else(|| {
                        FenError::InvalidPiecePlacement(format!("rank {} overflows", rank + 1))
                    })?;
                    board[sq.index()] = Some(piece);
                    file += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        rank + 1
                    )));
                }
            }
            if file != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    rank + 1,
                    file
                )));
            }
        }
        Ok(board)
    }

    /// Serializes the position to FEN.
    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match Square::new(file, rank).and_then(|sq| self.piece_at(sq)) {
                    Some((piece, color)) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(piece.to_fen_char(color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let en_passant = self
            .en_passant
            .map(|sq| sq.to_string())
            .unwrap_or_else(|| "-".to_string());

        format!(
            "{} {} {} {} {} {}",
            placement,
            self.side_to_move.fen_char(),
            self.castling.to_fen(),
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Returns the piece and color on a square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        self.board[sq.index()]
    }

    pub(crate) fn set_piece(&mut self, sq: Square, piece: Option<(Piece, Color)>) {
        self.board[sq.index()] = piece;
    }

    /// Finds the king of the given color.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        Square::all().find(|&sq| self.piece_at(sq) == Some((Piece::King, color)))
    }

    /// Total material of one side (pawn 1, minor 3, rook 5, queen 9, king excluded).
    pub fn material(&self, color: Color) -> u32 {
        self.board
            .iter()
            .flatten()
            .filter(|(_, c)| *c == color)
            .map(|(piece, _)| piece.material_value())
            .sum()
    }

    /// Returns the position after playing a legal move.
    pub fn play(&self, mv: Move) -> Position {
        movegen::make_move(self, mv)
    }

    /// Plays a move given in SAN notation.
    pub fn play_san(&self, san: &str) -> Result<(Move, Position), crate::SanError> {
        let mv = crate::san::san_to_move(self, san)?;
        Ok((mv, self.play(mv)))
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}
