//! Chess piece representation.

use crate::Color;

/// The six types of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Piece {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl Piece {
    /// Pieces a pawn may promote to, in the order SAN generation prefers.
    pub const PROMOTIONS: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

    /// Material value in pawns. The king carries no material value.
    #[inline]
    pub const fn material_value(self) -> u32 {
        match self {
            Piece::Pawn => 1,
            Piece::Knight | Piece::Bishop => 3,
            Piece::Rook => 5,
            Piece::Queen => 9,
            Piece::King => 0,
        }
    }

    /// Returns the FEN character for this piece with the given color.
    pub const fn to_fen_char(self, color: Color) -> char {
        let c = match self {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parses a FEN character into a piece and color.
    pub const fn from_fen_char(c: char) -> Option<(Piece, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let piece = match c.to_ascii_lowercase() {
            'p' => Piece::Pawn,
            'n' => Piece::Knight,
            'b' => Piece::Bishop,
            'r' => Piece::Rook,
            'q' => Piece::Queen,
            'k' => Piece::King,
            _ => return None,
        };
        Some((piece, color))
    }

    /// The SAN letter for this piece (pawns have none).
    pub const fn san_char(self) -> Option<char> {
        match self {
            Piece::Pawn => None,
            Piece::Knight => Some('N'),
            Piece::Bishop => Some('B'),
            Piece::Rook => Some('R'),
            Piece::Queen => Some('Q'),
            Piece::King => Some('K'),
        }
    }

    /// Parses an uppercase SAN piece letter.
    pub const fn from_san_char(c: char) -> Option<Piece> {
        match c {
            'N' => Some(Piece::Knight),
            'B' => Some(Piece::Bishop),
            'R' => Some(Piece::Rook),
            'Q' => Some(Piece::Queen),
            'K' => Some(Piece::King),
            _ => None,
        }
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Piece::Pawn => "Pawn",
            Piece::Knight => "Knight",
            Piece::Bishop => "Bishop",
            Piece::Rook => "Rook",
            Piece::Queen => "Queen",
            Piece::King => "King",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_values() {
        assert_eq!(Piece::Pawn.material_value(), 1);
        assert_eq!(Piece::Knight.material_value(), 3);
        assert_eq!(Piece::Bishop.material_value(), 3);
        assert_eq!(Piece::Rook.material_value(), 5);
        assert_eq!(Piece::Queen.material_value(), 9);
        assert_eq!(Piece::King.material_value(), 0);
    }

    #[test]
    fn fen_chars() {
        assert_eq!(Piece::Pawn.to_fen_char(Color::White), 'P');
        assert_eq!(Piece::Knight.to_fen_char(Color::Black), 'n');
        assert_eq!(Piece::from_fen_char('K'), Some((Piece::King, Color::White)));
        assert_eq!(Piece::from_fen_char('x'), None);
    }

    #[test]
    fn san_chars() {
        assert_eq!(Piece::Pawn.san_char(), None);
        assert_eq!(Piece::from_san_char('N'), Some(Piece::Knight));
        assert_eq!(Piece::from_san_char('b'), None);
    }
}
