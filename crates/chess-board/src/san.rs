//! Standard Algebraic Notation (SAN) parsing and generation.
//!
//! SAN is the standard way to record chess moves in human-readable form.
//! Examples: "e4", "Nf3", "Bxc6", "O-O", "e8=Q", "Nbd2", "R1e1"

use thiserror::Error;

use crate::movegen::{is_king_attacked, legal_moves, make_move, Move, MoveKind};
use crate::square::{file_char, file_index, rank_char, rank_index};
use crate::{Piece, Position, Square};

/// Error type for SAN parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SanError {
    /// The SAN string is empty.
    #[error("empty SAN string")]
    Empty,
    /// The SAN string has invalid format.
    #[error("invalid SAN format: {0}")]
    InvalidFormat(String),
    /// No legal move matches the SAN.
    #[error("no legal move matches: {0}")]
    NoMatchingMove(String),
    /// Multiple legal moves match the SAN (ambiguous).
    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),
}

/// Parsed components of a SAN string.
#[derive(Debug)]
struct ParsedSan {
    piece: Piece,
    from_file: Option<u8>,
    from_rank: Option<u8>,
    to: Square,
    promotion: Option<Piece>,
}

/// Parses a SAN string and returns the corresponding legal move.
///
/// Check markers and annotation suffixes (`+`, `#`, `!`, `?`) are ignored.
pub fn san_to_move(position: &Position, san: &str) -> Result<Move, SanError> {
    let trimmed = san.trim().trim_end_matches(['+', '#', '!', '?']);
    if trimmed.is_empty() {
        return Err(SanError::Empty);
    }

    let legal = legal_moves(position);

    let castle = match trimmed {
        "O-O" | "0-0" => Some(MoveKind::CastleKingside),
        "O-O-O" | "0-0-0" => Some(MoveKind::CastleQueenside),
        _ => None,
    };
    if let Some(kind) = castle {
        return legal
            .into_iter()
            .find(|m| m.kind == kind)
            .ok_or_else(|| SanError::NoMatchingMove(san.to_string()));
    }

    let parsed = parse_components(trimmed)?;
    let mut candidates = legal.into_iter().filter(|m| {
        position.piece_at(m.from).map(|(p, _)| p) == Some(parsed.piece)
            && m.to == parsed.to
            && m.promotion == parsed.promotion
            && parsed.from_file.map_or(true, |f| m.from.file() == f)
            && parsed.from_rank.map_or(true, |r| m.from.rank() == r)
            && !matches!(m.kind, MoveKind::CastleKingside | MoveKind::CastleQueenside)
    });

    let first = candidates
        .next()
        .ok_or_else(|| SanError::NoMatchingMove(san.to_string()))?;
    if candidates.next().is_some() {
        return Err(SanError::AmbiguousMove(san.to_string()));
    }
    Ok(first)
}

fn parse_components(san: &str) -> Result<ParsedSan, SanError> {
    let invalid = || SanError::InvalidFormat(san.to_string());

    let mut chars: Vec<char> = san.chars().filter(|&c| c != 'x' && c != '-').collect();

    let piece = match chars.first() {
        Some(&c) if c.is_ascii_uppercase() => {
            chars.remove(0);
            Piece::from_san_char(c).ok_or_else(invalid)?
        }
        Some(_) => Piece::Pawn,
        None => return Err(invalid()),
    };

    // Promotion: "e8=Q" or "e8Q"
    let promotion = match chars.last() {
        Some(&c) if c.is_ascii_uppercase() => {
            chars.pop();
            if chars.last() == Some(&'=') {
                chars.pop();
            }
            Some(Piece::from_san_char(c).ok_or_else(invalid)?)
        }
        _ => None,
    };
    if promotion.is_some() && piece != Piece::Pawn {
        return Err(invalid());
    }

    if chars.len() < 2 || chars.len() > 4 {
        return Err(invalid());
    }
    let n = chars.len();
    let to = Square::new(
        file_index(chars[n - 2]).ok_or_else(invalid)?,
        rank_index(chars[n - 1]).ok_or_else(invalid)?,
    )
    .ok_or_else(invalid)?;

    let mut from_file = None;
    let mut from_rank = None;
    for &c in &chars[..n - 2] {
        if let Some(f) = file_index(c) {
            from_file = Some(f);
        } else if let Some(r) = rank_index(c) {
            from_rank = Some(r);
        } else {
            return Err(invalid());
        }
    }

    Ok(ParsedSan {
        piece,
        from_file,
        from_rank,
        to,
        promotion,
    })
}

/// Converts a move to SAN notation given the current position.
///
/// The position must be the state BEFORE the move is made and the move must be
/// legal in it.
pub fn move_to_san(position: &Position, mv: Move) -> String {
    let mut san = String::new();

    match mv.kind {
        MoveKind::CastleKingside => san.push_str("O-O"),
        MoveKind::CastleQueenside => san.push_str("O-O-O"),
        _ => {
            let piece = position
                .piece_at(mv.from)
                .map(|(p, _)| p)
                .unwrap_or(Piece::Pawn);
            let is_capture = position.piece_at(mv.to).is_some() || mv.kind == MoveKind::EnPassant;

            if let Some(letter) = piece.san_char() {
                san.push(letter);
                san.push_str(&disambiguation(position, mv, piece));
            } else if is_capture {
                san.push(file_char(mv.from.file()));
            }
            if is_capture {
                san.push('x');
            }
            san.push(file_char(mv.to.file()));
            san.push(rank_char(mv.to.rank()));
            if let Some(promo) = mv.promotion.and_then(Piece::san_char) {
                san.push('=');
                san.push(promo);
            }
        }
    }

    let next = make_move(position, mv);
    if is_king_attacked(&next, next.side_to_move) {
        if legal_moves(&next).is_empty() {
            san.push('#');
        } else {
            san.push('+');
        }
    }
    san
}

fn disambiguation(position: &Position, mv: Move, piece: Piece) -> String {
    let rivals: Vec<Move> = legal_moves(position)
        .into_iter()
        .filter(|m| {
            m.to == mv.to
                && m.from != mv.from
                && position.piece_at(m.from).map(|(p, _)| p) == Some(piece)
        })
        .collect();

    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|m| m.from.file() != mv.from.file()) {
        file_char(mv.from.file()).to_string()
    } else if rivals.iter().all(|m| m.from.rank() != mv.from.rank()) {
        rank_char(mv.from.rank()).to_string()
    } else {
        mv.from.to_string()
    }
}
