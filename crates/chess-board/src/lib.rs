//! Board state and notation for chess game records.
//!
//! This crate provides:
//! - [`Color`], [`Piece`] and [`Square`] for board coordinates
//! - [`Position`] - full board state with FEN parsing and serialization
//! - Legal move generation and [`Move`] application
//! - SAN notation parsing and generation
//! - [`GameRecord`] - PGN reading with `[%clk]` clock annotations
//!
//! # Example
//!
//! ```
//! use chess_board::{san, Position};
//!
//! let position = Position::startpos();
//! let mv = san::san_to_move(&position, "e4").unwrap();
//! let next = position.play(mv);
//! assert_eq!(
//!     next.to_fen(),
//!     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
//! );
//! ```

mod color;
pub mod movegen;
pub mod pgn;
mod piece;
mod position;
pub mod san;
mod square;

pub use color::Color;
pub use movegen::{is_king_attacked, legal_moves, Move, MoveKind};
pub use pgn::{GameHeaders, GameOutcome, GameRecord, PgnError, Ply, RecordedMove};
pub use piece::Piece;
pub use position::{FenError, Position};
pub use san::{move_to_san, san_to_move, SanError};
pub use square::Square;
