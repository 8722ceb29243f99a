//! Move-by-move chess game analysis.
//!
//! This crate walks recorded games through a position-evaluation oracle,
//! classifies each half-move's evaluation swing, finds clusters of mistakes
//! and aggregates the results across a player's games.
//!
//! # Overview
//!
//! - [`Oracle`] / [`OracleProvider`] - the evaluation capability; [`UciEngine`]
//!   drives a UCI engine such as Stockfish
//! - [`GameWalker`] - evaluates the position before and after every half-move
//! - [`Thresholds`] - maps an evaluation swing to a [`Severity`]
//! - [`GameAnalysis`] - mistakes, per-side counts, worst mistake and
//!   [`CriticalMoment`]s for one game
//! - [`GameAnalyzer`] - opens a session per game and reports an [`AnalysisStatus`]
//! - [`stats`] - time pressure, openings, endgames, rating trend and reviews
//!
//! # Example
//!
//! ```ignore
//! use chess_analysis::{AnalysisConfig, EngineOptions, GameAnalyzer, UciEngineProvider};
//! use chess_board::GameRecord;
//!
//! let provider = UciEngineProvider::new("stockfish", EngineOptions::default());
//! let analyzer = GameAnalyzer::new(provider, AnalysisConfig::with_depth(18));
//! let record = GameRecord::from_pgn(pgn_text)?;
//! if let Some(analysis) = analyzer.analyze(&record).analysis() {
//!     println!("{} mistakes", analysis.mistakes().len());
//! }
//! ```

pub mod analysis;
pub mod analyzer;
pub mod criticality;
pub mod engine;
pub mod evaluation;
pub mod oracle;
pub mod quality;
pub mod stats;
pub mod walker;

pub use analysis::{EvaluatedMove, GameAnalysis, Mistake, MoveRecord, Summary};
pub use analyzer::{AnalysisConfig, AnalysisStatus, AnalyzerError, GameAnalyzer};
pub use criticality::{detect_critical_moments, CriticalMoment, CriticalityConfig};
pub use engine::{EngineOptions, UciEngine, UciEngineProvider};
pub use evaluation::{Evaluation, MATE_SCORE};
pub use oracle::{Oracle, OracleError, OracleProvider, SearchLimit};
pub use quality::{classify, Severity, Thresholds};
pub use stats::AnalyzedGame;
pub use walker::GameWalker;
