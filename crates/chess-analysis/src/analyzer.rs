//! Whole-game analysis over an oracle provider.
//!
//! This module provides the [`GameAnalyzer`], which owns one oracle session
//! per game, walks the game and assembles a [`GameAnalysis`].

use chess_board::GameRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::GameAnalysis;
use crate::criticality::CriticalityConfig;
use crate::oracle::{Oracle, OracleError, OracleProvider, SearchLimit};
use crate::quality::Thresholds;
use crate::walker::GameWalker;

/// Errors that can occur during game analysis.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Error from the evaluation oracle.
    #[error("Engine error: {0}")]
    Oracle(#[from] OracleError),
    /// Invalid game data was provided.
    #[error("Invalid game data: {0}")]
    InvalidGame(String),
}

/// Configuration for game analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Search effort per evaluated position.
    pub limit: SearchLimit,
    pub thresholds: Thresholds,
    pub criticality: CriticalityConfig,
}

impl AnalysisConfig {
    pub fn with_depth(depth: u32) -> Self {
        Self {
            limit: SearchLimit::Depth(depth),
            ..Self::default()
        }
    }
}

/// Outcome of analysing one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisStatus {
    Analyzed(GameAnalysis),
    NotAnalyzed { reason: String },
}

impl AnalysisStatus {
    pub fn analysis(&self) -> Option<&GameAnalysis> {
        match self {
            AnalysisStatus::Analyzed(analysis) => Some(analysis),
            AnalysisStatus::NotAnalyzed { .. } => None,
        }
    }

    pub fn is_analyzed(&self) -> bool {
        matches!(self, AnalysisStatus::Analyzed(_))
    }
}

impl From<Result<GameAnalysis, AnalyzerError>> for AnalysisStatus {
    fn from(result: Result<GameAnalysis, AnalyzerError>) -> Self {
        match result {
            Ok(analysis) => AnalysisStatus::Analyzed(analysis),
            Err(e) => AnalysisStatus::NotAnalyzed {
                reason: e.to_string(),
            },
        }
    }
}

/// Analyzes games, opening a fresh oracle session for each one.
pub struct GameAnalyzer<P> {
    provider: P,
    config: AnalysisConfig,
}

impl<P: OracleProvider> GameAnalyzer<P> {
    pub fn new(provider: P, config: AnalysisConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyzes one game; every failure becomes [`AnalysisStatus::NotAnalyzed`].
    ///
    /// The session is dropped, and so terminated, before this returns.
    pub fn analyze(&self, record: &GameRecord) -> AnalysisStatus {
        let result = self
            .provider
            .open_session()
            .map_err(AnalyzerError::from)
            .and_then(|mut session| self.analyze_with(&mut session, record));

        if let Err(e) = &result {
            warn!(
                white = %record.headers.white,
                black = %record.headers.black,
                error = %e,
                "game not analyzed"
            );
        }
        result.into()
    }

    /// Analyzes one game on an existing session.
    pub fn analyze_with<O: Oracle + ?Sized>(
        &self,
        oracle: &mut O,
        record: &GameRecord,
    ) -> Result<GameAnalysis, AnalyzerError> {
        let walked = GameWalker::new(self.config.limit).walk(oracle, record)?;
        let half_moves = walked.len();
        let analysis = GameAnalysis::assemble(
            walked,
            self.config.limit,
            &self.config.thresholds,
            &self.config.criticality,
        );
        info!(
            white = %record.headers.white,
            black = %record.headers.black,
            half_moves,
            mistakes = analysis.mistakes().len(),
            critical_moments = analysis.summary().critical_moments.len(),
            "game analyzed"
        );
        Ok(analysis)
    }
}
