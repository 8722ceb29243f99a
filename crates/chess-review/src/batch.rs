//! Concurrent analysis of many games.
//!
//! Each game gets its own oracle session on a blocking worker; a semaphore
//! caps how many engine processes run at once.

use std::sync::Arc;

use chess_analysis::{AnalysisStatus, AnalyzedGame, GameAnalyzer, OracleProvider};
use chess_board::GameRecord;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Runs a [`GameAnalyzer`] over batches of games.
pub struct BatchAnalyzer<P> {
    analyzer: Arc<GameAnalyzer<P>>,
    semaphore: Arc<Semaphore>,
}

impl<P> BatchAnalyzer<P>
where
    P: OracleProvider + 'static,
{
    /// `workers` is clamped to at least one.
    pub fn new(analyzer: GameAnalyzer<P>, workers: usize) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Analyses every game; results come back in input order.
    ///
    /// A game whose task fails is reported as not analysed.
    pub async fn analyze_all(&self, records: Vec<GameRecord>) -> Vec<AnalyzedGame> {
        let mut pending = Vec::with_capacity(records.len());

        for (index, record) in records.into_iter().enumerate() {
            let analyzer = Arc::clone(&self.analyzer);
            let semaphore = Arc::clone(&self.semaphore);
            let task_record = record.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await?;
                debug!(game = index, "starting analysis");
                let status =
                    tokio::task::spawn_blocking(move || analyzer.analyze(&task_record)).await?;
                Ok::<_, anyhow::Error>(status)
            });
            pending.push((record, handle));
        }

        let mut results = Vec::with_capacity(pending.len());
        for (index, (record, handle)) in pending.into_iter().enumerate() {
            let status = match handle.await.map_err(anyhow::Error::from).and_then(|r| r) {
                Ok(status) => status,
                Err(e) => {
                    warn!(game = index, error = %e, "analysis task failed");
                    AnalysisStatus::NotAnalyzed {
                        reason: e.to_string(),
                    }
                }
            };
            results.push(AnalyzedGame::new(record, status));
        }
        results
    }
}
