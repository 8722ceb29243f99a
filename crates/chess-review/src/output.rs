//! JSON persistence of analysed games.
//!
//! One document per game, named `<pgn stem>-<index>.json`, so a directory
//! of documents can later be loaded back for player statistics.

use std::fs;
use std::path::{Path, PathBuf};

use chess_analysis::AnalyzedGame;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A stored analysis: the game, its outcome, and provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDocument {
    /// PGN file the game was read from.
    pub source: String,
    /// Position of the game within the source file, from zero.
    pub index: usize,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub game: AnalyzedGame,
}

impl AnalysisDocument {
    pub fn new(source: impl Into<String>, index: usize, game: AnalyzedGame) -> Self {
        Self {
            source: source.into(),
            index,
            created_at: Utc::now(),
            game,
        }
    }

    fn file_name(&self) -> String {
        let stem = Path::new(&self.source)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("game");
        format!("{}-{:03}.json", stem, self.index)
    }
}

/// Writes each document as pretty JSON under `dir`, creating it if needed.
///
/// Returns the paths written, in document order.
pub fn write_documents(
    dir: &Path,
    documents: &[AnalysisDocument],
) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    documents
        .iter()
        .map(|doc| -> anyhow::Result<PathBuf> {
            let path = dir.join(doc.file_name());
            fs::write(&path, serde_json::to_string_pretty(doc)?)?;
            Ok(path)
        })
        .collect()
}

pub fn read_document(path: &Path) -> anyhow::Result<AnalysisDocument> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Loads every `.json` document in `dir`, sorted by file name.
///
/// Files that fail to parse are skipped with a warning.
pub fn load_directory(dir: &Path) -> anyhow::Result<Vec<AnalysisDocument>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        match read_document(&path) {
            Ok(doc) => documents.push(doc),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable analysis"),
        }
    }
    Ok(documents)
}
