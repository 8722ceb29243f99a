//! Configuration file loading for the review tool.
//!
//! Settings come from `review.toml` (every key optional) and are then
//! overridden by environment variables:
//!
//! | Variable | Setting |
//! |---|---|
//! | `STOCKFISH_PATH` | `engine.path` |
//! | `ENGINE_THREADS` | `engine.threads` |
//! | `ENGINE_HASH` | `engine.hash_mb` |
//! | `ANALYSIS_DEPTH` | `analysis.depth` |
//! | `CHESS_DATA_DIR` | `output_dir` |

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chess_analysis::{AnalysisConfig, EngineOptions};
use chess_openings::{builtin_database, DatabaseError, OpeningDatabase};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A setting has a value the tool cannot use.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

/// The engine used as the evaluation oracle.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EngineSection {
    /// Path to the engine executable; bare names are looked up in PATH.
    pub path: String,
    pub threads: u32,
    pub hash_mb: u32,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            path: "stockfish".to_string(),
            threads: 2,
            hash_mb: 256,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AnalysisSection {
    /// Search depth per evaluated position.
    pub depth: u32,
    /// Games analysed concurrently, one engine process each.
    pub workers: usize,
    /// Half-moves used to classify the opening.
    pub opening_plies: usize,
    /// Optional JSON signature table replacing the built-in one.
    pub openings_file: Option<PathBuf>,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            depth: 18,
            workers: 2,
            opening_plies: 10,
            openings_file: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ReviewConfig {
    pub engine: EngineSection,
    pub analysis: AnalysisSection,
    /// Directory where analysis documents are written.
    pub output_dir: PathBuf,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            engine: EngineSection::default(),
            analysis: AnalysisSection::default(),
            output_dir: PathBuf::from("analysis"),
        }
    }
}

impl ReviewConfig {
    /// Loads the file at `path` (defaults if it does not exist), then applies
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// [`ConfigError::ParseError`] if it contains invalid TOML, or
    /// [`ConfigError::InvalidValue`] for unusable settings.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::from_toml(&std::fs::read_to_string(path)?)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Applies overrides from `lookup`, normally the process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("STOCKFISH_PATH") {
            self.engine.path = path;
        }
        if let Some(value) = lookup("ENGINE_THREADS") {
            self.engine.threads = parse_setting("ENGINE_THREADS", &value)?;
        }
        if let Some(value) = lookup("ENGINE_HASH") {
            self.engine.hash_mb = parse_setting("ENGINE_HASH", &value)?;
        }
        if let Some(value) = lookup("ANALYSIS_DEPTH") {
            self.analysis.depth = parse_setting("ANALYSIS_DEPTH", &value)?;
        }
        if let Some(dir) = lookup("CHESS_DATA_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Rejects settings that would make analysis impossible.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("engine.path", self.engine.path.trim().is_empty(), self.engine.path.clone()),
            ("engine.threads", self.engine.threads == 0, self.engine.threads.to_string()),
            ("analysis.depth", self.analysis.depth == 0, self.analysis.depth.to_string()),
            ("analysis.workers", self.analysis.workers == 0, self.analysis.workers.to_string()),
        ];
        match checks.into_iter().find(|(_, invalid, _)| *invalid) {
            Some((key, _, value)) => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value,
            }),
            None => Ok(()),
        }
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            threads: self.engine.threads,
            hash_mb: self.engine.hash_mb,
        }
    }

    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig::with_depth(self.analysis.depth)
    }

    /// The configured signature table, or the built-in one.
    pub fn openings(&self) -> Result<OpeningDatabase, DatabaseError> {
        match &self.analysis.openings_file {
            Some(path) => OpeningDatabase::load(path),
            None => Ok(builtin_database()),
        }
    }
}

fn parse_setting<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_analysis::SearchLimit;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_full_toml_config() {
        let config = ReviewConfig::from_toml(
            r#"
output_dir = "out"

[engine]
path = "/usr/bin/stockfish"
threads = 4
hash_mb = 1024

[analysis]
depth = 22
workers = 3
opening_plies = 12
openings_file = "openings.json"
"#,
        )
        .unwrap();

        assert_eq!(config.engine.path, "/usr/bin/stockfish");
        assert_eq!(config.engine.threads, 4);
        assert_eq!(config.engine.hash_mb, 1024);
        assert_eq!(config.analysis.depth, 22);
        assert_eq!(config.analysis.workers, 3);
        assert_eq!(config.analysis.opening_plies, 12);
        assert_eq!(config.analysis.openings_file, Some(PathBuf::from("openings.json")));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.analysis_config().limit, SearchLimit::Depth(22));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ReviewConfig::from_toml("[engine]\nthreads = 8\n").unwrap();
        assert_eq!(config.engine.threads, 8);
        assert_eq!(config.engine.path, "stockfish");
        assert_eq!(config.engine.hash_mb, 256);
        assert_eq!(config.analysis, AnalysisSection::default());
        assert_eq!(config.output_dir, PathBuf::from("analysis"));

        assert_eq!(ReviewConfig::from_toml("").unwrap(), ReviewConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            ReviewConfig::from_toml("[engine\npath = 1"),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            ReviewConfig::from_toml("[analysis]\ndepth = \"deep\"\n"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ReviewConfig::default();
        config
            .apply_env(env(&[
                ("STOCKFISH_PATH", "/opt/sf"),
                ("ANALYSIS_DEPTH", "12"),
                ("ENGINE_THREADS", "6"),
                ("ENGINE_HASH", "64"),
                ("CHESS_DATA_DIR", "/data"),
            ]))
            .unwrap();

        assert_eq!(config.engine.path, "/opt/sf");
        assert_eq!(config.analysis.depth, 12);
        assert_eq!(config.engine_options(), EngineOptions { threads: 6, hash_mb: 64 });
        assert_eq!(config.output_dir, PathBuf::from("/data"));
    }

    #[test]
    fn test_env_invalid_number() {
        let mut config = ReviewConfig::default();
        let err = config.apply_env(env(&[("ANALYSIS_DEPTH", "deep")])).unwrap_err();
        match err {
            ConfigError::InvalidValue { key, value } => {
                assert_eq!(key, "ANALYSIS_DEPTH");
                assert_eq!(value, "deep");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate() {
        assert!(ReviewConfig::default().validate().is_ok());

        let mut config = ReviewConfig::default();
        config.analysis.workers = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key, .. }) if key == "analysis.workers"
        ));

        let mut config = ReviewConfig::default();
        config.analysis.depth = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("review.toml");
        std::fs::write(&path, "[analysis]\nworkers = 5\n").unwrap();

        let config = ReviewConfig::load(&path).unwrap();
        assert_eq!(config.analysis.workers, 5);

        let missing = ReviewConfig::load(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(missing.analysis.workers, 2);
    }

    #[test]
    fn test_openings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("openings.json");
        std::fs::write(&path, r#"[{"name": "Bird Opening", "signatures": ["f4"]}]"#).unwrap();

        let mut config = ReviewConfig::default();
        assert!(config.openings().unwrap().len() > 3);

        config.analysis.openings_file = Some(path);
        let table = config.openings().unwrap();
        assert_eq!(table.classify(&["f4", "d5"][..], 10), "Bird Opening");
    }
}
