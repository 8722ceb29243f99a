//! Opening signature table storage and classification.

use std::path::Path;

use thiserror::Error;

use crate::opening::Opening;

/// Name reported for games whose moves match no signature.
pub const UNKNOWN_OPENING: &str = "Unknown Opening";

/// Errors that can occur when working with opening databases.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// An entry has no name or no usable signature.
    #[error("invalid opening entry: {0}")]
    InvalidEntry(String),

    /// Failed to read the opening database file.
    #[error("failed to read opening database: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// An ordered table of named openings.
///
/// Table order is significant: [`classify`](Self::classify) returns the first
/// entry with a matching signature, so broader prefixes listed early shadow
/// more specific ones listed later.
#[derive(Debug, Clone, Default)]
pub struct OpeningDatabase {
    openings: Vec<Opening>,
}

impl OpeningDatabase {
    /// Creates a new empty opening database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new opening database with the given openings, in order.
    #[must_use]
    pub fn with_openings(openings: Vec<Opening>) -> Self {
        Self { openings }
    }

    /// Parses a JSON array of openings.
    pub fn from_json(json: &str) -> Result<Self, DatabaseError> {
        let openings: Vec<Opening> = serde_json::from_str(json)?;
        for opening in &openings {
            validate(opening)?;
        }
        Ok(Self { openings })
    }

    /// Loads a JSON signature table from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serializes the table back to pretty JSON.
    pub fn to_json(&self) -> Result<String, DatabaseError> {
        Ok(serde_json::to_string_pretty(&self.openings)?)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.openings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.openings.is_empty()
    }

    /// Appends an opening at the end of the table.
    pub fn add(&mut self, opening: Opening) {
        self.openings.push(opening);
    }

    /// Returns all openings in table order.
    #[must_use]
    pub fn all(&self) -> &[Opening] {
        &self.openings
    }

    /// Finds an opening by exact name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Opening> {
        self.openings.iter().find(|o| o.name == name)
    }

    /// Finds all openings matching an ECO code prefix.
    ///
    /// For example, `by_eco("C6")` would match "C60", "C65", etc.
    #[must_use]
    pub fn by_eco(&self, eco_prefix: &str) -> Vec<&Opening> {
        self.openings
            .iter()
            .filter(|o| {
                o.eco
                    .as_ref()
                    .is_some_and(|eco| eco.starts_with(eco_prefix))
            })
            .collect()
    }

    /// Returns the first opening whose signature prefixes `move_text`.
    #[must_use]
    pub fn find(&self, move_text: &str) -> Option<&Opening> {
        self.openings
            .iter()
            .find(|o| o.matching_signature(move_text).is_some())
    }

    /// Classifies a game from its first `plies` SAN moves.
    ///
    /// Returns [`UNKNOWN_OPENING`] when nothing matches.
    #[must_use]
    pub fn classify<S: AsRef<str>>(&self, moves: &[S], plies: usize) -> &str {
        let move_text = moves
            .iter()
            .take(plies)
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");
        self.find(&move_text)
            .map_or(UNKNOWN_OPENING, |o| o.name.as_str())
    }
}

fn validate(opening: &Opening) -> Result<(), DatabaseError> {
    if opening.name.trim().is_empty() {
        return Err(DatabaseError::InvalidEntry("opening without a name".into()));
    }
    if opening.signatures.is_empty() || opening.signatures.iter().any(|s| s.trim().is_empty()) {
        return Err(DatabaseError::InvalidEntry(format!(
            "{} has an empty signature list or signature",
            opening.name
        )));
    }
    Ok(())
}
