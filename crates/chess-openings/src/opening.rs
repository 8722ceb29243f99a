//! Core opening types.

use serde::{Deserialize, Serialize};

/// A named opening and the move prefixes that identify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opening {
    /// The name of the opening.
    pub name: String,
    /// The ECO code for this opening (e.g., "B20", "C60").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eco: Option<String>,
    /// Space-separated SAN move prefixes, e.g. `"e4 c5"`.
    pub signatures: Vec<String>,
}

impl Opening {
    /// Creates a new opening with a single signature.
    #[must_use]
    pub fn new(name: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            eco: None,
            signatures: vec![signature.into()],
        }
    }

    /// Sets the ECO code.
    #[must_use]
    pub fn with_eco(mut self, eco: impl Into<String>) -> Self {
        self.eco = Some(eco.into());
        self
    }

    /// Adds another signature after the existing ones.
    #[must_use]
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signatures.push(signature.into());
        self
    }

    /// Returns the first signature that `move_text` starts with.
    #[must_use]
    pub fn matching_signature(&self, move_text: &str) -> Option<&str> {
        self.signatures
            .iter()
            .map(String::as_str)
            .find(|sig| move_text.starts_with(sig))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_builder() {
        let opening = Opening::new("Sicilian Defense", "e4 c5")
            .with_eco("B20")
            .with_signature("c4 c5 e4");
        assert_eq!(opening.name, "Sicilian Defense");
        assert_eq!(opening.eco.as_deref(), Some("B20"));
        assert_eq!(opening.signatures.len(), 2);
    }

    #[test]
    fn test_matching_signature_is_textual_prefix() {
        let opening = Opening::new("Queen's Gambit", "d4 d5 c4");
        assert_eq!(
            opening.matching_signature("d4 d5 c4 e6 Nc3"),
            Some("d4 d5 c4")
        );
        assert_eq!(opening.matching_signature("d4 d5 Nf3"), None);
        assert_eq!(opening.matching_signature(""), None);
    }

    #[test]
    fn test_json_shape() {
        let opening = Opening::new("Ruy Lopez", "e4 e5 Nf3 Nc6 Bb5");
        let json = serde_json::to_string(&opening).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Ruy Lopez","signatures":["e4 e5 Nf3 Nc6 Bb5"]}"#
        );
    }
}
