//! Mistake severity classification.

use serde::{Deserialize, Serialize};

/// Severity of a recorded mistake, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Noticeable evaluation swing
    Inaccuracy,
    /// Significant evaluation swing
    Mistake,
    /// Major evaluation swing
    Blunder,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Inaccuracy => "inaccuracy",
            Severity::Mistake => "mistake",
            Severity::Blunder => "blunder",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exclusive lower bounds, in centipawns, for each severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub blunder: u32,
    pub mistake: u32,
    pub inaccuracy: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            blunder: 200,
            mistake: 100,
            inaccuracy: 50,
        }
    }
}

impl Thresholds {
    /// Classifies an evaluation swing by magnitude alone.
    ///
    /// Checked from most to least severe; a swing equal to a threshold falls
    /// into the lower class. Swings at or below `inaccuracy` are not mistakes.
    pub fn classify(&self, eval_diff: u32) -> Option<Severity> {
        if eval_diff > self.blunder {
            Some(Severity::Blunder)
        } else if eval_diff > self.mistake {
            Some(Severity::Mistake)
        } else if eval_diff > self.inaccuracy {
            Some(Severity::Inaccuracy)
        } else {
            None
        }
    }
}

/// Classifies a swing against the default thresholds (200/100/50).
pub fn classify(eval_diff: u32) -> Option<Severity> {
    Thresholds::default().classify(eval_diff)
}
