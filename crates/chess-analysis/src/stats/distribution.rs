//! Mistake counts by severity.

use serde::{Deserialize, Serialize};

use crate::analysis::Mistake;
use crate::quality::Severity;

/// Mistake counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MistakeDistribution {
    pub blunders: usize,
    pub mistakes: usize,
    pub inaccuracies: usize,
}

impl MistakeDistribution {
    pub fn from_mistakes<'a>(mistakes: impl IntoIterator<Item = &'a Mistake>) -> Self {
        let mut dist = Self::default();
        for m in mistakes {
            dist.add(m.severity());
        }
        dist
    }

    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Blunder => self.blunders += 1,
            Severity::Mistake => self.mistakes += 1,
            Severity::Inaccuracy => self.inaccuracies += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.blunders + self.mistakes + self.inaccuracies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::mistake;

    #[test]
    fn test_counts_by_severity() {
        let all = [mistake(1, 60), mistake(2, 150), mistake(3, 250), mistake(4, 300)];
        let dist = MistakeDistribution::from_mistakes(&all);
        assert_eq!(
            dist,
            MistakeDistribution {
                blunders: 2,
                mistakes: 1,
                inaccuracies: 1,
            }
        );
        assert_eq!(dist.total(), 4);
        assert_eq!(MistakeDistribution::from_mistakes(&[]).total(), 0);
    }
}
