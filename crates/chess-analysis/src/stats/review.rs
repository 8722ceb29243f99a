//! Game review and recurring-mistake positions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::analysis::{GameAnalysis, Mistake, Summary};

const KEY_MOMENTS: usize = 3;
const EXAMPLES_PER_POSITION: usize = 2;

/// A position where the same game went wrong more than once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningOpportunity {
    /// FEN reduced to placement, side to move, castling and en passant.
    pub position: String,
    pub count: usize,
    pub examples: Vec<Mistake>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameReview {
    pub summary: Summary,
    /// Largest swings first; equal swings keep walk order.
    pub key_moments: Vec<Mistake>,
    pub learning_opportunities: Vec<LearningOpportunity>,
}

/// A position that recurs among a player's mistakes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonMistake {
    pub position: String,
    pub count: usize,
    pub average_diff: f64,
    pub example: Mistake,
}

/// Drops the half-move clock and full-move number from a FEN.
pub fn reduced_fen(fen: &str) -> String {
    fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}

/// Groups mistakes by reduced FEN before the move, in first-seen order.
fn group_by_position<'a>(
    mistakes: impl IntoIterator<Item = &'a Mistake>,
) -> Vec<(String, Vec<&'a Mistake>)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&Mistake>)> = Vec::new();
    for m in mistakes {
        let key = reduced_fen(m.fen_before());
        match index.get(&key) {
            Some(&i) => groups[i].1.push(m),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![m]));
            }
        }
    }
    groups
}

pub fn review_game(analysis: &GameAnalysis) -> GameReview {
    let mut key_moments: Vec<&Mistake> = analysis.mistakes().iter().collect();
    // Stable sort keeps walk order among equal swings.
    key_moments.sort_by(|a, b| b.eval_diff().cmp(&a.eval_diff()));
    key_moments.truncate(KEY_MOMENTS);

    let learning_opportunities = group_by_position(analysis.mistakes())
        .into_iter()
        .filter(|(_, group)| group.len() > 1)
        .map(|(position, group)| LearningOpportunity {
            position,
            count: group.len(),
            examples: group
                .into_iter()
                .take(EXAMPLES_PER_POSITION)
                .cloned()
                .collect(),
        })
        .collect();

    GameReview {
        summary: analysis.summary().clone(),
        key_moments: key_moments.into_iter().cloned().collect(),
        learning_opportunities,
    }
}

/// The `limit` most frequent mistake positions, most frequent first.
pub fn common_mistakes<'a>(
    mistakes: impl IntoIterator<Item = &'a Mistake>,
    limit: usize,
) -> Vec<CommonMistake> {
    let mut groups = group_by_position(mistakes);
    groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

    groups
        .into_iter()
        .take(limit)
        .filter_map(|(position, group)| {
            let example = (*group.first()?).clone();
            let total: u64 = group.iter().map(|m| u64::from(m.eval_diff())).sum();
            Some(CommonMistake {
                position,
                count: group.len(),
                average_diff: total as f64 / group.len() as f64,
                example,
            })
        })
        .collect()
}
