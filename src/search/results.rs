use std::cmp::Ordering;
use serde::{Serialize, Deserialize};
use crate::core::types::StringId;

/// Verified string with its similarity score.
///
/// `score` is at least the threshold, less at most [`EPSILON`](crate::scoring::measure::EPSILON) of rounding slack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: StringId,
    pub text: String,
    pub score: f64,
}

impl Match {
    pub fn new(id: StringId, text: impl Into<String>, score: f64) -> Self {
        Match { id, text: text.into(), score }
    }

    /// Ranking order: higher score first, ties broken by identifier.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .partial_cmp(&self.score)
            .unwrap_or(Ordering::Equal)
            .then(self.id.cmp(&other.id))
    }
}

impl PartialEq for Match {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.score == other.score
    }
}

pub fn sort_by_rank(matches: &mut [Match]) {
    matches.sort_by(Match::rank_cmp);
}

pub fn sort_by_id(matches: &mut [Match]) {
    matches.sort_by_key(|m| m.id);
}
