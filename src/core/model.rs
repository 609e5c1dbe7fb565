//! Row types for the ladder: parks, outcomes, and the enriched recent view.

use serde::{Deserialize, Serialize};

/// A park on the ladder.
///
/// Display metadata is opaque to the rating engine; only `rating` and the two
/// rank fields are ever mutated, and only by the ranking store.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Park {
    pub id: i64,
    pub name: String,
    pub state: String,
    pub description: String,
    pub image: String,
    /// Annual visitor count.
    pub visitors: i64,
    /// Founding year.
    pub established: i64,
    /// Size in acres.
    pub size: i64,
    pub tag: Option<String>,
    pub rating: i64,
    /// Rank immediately before the most recent recomputation.
    pub previous_rank: i64,
    /// 1-based position by descending rating, ties broken by ascending id.
    pub current_rank: i64,
}

impl Park {
    /// Positions gained since the last recompute. Positive means moved up.
    pub fn rank_delta(&self) -> i64 {
        self.previous_rank - self.current_rank
    }
}

/// Seed-time input: display metadata only.
///
/// The store assigns id, baseline rating, and initial ranks at insert.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewPark {
    pub name: String,
    pub state: String,
    pub description: String,
    pub image: String,
    pub visitors: i64,
    pub established: i64,
    pub size: i64,
    #[serde(default)]
    pub tag: Option<String>,
}

/// An accepted head-to-head outcome. Immutable once created.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub id: i64,
    pub winner_id: i64,
    pub loser_id: i64,
    /// Points credited to the winner for this outcome.
    pub points: i64,
    /// Epoch seconds with `Z` suffix.
    pub created_at: String,
}

/// Outcome joined with both parks' display data at query time.
///
/// Names and images reflect the parks as they are now, not as they were when
/// the outcome was recorded.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RecentOutcome {
    pub outcome_id: i64,
    pub winner_id: i64,
    pub winner_name: String,
    pub winner_image: String,
    pub loser_id: i64,
    pub loser_name: String,
    pub loser_image: String,
    pub points: i64,
    pub created_at: String,
    /// Humanized age, e.g. "3 mins ago".
    pub time_since: String,
}
