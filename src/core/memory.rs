//! Volatile ranking store backed by an in-process map.
//!
//! All state lives behind one mutex; mutations stage their writes and commit
//! only after every step has succeeded, so a failure mid-operation leaves
//! nothing behind.

use crate::core::elo;
use crate::core::error::ParkrankError;
use crate::core::model::{NewPark, Outcome, Park, RecentOutcome};
use crate::core::store::{RankingStore, pick_distinct_indices};
use crate::core::time;
use rustc_hash::FxHashMap;
use std::sync::Mutex;

struct MemInner {
    parks: FxHashMap<i64, Park>,
    outcomes: Vec<Outcome>,
    next_outcome_id: i64,
}

pub struct MemoryStore {
    inner: Mutex<MemInner>,
    k_factor: f64,
}

impl MemoryStore {
    pub fn new(k_factor: f64) -> Self {
        Self {
            inner: Mutex::new(MemInner {
                parks: FxHashMap::default(),
                outcomes: Vec::new(),
                next_outcome_id: 1,
            }),
            k_factor,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemInner>, ParkrankError> {
        self.inner
            .lock()
            .map_err(|_| ParkrankError::ValidationError("ranking store lock poisoned".to_string()))
    }

    /// `record_outcome` with an injectable failure point between the two
    /// staged rating writes. The trait method passes a no-op hook; tests
    /// inject failures to prove nothing partial ever lands.
    pub(crate) fn record_outcome_hooked(
        &self,
        winner_id: i64,
        loser_id: i64,
        hook: &mut dyn FnMut() -> Result<(), ParkrankError>,
    ) -> Result<Outcome, ParkrankError> {
        if winner_id == loser_id {
            return Err(ParkrankError::InvalidOutcome(format!(
                "park {} cannot beat itself",
                winner_id
            )));
        }

        let mut inner = self.lock()?;
        let winner = inner
            .parks
            .get(&winner_id)
            .cloned()
            .ok_or_else(|| ParkrankError::NotFound(format!("park {}", winner_id)))?;
        let loser = inner
            .parks
            .get(&loser_id)
            .cloned()
            .ok_or_else(|| ParkrankError::NotFound(format!("park {}", loser_id)))?;

        let update = elo::compute_update(winner.rating, loser.rating, self.k_factor);

        // Stage both writes; the map is untouched until every step succeeds.
        let mut staged_winner = winner;
        staged_winner.rating = update.winner_new_rating;
        hook()?;
        let mut staged_loser = loser;
        staged_loser.rating = update.loser_new_rating;

        let outcome = Outcome {
            id: inner.next_outcome_id,
            winner_id,
            loser_id,
            points: update.points_exchanged,
            created_at: time::now_epoch_z(),
        };

        inner.next_outcome_id += 1;
        inner.parks.insert(winner_id, staged_winner);
        inner.parks.insert(loser_id, staged_loser);
        inner.outcomes.push(outcome.clone());
        rerank(&mut inner.parks);

        Ok(outcome)
    }
}

/// Reassign rank fields in place: descending rating, ascending id on ties.
fn rerank(parks: &mut FxHashMap<i64, Park>) {
    let mut order: Vec<(i64, i64)> = parks.values().map(|p| (p.rating, p.id)).collect();
    order.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    for (pos, (_, id)) in order.iter().enumerate() {
        if let Some(park) = parks.get_mut(id) {
            park.previous_rank = park.current_rank;
            park.current_rank = (pos + 1) as i64;
        }
    }
}

impl RankingStore for MemoryStore {
    fn seed_parks(&self, parks: &[NewPark]) -> Result<usize, ParkrankError> {
        let mut inner = self.lock()?;
        if !inner.parks.is_empty() {
            return Err(ParkrankError::ValidationError(
                "store already seeded; refusing to re-import parks".to_string(),
            ));
        }

        for (idx, park) in parks.iter().enumerate() {
            let id = (idx + 1) as i64;
            let rank = (idx + 1) as i64;
            inner.parks.insert(
                id,
                Park {
                    id,
                    name: park.name.clone(),
                    state: park.state.clone(),
                    description: park.description.clone(),
                    image: park.image.clone(),
                    visitors: park.visitors,
                    established: park.established,
                    size: park.size,
                    tag: park.tag.clone(),
                    rating: elo::BASELINE_RATING,
                    previous_rank: rank,
                    current_rank: rank,
                },
            );
        }
        Ok(parks.len())
    }

    fn get_all_ranked(&self) -> Result<Vec<Park>, ParkrankError> {
        let inner = self.lock()?;
        let mut parks: Vec<Park> = inner.parks.values().cloned().collect();
        parks.sort_by(|a, b| b.rating.cmp(&a.rating).then(a.id.cmp(&b.id)));
        Ok(parks)
    }

    fn get_park(&self, id: i64) -> Result<Park, ParkrankError> {
        let inner = self.lock()?;
        inner
            .parks
            .get(&id)
            .cloned()
            .ok_or_else(|| ParkrankError::NotFound(format!("park {}", id)))
    }

    fn get_random_pair(&self) -> Result<(Park, Park), ParkrankError> {
        let inner = self.lock()?;
        let parks: Vec<Park> = inner.parks.values().cloned().collect();
        if parks.len() < 2 {
            return Err(ParkrankError::InsufficientParks(format!(
                "need at least 2 parks for a matchup, have {}",
                parks.len()
            )));
        }
        let (first, second) = pick_distinct_indices(parks.len());
        Ok((parks[first].clone(), parks[second].clone()))
    }

    fn record_outcome(&self, winner_id: i64, loser_id: i64) -> Result<Outcome, ParkrankError> {
        self.record_outcome_hooked(winner_id, loser_id, &mut || Ok(()))
    }

    fn recompute_ranks(&self) -> Result<(), ParkrankError> {
        let mut inner = self.lock()?;
        rerank(&mut inner.parks);
        Ok(())
    }

    fn get_recent_outcomes(&self, limit: usize) -> Result<Vec<RecentOutcome>, ParkrankError> {
        let inner = self.lock()?;
        let now = time::now_epoch_secs();

        // outcomes is insertion-ordered, which is the creation total order.
        let mut views = Vec::new();
        for outcome in inner.outcomes.iter().rev().take(limit) {
            let winner = inner
                .parks
                .get(&outcome.winner_id)
                .ok_or_else(|| ParkrankError::NotFound(format!("park {}", outcome.winner_id)))?;
            let loser = inner
                .parks
                .get(&outcome.loser_id)
                .ok_or_else(|| ParkrankError::NotFound(format!("park {}", outcome.loser_id)))?;
            views.push(RecentOutcome {
                outcome_id: outcome.id,
                winner_id: winner.id,
                winner_name: winner.name.clone(),
                winner_image: winner.image.clone(),
                loser_id: loser.id,
                loser_name: loser.name.clone(),
                loser_image: loser.image.clone(),
                points: outcome.points,
                created_at: outcome.created_at.clone(),
                time_since: time::time_since(&outcome.created_at, now),
            });
        }
        Ok(views)
    }

    fn get_outcome_count(&self) -> Result<u64, ParkrankError> {
        let inner = self.lock()?;
        Ok(inner.outcomes.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::elo::DEFAULT_K_FACTOR;

    fn two_parks() -> Vec<NewPark> {
        vec![
            NewPark {
                name: "Zion".to_string(),
                state: "Utah".to_string(),
                description: "Deep red canyon walls.".to_string(),
                image: "zion.jpg".to_string(),
                visitors: 4_257_704,
                established: 1919,
                size: 147_237,
                tag: None,
            },
            NewPark {
                name: "Acadia".to_string(),
                state: "Maine".to_string(),
                description: "Rocky headlands on the Atlantic coast.".to_string(),
                image: "acadia.jpg".to_string(),
                visitors: 3_537_575,
                established: 1919,
                size: 49_075,
                tag: None,
            },
        ]
    }

    #[test]
    fn injected_failure_between_writes_leaves_no_partial_state() {
        let store = MemoryStore::new(DEFAULT_K_FACTOR);
        store.seed_parks(&two_parks()).expect("seed");

        let result = store.record_outcome_hooked(1, 2, &mut || {
            Err(ParkrankError::ValidationError("injected".to_string()))
        });
        assert!(result.is_err());

        assert_eq!(store.get_park(1).expect("winner").rating, 1500);
        assert_eq!(store.get_park(2).expect("loser").rating, 1500);
        assert_eq!(store.get_outcome_count().expect("count"), 0);

        // The store is not wedged: the same outcome succeeds afterwards.
        let outcome = store.record_outcome(1, 2).expect("record");
        assert_eq!(outcome.id, 1);
        assert_eq!(outcome.points, 16);
    }

    #[test]
    fn seed_rejects_non_empty_store() {
        let store = MemoryStore::new(DEFAULT_K_FACTOR);
        store.seed_parks(&two_parks()).expect("seed");
        assert!(matches!(
            store.seed_parks(&two_parks()),
            Err(ParkrankError::ValidationError(_))
        ));
    }
}
