//! Ranking-store contract and construction.
//!
//! Two store types sit behind one trait: a volatile map-backed store for
//! tests and embedding, and a SQLite-backed store for everything durable.
//! The variant is chosen once at construction; call sites only ever see
//! `dyn RankingStore`.

use crate::core::error::ParkrankError;
use crate::core::memory::MemoryStore;
use crate::core::model::{NewPark, Outcome, Park, RecentOutcome};
use crate::core::sqlite::SqliteStore;
use rand::Rng;
use std::path::PathBuf;

/// Store variant discriminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    /// Volatile in-process store. State dies with the handle.
    Memory,
    /// SQLite store rooted at a data directory.
    Sqlite(PathBuf),
}

/// The ranking store: all park ratings and ranks, plus the append-only
/// outcome history.
///
/// `record_outcome` is the only path that writes rating or rank fields after
/// seeding, and it behaves as one logical transaction: on any internal
/// failure, no partial state is observable.
pub trait RankingStore: Send + Sync {
    /// Bulk-insert precondition: populate an empty store. Parks get ids in
    /// import order, the baseline rating, and `previous_rank == current_rank
    /// == position`. Fails with `ValidationError` if parks already exist.
    fn seed_parks(&self, parks: &[NewPark]) -> Result<usize, ParkrankError>;

    /// Every park, descending rating, ties broken by ascending id, rank
    /// fields populated from the last recomputation.
    fn get_all_ranked(&self) -> Result<Vec<Park>, ParkrankError>;

    fn get_park(&self, id: i64) -> Result<Park, ParkrankError>;

    /// Two distinct parks chosen independently at random. Distinctness is
    /// structural, not retried-until-different.
    fn get_random_pair(&self) -> Result<(Park, Park), ParkrankError>;

    /// Apply a decided matchup: read both ratings at one consistent point,
    /// compute the ELO update, write both new ratings, append the outcome
    /// record, recompute ranks. Returns the persisted record.
    fn record_outcome(&self, winner_id: i64, loser_id: i64) -> Result<Outcome, ParkrankError>;

    /// Reassign `current_rank` 1..N by descending rating (id ascending on
    /// ties), copying the prior `current_rank` into `previous_rank` first.
    /// Idempotent: with no intervening rating change, a second call leaves
    /// `current_rank` unchanged and `previous_rank == current_rank`.
    fn recompute_ranks(&self) -> Result<(), ParkrankError>;

    /// Newest outcomes first, joined with both parks' current display data.
    fn get_recent_outcomes(&self, limit: usize) -> Result<Vec<RecentOutcome>, ParkrankError>;

    fn get_outcome_count(&self) -> Result<u64, ParkrankError>;
}

/// Build a store handle for the given variant.
pub fn open_store(kind: &StoreKind, k_factor: f64) -> Result<Box<dyn RankingStore>, ParkrankError> {
    match kind {
        StoreKind::Memory => Ok(Box::new(MemoryStore::new(k_factor))),
        StoreKind::Sqlite(root) => Ok(Box::new(SqliteStore::open(root, k_factor)?)),
    }
}

/// Pick two distinct indices in `0..len` uniformly at random.
///
/// The second draw comes from the remaining `len - 1` slots and is shifted
/// past the first, so the pair is distinct by construction. Caller guarantees
/// `len >= 2`.
pub(crate) fn pick_distinct_indices(len: usize) -> (usize, usize) {
    let mut rng = rand::rng();
    let first = rng.random_range(0..len);
    let mut second = rng.random_range(0..len - 1);
    if second >= first {
        second += 1;
    }
    (first, second)
}
