//! SQLite-backed ranking store.
//!
//! Writes serialize through a per-store mutex and run inside a transaction on
//! a fresh connection; a failure at any step rolls the whole operation back.
//! Reads open fresh connections with no mutex and rely on WAL snapshots.
//! Every mutating operation appends a ledger event to `ladder.events.jsonl`
//! beside the database.

use crate::core::db;
use crate::core::elo;
use crate::core::error::ParkrankError;
use crate::core::model::{NewPark, Outcome, Park, RecentOutcome};
use crate::core::store::{RankingStore, pick_distinct_indices};
use crate::core::time;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One line of the mutation ledger.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LedgerEvent {
    pub ts: String,
    pub event_id: String,
    pub op: String,
    pub status: String,
}

pub struct SqliteStore {
    db_path: PathBuf,
    events_path: PathBuf,
    write_lock: Mutex<()>,
    k_factor: f64,
}

impl SqliteStore {
    /// Open (and if needed create) the ladder database under `root`.
    pub fn open(root: &Path, k_factor: f64) -> Result<Self, ParkrankError> {
        db::initialize_ladder_db(root)?;
        Ok(Self {
            db_path: db::ladder_db_path(root),
            events_path: db::ladder_events_path(root),
            write_lock: Mutex::new(()),
            k_factor,
        })
    }

    /// Execute a closure with a write connection. Writes are serialized
    /// through the store's mutex; the outcome is appended to the ledger.
    fn with_write<F, R>(&self, op: &str, f: F) -> Result<R, ParkrankError>
    where
        F: FnOnce(&mut Connection) -> Result<R, ParkrankError>,
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| ParkrankError::ValidationError("store write lock poisoned".to_string()))?;

        let mut conn = db::db_connect(&self.db_path.to_string_lossy())?;
        let result = f(&mut conn);

        let status = if result.is_ok() { "success" } else { "error" };
        self.log_event(op, status)?;
        result
    }

    /// Execute a closure with a fresh read connection (no mutex; WAL allows
    /// concurrent readers against a consistent snapshot).
    fn with_read<F, R>(&self, f: F) -> Result<R, ParkrankError>
    where
        F: FnOnce(&Connection) -> Result<R, ParkrankError>,
    {
        let conn = db::db_connect(&self.db_path.to_string_lossy())?;
        f(&conn)
    }

    fn log_event(&self, op: &str, status: &str) -> Result<(), ParkrankError> {
        use std::fs::OpenOptions;
        use std::io::Write;

        let ev = LedgerEvent {
            ts: time::now_epoch_z(),
            event_id: time::new_event_id(),
            op: op.to_string(),
            status: status.to_string(),
        };

        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.events_path)
            .map_err(ParkrankError::IoError)?;
        let line = serde_json::to_string(&ev)
            .map_err(|e| ParkrankError::ValidationError(format!("ledger encode: {}", e)))?;
        writeln!(f, "{}", line).map_err(ParkrankError::IoError)?;
        Ok(())
    }

    /// `record_outcome` with an injectable failure point between the winner
    /// and loser rating writes, inside the transaction. The trait method
    /// passes a no-op hook; tests inject failures to prove rollback.
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

        let k_factor = self.k_factor;
        self.with_write("outcome.record", |conn| {
            let tx = conn.transaction()?;

            let winner = get_park_tx(&tx, winner_id)?;
            let loser = get_park_tx(&tx, loser_id)?;
            let update = elo::compute_update(winner.rating, loser.rating, k_factor);

            tx.execute(
                "UPDATE parks SET rating = ?1 WHERE id = ?2",
                params![update.winner_new_rating, winner_id],
            )?;
            hook()?;
            tx.execute(
                "UPDATE parks SET rating = ?1 WHERE id = ?2",
                params![update.loser_new_rating, loser_id],
            )?;

            let created_at = time::now_epoch_z();
            tx.execute(
                "INSERT INTO outcomes(winner_id, loser_id, points, created_at) VALUES(?1, ?2, ?3, ?4)",
                params![winner_id, loser_id, update.points_exchanged, created_at],
            )?;
            let outcome_id = tx.last_insert_rowid();

            recompute_ranks_tx(&tx)?;
            tx.commit()?;

            Ok(Outcome {
                id: outcome_id,
                winner_id,
                loser_id,
                points: update.points_exchanged,
                created_at,
            })
        })
    }
}

fn park_from_row(row: &Row) -> rusqlite::Result<Park> {
    Ok(Park {
        id: row.get(0)?,
        name: row.get(1)?,
        state: row.get(2)?,
        description: row.get(3)?,
        image: row.get(4)?,
        visitors: row.get(5)?,
        established: row.get(6)?,
        size: row.get(7)?,
        tag: row.get(8)?,
        rating: row.get(9)?,
        previous_rank: row.get(10)?,
        current_rank: row.get(11)?,
    })
}

const PARK_COLUMNS: &str =
    "id, name, state, description, image, visitors, established, size, tag, rating, previous_rank, current_rank";

fn get_park_tx(conn: &Connection, id: i64) -> Result<Park, ParkrankError> {
    let sql = format!("SELECT {} FROM parks WHERE id = ?1", PARK_COLUMNS);
    conn.query_row(&sql, params![id], park_from_row)
        .optional()?
        .ok_or_else(|| ParkrankError::NotFound(format!("park {}", id)))
}

/// Rewrite every park's rank fields: descending rating, ascending id on
/// ties. The prior `current_rank` is preserved as `previous_rank`.
fn recompute_ranks_tx(conn: &Connection) -> Result<(), ParkrankError> {
    let mut stmt = conn.prepare("SELECT id FROM parks ORDER BY rating DESC, id ASC")?;
    let ids: Vec<i64> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<_>>()?;

    let mut update =
        conn.prepare("UPDATE parks SET previous_rank = current_rank, current_rank = ?1 WHERE id = ?2")?;
    for (pos, id) in ids.iter().enumerate() {
        update.execute(params![(pos + 1) as i64, id])?;
    }
    Ok(())
}

impl RankingStore for SqliteStore {
    fn seed_parks(&self, parks: &[NewPark]) -> Result<usize, ParkrankError> {
        self.with_write("parks.seed", |conn| {
            let tx = conn.transaction()?;

            let existing: i64 = tx.query_row("SELECT COUNT(*) FROM parks", [], |row| row.get(0))?;
            if existing > 0 {
                return Err(ParkrankError::ValidationError(
                    "store already seeded; refusing to re-import parks".to_string(),
                ));
            }

            {
                let mut insert = tx.prepare(
                    "INSERT INTO parks(name, state, description, image, visitors, established, size, tag, rating, previous_rank, current_rank)
                     VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                )?;
                for (idx, park) in parks.iter().enumerate() {
                    let rank = (idx + 1) as i64;
                    insert.execute(params![
                        park.name,
                        park.state,
                        park.description,
                        park.image,
                        park.visitors,
                        park.established,
                        park.size,
                        park.tag,
                        elo::BASELINE_RATING,
                        rank,
                        rank
                    ])?;
                }
            }

            tx.commit()?;
            Ok(parks.len())
        })
    }

    fn get_all_ranked(&self) -> Result<Vec<Park>, ParkrankError> {
        self.with_read(|conn| {
            let sql = format!(
                "SELECT {} FROM parks ORDER BY rating DESC, id ASC",
                PARK_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let parks = stmt
                .query_map([], park_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(parks)
        })
    }

    fn get_park(&self, id: i64) -> Result<Park, ParkrankError> {
        self.with_read(|conn| get_park_tx(conn, id))
    }

    fn get_random_pair(&self) -> Result<(Park, Park), ParkrankError> {
        let parks = self.get_all_ranked()?;
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
        self.with_write("ranks.recompute", |conn| {
            let tx = conn.transaction()?;
            recompute_ranks_tx(&tx)?;
            tx.commit()?;
            Ok(())
        })
    }

    fn get_recent_outcomes(&self, limit: usize) -> Result<Vec<RecentOutcome>, ParkrankError> {
        self.with_read(|conn| {
            let now = time::now_epoch_secs();
            let mut stmt = conn.prepare(
                "SELECT o.id, o.winner_id, w.name, w.image, o.loser_id, l.name, l.image, o.points, o.created_at
                 FROM outcomes o
                 JOIN parks w ON w.id = o.winner_id
                 JOIN parks l ON l.id = o.loser_id
                 ORDER BY o.created_at DESC, o.id DESC
                 LIMIT ?1",
            )?;
            let views = stmt
                .query_map(params![limit as i64], |row| {
                    let created_at: String = row.get(8)?;
                    Ok(RecentOutcome {
                        outcome_id: row.get(0)?,
                        winner_id: row.get(1)?,
                        winner_name: row.get(2)?,
                        winner_image: row.get(3)?,
                        loser_id: row.get(4)?,
                        loser_name: row.get(5)?,
                        loser_image: row.get(6)?,
                        points: row.get(7)?,
                        time_since: time::time_since(&created_at, now),
                        created_at,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(views)
        })
    }

    fn get_outcome_count(&self) -> Result<u64, ParkrankError> {
        self.with_read(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM outcomes", [], |row| row.get(0))?;
            Ok(count as u64)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::elo::DEFAULT_K_FACTOR;
    use std::fs;
    use tempfile::tempdir;

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
    fn injected_failure_rolls_back_the_transaction() {
        let tmp = tempdir().expect("tempdir");
        let store = SqliteStore::open(tmp.path(), DEFAULT_K_FACTOR).expect("open");
        store.seed_parks(&two_parks()).expect("seed");

        let result = store.record_outcome_hooked(1, 2, &mut || {
            Err(ParkrankError::ValidationError("injected".to_string()))
        });
        assert!(result.is_err());

        // Winner's rating was written inside the transaction before the
        // failure; the rollback must erase it along with everything else.
        assert_eq!(store.get_park(1).expect("winner").rating, 1500);
        assert_eq!(store.get_park(2).expect("loser").rating, 1500);
        assert_eq!(store.get_outcome_count().expect("count"), 0);

        let outcome = store.record_outcome(1, 2).expect("record");
        assert_eq!(outcome.points, 16);
        assert_eq!(store.get_park(1).expect("winner").rating, 1516);
    }

    #[test]
    fn ledger_records_success_and_error_events() {
        let tmp = tempdir().expect("tempdir");
        let store = SqliteStore::open(tmp.path(), DEFAULT_K_FACTOR).expect("open");
        store.seed_parks(&two_parks()).expect("seed");
        store.record_outcome(1, 2).expect("record");
        let _ = store.record_outcome(1, 1);
        let _ = store.record_outcome(1, 99);

        let events: Vec<LedgerEvent> = fs::read_to_string(tmp.path().join("ladder.events.jsonl"))
            .expect("read ledger")
            .lines()
            .map(|line| serde_json::from_str(line).expect("valid ledger event"))
            .collect();
        assert!(events.iter().any(|ev| ev.op == "parks.seed" && ev.status == "success"));
        assert!(events.iter().any(|ev| ev.op == "outcome.record" && ev.status == "success"));
        assert!(events.iter().any(|ev| ev.op == "outcome.record" && ev.status == "error"));
        assert!(events.iter().all(|ev| ulid::Ulid::from_string(&ev.event_id).is_ok()));
    }

    #[test]
    fn self_vote_is_rejected_before_touching_the_db() {
        let tmp = tempdir().expect("tempdir");
        let store = SqliteStore::open(tmp.path(), DEFAULT_K_FACTOR).expect("open");
        store.seed_parks(&two_parks()).expect("seed");
        assert!(matches!(
            store.record_outcome(2, 2),
            Err(ParkrankError::InvalidOutcome(_))
        ));
        assert_eq!(store.get_outcome_count().expect("count"), 0);
    }
}
