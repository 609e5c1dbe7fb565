//! Pure ELO updates for head-to-head outcomes.
//!
//! No IO, no state. Two current ratings in, two new ratings out — the store
//! layers persistence and rank maintenance on top of this.

/// Rating every park starts with at seed time.
pub const BASELINE_RATING: i64 = 1500;

/// Default K-factor. Bounds the maximum single-outcome rating swing.
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// Result of one rating update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EloUpdate {
    pub winner_new_rating: i64,
    pub loser_new_rating: i64,
    /// Points credited to the winner; the magnitude reported back to callers.
    pub points_exchanged: i64,
}

/// Compute new ratings for a decided matchup.
///
/// Standard logistic update: expected score `1 / (1 + 10^(diff/400))`, each
/// delta scaled by `k_factor` and rounded independently with
/// round-half-away-from-zero (`f64::round`). Because the two complementary
/// probabilities round independently, `winner` gain and `loser` loss can
/// differ in magnitude by 1; that asymmetry is part of the contract and is
/// left uncorrected.
///
/// Total over its numeric domain: no error conditions, no panics. The caller
/// guarantees winner != loser.
pub fn compute_update(winner_rating: i64, loser_rating: i64, k_factor: f64) -> EloUpdate {
    let expected_winner = expected_score(winner_rating, loser_rating);
    let expected_loser = expected_score(loser_rating, winner_rating);

    let winner_delta = (k_factor * (1.0 - expected_winner)).round() as i64;
    let loser_delta = (k_factor * (0.0 - expected_loser)).round() as i64;

    EloUpdate {
        winner_new_rating: winner_rating + winner_delta,
        loser_new_rating: loser_rating + loser_delta,
        points_exchanged: winner_delta,
    }
}

/// Probability that `rating` beats `opponent` under the logistic model.
fn expected_score(rating: i64, opponent: i64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) as f64 / 400.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_ratings_split_sixteen() {
        let up = compute_update(1500, 1500, DEFAULT_K_FACTOR);
        assert_eq!(up.winner_new_rating, 1516);
        assert_eq!(up.loser_new_rating, 1484);
        assert_eq!(up.points_exchanged, 16);
    }

    #[test]
    fn favorite_gains_less_than_underdog() {
        let favorite_wins = compute_update(1600, 1400, DEFAULT_K_FACTOR);
        let upset = compute_update(1400, 1600, DEFAULT_K_FACTOR);
        assert_eq!(favorite_wins.points_exchanged, 8);
        assert_eq!(upset.points_exchanged, 24);
        assert!(upset.points_exchanged > favorite_wins.points_exchanged);
    }

    #[test]
    fn deterministic_for_repeated_calls() {
        for (w, l, k) in [(1500, 1500, 32.0), (1873, 1212, 32.0), (900, 2100, 16.0)] {
            assert_eq!(compute_update(w, l, k), compute_update(w, l, k));
        }
    }

    #[test]
    fn zero_sum_within_rounding_over_grid() {
        for w in (800..=2200).step_by(37) {
            for l in (800..=2200).step_by(41) {
                let up = compute_update(w, l, DEFAULT_K_FACTOR);
                let winner_delta = up.winner_new_rating - w;
                let loser_delta = up.loser_new_rating - l;
                assert!(
                    (winner_delta + loser_delta).abs() <= 1,
                    "rounding drift >1 for ({}, {})",
                    w,
                    l
                );
            }
        }
    }

    #[test]
    fn k_factor_bounds_the_swing() {
        let up = compute_update(800, 2200, 32.0);
        assert!(up.points_exchanged <= 32);
        let small_k = compute_update(800, 2200, 8.0);
        assert!(small_k.points_exchanged <= 8);
    }

    #[test]
    fn expected_scores_are_complementary() {
        let a = expected_score(1650, 1350);
        let b = expected_score(1350, 1650);
        assert!((a + b - 1.0).abs() < 1e-12);
    }
}
