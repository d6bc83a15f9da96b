//! Per-(cohort, asset) pool bookkeeping.

use pledge_types::{CohortPool, Distribution, ParamsError, SweepSplit};
use serde::{Deserialize, Serialize};

use crate::distribution::{split_loss, split_sweep, LossSplit, SweepShares};
use crate::error::CohortError;
use crate::outcome::Outcome;

/// Result of settling one stake against its pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortSettlement {
    /// The pool record to store after this settlement.
    pub pool: CohortPool,
    /// Bonus drawn from the pool for a winner (always zero for a loss).
    pub bonus: u128,
    /// How a loser's collateral was split (`None` for a win).
    pub loss: Option<LossSplit>,
    /// Set when this settlement closed the pool and a sweep was due.
    pub sweep: Option<SweepShares>,
}

impl CohortSettlement {
    /// Whether this settlement brought `total_active` to zero.
    pub fn finalized(&self) -> bool {
        self.sweep.is_some()
    }
}

/// Applies entry and settlement rules to pool records.
#[derive(Clone, Copy, Debug)]
pub struct CohortEngine {
    distribution: Distribution,
    sweep: SweepSplit,
}

impl CohortEngine {
    pub fn new(distribution: Distribution, sweep: SweepSplit) -> Result<Self, CohortError> {
        distribution.validate()?;
        if sweep.treasury_percent > 100 {
            return Err(ParamsError::SweepShare(sweep.treasury_percent).into());
        }
        Ok(Self {
            distribution,
            sweep,
        })
    }

    /// Count a new staker. Every staker starts as a potential winner.
    pub fn enter(&self, pool: CohortPool) -> Result<CohortPool, CohortError> {
        check_invariant(&pool)?;
        Ok(CohortPool {
            pool: pool.pool,
            remaining_winners: pool
                .remaining_winners
                .checked_add(1)
                .ok_or(CohortError::Overflow)?,
            total_active: pool
                .total_active
                .checked_add(1)
                .ok_or(CohortError::Overflow)?,
        })
    }

    /// Settle one stake of `amount` collateral with the given outcome.
    pub fn settle(
        &self,
        pool: CohortPool,
        outcome: Outcome,
        amount: u128,
    ) -> Result<CohortSettlement, CohortError> {
        check_invariant(&pool)?;
        if pool.total_active == 0 {
            return Err(CohortError::NoActiveStakers);
        }

        let mut next = pool;
        let mut bonus = 0;
        let mut loss = None;

        match outcome {
            Outcome::Loss => {
                let split = split_loss(amount, &self.distribution);
                next.pool = next
                    .pool
                    .checked_add(split.winner_pool)
                    .ok_or(CohortError::Overflow)?;
                // a confirmed loser can never claim, so future bonuses split fewer ways
                next.remaining_winners = next.remaining_winners.saturating_sub(1);
                loss = Some(split);
            }
            Outcome::Win => {
                if next.remaining_winners > 0 {
                    bonus = next.pool / next.remaining_winners as u128;
                    next.pool -= bonus;
                    next.remaining_winners -= 1;
                }
            }
        }

        next.total_active -= 1;

        let sweep = if next.total_active == 0 {
            let shares = split_sweep(next.pool, &self.sweep);
            next = CohortPool::default();
            Some(shares)
        } else {
            None
        };

        Ok(CohortSettlement {
            pool: next,
            bonus,
            loss,
            sweep,
        })
    }
}

fn check_invariant(pool: &CohortPool) -> Result<(), CohortError> {
    if pool.remaining_winners > pool.total_active {
        return Err(CohortError::WinnersExceedActive {
            remaining_winners: pool.remaining_winners,
            total_active: pool.total_active,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pledge_types::UNIT;

    fn engine() -> CohortEngine {
        CohortEngine::new(Distribution::default(), SweepSplit::default()).unwrap()
    }

    fn entered(n: u64) -> CohortPool {
        let e = engine();
        (0..n).fold(CohortPool::default(), |p, _| e.enter(p).unwrap())
    }

    #[test]
    fn entry_counts_optimistically() {
        let pool = entered(3);
        assert_eq!(pool.total_active, 3);
        assert_eq!(pool.remaining_winners, 3);
        assert_eq!(pool.pool, 0);
    }

    #[test]
    fn lone_loser_is_swept() {
        let s = engine().settle(entered(1), Outcome::Loss, UNIT).unwrap();
        let loss = s.loss.unwrap();
        assert_eq!(loss.treasury, 4 * UNIT / 10);
        assert_eq!(loss.charity, 2 * UNIT / 10);
        let sweep = s.sweep.unwrap();
        assert_eq!(loss.treasury + sweep.treasury, 668 * UNIT / 1000);
        assert_eq!(loss.charity + sweep.charity, 332 * UNIT / 1000);
        assert!(s.pool.is_empty());
        assert_eq!(s.bonus, 0);
    }

    #[test]
    fn winner_after_loser_takes_whole_pool() {
        let e = engine();
        let after_loss = e.settle(entered(2), Outcome::Loss, UNIT).unwrap();
        assert_eq!(after_loss.pool.pool, 4 * UNIT / 10);
        assert_eq!(after_loss.pool.remaining_winners, 1);
        assert_eq!(after_loss.pool.total_active, 1);
        assert!(!after_loss.finalized());

        let win = e.settle(after_loss.pool, Outcome::Win, UNIT).unwrap();
        assert_eq!(win.bonus, 4 * UNIT / 10);
        assert_eq!(win.sweep, Some(SweepShares::default()));
    }

    #[test]
    fn two_winners_split_one_losers_share() {
        let e = engine();
        let s = e.settle(entered(3), Outcome::Loss, UNIT).unwrap();
        assert_eq!(s.pool.remaining_winners, 2);

        let w1 = e.settle(s.pool, Outcome::Win, UNIT).unwrap();
        assert_eq!(w1.bonus, 2 * UNIT / 10);
        let w2 = e.settle(w1.pool, Outcome::Win, UNIT).unwrap();
        assert_eq!(w2.bonus, 2 * UNIT / 10);
        assert!(w2.finalized());
    }

    #[test]
    fn early_winner_gets_nothing_from_empty_pool() {
        let e = engine();
        let w = e.settle(entered(2), Outcome::Win, UNIT).unwrap();
        assert_eq!(w.bonus, 0);
        assert_eq!(w.pool.remaining_winners, 1);

        // the loser settles last; nobody is left to claim its share
        let l = e.settle(w.pool, Outcome::Loss, UNIT).unwrap();
        assert_eq!(l.sweep.unwrap().total(), 4 * UNIT / 10);
    }

    #[test]
    fn rounding_dust_stays_until_sweep() {
        let e = engine();
        // loser of 10 raw puts 4 in the pool; three winners remain
        let s = e.settle(entered(4), Outcome::Loss, 10).unwrap();
        let w1 = e.settle(s.pool, Outcome::Win, 10).unwrap();
        assert_eq!(w1.bonus, 1);
        let w2 = e.settle(w1.pool, Outcome::Win, 10).unwrap();
        assert_eq!(w2.bonus, 1);
        let w3 = e.settle(w2.pool, Outcome::Win, 10).unwrap();
        assert_eq!(w3.bonus, 2);
        assert_eq!(w3.sweep.unwrap().total(), 0);
    }

    #[test]
    fn settling_empty_pool_is_an_error() {
        assert_eq!(
            engine().settle(CohortPool::default(), Outcome::Win, 1),
            Err(CohortError::NoActiveStakers)
        );
    }

    #[test]
    fn corrupted_pool_rejected() {
        let bad = CohortPool {
            pool: 0,
            remaining_winners: 2,
            total_active: 1,
        };
        assert!(matches!(
            engine().settle(bad, Outcome::Loss, 1),
            Err(CohortError::WinnersExceedActive { .. })
        ));
    }

    #[test]
    fn invalid_distribution_rejected() {
        let bad = Distribution {
            winner_percent: 60,
            treasury_percent: 60,
            charity_percent: 0,
        };
        assert!(matches!(
            CohortEngine::new(bad, SweepSplit::default()),
            Err(CohortError::Params(ParamsError::DistributionSum(120)))
        ));
    }
}
