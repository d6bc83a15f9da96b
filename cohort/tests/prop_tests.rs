use proptest::prelude::*;

use pledge_cohort::{CohortEngine, Outcome};
use pledge_types::{CohortPool, Distribution, SweepSplit};

fn distribution() -> impl Strategy<Value = Distribution> {
    (0u8..=100)
        .prop_flat_map(|w| (Just(w), 0u8..=(100 - w)))
        .prop_map(|(w, t)| Distribution::new(w, t, 100 - w - t).unwrap())
}

fn stakers() -> impl Strategy<Value = Vec<(u128, bool)>> {
    prop::collection::vec((1u128..1_000_000_000_000, any::<bool>()), 1..24).prop_shuffle()
}

proptest! {
    /// Refunds, bonuses, direct loss shares and sweeps account for every unit staked,
    /// whatever order the stakers settle in.
    #[test]
    fn settlement_conserves_value(
        dist in distribution(),
        sweep_pct in 0u8..=100,
        stakers in stakers(),
    ) {
        let engine = CohortEngine::new(dist, SweepSplit { treasury_percent: sweep_pct }).unwrap();
        let mut pool = CohortPool::default();
        for _ in &stakers {
            pool = engine.enter(pool).unwrap();
        }

        let staked: u128 = stakers.iter().map(|(a, _)| a).sum();
        let mut paid_out = 0u128;
        let mut finalizations = 0;

        for (amount, won) in &stakers {
            let outcome = if *won { Outcome::Win } else { Outcome::Loss };
            let s = engine.settle(pool, outcome, *amount).unwrap();
            if *won {
                paid_out += amount + s.bonus;
                prop_assert!(s.loss.is_none());
            } else {
                prop_assert_eq!(s.bonus, 0);
                let loss = s.loss.unwrap();
                prop_assert_eq!(loss.total(), *amount);
                paid_out += loss.treasury + loss.charity;
            }
            if let Some(sweep) = s.sweep {
                paid_out += sweep.total();
                finalizations += 1;
            }
            pool = s.pool;
        }

        prop_assert_eq!(paid_out, staked);
        prop_assert_eq!(finalizations, 1);
        prop_assert!(pool.is_empty());
    }

    /// remaining_winners never exceeds total_active, and both hit zero only at the end.
    #[test]
    fn winners_bounded_by_active(stakers in stakers()) {
        let engine = CohortEngine::new(Distribution::default(), SweepSplit::default()).unwrap();
        let mut pool = CohortPool::default();
        for _ in &stakers {
            pool = engine.enter(pool).unwrap();
            prop_assert!(pool.remaining_winners <= pool.total_active);
        }
        for (i, (amount, won)) in stakers.iter().enumerate() {
            let outcome = if *won { Outcome::Win } else { Outcome::Loss };
            pool = engine.settle(pool, outcome, *amount).unwrap().pool;
            prop_assert!(pool.remaining_winners <= pool.total_active);
            let all_settled = i + 1 == stakers.len();
            prop_assert_eq!(pool.total_active == 0, all_settled);
        }
    }

    /// A loser always returns exactly zero to its owner; the binary rule has no middle ground.
    #[test]
    fn outcome_is_binary(duration in 1u32..365, successes in 0u32..365) {
        let successes = successes.min(duration);
        let outcome = Outcome::from_days(successes, duration);
        prop_assert_eq!(outcome == Outcome::Win, successes == duration);
    }
}
