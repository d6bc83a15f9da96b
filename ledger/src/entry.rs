//! Stake entry: parameter checks and construction of the new record.

use pledge_types::{AssetKind, EconomicParams, PublicKey, Stake, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// What a participant asks for when opening a stake.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenStake {
    /// Collateral escrowed alongside the call, in raw units.
    pub amount: u128,
    pub asset: AssetKind,
    pub daily_limit_minutes: u32,
    pub duration_days: u32,
    pub public_key: PublicKey,
}

/// Check goal, duration and amount against the configured limits.
pub fn validate_entry(params: &EconomicParams, request: &OpenStake) -> Result<(), LedgerError> {
    let goal = request.daily_limit_minutes;
    if goal < params.min_daily_limit_minutes || goal > params.max_daily_limit_minutes {
        return Err(LedgerError::GoalOutOfRange {
            value: goal,
            min: params.min_daily_limit_minutes,
            max: params.max_daily_limit_minutes,
        });
    }

    let duration = request.duration_days;
    if duration < params.min_duration_days || duration > params.max_duration_days {
        return Err(LedgerError::DurationOutOfRange {
            value: duration,
            min: params.min_duration_days,
            max: params.max_duration_days,
        });
    }

    let minimum = params.min_stake(request.asset);
    // a zero amount would read back as an empty slot
    if request.amount == 0 || request.amount < minimum {
        return Err(LedgerError::AmountBelowMinimum {
            asset: request.asset,
            amount: request.amount,
            minimum,
        });
    }
    Ok(())
}

/// The record stored for a validated request opened at `now`.
pub fn new_stake(params: &EconomicParams, request: &OpenStake, now: Timestamp) -> Stake {
    Stake {
        amount: request.amount,
        asset: request.asset,
        daily_limit_minutes: request.daily_limit_minutes,
        start: now,
        duration_days: request.duration_days,
        public_key: request.public_key,
        successful_days: 0,
        settled: false,
        cohort: params.cohort_of(now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pledge_types::{CohortId, UNIT};

    fn request() -> OpenStake {
        OpenStake {
            amount: UNIT,
            asset: AssetKind::Native,
            daily_limit_minutes: 60,
            duration_days: 7,
            public_key: PublicKey([1; 32]),
        }
    }

    #[test]
    fn accepts_default_request() {
        assert!(validate_entry(&EconomicParams::default(), &request()).is_ok());
    }

    #[test]
    fn goal_bounds_are_inclusive() {
        let params = EconomicParams::default();
        let mut r = request();
        r.daily_limit_minutes = params.min_daily_limit_minutes;
        assert!(validate_entry(&params, &r).is_ok());
        r.daily_limit_minutes = params.max_daily_limit_minutes;
        assert!(validate_entry(&params, &r).is_ok());
        r.daily_limit_minutes = params.max_daily_limit_minutes + 1;
        assert!(matches!(
            validate_entry(&params, &r),
            Err(LedgerError::GoalOutOfRange { value: 721, .. })
        ));
        r.daily_limit_minutes = 0;
        assert!(matches!(
            validate_entry(&params, &r),
            Err(LedgerError::GoalOutOfRange { .. })
        ));
    }

    #[test]
    fn duration_out_of_range() {
        let mut r = request();
        r.duration_days = 0;
        assert!(matches!(
            validate_entry(&EconomicParams::default(), &r),
            Err(LedgerError::DurationOutOfRange { .. })
        ));
        r.duration_days = 91;
        assert!(matches!(
            validate_entry(&EconomicParams::default(), &r),
            Err(LedgerError::DurationOutOfRange { value: 91, .. })
        ));
    }

    #[test]
    fn minimum_depends_on_asset() {
        let params = EconomicParams::default();
        let mut r = request();
        r.amount = UNIT / 1000;
        assert!(validate_entry(&params, &r).is_ok());

        r.asset = AssetKind::Token;
        assert!(matches!(
            validate_entry(&params, &r),
            Err(LedgerError::AmountBelowMinimum {
                asset: AssetKind::Token,
                ..
            })
        ));
    }

    #[test]
    fn new_stake_starts_clean() {
        let params = EconomicParams::default();
        let now = Timestamp::new(3 * params.cohort_length_secs + 5);
        let stake = new_stake(&params, &request(), now);
        assert_eq!(stake.start, now);
        assert_eq!(stake.successful_days, 0);
        assert!(!stake.settled);
        assert_eq!(stake.cohort, CohortId(3));
        assert!(stake.is_open());
    }
}
