//! Day arithmetic within a stake.
//!
//! Day `d` covers `[start + d*L, start + (d+1)*L)`. Its outcome can only be known
//! once the day is over, so the proof window for day `d` opens at the end of the
//! day and stays open for the grace interval. Both window bounds are inclusive.

use pledge_types::{EconomicParams, Stake, Timestamp};

use crate::error::LedgerError;

/// Inclusive time range in which a proof for one day is accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProofWindow {
    pub opens: Timestamp,
    pub closes: Timestamp,
}

impl ProofWindow {
    pub fn contains(&self, now: Timestamp) -> bool {
        now >= self.opens && now <= self.closes
    }

    pub fn is_pending(&self, now: Timestamp) -> bool {
        now < self.opens
    }

    pub fn has_passed(&self, now: Timestamp) -> bool {
        now > self.closes
    }
}

/// Proof window of `day`, or `InvalidDay` when the stake has no such day.
pub fn proof_window(
    params: &EconomicParams,
    stake: &Stake,
    day: u32,
) -> Result<ProofWindow, LedgerError> {
    if day >= stake.duration_days {
        return Err(LedgerError::InvalidDay {
            day,
            duration: stake.duration_days,
        });
    }
    let opens = stake
        .start
        .plus((day as u64 + 1).saturating_mul(params.day_length_secs));
    Ok(ProofWindow {
        opens,
        closes: opens.plus(params.proof_grace_secs),
    })
}

/// Index of the day `now` falls in, saturating at the stake's last day.
pub fn current_day(params: &EconomicParams, stake: &Stake, now: Timestamp) -> u32 {
    let elapsed = stake.start.elapsed_since(now) / params.day_length_secs;
    let last = stake.duration_days.saturating_sub(1) as u64;
    elapsed.min(last) as u32
}

/// Earliest time the owner may claim.
pub fn claimable_at(params: &EconomicParams, stake: &Stake) -> Timestamp {
    stake.end(params.day_length_secs)
}

/// Earliest time anyone may force-settle.
pub fn resolvable_at(params: &EconomicParams, stake: &Stake) -> Timestamp {
    claimable_at(params, stake).plus(params.resolution_buffer_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pledge_types::{AssetKind, CohortId, PublicKey};

    const START: u64 = 1_000_000;
    const DAY: u64 = 86_400;

    fn stake(duration_days: u32) -> Stake {
        Stake {
            amount: 1,
            asset: AssetKind::Native,
            daily_limit_minutes: 30,
            start: Timestamp::new(START),
            duration_days,
            public_key: PublicKey([0; 32]),
            successful_days: 0,
            settled: false,
            cohort: CohortId(0),
        }
    }

    #[test]
    fn window_bounds_inclusive() {
        let params = EconomicParams::default();
        let w = proof_window(&params, &stake(7), 0).unwrap();
        assert_eq!(w.opens, Timestamp::new(START + DAY));
        assert_eq!(w.closes, Timestamp::new(START + DAY + 6 * 3600));

        assert!(w.is_pending(Timestamp::new(START + DAY - 1)));
        assert!(w.contains(w.opens));
        assert!(w.contains(w.closes));
        assert!(w.has_passed(w.closes.plus(1)));
    }

    #[test]
    fn last_day_window_opens_at_end() {
        let params = EconomicParams::default();
        let s = stake(7);
        let w = proof_window(&params, &s, 6).unwrap();
        assert_eq!(w.opens, claimable_at(&params, &s));
    }

    #[test]
    fn day_past_duration_rejected() {
        assert!(matches!(
            proof_window(&EconomicParams::default(), &stake(7), 7),
            Err(LedgerError::InvalidDay {
                day: 7,
                duration: 7
            })
        ));
    }

    #[test]
    fn current_day_saturates() {
        let params = EconomicParams::default();
        let s = stake(3);
        assert_eq!(current_day(&params, &s, Timestamp::new(START)), 0);
        assert_eq!(current_day(&params, &s, Timestamp::new(START + DAY - 1)), 0);
        assert_eq!(current_day(&params, &s, Timestamp::new(START + DAY)), 1);
        assert_eq!(current_day(&params, &s, Timestamp::new(START + 30 * DAY)), 2);
        // clock behind start
        assert_eq!(current_day(&params, &s, Timestamp::new(START - 10)), 0);
    }

    #[test]
    fn resolution_waits_for_buffer() {
        let params = EconomicParams::default();
        let s = stake(7);
        assert_eq!(
            resolvable_at(&params, &s),
            Timestamp::new(START + 7 * DAY + 7 * DAY)
        );
    }
}
