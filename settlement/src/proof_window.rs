//! Per-day proof acceptance.
//!
//! ```text
//! Unopened ──(start + (d+1)·day)──▶ Open ──(+ grace)──▶ Expired
//!                                     │
//!                                     └──(valid proof)──▶ Verified
//! ```

use pledge_ledger::{proof_window, LedgerError};
use pledge_types::{EconomicParams, Stake, StakeKey, Timestamp};
use serde::Serialize;

use crate::SettlementError;

/// Whether a proof for one (stake, day) would be accepted right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DayStatus {
    /// No open stake at the requested key.
    NoStake,
    /// The stake has fewer days than the index asked for.
    OutOfRange { duration_days: u32 },
    /// A proof for this day was already accepted.
    Verified,
    Unopened { opens: Timestamp },
    Open { closes: Timestamp },
    Expired { closed: Timestamp },
}

impl DayStatus {
    /// Classify `day` of an open stake at `now`.
    pub fn of(
        params: &EconomicParams,
        stake: &Stake,
        day: u32,
        verified: bool,
        now: Timestamp,
    ) -> Self {
        let window = match proof_window(params, stake, day) {
            Ok(window) => window,
            Err(_) => {
                return Self::OutOfRange {
                    duration_days: stake.duration_days,
                }
            }
        };
        if verified {
            Self::Verified
        } else if window.is_pending(now) {
            Self::Unopened {
                opens: window.opens,
            }
        } else if window.has_passed(now) {
            Self::Expired {
                closed: window.closes,
            }
        } else {
            Self::Open {
                closes: window.closes,
            }
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    /// Why a submission would be refused, or `None` when it would be accepted.
    pub fn rejection_reason(&self) -> Option<String> {
        match self {
            Self::NoStake => Some("no open stake".to_string()),
            Self::OutOfRange { duration_days } => Some(format!(
                "day index beyond stake duration of {duration_days} days"
            )),
            Self::Verified => Some("day already verified".to_string()),
            Self::Unopened { opens } => Some(format!("window not open until {opens}")),
            Self::Expired { closed } => Some(format!("window closed at {closed}")),
            Self::Open { .. } => None,
        }
    }

    /// The error a submission for `day` of `stake` fails with in this state.
    pub(crate) fn check(&self, stake: &StakeKey, day: u32) -> Result<(), SettlementError> {
        match *self {
            Self::Open { .. } => Ok(()),
            Self::NoStake => Err(LedgerError::NotFound(stake.clone()).into()),
            Self::OutOfRange { duration_days } => Err(LedgerError::InvalidDay {
                day,
                duration: duration_days,
            }
            .into()),
            Self::Verified => Err(SettlementError::AlreadyVerified { day }),
            Self::Unopened { .. } | Self::Expired { .. } => {
                Err(SettlementError::WindowClosed { day })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pledge_types::{Address, AssetKind, CohortId, PublicKey};

    const START: u64 = 500_000;
    const DAY: u64 = 86_400;
    const GRACE: u64 = 6 * 3600;

    fn stake() -> Stake {
        Stake {
            amount: 1,
            asset: AssetKind::Native,
            daily_limit_minutes: 30,
            start: Timestamp::new(START),
            duration_days: 7,
            public_key: PublicKey([0; 32]),
            successful_days: 0,
            settled: false,
            cohort: CohortId(0),
        }
    }

    fn key() -> StakeKey {
        StakeKey::single(Address::new("alice"))
    }

    fn status(day: u32, verified: bool, now: u64) -> DayStatus {
        DayStatus::of(
            &EconomicParams::default(),
            &stake(),
            day,
            verified,
            Timestamp::new(now),
        )
    }

    #[test]
    fn lifecycle_of_day_two() {
        let opens = START + 3 * DAY;
        assert!(matches!(status(2, false, opens - 1), DayStatus::Unopened { .. }));
        assert!(status(2, false, opens).is_open());
        assert!(status(2, false, opens + GRACE).is_open());
        assert!(matches!(
            status(2, false, opens + GRACE + 1),
            DayStatus::Expired { .. }
        ));
    }

    #[test]
    fn verified_wins_over_window() {
        assert_eq!(status(0, true, START + DAY), DayStatus::Verified);
        assert_eq!(status(0, true, START + 40 * DAY), DayStatus::Verified);
    }

    #[test]
    fn out_of_range_checked_first() {
        assert_eq!(
            status(7, true, START + 8 * DAY),
            DayStatus::OutOfRange { duration_days: 7 }
        );
    }

    #[test]
    fn rejection_maps_to_errors() {
        assert!(status(0, false, START + DAY).check(&key(), 0).is_ok());
        assert!(matches!(
            status(0, false, START).check(&key(), 0),
            Err(SettlementError::WindowClosed { day: 0 })
        ));
        assert!(matches!(
            status(0, true, START + DAY).check(&key(), 0),
            Err(SettlementError::AlreadyVerified { day: 0 })
        ));
        assert!(matches!(
            status(9, false, START).check(&key(), 9),
            Err(SettlementError::Ledger(LedgerError::InvalidDay { day: 9, .. }))
        ));
    }

    #[test]
    fn missing_stake_is_rejected() {
        assert!(matches!(
            DayStatus::NoStake.check(&key(), 0),
            Err(SettlementError::Ledger(LedgerError::NotFound(k))) if k == key()
        ));
    }

    #[test]
    fn reasons_are_human_readable() {
        assert_eq!(status(0, false, START + DAY).rejection_reason(), None);
        assert_eq!(
            DayStatus::NoStake.rejection_reason().as_deref(),
            Some("no open stake")
        );
        let reason = status(0, false, START + DAY + GRACE + 1)
            .rejection_reason()
            .unwrap();
        assert!(reason.starts_with("window closed at"));
    }
}
