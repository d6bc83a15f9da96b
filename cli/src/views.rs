//! JSON views printed by the inspection commands.

use pledge_crypto::key_fingerprint;
use pledge_ledger::{claimable_at, current_day, resolvable_at};
use pledge_settlement::DayStatus;
use pledge_types::{EconomicParams, Stake, StakeKey, Timestamp};
use pledge_utils::format_relative;
use serde::Serialize;

/// A stake as an operator wants to read it.
#[derive(Debug, Serialize)]
pub struct StakeView {
    pub key: String,
    /// Raw amount as a decimal string.
    pub amount: String,
    pub asset: String,
    pub cohort: u64,
    pub daily_limit_minutes: u32,
    pub duration_days: u32,
    pub successful_days: u32,
    pub current_day: u32,
    pub start: u64,
    pub claimable_at: u64,
    pub claimable: String,
    pub resolvable_at: u64,
    pub public_key: String,
    pub key_fingerprint: String,
}

impl StakeView {
    pub fn new(params: &EconomicParams, key: &StakeKey, stake: &Stake, now: Timestamp) -> Self {
        let claim = claimable_at(params, stake);
        Self {
            key: key.to_string(),
            amount: stake.amount.to_string(),
            asset: stake.asset.to_string(),
            cohort: stake.cohort.0,
            daily_limit_minutes: stake.daily_limit_minutes,
            duration_days: stake.duration_days,
            successful_days: stake.successful_days,
            current_day: current_day(params, stake, now),
            start: stake.start.as_secs(),
            claimable_at: claim.as_secs(),
            claimable: format_relative(claim.as_secs(), now.as_secs()),
            resolvable_at: resolvable_at(params, stake).as_secs(),
            public_key: hex::encode(stake.public_key.as_bytes()),
            key_fingerprint: key_fingerprint(&stake.public_key).to_string(),
        }
    }
}

/// Day acceptability with its rejection reason spelled out.
#[derive(Debug, Serialize)]
pub struct DayView {
    pub day: u32,
    #[serde(flatten)]
    pub status: DayStatus,
    pub accepting: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DayView {
    pub fn new(day: u32, status: DayStatus) -> Self {
        Self {
            day,
            accepting: status.is_open(),
            reason: status.rejection_reason(),
            status,
        }
    }
}
