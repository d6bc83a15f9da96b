//! Settlement orchestrator.
//!
//! Every mutating call follows the same shape: load and validate against the
//! committed state, stage all writes in a [`StagedStore`], request the owed
//! transfers as one all-or-nothing batch, and only then commit the writes. Any error before the commit
//! drops the staged writes, so a rejected call leaves no trace in the store.
//!
//! Calls are serialized through one lock; the engine assumes the host's own
//! ordering of calls and adds nothing to it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pledge_cohort::{CohortEngine, Outcome, SweepShares};
use pledge_crypto::{attestation_digest, AttestationVerifier};
use pledge_ledger::{claimable_at, current_day, resolvable_at, OpenStake, StakeLedger};
use pledge_store::{CohortStore, PledgeStore, ProofStore, StagedStore};
use pledge_types::{
    Address, AssetKind, CohortId, CohortPool, Deployment, EconomicParams, Signature, Stake,
    StakeKey, StakeMode, Timestamp,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{PledgeConfig, SettlementConfig};
use crate::events::{EventBus, PledgeEvent};
use crate::key_registry;
use crate::proof_window::DayStatus;
use crate::transfer::{add_payout, AssetTransfer, Payout, TransferError};
use crate::SettlementError;

/// What one settlement paid out and to whom.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SettlementReceipt {
    pub stake: StakeKey,
    pub asset: AssetKind,
    pub cohort: CohortId,
    pub outcome: Outcome,
    pub returned: u128,
    pub forfeited: u128,
    pub bonus: u128,
    /// Receiver of `returned + bonus`; the treasury when a resolution diverted it.
    pub recipient: Address,
    pub diverted: bool,
    /// Set when this settlement finalized its pool.
    pub sweep: Option<SweepShares>,
}

impl SettlementReceipt {
    pub fn payout(&self) -> u128 {
        self.returned + self.bonus
    }
}

/// Both asset records of one cohort.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PoolSnapshot {
    pub cohort: CohortId,
    pub native: CohortPool,
    pub token: CohortPool,
}

impl PoolSnapshot {
    pub fn get(&self, asset: AssetKind) -> CohortPool {
        match asset {
            AssetKind::Native => self.native,
            AssetKind::Token => self.token,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SettlePath {
    /// Owner-initiated; a failed payout aborts the call.
    Claim,
    /// Third-party; a failed payout goes to the treasury instead.
    Resolve,
}

/// The settlement engine over a storage backend.
pub struct PledgeEngine<S: PledgeStore + ?Sized> {
    store: Arc<S>,
    ledger: StakeLedger,
    deployment: Deployment,
    config: Arc<dyn SettlementConfig>,
    verifier: Arc<dyn AttestationVerifier>,
    transfers: Arc<dyn AssetTransfer>,
    events: EventBus,
    serial: Mutex<()>,
}

impl<S: PledgeStore + ?Sized> PledgeEngine<S> {
    pub fn new(
        store: Arc<S>,
        config: PledgeConfig,
        verifier: Arc<dyn AttestationVerifier>,
        transfers: Arc<dyn AssetTransfer>,
    ) -> Result<Self, SettlementError> {
        config.validate()?;
        Ok(Self {
            store,
            ledger: StakeLedger::new(config.mode, config.economics.clone()),
            deployment: config.deployment(),
            config: Arc::new(config),
            verifier,
            transfers,
            events: EventBus::new(),
            serial: Mutex::new(()),
        })
    }

    /// Read payout percentages and addresses from a live collaborator instead
    /// of the static configuration.
    pub fn with_settlement_config(mut self, config: Arc<dyn SettlementConfig>) -> Self {
        self.config = config;
        self
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&PledgeEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    pub fn mode(&self) -> StakeMode {
        self.ledger.mode()
    }

    pub fn params(&self) -> &EconomicParams {
        self.ledger.params()
    }

    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Mutating operations ────────────────────────────────────────────

    /// Open a stake for `caller`. The collateral is already escrowed by the host.
    pub fn open_stake(
        &self,
        caller: &Address,
        request: &OpenStake,
        now: Timestamp,
    ) -> Result<StakeKey, SettlementError> {
        let _serial = self.lock_serial();
        let mut staged = StagedStore::new(&*self.store);

        let (key, stake) = self.ledger.open(&mut staged, caller, request, now)?;
        key_registry::register(&mut staged, &*self.verifier, &stake.public_key, caller)?;

        let pool = staged.get_pool(stake.cohort, stake.asset)?;
        let pool = self.cohort_engine()?.enter(pool)?;
        staged.put_pool(stake.cohort, stake.asset, pool);
        staged.commit()?;

        info!(
            stake = %key,
            asset = %stake.asset,
            cohort = %stake.cohort,
            amount = stake.amount,
            duration_days = stake.duration_days,
            "stake opened"
        );
        self.events.emit(&PledgeEvent::StakeOpened {
            stake: key.clone(),
            asset: stake.asset,
            cohort: stake.cohort,
            amount: stake.amount,
            duration_days: stake.duration_days,
        });
        Ok(key)
    }

    /// Accept the owner's signed outcome for one day.
    pub fn submit_proof(
        &self,
        caller: &Address,
        sequence: Option<u64>,
        day: u32,
        achieved: bool,
        signature: &Signature,
        now: Timestamp,
    ) -> Result<(), SettlementError> {
        let _serial = self.lock_serial();
        let key = self.ledger.key(caller, sequence)?;
        let stake = self.ledger.load_open(&*self.store, &key)?;

        let verified = self.store.is_day_verified(&key, day)?;
        DayStatus::of(self.params(), &stake, day, verified, now).check(&key, day)?;

        let message = attestation_digest(&self.deployment, &key, day, achieved);
        if !self.verifier.verify(&message, signature, &stake.public_key) {
            return Err(SettlementError::InvalidSignature);
        }

        let mut staged = StagedStore::new(&*self.store);
        self.ledger
            .record_proof(&mut staged, &key, stake, day, achieved)?;
        staged.commit()?;

        debug!(stake = %key, day, achieved, "proof accepted");
        self.events.emit(&PledgeEvent::ProofAccepted {
            stake: key,
            day,
            achieved,
        });
        Ok(())
    }

    /// Owner settles their own stake once it has ended.
    pub fn claim(
        &self,
        caller: &Address,
        sequence: Option<u64>,
        now: Timestamp,
    ) -> Result<SettlementReceipt, SettlementError> {
        let _serial = self.lock_serial();
        let key = self.ledger.key(caller, sequence)?;
        let stake = self.ledger.load_open(&*self.store, &key)?;
        let allowed_at = claimable_at(self.params(), &stake);
        if now < allowed_at {
            return Err(SettlementError::TooEarly { allowed_at });
        }
        self.settle(key, stake, SettlePath::Claim)
    }

    /// Anyone settles `owner`'s stake once the resolution buffer has passed.
    pub fn resolve_expired(
        &self,
        owner: &Address,
        sequence: Option<u64>,
        now: Timestamp,
    ) -> Result<SettlementReceipt, SettlementError> {
        let _serial = self.lock_serial();
        let key = self.ledger.key(owner, sequence)?;
        let stake = self.ledger.load_open(&*self.store, &key)?;
        let allowed_at = resolvable_at(self.params(), &stake);
        if now < allowed_at {
            return Err(SettlementError::TooEarly { allowed_at });
        }
        self.settle(key, stake, SettlePath::Resolve)
    }

    fn settle(
        &self,
        key: StakeKey,
        stake: Stake,
        path: SettlePath,
    ) -> Result<SettlementReceipt, SettlementError> {
        let outcome = Outcome::from_days(stake.successful_days, stake.duration_days);
        let treasury = self.config.treasury();
        let charity = self.config.charity();

        let mut staged = StagedStore::new(&*self.store);
        self.ledger.clear(&mut staged, &key, &stake);
        if self.mode() == StakeMode::Single {
            key_registry::release(&mut staged, &stake.public_key);
        }

        let pool = staged.get_pool(stake.cohort, stake.asset)?;
        let settled = self.cohort_engine()?.settle(pool, outcome, stake.amount)?;
        staged.put_pool(stake.cohort, stake.asset, settled.pool);

        let (returned, forfeited) = match outcome {
            Outcome::Win => (stake.amount, 0),
            Outcome::Loss => (0, stake.amount),
        };
        let payout = returned
            .checked_add(settled.bonus)
            .ok_or(SettlementError::Overflow)?;

        let payouts = |owner_leg: &Address| -> Result<Vec<Payout>, SettlementError> {
            let mut payouts = Vec::new();
            add_payout(&mut payouts, owner_leg, payout)?;
            if let Some(loss) = settled.loss {
                add_payout(&mut payouts, &treasury, loss.treasury)?;
                add_payout(&mut payouts, &charity, loss.charity)?;
            }
            if let Some(sweep) = settled.sweep {
                add_payout(&mut payouts, &treasury, sweep.treasury)?;
                add_payout(&mut payouts, &charity, sweep.charity)?;
            }
            Ok(payouts)
        };

        let mut recipient = key.owner.clone();
        if let Err(err) = self.pay(stake.asset, &payouts(&key.owner)?) {
            let owner_refused = payout > 0 && err == TransferError::Rejected(key.owner.clone());
            match path {
                SettlePath::Resolve if owner_refused => {
                    warn!(stake = %key, %err, amount = payout, "owner cannot receive, diverting to treasury");
                    self.pay(stake.asset, &payouts(&treasury)?)?;
                    recipient = treasury.clone();
                }
                _ => return Err(err.into()),
            }
        }

        staged.commit()?;

        let receipt = SettlementReceipt {
            diverted: recipient != key.owner,
            stake: key,
            asset: stake.asset,
            cohort: stake.cohort,
            outcome,
            returned,
            forfeited,
            bonus: settled.bonus,
            recipient,
            sweep: settled.sweep,
        };
        info!(
            stake = %receipt.stake,
            asset = %receipt.asset,
            cohort = %receipt.cohort,
            outcome = ?receipt.outcome,
            returned,
            forfeited,
            bonus = receipt.bonus,
            "stake settled"
        );
        self.events.emit(&PledgeEvent::Settled {
            stake: receipt.stake.clone(),
            asset: receipt.asset,
            cohort: receipt.cohort,
            outcome,
            returned,
            forfeited,
            bonus: receipt.bonus,
            recipient: receipt.recipient.clone(),
        });
        if let Some(sweep) = receipt.sweep {
            info!(
                cohort = %receipt.cohort,
                asset = %receipt.asset,
                treasury = sweep.treasury,
                charity = sweep.charity,
                "pool finalized"
            );
            self.events.emit(&PledgeEvent::PoolFinalized {
                cohort: receipt.cohort,
                asset: receipt.asset,
                treasury: sweep.treasury,
                charity: sweep.charity,
            });
        }
        Ok(receipt)
    }

    // ── Read accessors ─────────────────────────────────────────────────

    /// Snapshot of the open stake at `(owner, sequence)`.
    pub fn stake(
        &self,
        owner: &Address,
        sequence: Option<u64>,
    ) -> Result<Option<Stake>, SettlementError> {
        let Ok(key) = self.ledger.key(owner, sequence) else {
            return Ok(None);
        };
        Ok(self.store.get_stake(&key)?.filter(Stake::is_open))
    }

    /// Keys of `owner`'s open stakes.
    pub fn stakes_of(&self, owner: &Address) -> Result<Vec<StakeKey>, SettlementError> {
        Ok(self.ledger.open_stakes(&*self.store, owner)?)
    }

    /// Whether a proof for `day` would be accepted at `now`.
    pub fn day_status(
        &self,
        owner: &Address,
        sequence: Option<u64>,
        day: u32,
        now: Timestamp,
    ) -> Result<DayStatus, SettlementError> {
        let Ok(key) = self.ledger.key(owner, sequence) else {
            return Ok(DayStatus::NoStake);
        };
        let Some(stake) = self.store.get_stake(&key)?.filter(Stake::is_open) else {
            return Ok(DayStatus::NoStake);
        };
        let verified = self.store.is_day_verified(&key, day)?;
        Ok(DayStatus::of(self.params(), &stake, day, verified, now))
    }

    /// Day index `now` falls in, or `None` without an open stake.
    pub fn current_day(
        &self,
        owner: &Address,
        sequence: Option<u64>,
        now: Timestamp,
    ) -> Result<Option<u32>, SettlementError> {
        Ok(self
            .stake(owner, sequence)?
            .map(|stake| current_day(self.params(), &stake, now)))
    }

    pub fn pool_snapshot(&self, cohort: CohortId) -> Result<PoolSnapshot, SettlementError> {
        Ok(PoolSnapshot {
            cohort,
            native: self.store.get_pool(cohort, AssetKind::Native)?,
            token: self.store.get_pool(cohort, AssetKind::Token)?,
        })
    }

    pub fn cohort_of(&self, timestamp: Timestamp) -> CohortId {
        self.params().cohort_of(timestamp)
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn lock_serial(&self) -> MutexGuard<'_, ()> {
        self.serial.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Distribution is read per call so a live collaborator's changes apply
    /// to the next settlement.
    fn cohort_engine(&self) -> Result<CohortEngine, SettlementError> {
        Ok(CohortEngine::new(
            self.config.distribution(),
            self.params().sweep,
        )?)
    }

    /// All legs of one settlement move together or not at all.
    fn pay(&self, asset: AssetKind, payouts: &[Payout]) -> Result<(), TransferError> {
        if payouts.is_empty() {
            return Ok(());
        }
        self.transfers.transfer_all(asset, payouts)
    }
}
