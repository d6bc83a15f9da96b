use pledge_ledger::{LedgerError, OpenStake, StakeLedger};
use pledge_nullables::NullStore;
use pledge_store::{ProofStore, SequenceStore, StagedStore, StakeStore};
use pledge_types::{
    Address, AssetKind, EconomicParams, PublicKey, StakeKey, StakeMode, Timestamp, UNIT,
};

fn request() -> OpenStake {
    OpenStake {
        amount: UNIT,
        asset: AssetKind::Native,
        daily_limit_minutes: 90,
        duration_days: 3,
        public_key: PublicKey([4; 32]),
    }
}

fn alice() -> Address {
    Address::new("alice")
}

fn open(ledger: &StakeLedger, store: &NullStore) -> Result<StakeKey, LedgerError> {
    let mut staged = StagedStore::new(store);
    let (key, _) = ledger.open(&mut staged, &alice(), &request(), Timestamp::new(10))?;
    staged.commit()?;
    Ok(key)
}

#[test]
fn single_mode_allows_one_open_stake() {
    let store = NullStore::new();
    let ledger = StakeLedger::new(StakeMode::Single, EconomicParams::default());

    let key = open(&ledger, &store).unwrap();
    assert_eq!(key, StakeKey::single(alice()));
    assert!(matches!(
        open(&ledger, &store),
        Err(LedgerError::AlreadyStaked(k)) if k == key
    ));
}

#[test]
fn multi_mode_assigns_increasing_sequences() {
    let store = NullStore::new();
    let ledger = StakeLedger::new(StakeMode::Multi, EconomicParams::default());

    let first = open(&ledger, &store).unwrap();
    let second = open(&ledger, &store).unwrap();
    assert_eq!(first, StakeKey::multi(alice(), 0));
    assert_eq!(second, StakeKey::multi(alice(), 1));
    assert_eq!(store.next_sequence(&alice()).unwrap(), 2);
    assert_eq!(
        ledger.open_stakes(&store, &alice()).unwrap(),
        vec![first, second]
    );
}

#[test]
fn sequences_are_never_reused() {
    let store = NullStore::new();
    let ledger = StakeLedger::new(StakeMode::Multi, EconomicParams::default());
    let first = open(&ledger, &store).unwrap();

    let stake = ledger.load_open(&store, &first).unwrap();
    let mut staged = StagedStore::new(&store);
    ledger.clear(&mut staged, &first, &stake);
    staged.commit().unwrap();

    assert_eq!(open(&ledger, &store).unwrap(), StakeKey::multi(alice(), 1));
}

#[test]
fn rejected_entry_writes_nothing() {
    let store = NullStore::new();
    let ledger = StakeLedger::new(StakeMode::Multi, EconomicParams::default());
    let mut bad = request();
    bad.duration_days = 0;

    let mut staged = StagedStore::new(&store);
    let err = ledger
        .open(&mut staged, &alice(), &bad, Timestamp::new(10))
        .unwrap_err();
    assert!(matches!(err, LedgerError::DurationOutOfRange { .. }));
    assert!(staged.pending().is_empty());
}

#[test]
fn proofs_count_only_achieved_days() {
    let store = NullStore::new();
    let ledger = StakeLedger::new(StakeMode::Single, EconomicParams::default());
    let key = open(&ledger, &store).unwrap();

    let mut staged = StagedStore::new(&store);
    let stake = ledger.load_open(&staged, &key).unwrap();
    let stake = ledger
        .record_proof(&mut staged, &key, stake, 0, true)
        .unwrap();
    let stake = ledger
        .record_proof(&mut staged, &key, stake, 1, false)
        .unwrap();
    staged.commit().unwrap();

    assert_eq!(stake.successful_days, 1);
    assert!(store.is_day_verified(&key, 0).unwrap());
    assert!(store.is_day_verified(&key, 1).unwrap());
    assert!(!store.is_day_verified(&key, 2).unwrap());
    assert_eq!(store.get_stake(&key).unwrap().unwrap().successful_days, 1);
}

#[test]
fn clear_removes_stake_and_day_flags() {
    let store = NullStore::new();
    let ledger = StakeLedger::new(StakeMode::Single, EconomicParams::default());
    let key = open(&ledger, &store).unwrap();

    let mut staged = StagedStore::new(&store);
    let stake = ledger.load_open(&staged, &key).unwrap();
    let stake = ledger
        .record_proof(&mut staged, &key, stake, 2, true)
        .unwrap();
    ledger.clear(&mut staged, &key, &stake);
    staged.commit().unwrap();

    assert_eq!(store.stake_count(), 0);
    assert_eq!(store.verified_day_count(), 0);
    assert!(matches!(
        ledger.load_open(&store, &key),
        Err(LedgerError::NotFound(_))
    ));
    // the slot is free again
    assert!(open(&ledger, &store).is_ok());
}

#[test]
fn settled_record_is_reported() {
    let store = NullStore::new();
    let ledger = StakeLedger::new(StakeMode::Single, EconomicParams::default());
    let key = open(&ledger, &store).unwrap();
    let mut stake = store.get_stake(&key).unwrap().unwrap();
    stake.settled = true;
    store.insert_stake(key.clone(), stake);

    assert!(matches!(
        ledger.load_open(&store, &key),
        Err(LedgerError::AlreadySettled(_))
    ));
    // a settled record does not block a new stake
    assert!(open(&ledger, &store).is_ok());
}

#[test]
fn zero_amount_record_counts_as_absent() {
    let store = NullStore::new();
    let ledger = StakeLedger::new(StakeMode::Single, EconomicParams::default());
    let key = open(&ledger, &store).unwrap();
    let mut stake = store.get_stake(&key).unwrap().unwrap();
    stake.amount = 0;
    store.insert_stake(key.clone(), stake);

    assert!(matches!(
        ledger.load_open(&store, &key),
        Err(LedgerError::NotFound(_))
    ));
    assert!(ledger.open_stakes(&store, &alice()).unwrap().is_empty());
}
