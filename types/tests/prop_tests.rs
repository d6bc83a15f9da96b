use proptest::prelude::*;

use pledge_types::{
    Address, AssetKind, CohortId, Distribution, EconomicParams, PublicKey, Signature, Stake,
    Timestamp,
};

proptest! {
    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// Timestamp has_expired agrees with manual arithmetic.
    #[test]
    fn timestamp_has_expired_correct(
        start in 0u64..500_000,
        duration in 1u64..500_000,
        offset in 0u64..1_000_000,
    ) {
        let t = Timestamp::new(start);
        let now = Timestamp::new(start + offset);
        prop_assert_eq!(t.has_expired(duration, now), offset >= duration);
    }

    /// Distribution validation accepts exactly the triples summing to 100.
    #[test]
    fn distribution_sum_rule(w in 0u8..=100, t in 0u8..=100, c in 0u8..=100) {
        let ok = Distribution::new(w, t, c).is_ok();
        prop_assert_eq!(ok, w as u32 + t as u32 + c as u32 == 100);
    }

    /// Every timestamp inside a bucket maps to the same cohort.
    #[test]
    fn cohort_is_floor_of_week(secs in 0u64..10_000_000_000) {
        let params = EconomicParams::default();
        let cohort = params.cohort_of(Timestamp::new(secs));
        let week = params.cohort_length_secs;
        prop_assert_eq!(cohort, CohortId(secs / week));
        prop_assert_eq!(params.cohort_of(Timestamp::new(cohort.0 * week)), cohort);
    }

    /// Stake end never wraps around.
    #[test]
    fn stake_end_saturates(start in 0u64..u64::MAX, days in 0u32..u32::MAX) {
        let stake = Stake {
            amount: 1,
            asset: AssetKind::Token,
            daily_limit_minutes: 1,
            start: Timestamp::new(start),
            duration_days: days,
            public_key: PublicKey([1; 32]),
            successful_days: 0,
            settled: false,
            cohort: CohortId(0),
        };
        prop_assert!(stake.end(86_400) >= stake.start);
    }

    /// Signature bincode serialization roundtrip.
    #[test]
    fn signature_bincode_roundtrip(bytes in prop::collection::vec(any::<u8>(), 64)) {
        let mut raw = [0u8; 64];
        raw.copy_from_slice(&bytes);
        let sig = Signature(raw);
        let encoded = bincode::serialize(&sig).unwrap();
        let decoded: Signature = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, sig);
    }
}

#[test]
fn address_parse_matches_new() {
    assert_eq!(Address::parse("treasury"), Some(Address::new("treasury")));
}
