//! Byte layouts of LMDB keys.
//!
//! Stake keys are `owner_len (u32 BE) ++ owner ++ seq_tag ++ seq (u64 BE)` so that
//! all stakes of one owner are contiguous and no owner is a byte-prefix of
//! another owner's range. Day keys append the day index (u32 BE) to a stake key.

use pledge_types::{Address, AssetKind, CohortId, StakeKey};

use crate::LmdbError;

const SEQ_NONE: u8 = 0;
const SEQ_SOME: u8 = 1;

/// Prefix shared by every stake key of `owner`.
pub fn owner_prefix(owner: &Address) -> Vec<u8> {
    let bytes = owner.as_bytes();
    let mut out = Vec::with_capacity(4 + bytes.len());
    out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    out.extend_from_slice(bytes);
    out
}

pub fn stake_key(key: &StakeKey) -> Vec<u8> {
    let mut out = owner_prefix(&key.owner);
    match key.sequence {
        Some(seq) => {
            out.push(SEQ_SOME);
            out.extend_from_slice(&seq.to_be_bytes());
        }
        None => {
            out.push(SEQ_NONE);
            out.extend_from_slice(&0u64.to_be_bytes());
        }
    }
    out
}

/// Recover the sequence part of a stake key whose owner prefix is already known.
pub fn decode_stake_key(owner: &Address, raw: &[u8]) -> Result<StakeKey, LmdbError> {
    let prefix_len = 4 + owner.as_bytes().len();
    let tail = raw.get(prefix_len..).ok_or_else(|| malformed("key shorter than prefix"))?;
    if tail.len() != 9 {
        return Err(malformed(format!("expected 9 tail bytes, got {}", tail.len())));
    }
    let mut seq = [0u8; 8];
    seq.copy_from_slice(&tail[1..]);
    match tail[0] {
        SEQ_NONE => Ok(StakeKey::single(owner.clone())),
        SEQ_SOME => Ok(StakeKey::multi(owner.clone(), u64::from_be_bytes(seq))),
        tag => Err(malformed(format!("unknown sequence tag {tag}"))),
    }
}

pub fn day_key(stake: &StakeKey, day: u32) -> Vec<u8> {
    let mut out = stake_key(stake);
    out.extend_from_slice(&day.to_be_bytes());
    out
}

pub fn pool_key(cohort: CohortId, asset: AssetKind) -> [u8; 9] {
    let mut out = [0u8; 9];
    out[..8].copy_from_slice(&cohort.0.to_be_bytes());
    out[8] = asset.tag();
    out
}

/// Smallest byte string greater than every string starting with `prefix`.
/// Returns `false` when no such bound exists (all bytes 0xFF).
pub fn increment_prefix(prefix: &mut Vec<u8>) -> bool {
    while let Some(last) = prefix.pop() {
        if last < u8::MAX {
            prefix.push(last + 1);
            return true;
        }
    }
    false
}

fn malformed(reason: impl Into<String>) -> LmdbError {
    LmdbError::MalformedKey {
        db: "stakes",
        reason: reason.into(),
    }
}
