//! Asset kinds and amount conventions.
//!
//! Amounts are represented as raw integers (u128) to avoid floating-point errors.
//! Both asset kinds use 18 decimal places, so `UNIT` raw equals one whole unit.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw units in one whole unit of either asset.
pub const UNIT: u128 = 1_000_000_000_000_000_000;

/// Which asset a stake's collateral is denominated in.
///
/// The two kinds are accounted in fully independent cohort pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// The host chain's native value type.
    Native,
    /// The configured fungible token.
    Token,
}

impl AssetKind {
    pub const ALL: [AssetKind; 2] = [AssetKind::Native, AssetKind::Token];

    /// Stable one-byte tag used in storage keys and signed messages.
    pub fn tag(self) -> u8 {
        match self {
            Self::Native => 0,
            Self::Token => 1,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Native),
            1 => Some(Self::Token),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Token => "token",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serde helper for raw amounts in text formats.
///
/// TOML integers are 64-bit and JSON consumers often lose precision above
/// 2^53, so amounts are written as decimal strings. Plain integers are still
/// accepted on input.
pub mod raw_amount {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(amount: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&amount.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        deserializer.deserialize_any(RawAmountVisitor)
    }

    struct RawAmountVisitor;

    impl Visitor<'_> for RawAmountVisitor {
        type Value = u128;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a non-negative integer or decimal string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
            Ok(v as u128)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
            u128::try_from(v).map_err(|_| E::custom(format!("negative amount {v}")))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
            v.parse()
                .map_err(|_| E::custom(format!("invalid amount {v:?}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_stable() {
        for kind in AssetKind::ALL {
            assert_eq!(AssetKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(AssetKind::from_tag(7), None);
    }
}
