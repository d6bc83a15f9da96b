//! Account address type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An account address as handed to the engine by the host.
///
/// The engine never derives addresses itself; it only compares, stores and
/// hashes them. Any non-empty string without whitespace is accepted.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Create a new address from a raw string.
    ///
    /// # Panics
    /// Panics if the string is empty or contains whitespace.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(Self::is_well_formed(&s), "malformed address: {s:?}");
        Self(s)
    }

    /// Fallible constructor for untrusted input (config files, CLI flags).
    pub fn parse(raw: &str) -> Option<Self> {
        Self::is_well_formed(raw).then(|| Self(raw.to_string()))
    }

    fn is_well_formed(s: &str) -> bool {
        !s.is_empty() && !s.chars().any(char::is_whitespace)
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
