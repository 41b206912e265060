//! Strongly-typed ordinals and identifiers.
//!
//! Downstream crates should not pass raw integers or strings around; an
//! `Identifier` is only minted by a `Codec`, so its width and characters are
//! known to be valid for that codec.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Zero-indexed position of an identifier in global issuance order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Ord, PartialOrd)]
#[serde(transparent)]
pub struct Ordinal(u64);

impl Ordinal {
    pub const ZERO: Ordinal = Ordinal(0);

    pub const fn new(v: u64) -> Self {
        Self(v)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for Ordinal {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed-width encoding of an [`Ordinal`].
///
/// Identifiers from the same codec compare in the same order as their ordinals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Ord, PartialOrd)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub(crate) fn from_encoded(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Identifier {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
