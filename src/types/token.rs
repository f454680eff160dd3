//! Token and loot identifiers
//!
//! Collection tokens carry dense sequential IDs split into two disjoint
//! ranges: founder-claimed tokens occupy `0..max_supply_claimable`, and
//! publicly minted tokens occupy `max_supply_claimable..max_supply`.
//! Loot IDs identify items in the external eligibility domain.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a token in the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenId(pub u64);

impl TokenId {
    /// Get the raw ID value
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of an item in the external loot domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LootId(pub u64);

impl LootId {
    /// Get the raw ID value
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LootId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loot-{}", self.0)
    }
}

/// A 24-bit color code
///
/// Values wider than 24 bits are truncated on construction; the stored
/// value is always `<= HexCode::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct HexCode(u32);

impl HexCode {
    /// Largest representable color value (24 bits)
    pub const MAX: u32 = 0x00FF_FFFF;

    /// Create a hex code, truncating to 24 bits
    pub const fn new(value: u32) -> Self {
        Self(value & Self::MAX)
    }

    /// Get the raw color value
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Parse from a hex string (with or without a `#` prefix)
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.is_empty() || s.len() > 6 {
            return None;
        }
        u32::from_str_radix(s, 16).ok().map(Self::new)
    }
}

impl fmt::Display for HexCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}
