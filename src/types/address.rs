//! HexMint addresses
//!
//! An address identifies a principal: the collection admin, a claimer,
//! a minter, or the treasury. Addresses are opaque 20-byte values,
//! hex-encoded for display and parsing.

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::fmt;

/// Address length in bytes (20 bytes = 160 bits)
pub const ADDRESS_LENGTH: usize = 20;

/// A principal identity
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    /// The 20-byte address value
    #[serde_as(as = "serde_with::hex::Hex")]
    pub bytes: [u8; ADDRESS_LENGTH],
}

impl Address {
    /// Create a new address from raw bytes
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Zero address (unset / burn)
    pub const fn zero() -> Self {
        Self { bytes: [0u8; ADDRESS_LENGTH] }
    }

    /// Check if this is the zero address
    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse from hex string (with or without a 0x prefix)
    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes_vec = hex::decode(s).map_err(|_| AddressError::InvalidHex)?;
        if bytes_vec.len() != ADDRESS_LENGTH {
            return Err(AddressError::InvalidLength);
        }

        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes.copy_from_slice(&bytes_vec);

        Ok(Self { bytes })
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x{})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl std::str::FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// Address parsing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("Invalid hex encoding")]
    InvalidHex,
    #[error("Invalid address length")]
    InvalidLength,
}
