//! HexMint: fixed-supply token collection ledger
//!
//! HexMint tracks ownership of a fixed-supply collection of unique tokens
//! with two issuance paths:
//! - Founder claims: free, gated by ownership of an external loot item
//! - Public minting: priced, gated by an admin flag and exact payment
//!
//! ## Core Guarantees
//! - A token ID is issued at most once, ever
//! - A loot item backs at most one founder claim
//! - Total issuance never exceeds the supply cap
//! - Mint payments are forwarded to the treasury atomically with issuance
//! - Every failed call leaves the ledger exactly as it was
//!
//! ## Modules
//! - `types` - Core data structures (addresses, coin amounts, identifiers)
//! - `registry` - The issuance ledger and its components
//! - `storage` - Durable state snapshots

pub mod types;
pub mod registry;
pub mod storage;

pub use types::*;
pub use registry::{RegistryError, RegistryEvent, RegistryResult, SharedLedger, TokenLedger};

/// Collection configuration, fixed at construction time
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LedgerConfig {
    /// Collection name
    pub name: String,
    /// Collection symbol
    pub symbol: String,
    /// Base metadata URI (opaque, joined with token IDs for display)
    pub base_uri: String,
    /// Treasury address receiving all mint payments
    pub treasury: Address,
    /// Exact payment required per public mint
    pub price: Coin,
    /// Upper bound on total tokens ever issued
    pub max_supply: u64,
    /// Portion of the supply reserved for founder claims
    pub max_supply_claimable: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            name: "HexMint".into(),
            symbol: "HEXM".into(),
            base_uri: String::new(),
            treasury: Address::zero(),
            price: Coin::from_units(80_000_000), // 0.08
            max_supply: 8_000,
            max_supply_claimable: 1_000,
        }
    }
}

impl LedgerConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::InvalidName("name required".into()));
        }
        if self.name.len() > 64 {
            return Err(ConfigError::InvalidName("name too long".into()));
        }
        if self.symbol.is_empty() {
            return Err(ConfigError::InvalidSymbol("symbol required".into()));
        }
        if self.symbol.len() > 10 {
            return Err(ConfigError::InvalidSymbol("symbol too long".into()));
        }
        if self.max_supply == 0 {
            return Err(ConfigError::ZeroSupply);
        }
        if self.max_supply_claimable > self.max_supply {
            return Err(ConfigError::ClaimableExceedsSupply {
                claimable: self.max_supply_claimable,
                max: self.max_supply,
            });
        }
        if self.treasury.is_zero() {
            return Err(ConfigError::ZeroTreasury);
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid collection name: {0}")]
    InvalidName(String),
    #[error("Invalid collection symbol: {0}")]
    InvalidSymbol(String),
    #[error("Max supply must be nonzero")]
    ZeroSupply,
    #[error("Claimable supply {claimable} exceeds max supply {max}")]
    ClaimableExceedsSupply { claimable: u64, max: u64 },
    #[error("Treasury address must not be zero")]
    ZeroTreasury,
}
