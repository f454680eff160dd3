//! Durable ledger state
//!
//! All registry state survives across calls. [`LedgerState`] is the
//! serializable snapshot of everything durable — counters, flags, the
//! claimed-loot set, token ownership, the hex-code grid, and balances —
//! encoded with bincode for persistence to a state file.

use crate::registry::{AttributeTable, Bank, ClaimRegistry, Flags, SupplyLedger};
use crate::types::{Address, TokenId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Storage operation result
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Snapshot of all durable registry state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerState {
    /// Issuance gate flags
    pub flags: Flags,
    /// Counters and caps
    pub supply: SupplyLedger,
    /// Claimed-loot bookkeeping
    pub claims: ClaimRegistry,
    /// Hex-code grid
    pub attributes: AttributeTable,
    /// Payment balances
    pub bank: Bank,
    /// Token ownership map
    pub owners: HashMap<TokenId, Address>,
}

impl LedgerState {
    /// Encode to bytes
    pub fn encode(&self) -> StorageResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Decode from bytes
    pub fn decode(data: &[u8]) -> StorageResult<Self> {
        bincode::deserialize(data).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Write the snapshot to a file
    pub fn save(&self, path: &Path) -> StorageResult<()> {
        let data = self.encode()?;
        std::fs::write(path, data).map_err(|e| StorageError::Io(e.to_string()))
    }

    /// Read a snapshot from a file
    pub fn load(path: &Path) -> StorageResult<Self> {
        let data = std::fs::read(path).map_err(|e| StorageError::Io(e.to_string()))?;
        Self::decode(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HexCode;

    fn sample_state() -> LedgerState {
        let mut bank = Bank::new();
        let addr = Address::new([7u8; 20]);
        bank.credit(&addr, crate::types::Coin::from_whole(3));

        let mut supply = SupplyLedger::new(10, 2);
        supply.allocate_founder().unwrap();

        let mut attributes = AttributeTable::new();
        attributes.replace(vec![vec![HexCode::new(0x1F0D39)]]);

        let mut owners = HashMap::new();
        owners.insert(TokenId(0), addr);

        LedgerState {
            flags: Flags::default(),
            supply,
            claims: ClaimRegistry::new(),
            attributes,
            bank,
            owners,
        }
    }

    #[test]
    fn test_save_load_file() {
        let state = sample_state();
        let path = std::env::temp_dir().join(format!("hexmint-state-{}.bin", std::process::id()));

        state.save(&path).unwrap();
        let loaded = LedgerState::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, state);
        assert_eq!(loaded.supply.next_founder_token_id(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("hexmint-state-does-not-exist.bin");
        assert!(matches!(LedgerState::load(&path), Err(StorageError::Io(_))));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            LedgerState::decode(&[0xFF; 3]),
            Err(StorageError::Serialization(_))
        ));
    }
}
