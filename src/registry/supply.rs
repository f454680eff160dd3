//! Supply accounting
//!
//! Tracks the two monotonic issuance cursors and the collection caps.
//! Founder tokens take IDs from `0..max_supply_claimable`; publicly
//! minted tokens take IDs from `max_supply_claimable..max_supply`. The
//! ranges are disjoint, so no allocation order can collide.

use super::{RegistryError, RegistryResult};
use crate::types::TokenId;
use serde::{Deserialize, Serialize};

/// Issuance counters and caps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyLedger {
    /// Next founder token ID to assign (also the count of claimed tokens)
    next_founder_token_id: u64,
    /// Next public-mint offset to assign (also the count of minted tokens)
    next_mintable_token_id: u64,
    /// Upper bound on total tokens ever issued
    max_supply: u64,
    /// Portion of the supply reserved for founder claims
    max_supply_claimable: u64,
}

impl SupplyLedger {
    /// Create a fresh supply ledger
    ///
    /// Callers must have validated `max_supply_claimable <= max_supply`.
    pub fn new(max_supply: u64, max_supply_claimable: u64) -> Self {
        debug_assert!(max_supply_claimable <= max_supply);
        Self {
            next_founder_token_id: 0,
            next_mintable_token_id: 0,
            max_supply,
            max_supply_claimable,
        }
    }

    /// Next founder token ID to be assigned
    pub fn next_founder_token_id(&self) -> u64 {
        self.next_founder_token_id
    }

    /// Next public-mint offset to be assigned
    pub fn next_mintable_token_id(&self) -> u64 {
        self.next_mintable_token_id
    }

    /// Collection supply cap
    pub fn max_supply(&self) -> u64 {
        self.max_supply
    }

    /// Claimable sub-range cap
    pub fn max_supply_claimable(&self) -> u64 {
        self.max_supply_claimable
    }

    /// Total tokens issued on both paths
    pub fn total_issued(&self) -> u64 {
        self.next_founder_token_id + self.next_mintable_token_id
    }

    /// Founder tokens still available
    pub fn remaining_claimable(&self) -> u64 {
        self.max_supply_claimable - self.next_founder_token_id
    }

    /// Publicly mintable tokens still available
    pub fn remaining_mintable(&self) -> u64 {
        self.max_supply - self.max_supply_claimable - self.next_mintable_token_id
    }

    /// Check that a founder token can still be issued
    pub fn ensure_claimable(&self) -> RegistryResult<()> {
        if self.next_founder_token_id >= self.max_supply_claimable {
            return Err(RegistryError::SupplyExhausted);
        }
        Ok(())
    }

    /// Check that a public token can still be issued
    pub fn ensure_mintable(&self) -> RegistryResult<()> {
        if self.max_supply_claimable + self.next_mintable_token_id >= self.max_supply {
            return Err(RegistryError::SupplyExhausted);
        }
        Ok(())
    }

    /// Assign the next founder token ID
    pub fn allocate_founder(&mut self) -> RegistryResult<TokenId> {
        self.ensure_claimable()?;
        let id = TokenId(self.next_founder_token_id);
        self.next_founder_token_id += 1;
        Ok(id)
    }

    /// Assign the next public token ID
    pub fn allocate_mintable(&mut self) -> RegistryResult<TokenId> {
        self.ensure_mintable()?;
        let id = TokenId(self.max_supply_claimable + self.next_mintable_token_id);
        self.next_mintable_token_id += 1;
        Ok(id)
    }
}
