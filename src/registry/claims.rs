//! Founder claims
//!
//! The claim path issues founder tokens for free to current owners of
//! external loot items. Eligibility is answered by an injected read-only
//! oracle, queried on every call so a loot transfer between calls is
//! always observed. Each loot item backs at most one claim, ever.

use super::supply::SupplyLedger;
use super::{RegistryError, RegistryResult};
use crate::types::{Address, LootId, TokenId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Read-only capability over the external loot domain
pub trait LootOracle {
    /// Current owner of the loot item, if it exists
    fn owner_of(&self, loot: LootId) -> Option<Address>;
}

/// In-memory loot ownership table
///
/// Stands in for the external loot registry in tests and tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryLootRegistry {
    owners: HashMap<LootId, Address>,
}

impl MemoryLootRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the owner of a loot item
    pub fn set_owner(&mut self, loot: LootId, owner: Address) {
        self.owners.insert(loot, owner);
    }

    /// Remove a loot item
    pub fn remove(&mut self, loot: LootId) {
        self.owners.remove(&loot);
    }
}

impl LootOracle for MemoryLootRegistry {
    fn owner_of(&self, loot: LootId) -> Option<Address> {
        self.owners.get(&loot).copied()
    }
}

/// At-most-once claim bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRegistry {
    /// Loot items already used to claim, and the token each produced
    claimed: HashMap<LootId, TokenId>,
}

impl ClaimRegistry {
    /// Create an empty claim registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a loot item has been used to claim
    pub fn is_claimed(&self, loot: LootId) -> bool {
        self.claimed.contains_key(&loot)
    }

    /// Token minted by a claimed loot item, if any
    pub fn token_for(&self, loot: LootId) -> Option<TokenId> {
        self.claimed.get(&loot).copied()
    }

    /// Number of claims recorded
    pub fn claimed_count(&self) -> usize {
        self.claimed.len()
    }

    /// Execute a founder claim
    ///
    /// Checks run in a fixed order so each failure is observable on its
    /// own: already-claimed, then ownership, then supply. No state is
    /// touched until every check has passed.
    pub fn claim(
        &mut self,
        oracle: &dyn LootOracle,
        supply: &mut SupplyLedger,
        recipient: &Address,
        loot: LootId,
    ) -> RegistryResult<TokenId> {
        if self.is_claimed(loot) {
            return Err(RegistryError::AlreadyClaimed(loot));
        }

        match oracle.owner_of(loot) {
            Some(owner) if owner == *recipient => {}
            _ => return Err(RegistryError::NotOwner(loot)),
        }

        let token_id = supply.allocate_founder()?;
        self.claimed.insert(loot, token_id);
        Ok(token_id)
    }
}
