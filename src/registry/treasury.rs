//! Payment ledger and treasury forwarding
//!
//! The bank tracks native-currency balances for every principal the
//! ledger has seen. A successful mint moves exactly the configured price
//! from the minter to the treasury in one step; if the move cannot
//! complete, nothing else about the mint happens.

use super::{RegistryError, RegistryResult};
use crate::types::{Address, Coin};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Native currency balances
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    balances: HashMap<Address, Coin>,
}

impl Bank {
    /// Create an empty bank
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of an address (zero if never seen)
    pub fn balance_of(&self, address: &Address) -> Coin {
        self.balances.get(address).copied().unwrap_or(Coin::ZERO)
    }

    /// Add to a balance
    pub fn credit(&mut self, address: &Address, amount: Coin) {
        let entry = self.balances.entry(*address).or_insert(Coin::ZERO);
        *entry = entry.saturating_add(amount);
    }

    /// Move value between two addresses
    ///
    /// Fails before touching either balance if the payer cannot cover
    /// the amount.
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: Coin) -> Result<(), BankError> {
        let have = self.balance_of(from);
        let remaining = have.checked_sub(amount).ok_or(BankError::InsufficientFunds {
            have,
            need: amount,
        })?;

        self.balances.insert(*from, remaining);
        self.credit(to, amount);
        Ok(())
    }
}

/// Bank errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BankError {
    #[error("Insufficient funds: have {have}, need {need}")]
    InsufficientFunds { have: Coin, need: Coin },
}

/// Forwards mint payments to the configured treasury
#[derive(Debug, Clone)]
pub struct TreasuryForwarder {
    treasury: Address,
}

impl TreasuryForwarder {
    /// Create a forwarder for the given treasury address
    pub fn new(treasury: Address) -> Self {
        Self { treasury }
    }

    /// The configured treasury address
    pub fn treasury(&self) -> &Address {
        &self.treasury
    }

    /// Forward the full payment to the treasury
    pub fn forward(&self, bank: &mut Bank, from: &Address, amount: Coin) -> RegistryResult<()> {
        bank.transfer(from, &self.treasury, amount)
            .map_err(|e| RegistryError::PaymentForwardingFailed(e.to_string()))?;
        debug!(%from, amount = %amount, "payment forwarded to treasury");
        Ok(())
    }
}
