//! The issuance ledger
//!
//! This module provides the registry components and the facade that
//! serializes access to them:
//!
//! - `supply` - issuance counters and the disjoint ID ranges
//! - `claims` - at-most-once founder claims and the loot oracle seam
//! - `minting` - the priced public path
//! - `attributes` - the admin-managed hex-code grid
//! - `treasury` - balance ledger and atomic payment forwarding
//!
//! ## Consistency Model
//! Every state-changing operation runs as one indivisible unit: all
//! checks precede all mutations, so a failed call leaves the ledger
//! exactly as it was. `SharedLedger` extends the same guarantee across
//! threads with a single write lock around each call.

pub mod attributes;
pub mod claims;
pub mod minting;
pub mod supply;
pub mod treasury;

pub use attributes::AttributeTable;
pub use claims::{ClaimRegistry, LootOracle, MemoryLootRegistry};
pub use minting::MintController;
pub use supply::SupplyLedger;
pub use treasury::{Bank, BankError, TreasuryForwarder};

use crate::storage::LedgerState;
use crate::types::{Address, Coin, HexCode, LootId, TokenId};
use crate::{ConfigError, LedgerConfig};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Registry operation result
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry errors
///
/// Every failure is reported synchronously and leaves all ledger state
/// untouched; none is fatal to the registry itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Claiming is not enabled")]
    ClaimingDisabled,
    #[error("Minting is not enabled")]
    MintingDisabled,
    #[error("Not owner of {0}")]
    NotOwner(LootId),
    #[error("{0} already claimed")]
    AlreadyClaimed(LootId),
    #[error("Supply exhausted")]
    SupplyExhausted,
    #[error("Value is wrong: expected {expected}, got {got}")]
    WrongValue { expected: Coin, got: Coin },
    #[error("Payment forwarding failed: {0}")]
    PaymentForwardingFailed(String),
    #[error("Hex code index out of range: ({row}, {col})")]
    IndexOutOfRange { row: usize, col: usize },
}

/// Events emitted by successful state changes
///
/// Accumulated on the ledger and drained with [`TokenLedger::take_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A founder token was claimed
    FounderTokenClaimed { recipient: Address, token_id: TokenId },
    /// A token was publicly minted
    Minted { recipient: Address, token_id: TokenId },
    /// Claiming was switched on
    ClaimingEnabled,
    /// Claiming was switched off
    ClaimingDisabled,
    /// Minting was switched on
    MintingEnabled,
    /// Minting was switched off
    MintingDisabled,
    /// The master switch was flipped
    ActiveToggled { active: bool },
    /// The hex-code grid was replaced
    HexCodesSet { rows: usize, cells: usize },
}

/// Issuance gate flags
///
/// The path flags start out off and are mutated only by admin calls.
/// `is_active` is a master switch over both paths: it starts on and is
/// flipped, never set, so repeated toggles alternate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    /// Master switch over both issuance paths
    pub is_active: bool,
    /// Founder-claim path gate
    pub claiming_active: bool,
    /// Public-mint path gate
    pub minting_active: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            is_active: true,
            claiming_active: false,
            minting_active: false,
        }
    }
}

/// The token issuance and claim registry
///
/// Owns all durable state: supply counters, flags, the claimed-loot
/// set, token ownership, the hex-code grid, and the payment ledger.
/// The eligibility oracle is an injected capability, queried per call.
pub struct TokenLedger {
    config: LedgerConfig,
    admin: Address,
    flags: Flags,
    supply: SupplyLedger,
    claims: ClaimRegistry,
    mint_controller: MintController,
    attributes: AttributeTable,
    bank: Bank,
    forwarder: TreasuryForwarder,
    owners: HashMap<TokenId, Address>,
    oracle: Box<dyn LootOracle + Send + Sync>,
    events: Vec<RegistryEvent>,
}

impl TokenLedger {
    /// Create a fresh ledger
    pub fn new(
        config: LedgerConfig,
        admin: Address,
        oracle: Box<dyn LootOracle + Send + Sync>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        info!(name = %config.name, max_supply = config.max_supply, "initializing ledger");

        Ok(Self {
            supply: SupplyLedger::new(config.max_supply, config.max_supply_claimable),
            mint_controller: MintController::new(config.price),
            forwarder: TreasuryForwarder::new(config.treasury),
            config,
            admin,
            flags: Flags::default(),
            claims: ClaimRegistry::new(),
            attributes: AttributeTable::new(),
            bank: Bank::new(),
            owners: HashMap::new(),
            oracle,
            events: Vec::new(),
        })
    }

    /// Rebuild a ledger from a persisted snapshot
    pub fn from_state(
        config: LedgerConfig,
        admin: Address,
        oracle: Box<dyn LootOracle + Send + Sync>,
        state: LedgerState,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            mint_controller: MintController::new(config.price),
            forwarder: TreasuryForwarder::new(config.treasury),
            config,
            admin,
            flags: state.flags,
            supply: state.supply,
            claims: state.claims,
            attributes: state.attributes,
            bank: state.bank,
            owners: state.owners,
            oracle,
            events: Vec::new(),
        })
    }

    /// Snapshot all durable state
    pub fn snapshot(&self) -> LedgerState {
        LedgerState {
            flags: self.flags,
            supply: self.supply.clone(),
            claims: self.claims.clone(),
            attributes: self.attributes.clone(),
            bank: self.bank.clone(),
            owners: self.owners.clone(),
        }
    }

    // ---- issuance ----

    /// Claim a founder token backed by a loot item
    ///
    /// The recipient must be the loot item's current owner per the
    /// oracle; ownership is read live on every call.
    pub fn claim_founder_token(
        &mut self,
        recipient: Address,
        loot: LootId,
    ) -> RegistryResult<TokenId> {
        self.ensure_claiming_enabled()?;

        let token_id =
            self.claims
                .claim(self.oracle.as_ref(), &mut self.supply, &recipient, loot)?;
        self.owners.insert(token_id, recipient);

        self.events
            .push(RegistryEvent::FounderTokenClaimed { recipient, token_id });
        debug!(%recipient, %token_id, %loot, "founder token claimed");
        Ok(token_id)
    }

    /// Publicly mint a token for exactly the configured price
    ///
    /// The payer funds the mint; the full payment reaches the treasury
    /// before the token is issued, or the whole call fails.
    pub fn mint(
        &mut self,
        payer: &Address,
        recipient: Address,
        payment: Coin,
    ) -> RegistryResult<TokenId> {
        self.ensure_minting_enabled()?;

        let token_id = self.mint_controller.mint(
            &mut self.supply,
            &mut self.bank,
            &self.forwarder,
            payer,
            payment,
        )?;
        self.owners.insert(token_id, recipient);

        self.events.push(RegistryEvent::Minted { recipient, token_id });
        debug!(%payer, %recipient, %token_id, "token minted");
        Ok(token_id)
    }

    // ---- admin ----

    /// Switch claiming on (idempotent)
    pub fn enable_claiming(&mut self, caller: &Address) -> RegistryResult<()> {
        self.ensure_admin(caller)?;
        if !self.flags.claiming_active {
            self.flags.claiming_active = true;
            self.events.push(RegistryEvent::ClaimingEnabled);
            info!("claiming enabled");
        }
        Ok(())
    }

    /// Switch claiming off (idempotent)
    pub fn disable_claiming(&mut self, caller: &Address) -> RegistryResult<()> {
        self.ensure_admin(caller)?;
        if self.flags.claiming_active {
            self.flags.claiming_active = false;
            self.events.push(RegistryEvent::ClaimingDisabled);
            info!("claiming disabled");
        }
        Ok(())
    }

    /// Switch minting on (idempotent)
    pub fn enable_minting(&mut self, caller: &Address) -> RegistryResult<()> {
        self.ensure_admin(caller)?;
        if !self.flags.minting_active {
            self.flags.minting_active = true;
            self.events.push(RegistryEvent::MintingEnabled);
            info!("minting enabled");
        }
        Ok(())
    }

    /// Switch minting off (idempotent)
    pub fn disable_minting(&mut self, caller: &Address) -> RegistryResult<()> {
        self.ensure_admin(caller)?;
        if self.flags.minting_active {
            self.flags.minting_active = false;
            self.events.push(RegistryEvent::MintingDisabled);
            info!("minting disabled");
        }
        Ok(())
    }

    /// Flip the master switch
    pub fn toggle_is_active(&mut self, caller: &Address) -> RegistryResult<()> {
        self.ensure_admin(caller)?;
        self.flags.is_active = !self.flags.is_active;
        self.events.push(RegistryEvent::ActiveToggled {
            active: self.flags.is_active,
        });
        info!(active = self.flags.is_active, "master switch toggled");
        Ok(())
    }

    /// Replace the hex-code grid wholesale
    pub fn set_hex_codes(
        &mut self,
        caller: &Address,
        grid: Vec<Vec<HexCode>>,
    ) -> RegistryResult<()> {
        self.ensure_admin(caller)?;
        self.attributes.replace(grid);
        self.events.push(RegistryEvent::HexCodesSet {
            rows: self.attributes.rows(),
            cells: self.attributes.cells(),
        });
        Ok(())
    }

    // ---- queries ----

    /// Exact payment required per public mint
    pub fn price(&self) -> Coin {
        self.mint_controller.price()
    }

    /// Collection supply cap
    pub fn max_supply(&self) -> u64 {
        self.supply.max_supply()
    }

    /// Claimable sub-range cap
    pub fn max_supply_claimable(&self) -> u64 {
        self.supply.max_supply_claimable()
    }

    /// Next founder token ID to be assigned
    pub fn next_founder_token_id(&self) -> u64 {
        self.supply.next_founder_token_id()
    }

    /// Next public-mint offset to be assigned
    pub fn next_mintable_token_id(&self) -> u64 {
        self.supply.next_mintable_token_id()
    }

    /// Total tokens issued on both paths
    pub fn total_issued(&self) -> u64 {
        self.supply.total_issued()
    }

    /// Owner of an issued token
    pub fn owner_of(&self, token_id: TokenId) -> Option<Address> {
        self.owners.get(&token_id).copied()
    }

    /// Whether a loot item has been used to claim
    pub fn is_claimed(&self, loot: LootId) -> bool {
        self.claims.is_claimed(loot)
    }

    /// Read a single hex-code cell
    pub fn hex_code(&self, row: usize, col: usize) -> RegistryResult<HexCode> {
        self.attributes.get(row, col)
    }

    /// The attribute table
    pub fn attributes(&self) -> &AttributeTable {
        &self.attributes
    }

    /// Master switch state
    pub fn is_active(&self) -> bool {
        self.flags.is_active
    }

    /// Founder-claim gate state
    pub fn claiming_active(&self) -> bool {
        self.flags.claiming_active
    }

    /// Public-mint gate state
    pub fn minting_active(&self) -> bool {
        self.flags.minting_active
    }

    /// The payment ledger
    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    /// Mutable payment ledger, for harnesses that fund accounts
    pub fn bank_mut(&mut self) -> &mut Bank {
        &mut self.bank
    }

    /// The configured treasury address
    pub fn treasury(&self) -> &Address {
        self.forwarder.treasury()
    }

    /// The admin principal
    pub fn admin(&self) -> &Address {
        &self.admin
    }

    /// Construction-time configuration
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Base metadata URI
    pub fn base_uri(&self) -> &str {
        &self.config.base_uri
    }

    /// Metadata URI for an issued token
    ///
    /// None for unissued tokens or when no base URI is configured.
    pub fn token_uri(&self, token_id: TokenId) -> Option<String> {
        if !self.owners.contains_key(&token_id) || self.config.base_uri.is_empty() {
            return None;
        }
        let mut uri = self.config.base_uri.clone();
        if !uri.ends_with('/') {
            uri.push('/');
        }
        uri.push_str(&token_id.value().to_string());
        Some(uri)
    }

    /// Get and clear emitted events
    pub fn take_events(&mut self) -> Vec<RegistryEvent> {
        std::mem::take(&mut self.events)
    }

    // ---- internal ----

    fn ensure_admin(&self, caller: &Address) -> RegistryResult<()> {
        if caller != &self.admin {
            return Err(RegistryError::Unauthorized("admin required".into()));
        }
        Ok(())
    }

    fn ensure_claiming_enabled(&self) -> RegistryResult<()> {
        if !self.flags.is_active || !self.flags.claiming_active {
            return Err(RegistryError::ClaimingDisabled);
        }
        Ok(())
    }

    fn ensure_minting_enabled(&self) -> RegistryResult<()> {
        if !self.flags.is_active || !self.flags.minting_active {
            return Err(RegistryError::MintingDisabled);
        }
        Ok(())
    }
}

/// Thread-safe handle over a [`TokenLedger`]
///
/// Every mutation takes the write lock for its full read-modify-write
/// sequence, so concurrent callers observe a total order and no
/// intermediate state. Queries share the read lock and see a consistent
/// snapshot.
#[derive(Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<TokenLedger>>,
}

impl SharedLedger {
    /// Wrap a ledger for shared access
    pub fn new(ledger: TokenLedger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    /// Claim a founder token
    pub fn claim_founder_token(
        &self,
        recipient: Address,
        loot: LootId,
    ) -> RegistryResult<TokenId> {
        self.inner.write().claim_founder_token(recipient, loot)
    }

    /// Publicly mint a token
    pub fn mint(
        &self,
        payer: &Address,
        recipient: Address,
        payment: Coin,
    ) -> RegistryResult<TokenId> {
        self.inner.write().mint(payer, recipient, payment)
    }

    /// Switch claiming on
    pub fn enable_claiming(&self, caller: &Address) -> RegistryResult<()> {
        self.inner.write().enable_claiming(caller)
    }

    /// Switch claiming off
    pub fn disable_claiming(&self, caller: &Address) -> RegistryResult<()> {
        self.inner.write().disable_claiming(caller)
    }

    /// Switch minting on
    pub fn enable_minting(&self, caller: &Address) -> RegistryResult<()> {
        self.inner.write().enable_minting(caller)
    }

    /// Switch minting off
    pub fn disable_minting(&self, caller: &Address) -> RegistryResult<()> {
        self.inner.write().disable_minting(caller)
    }

    /// Flip the master switch
    pub fn toggle_is_active(&self, caller: &Address) -> RegistryResult<()> {
        self.inner.write().toggle_is_active(caller)
    }

    /// Replace the hex-code grid
    pub fn set_hex_codes(&self, caller: &Address, grid: Vec<Vec<HexCode>>) -> RegistryResult<()> {
        self.inner.write().set_hex_codes(caller, grid)
    }

    /// Get and clear emitted events
    pub fn take_events(&self) -> Vec<RegistryEvent> {
        self.inner.write().take_events()
    }

    /// Run a closure under the read lock
    pub fn read<R>(&self, f: impl FnOnce(&TokenLedger) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run a closure under the write lock
    pub fn write<R>(&self, f: impl FnOnce(&mut TokenLedger) -> R) -> R {
        f(&mut self.inner.write())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_address(n: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = n;
        Address::new(bytes)
    }

    fn test_config(max_supply: u64, max_supply_claimable: u64) -> LedgerConfig {
        LedgerConfig {
            name: "Test".into(),
            symbol: "TST".into(),
            base_uri: "ipfs://QmTest".into(),
            treasury: test_address(9),
            price: Coin::from_whole(1),
            max_supply,
            max_supply_claimable,
        }
    }

    /// Ledger with loot 1..=4 owned by addresses 1..=4 and every
    /// address funded with 10 coins.
    fn test_ledger(max_supply: u64, max_supply_claimable: u64) -> TokenLedger {
        let mut loot = MemoryLootRegistry::new();
        for n in 1..=4u64 {
            loot.set_owner(LootId(n), test_address(n as u8));
        }

        let mut ledger = TokenLedger::new(
            test_config(max_supply, max_supply_claimable),
            test_address(100),
            Box::new(loot),
        )
        .unwrap();

        for n in 1..=4u8 {
            ledger.bank_mut().credit(&test_address(n), Coin::from_whole(10));
        }
        ledger
    }

    fn admin() -> Address {
        test_address(100)
    }

    #[test]
    fn test_flags_start_closed() {
        let ledger = test_ledger(10, 2);
        assert!(ledger.is_active());
        assert!(!ledger.claiming_active());
        assert!(!ledger.minting_active());
    }

    #[test]
    fn test_claim_requires_enabled_flag() {
        let mut ledger = test_ledger(10, 2);

        let result = ledger.claim_founder_token(test_address(1), LootId(1));
        assert_eq!(result, Err(RegistryError::ClaimingDisabled));

        // Enabling then disabling closes the gate again
        ledger.enable_claiming(&admin()).unwrap();
        ledger.disable_claiming(&admin()).unwrap();
        let result = ledger.claim_founder_token(test_address(1), LootId(1));
        assert_eq!(result, Err(RegistryError::ClaimingDisabled));

        ledger.enable_claiming(&admin()).unwrap();
        ledger.claim_founder_token(test_address(1), LootId(1)).unwrap();
    }

    #[test]
    fn test_mint_requires_enabled_flag() {
        let mut ledger = test_ledger(10, 2);
        let minter = test_address(1);
        let price = ledger.price();

        let result = ledger.mint(&minter, minter, price);
        assert_eq!(result, Err(RegistryError::MintingDisabled));

        ledger.enable_minting(&admin()).unwrap();
        ledger.disable_minting(&admin()).unwrap();
        let result = ledger.mint(&minter, minter, price);
        assert_eq!(result, Err(RegistryError::MintingDisabled));

        ledger.enable_minting(&admin()).unwrap();
        ledger.mint(&minter, minter, price).unwrap();
    }

    #[test]
    fn test_master_switch_gates_both_paths() {
        let mut ledger = test_ledger(10, 2);
        let minter = test_address(1);
        let price = ledger.price();
        ledger.enable_claiming(&admin()).unwrap();
        ledger.enable_minting(&admin()).unwrap();

        ledger.toggle_is_active(&admin()).unwrap();
        assert!(!ledger.is_active());
        assert_eq!(
            ledger.claim_founder_token(test_address(1), LootId(1)),
            Err(RegistryError::ClaimingDisabled)
        );
        assert_eq!(
            ledger.mint(&minter, minter, price),
            Err(RegistryError::MintingDisabled)
        );

        // Toggling alternates rather than latching
        ledger.toggle_is_active(&admin()).unwrap();
        assert!(ledger.is_active());
        ledger.claim_founder_token(test_address(1), LootId(1)).unwrap();
        ledger.mint(&minter, minter, price).unwrap();
    }

    #[test]
    fn test_admin_gating() {
        let mut ledger = test_ledger(10, 2);
        let stranger = test_address(1);

        assert!(matches!(
            ledger.enable_claiming(&stranger),
            Err(RegistryError::Unauthorized(_))
        ));
        assert!(matches!(
            ledger.enable_minting(&stranger),
            Err(RegistryError::Unauthorized(_))
        ));
        assert!(matches!(
            ledger.toggle_is_active(&stranger),
            Err(RegistryError::Unauthorized(_))
        ));
        assert!(matches!(
            ledger.set_hex_codes(&stranger, vec![vec![HexCode::new(1)]]),
            Err(RegistryError::Unauthorized(_))
        ));

        // Nothing changed
        assert!(!ledger.claiming_active());
        assert!(!ledger.minting_active());
        assert!(ledger.is_active());
        assert!(ledger.attributes().is_empty());
    }

    #[test]
    fn test_enable_is_idempotent() {
        let mut ledger = test_ledger(10, 2);

        ledger.enable_claiming(&admin()).unwrap();
        ledger.enable_claiming(&admin()).unwrap();
        assert!(ledger.claiming_active());

        // Only the actual state change emitted an event
        let events = ledger.take_events();
        assert_eq!(events, vec![RegistryEvent::ClaimingEnabled]);
    }

    #[test]
    fn test_claim_emits_event_and_records_owner() {
        let mut ledger = test_ledger(10, 2);
        ledger.enable_claiming(&admin()).unwrap();
        ledger.take_events();

        let token_id = ledger.claim_founder_token(test_address(1), LootId(1)).unwrap();

        assert_eq!(ledger.owner_of(token_id), Some(test_address(1)));
        assert!(ledger.is_claimed(LootId(1)));
        assert_eq!(
            ledger.take_events(),
            vec![RegistryEvent::FounderTokenClaimed {
                recipient: test_address(1),
                token_id,
            }]
        );
    }

    #[test]
    fn test_mint_moves_exactly_price_to_treasury() {
        let mut ledger = test_ledger(10, 2);
        ledger.enable_minting(&admin()).unwrap();
        ledger.take_events();

        let minter = test_address(1);
        let price = ledger.price();
        let minter_before = ledger.bank().balance_of(&minter);
        let treasury_before = ledger.bank().balance_of(ledger.treasury());

        let token_id = ledger.mint(&minter, minter, price).unwrap();

        assert_eq!(
            ledger.bank().balance_of(&minter),
            minter_before.checked_sub(price).unwrap()
        );
        assert_eq!(
            ledger.bank().balance_of(ledger.treasury()),
            treasury_before.saturating_add(price)
        );
        assert_eq!(
            ledger.take_events(),
            vec![RegistryEvent::Minted { recipient: minter, token_id }]
        );
    }

    #[test]
    fn test_wrong_value_rejected_both_ways() {
        let mut ledger = test_ledger(10, 2);
        ledger.enable_minting(&admin()).unwrap();

        let minter = test_address(1);
        let price = ledger.price();

        for payment in [price - Coin::from_units(1), price + Coin::from_units(1)] {
            let result = ledger.mint(&minter, minter, payment);
            assert_eq!(
                result,
                Err(RegistryError::WrongValue { expected: price, got: payment })
            );
        }
        assert_eq!(ledger.next_mintable_token_id(), 0);
        assert_eq!(ledger.bank().balance_of(&minter), Coin::from_whole(10));
    }

    #[test]
    fn test_unfunded_minter_pays_nothing_gets_nothing() {
        let mut ledger = test_ledger(10, 2);
        ledger.enable_minting(&admin()).unwrap();

        let broke = test_address(50);
        let price = ledger.price();

        let result = ledger.mint(&broke, broke, price);
        assert!(matches!(
            result,
            Err(RegistryError::PaymentForwardingFailed(_))
        ));
        assert_eq!(ledger.total_issued(), 0);
        assert_eq!(ledger.bank().balance_of(ledger.treasury()), Coin::ZERO);
    }

    #[test]
    fn test_full_issuance_exhausts_at_caps() {
        let mut ledger = test_ledger(4, 2);
        ledger.enable_claiming(&admin()).unwrap();
        ledger.enable_minting(&admin()).unwrap();
        let price = ledger.price();

        // Drain the founder range
        ledger.claim_founder_token(test_address(1), LootId(1)).unwrap();
        ledger.claim_founder_token(test_address(2), LootId(2)).unwrap();
        assert_eq!(
            ledger.claim_founder_token(test_address(3), LootId(3)),
            Err(RegistryError::SupplyExhausted)
        );

        // Drain the public range
        let minter = test_address(3);
        let a = ledger.mint(&minter, minter, price).unwrap();
        let b = ledger.mint(&minter, minter, price).unwrap();
        assert_eq!(
            ledger.mint(&minter, minter, price),
            Err(RegistryError::SupplyExhausted)
        );

        assert_eq!(ledger.total_issued(), ledger.max_supply());
        // All four IDs distinct and owned
        let ids = [TokenId(0), TokenId(1), a, b];
        for id in ids {
            assert!(ledger.owner_of(id).is_some());
        }
        assert_eq!(a, TokenId(2));
        assert_eq!(b, TokenId(3));
    }

    #[test]
    fn test_set_hex_codes_round_trip() {
        let mut ledger = test_ledger(10, 2);
        let grid = vec![
            vec![HexCode::new(0x1F0D39), HexCode::new(0xCA0048)],
            vec![HexCode::new(0x386F5B), HexCode::new(0xE16166)],
        ];

        ledger.set_hex_codes(&admin(), grid.clone()).unwrap();

        for (i, row) in grid.iter().enumerate() {
            for (j, &code) in row.iter().enumerate() {
                assert_eq!(ledger.hex_code(i, j).unwrap(), code);
            }
        }
        assert_eq!(
            ledger.hex_code(2, 0),
            Err(RegistryError::IndexOutOfRange { row: 2, col: 0 })
        );
    }

    #[test]
    fn test_issuance_does_not_touch_hex_codes() {
        let mut ledger = test_ledger(10, 2);
        let grid = vec![vec![HexCode::new(0xABCDEF)]];
        ledger.set_hex_codes(&admin(), grid.clone()).unwrap();

        ledger.enable_claiming(&admin()).unwrap();
        ledger.enable_minting(&admin()).unwrap();
        let minter = test_address(1);
        let price = ledger.price();
        ledger.claim_founder_token(test_address(1), LootId(1)).unwrap();
        ledger.mint(&minter, minter, price).unwrap();

        assert_eq!(ledger.attributes().grid(), &grid[..]);
    }

    #[test]
    fn test_token_uri() {
        let mut ledger = test_ledger(10, 2);
        ledger.enable_claiming(&admin()).unwrap();
        let token_id = ledger.claim_founder_token(test_address(1), LootId(1)).unwrap();

        assert_eq!(
            ledger.token_uri(token_id),
            Some("ipfs://QmTest/0".to_string())
        );
        // Unissued token has no URI
        assert_eq!(ledger.token_uri(TokenId(999)), None);
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let mut ledger = test_ledger(10, 2);
        ledger.enable_claiming(&admin()).unwrap();
        ledger.enable_minting(&admin()).unwrap();
        let minter = test_address(1);
        let price = ledger.price();
        ledger.claim_founder_token(test_address(1), LootId(1)).unwrap();
        ledger.mint(&minter, minter, price).unwrap();
        ledger.set_hex_codes(&admin(), vec![vec![HexCode::new(7)]]).unwrap();

        let state = ledger.snapshot();
        let restored = TokenLedger::from_state(
            ledger.config().clone(),
            admin(),
            Box::new(MemoryLootRegistry::new()),
            state,
        )
        .unwrap();

        assert_eq!(restored.total_issued(), 2);
        assert_eq!(restored.owner_of(TokenId(0)), Some(test_address(1)));
        assert!(restored.is_claimed(LootId(1)));
        assert!(restored.claiming_active());
        assert_eq!(restored.hex_code(0, 0).unwrap(), HexCode::new(7));
        assert_eq!(
            restored.bank().balance_of(restored.treasury()),
            price
        );
    }

    #[test]
    fn test_concurrent_mints_for_last_token() {
        // One token left in the public range; eight racing minters
        let mut ledger = test_ledger(3, 2);
        ledger.enable_minting(&admin()).unwrap();
        let price = ledger.price();

        let minters: Vec<Address> = (1..=8u8).map(|n| test_address(n + 10)).collect();
        for minter in &minters {
            ledger.bank_mut().credit(minter, Coin::from_whole(10));
        }

        let shared = SharedLedger::new(ledger);
        let mut handles = Vec::new();
        for minter in minters.clone() {
            let shared = shared.clone();
            handles.push(std::thread::spawn(move || {
                shared.mint(&minter, minter, price)
            }));
        }

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let winners: Vec<_> = results.iter().filter(|r| r.is_ok()).collect();
        let losers: Vec<_> = results.iter().filter(|r| r.is_err()).collect();

        assert_eq!(winners.len(), 1);
        assert_eq!(losers.len(), 7);
        for loser in losers {
            assert_eq!(loser, &Err(RegistryError::SupplyExhausted));
        }

        shared.read(|ledger| {
            assert_eq!(ledger.total_issued(), 1);
            assert!(ledger.owner_of(TokenId(2)).is_some());
            // Exactly one payment reached the treasury
            assert_eq!(ledger.bank().balance_of(ledger.treasury()), price);
        });
    }
}
