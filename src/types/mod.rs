//! Core types for the HexMint ledger
//!
//! This module defines the fundamental data structures:
//! - Addresses (principal identities)
//! - Coin amounts (native payment value)
//! - Token and loot identifiers
//! - Hex color codes

pub mod address;
pub mod coin;
pub mod token;

pub use address::{Address, AddressError};
pub use coin::{Coin, CoinError};
pub use token::{HexCode, LootId, TokenId};
