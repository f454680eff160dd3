//! Public minting
//!
//! The priced issuance path. A mint must attach exactly the configured
//! price: underpayment and overpayment are both rejected, never clamped
//! or refunded. The payment is forwarded to the treasury before any
//! counter moves, so a forwarding failure costs the caller nothing and
//! issues no token.

use super::supply::SupplyLedger;
use super::treasury::{Bank, TreasuryForwarder};
use super::{RegistryError, RegistryResult};
use crate::types::{Address, Coin, TokenId};

/// Priced issuance controller
#[derive(Debug, Clone)]
pub struct MintController {
    price: Coin,
}

impl MintController {
    /// Create a controller with a fixed price
    pub fn new(price: Coin) -> Self {
        Self { price }
    }

    /// Exact payment required per mint
    pub fn price(&self) -> Coin {
        self.price
    }

    /// Reject any payment that is not exactly the price
    pub fn verify_payment(&self, payment: Coin) -> RegistryResult<()> {
        if payment != self.price {
            return Err(RegistryError::WrongValue {
                expected: self.price,
                got: payment,
            });
        }
        Ok(())
    }

    /// Execute a public mint
    ///
    /// Ordering matters: payment and supply are validated first, the
    /// payment is forwarded as the last fallible step, and only then is
    /// the token ID assigned. Any failure leaves every balance and
    /// counter untouched.
    pub fn mint(
        &self,
        supply: &mut SupplyLedger,
        bank: &mut Bank,
        forwarder: &TreasuryForwarder,
        payer: &Address,
        payment: Coin,
    ) -> RegistryResult<TokenId> {
        self.verify_payment(payment)?;
        supply.ensure_mintable()?;
        forwarder.forward(bank, payer, payment)?;
        supply.allocate_mintable()
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

    fn setup() -> (MintController, SupplyLedger, Bank, TreasuryForwarder, Address) {
        let minter = test_address(1);
        let mut bank = Bank::new();
        bank.credit(&minter, Coin::from_whole(10));
        (
            MintController::new(Coin::from_whole(1)),
            SupplyLedger::new(5, 2),
            bank,
            TreasuryForwarder::new(test_address(9)),
            minter,
        )
    }

    #[test]
    fn test_mint_allocates_from_public_range() {
        let (controller, mut supply, mut bank, forwarder, minter) = setup();

        let id = controller
            .mint(&mut supply, &mut bank, &forwarder, &minter, Coin::from_whole(1))
            .unwrap();
        assert_eq!(id, TokenId(2));
        assert_eq!(supply.next_mintable_token_id(), 1);
    }

    #[test]
    fn test_payment_must_be_exact() {
        let (controller, mut supply, mut bank, forwarder, minter) = setup();
        let price = controller.price();

        let under = controller.mint(
            &mut supply,
            &mut bank,
            &forwarder,
            &minter,
            price - Coin::from_units(1),
        );
        assert!(matches!(under, Err(RegistryError::WrongValue { .. })));

        let over = controller.mint(
            &mut supply,
            &mut bank,
            &forwarder,
            &minter,
            price + Coin::from_units(1),
        );
        assert!(matches!(over, Err(RegistryError::WrongValue { .. })));

        // No payment was taken by either failure
        assert_eq!(bank.balance_of(&minter), Coin::from_whole(10));
        assert_eq!(supply.next_mintable_token_id(), 0);
    }

    #[test]
    fn test_forwarding_failure_rolls_back() {
        let (controller, mut supply, mut bank, forwarder, _) = setup();
        let broke = test_address(2);

        let result = controller.mint(
            &mut supply,
            &mut bank,
            &forwarder,
            &broke,
            Coin::from_whole(1),
        );
        assert!(matches!(
            result,
            Err(RegistryError::PaymentForwardingFailed(_))
        ));
        assert_eq!(supply.next_mintable_token_id(), 0);
        assert_eq!(bank.balance_of(forwarder.treasury()), Coin::ZERO);
    }

    #[test]
    fn test_supply_checked_before_payment() {
        let (controller, mut supply, mut bank, forwarder, minter) = setup();

        supply.allocate_mintable().unwrap();
        supply.allocate_mintable().unwrap();

        let result = controller.mint(
            &mut supply,
            &mut bank,
            &forwarder,
            &minter,
            Coin::from_whole(1),
        );
        assert_eq!(result, Err(RegistryError::SupplyExhausted));
        // Exhaustion must not cost the caller anything
        assert_eq!(bank.balance_of(&minter), Coin::from_whole(10));
    }
}
