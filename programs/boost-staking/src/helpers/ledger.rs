use anchor_lang::prelude::*;

/// The three token pots of a session
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Asset {
    /// Staking mint, holds participant principal
    Stake,
    /// Principal-reward mint, released linearly over the window
    Reward,
    /// Boost-reward mint, split at withdraw time
    Boost,
}

/// Custody of session funds.
///
/// Each call either moves the full amount or fails without moving anything.
/// Callers never issue zero-amount transfers.
pub trait Ledger {
    /// Pull `amount` of `asset` from `from` into session custody
    fn transfer_in(&mut self, asset: Asset, from: &Pubkey, amount: u64) -> Result<()>;

    /// Push `amount` of `asset` from session custody to `to`
    fn transfer_out(&mut self, asset: Asset, to: &Pubkey, amount: u64) -> Result<()>;
}
