use anchor_lang::prelude::*;
use crate::constants::WAD;
use crate::errors::ErrorCode;
use crate::helpers::math::{mul_div_ceil, mul_div_floor, to_token_amount};

/// Unsigned fixed-point number scaled by `WAD` (1e18).
///
/// Every operation is checked and reports `MathOverflow` instead of
/// wrapping. Every division truncates toward zero.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Fixed(pub u128);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(WAD);
    pub const LEN: usize = 16;

    pub fn from_int(value: u64) -> Fixed {
        // u64::MAX * 1e18 < u128::MAX
        Fixed(value as u128 * WAD)
    }

    /// numerator / denominator as a fixed-point value, truncated
    pub fn ratio(numerator: u128, denominator: u128) -> Result<Fixed> {
        Ok(Fixed(mul_div_floor(numerator, WAD, denominator)?))
    }

    pub fn raw(self) -> u128 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Fixed) -> Result<Fixed> {
        self.0
            .checked_add(other.0)
            .map(Fixed)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))
    }

    pub fn checked_sub(self, other: Fixed) -> Result<Fixed> {
        self.0
            .checked_sub(other.0)
            .map(Fixed)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))
    }

    /// floor(n * self), unscaled
    pub fn mul_floor(self, n: u128) -> Result<u128> {
        mul_div_floor(n, self.0, WAD)
    }

    /// ceil(n * self), unscaled
    pub fn mul_ceil(self, n: u128) -> Result<u128> {
        mul_div_ceil(n, self.0, WAD)
    }

    /// Integer part, truncated
    pub fn to_int_floor(self) -> Result<u64> {
        to_token_amount(self.0 / WAD)
    }
}
