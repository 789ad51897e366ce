use anchor_lang::prelude::*;
use crate::errors::ErrorCode;

const LOW_MASK: u128 = u64::MAX as u128;

/// Full 128x128 -> 256 bit product, returned as (hi, lo)
fn widening_mul(a: u128, b: u128) -> (u128, u128) {
    let (a_hi, a_lo) = (a >> 64, a & LOW_MASK);
    let (b_hi, b_lo) = (b >> 64, b & LOW_MASK);

    let lo_lo = a_lo * b_lo;
    let hi_lo = a_hi * b_lo;
    let lo_hi = a_lo * b_hi;
    let hi_hi = a_hi * b_hi;

    // Each term is < 2^64, so the sum cannot overflow
    let cross = (lo_lo >> 64) + (hi_lo & LOW_MASK) + (lo_hi & LOW_MASK);

    let lo = (cross << 64) | (lo_lo & LOW_MASK);
    let hi = hi_hi + (hi_lo >> 64) + (lo_hi >> 64) + (cross >> 64);
    (hi, lo)
}

/// floor(a * b / denominator) with a 256-bit intermediate product.
///
/// Truncates toward zero. Fails with `MathOverflow` on a zero denominator
/// or when the quotient does not fit in u128.
pub fn mul_div_floor(a: u128, b: u128, denominator: u128) -> Result<u128> {
    require!(denominator > 0, ErrorCode::MathOverflow);

    let (hi, lo) = widening_mul(a, b);
    if hi == 0 {
        return Ok(lo / denominator);
    }

    // Quotient fits in 128 bits only if the high word is below the divisor
    require!(hi < denominator, ErrorCode::MathOverflow);

    let mut remainder = hi;
    let mut quotient: u128 = 0;
    for bit in (0..128).rev() {
        let carry = remainder >> 127;
        remainder = (remainder << 1) | ((lo >> bit) & 1);
        quotient <<= 1;
        if carry == 1 || remainder >= denominator {
            remainder = remainder.wrapping_sub(denominator);
            quotient |= 1;
        }
    }

    #[cfg(feature = "verbose")]
    msg!("mul_div_floor: {} * {} / {} = {}", a, b, denominator, quotient);

    Ok(quotient)
}

/// ceil(a * b / denominator) with a 256-bit intermediate product
pub fn mul_div_ceil(a: u128, b: u128, denominator: u128) -> Result<u128> {
    let floor = mul_div_floor(a, b, denominator)?;
    if widening_mul(floor, denominator) == widening_mul(a, b) {
        Ok(floor)
    } else {
        floor.checked_add(1).ok_or_else(|| error!(ErrorCode::MathOverflow))
    }
}

/// Narrow a u128 token amount to u64, failing instead of truncating
pub fn to_token_amount(value: u128) -> Result<u64> {
    u64::try_from(value).map_err(|_| error!(ErrorCode::MathOverflow))
}

/// Format token amount with decimals for readable logs
pub fn format_tokens(amount: u64, decimals: u8) -> (u64, u64) {
    let unit = 10u64.saturating_pow(decimals as u32);
    (amount / unit, amount % unit)
}
