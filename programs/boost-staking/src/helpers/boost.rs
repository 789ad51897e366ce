use anchor_lang::prelude::*;
use crate::errors::ErrorCode;
use crate::helpers::math::{mul_div_floor, to_token_amount};
use crate::state::{Participant, Session};

/// A participant's boost reward, split by pool
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoostBreakdown {
    /// Share of gamma * P, proportional to stake
    pub stake_part: u64,

    /// Share of (1 - gamma) * P, proportional to stake * points
    pub hybrid_part: u64,
}

impl BoostBreakdown {
    pub fn total(&self) -> Result<u64> {
        self.stake_part
            .checked_add(self.hybrid_part)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))
    }
}

/// (stake pool, hybrid pool) for the session's gamma; they always sum to P
pub fn split_pool(session: &Session) -> Result<(u128, u128)> {
    let pool = session.check_in_pool as u128;
    let stake_pool = session.gamma.mul_floor(pool)?;
    let hybrid_pool = pool.checked_sub(stake_pool).ok_or(ErrorCode::MathOverflow)?;
    Ok((stake_pool, hybrid_pool))
}

/// Boost reward of `participant` evaluated against the session's current totals.
///
/// Nothing is paid when nobody checked in (the pool is left for recovery).
/// Otherwise every staker shares the stake pool by stake, and engaged
/// participants share the hybrid pool by stake * points. All shares truncate.
pub fn boost_breakdown(session: &Session, participant: &Participant) -> Result<BoostBreakdown> {
    if session.total_boost_points == 0 || participant.stake == 0 || session.total_staked == 0 {
        return Ok(BoostBreakdown::default());
    }

    let (stake_pool, hybrid_pool) = split_pool(session)?;

    let stake_part = mul_div_floor(
        stake_pool,
        participant.stake as u128,
        session.total_staked as u128,
    )?;

    let hybrid_part = if participant.boost_points == 0 {
        0
    } else {
        let own = participant.weighted_engagement()?;
        let total = session.total_weighted_engagement;
        if total <= own {
            // sole engaged participant takes the whole hybrid pool
            hybrid_pool
        } else {
            mul_div_floor(hybrid_pool, own, total)?
        }
    };

    #[cfg(feature = "verbose")]
    msg!(
        "boost_breakdown: user={} stake_part={} hybrid_part={}",
        participant.user,
        stake_part,
        hybrid_part
    );

    Ok(BoostBreakdown {
        stake_part: to_token_amount(stake_part)?,
        hybrid_part: to_token_amount(hybrid_part)?,
    })
}
