use anchor_lang::prelude::*;
use crate::errors::ErrorCode;
use crate::helpers::fixed::Fixed;
use crate::helpers::math::to_token_amount;

/// Per (session, user) staking record
///
/// Created on first deposit and kept after withdrawal for auditability.
///
/// PDA Seeds: ["participant", session, user]
#[account]
#[derive(Debug, Default, PartialEq)]
pub struct Participant {
    pub session_id: u64,

    pub user: Pubkey,

    /// Principal deposited into the session
    pub stake: u64,

    /// ceil(stake * acc_reward_per_share) at the last stake change, in base units
    pub reward_debt: u128,

    /// Reward harvested on restake, not yet paid, in base units
    pub accumulated_reward: u128,

    /// Engagement points earned by check-ins, never decreases
    pub boost_points: u64,

    /// Timestamp of the last check-in (0 = never)
    pub last_check_in_time: i64,

    /// Set once by withdraw, then the record is frozen
    pub withdrawn: bool,

    /// PDA bump seed
    pub bump: u8,
}

impl Participant {
    /// Account size calculation:
    /// - session_id, stake, boost_points, last_check_in_time: 8 * 4 = 32 bytes
    /// - user: 32 bytes (Pubkey)
    /// - reward_debt, accumulated_reward: 16 * 2 = 32 bytes (u128)
    /// - withdrawn, bump: 2 bytes
    /// Total: 98 bytes
    pub const LEN: usize = 8 * 4 + 32 + 16 * 2 + 2;

    pub fn new(session_id: u64, user: Pubkey, bump: u8) -> Self {
        Self {
            session_id,
            user,
            bump,
            ..Default::default()
        }
    }

    /// A freshly allocated account still carries the zero user
    pub fn is_initialized(&self) -> bool {
        self.user != Pubkey::default()
    }

    pub fn ensure_active(&self) -> Result<()> {
        require!(!self.withdrawn, ErrorCode::AlreadyWithdrawn);
        Ok(())
    }

    /// Reward earned since the last stake change, truncated to base units.
    ///
    /// The debt is rounded up, so the difference can dip one unit below zero
    /// right after a stake change; it is floored at zero.
    pub fn unsettled_reward(&self, acc_reward_per_share: Fixed) -> Result<u128> {
        let earned = acc_reward_per_share.mul_floor(self.stake as u128)?;
        Ok(earned.saturating_sub(self.reward_debt))
    }

    /// Total principal reward owed at `acc_reward_per_share`
    pub fn pending_principal(&self, acc_reward_per_share: Fixed) -> Result<u64> {
        if self.withdrawn {
            return Ok(0);
        }
        let owed = self
            .accumulated_reward
            .checked_add(self.unsettled_reward(acc_reward_per_share)?)
            .ok_or(ErrorCode::MathOverflow)?;
        to_token_amount(owed)
    }

    /// Fold unsettled reward into `accumulated_reward` before the stake changes
    pub fn harvest(&mut self, acc_reward_per_share: Fixed) -> Result<()> {
        if self.stake == 0 {
            return Ok(());
        }
        let unsettled = self.unsettled_reward(acc_reward_per_share)?;
        self.accumulated_reward = self
            .accumulated_reward
            .checked_add(unsettled)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }

    /// Raise the stake and re-anchor the reward debt to the new level
    pub fn add_stake(&mut self, amount: u64, acc_reward_per_share: Fixed) -> Result<()> {
        self.stake = self.stake.checked_add(amount).ok_or(ErrorCode::MathOverflow)?;
        self.reward_debt = acc_reward_per_share.mul_ceil(self.stake as u128)?;
        Ok(())
    }

    pub fn next_check_in_time(&self, cooldown: i64) -> Result<i64> {
        self.last_check_in_time
            .checked_add(cooldown)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))
    }

    /// stake * boost_points, the participant's weight in the hybrid pool
    pub fn weighted_engagement(&self) -> Result<u128> {
        (self.stake as u128)
            .checked_mul(self.boost_points as u128)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))
    }
}
