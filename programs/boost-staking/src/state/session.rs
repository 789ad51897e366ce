use anchor_lang::prelude::*;
use crate::errors::ErrorCode;
use crate::helpers::fixed::Fixed;
use crate::helpers::ledger::Asset;
use crate::state::registry::ReentrancyGuard;

/// Owner-supplied parameters of a new session
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionParams {
    pub staking_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub boost_mint: Pubkey,
    pub total_reward: u64,
    pub check_in_pool: u64,
    pub start_time: i64,
    pub end_time: i64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Scheduled,
    InProgress,
    Ended,
}

/// One staking campaign
///
/// Never closed: stays readable for payout verification after it ends.
///
/// PDA Seeds: ["session", id.to_le_bytes()]
#[account]
#[derive(Debug, Default, PartialEq)]
pub struct Session {
    /// Session id, starting at 1
    pub id: u64,

    /// Mint participants stake
    pub staking_mint: Pubkey,

    /// Mint of the linearly released reward
    pub reward_mint: Pubkey,

    /// Mint of the check-in boost reward
    pub boost_mint: Pubkey,

    /// Principal reward funded at creation
    pub total_reward: u64,

    /// Boost pool funded at creation
    pub check_in_pool: u64,

    pub start_time: i64,

    pub end_time: i64,

    /// total_reward / (end_time - start_time), truncated
    pub reward_per_second: u64,

    /// Sum of all stakes; not reduced by withdrawals
    pub total_staked: u64,

    /// Reward earned per unit of stake since the session started
    pub acc_reward_per_share: Fixed,

    /// Accumulator is valid up to this timestamp
    pub last_accrual_time: i64,

    /// Sum of engagement points over all participants
    pub total_boost_points: u64,

    /// Sum over participants of stake * points
    pub total_weighted_engagement: u128,

    /// Share of the boost pool split by stake alone, frozen at start
    pub gamma: Fixed,

    pub participant_count: u64,

    /// Principal reward paid out so far
    pub total_principal_paid: u64,

    /// Boost reward paid out so far
    pub total_boost_paid: u64,

    /// Unused boost pool returned to the owner
    pub boost_pool_recovered: bool,

    /// PDA bump seed
    pub bump: u8,

    pub guard: ReentrancyGuard,
}

impl Session {
    /// Account size calculation:
    /// - 3 Pubkeys: 32 * 3 = 96 bytes (staking_mint, reward_mint, boost_mint)
    /// - 12 u64/i64: 8 * 12 = 96 bytes (id, total_reward, check_in_pool, start_time, end_time,
    ///   reward_per_second, total_staked, last_accrual_time, total_boost_points,
    ///   participant_count, total_principal_paid, total_boost_paid)
    /// - 2 Fixed + 1 u128: 16 * 3 = 48 bytes (acc_reward_per_share, gamma, total_weighted_engagement)
    /// - 3 u8/bool: 3 bytes (boost_pool_recovered, bump, guard)
    /// Total: 96 + 96 + 48 + 3 = 243 bytes
    pub const LEN: usize = 32 * 3 + 8 * 12 + 16 * 3 + 3;

    pub fn new(id: u64, params: &SessionParams, gamma: Fixed, bump: u8) -> Result<Self> {
        let duration = params
            .end_time
            .checked_sub(params.start_time)
            .filter(|d| *d > 0)
            .ok_or(ErrorCode::InvalidWindow)?;

        let reward_per_second = params.total_reward / duration as u64;

        Ok(Self {
            id,
            staking_mint: params.staking_mint,
            reward_mint: params.reward_mint,
            boost_mint: params.boost_mint,
            total_reward: params.total_reward,
            check_in_pool: params.check_in_pool,
            start_time: params.start_time,
            end_time: params.end_time,
            reward_per_second,
            total_staked: 0,
            acc_reward_per_share: Fixed::ZERO,
            last_accrual_time: params.start_time,
            total_boost_points: 0,
            total_weighted_engagement: 0,
            gamma,
            participant_count: 0,
            total_principal_paid: 0,
            total_boost_paid: 0,
            boost_pool_recovered: false,
            bump,
            guard: ReentrancyGuard::new(),
        })
    }

    /// Run `op` on this session with its guard held.
    ///
    /// A staged copy written back by `op` carries the held guard; it is
    /// released afterwards either way.
    pub fn guarded<T>(&mut self, op: impl FnOnce(&mut Session) -> Result<T>) -> Result<T> {
        self.guard.enter()?;
        let result = op(self);
        self.guard.exit();
        result
    }

    pub fn mint_of(&self, asset: Asset) -> Pubkey {
        match asset {
            Asset::Stake => self.staking_mint,
            Asset::Reward => self.reward_mint,
            Asset::Boost => self.boost_mint,
        }
    }

    pub fn status(&self, now: i64) -> SessionStatus {
        if now < self.start_time {
            SessionStatus::Scheduled
        } else if now <= self.end_time {
            SessionStatus::InProgress
        } else {
            SessionStatus::Ended
        }
    }

    pub fn is_in_progress(&self, now: i64) -> bool {
        self.status(now) == SessionStatus::InProgress
    }

    pub fn has_ended(&self, now: i64) -> bool {
        self.status(now) == SessionStatus::Ended
    }

    /// Bring the reward-per-share accumulator up to `min(now, end_time)`.
    ///
    /// Idempotent for a repeated timestamp. Time with nothing staked is
    /// skipped, its share of the reward is never distributed.
    pub fn accrue(&mut self, now: i64) -> Result<()> {
        let now_clamped = now.min(self.end_time);
        if now_clamped <= self.last_accrual_time {
            return Ok(());
        }

        if self.total_staked == 0 {
            self.last_accrual_time = now_clamped;
            return Ok(());
        }

        let elapsed = (now_clamped - self.last_accrual_time) as u128;
        let emitted = elapsed
            .checked_mul(self.reward_per_second as u128)
            .ok_or(ErrorCode::MathOverflow)?;
        let delta = Fixed::ratio(emitted, self.total_staked as u128)?;

        #[cfg(feature = "verbose")]
        msg!(
            "accrue: session={} elapsed={} emitted={} delta={}",
            self.id,
            elapsed,
            emitted,
            delta.raw()
        );

        self.acc_reward_per_share = self.acc_reward_per_share.checked_add(delta)?;
        self.last_accrual_time = now_clamped;
        Ok(())
    }

    /// Accumulator value as of `now`, without touching the session
    pub fn projected_acc_reward_per_share(&self, now: i64) -> Result<Fixed> {
        let mut projected = self.clone();
        projected.accrue(now)?;
        Ok(projected.acc_reward_per_share)
    }

    pub fn set_gamma(&mut self, value: Fixed, now: i64) -> Result<()> {
        require!(value <= Fixed::ONE, ErrorCode::InvalidGamma);
        require!(now < self.start_time, ErrorCode::GammaFrozen);
        self.gamma = value;
        Ok(())
    }
}
