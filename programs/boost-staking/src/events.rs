use anchor_lang::prelude::*;

// ══════════════════════════════════════════════════════════════════════════════
// REGISTRY EVENTS
// ══════════════════════════════════════════════════════════════════════════════

/// Emitted when the registry is initialized
#[event]
pub struct RegistryInitialized {
    pub owner: Pubkey,
    pub check_in_cooldown: i64,
    pub tier_count: u8,
    pub default_gamma: u128,
    pub timestamp: i64,
}

/// Emitted when a session is created and funded
#[event]
pub struct SessionCreated {
    pub session_id: u64,
    pub staking_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub boost_mint: Pubkey,
    pub total_reward: u64,
    pub check_in_pool: u64,
    pub start_time: i64,
    pub end_time: i64,
    pub reward_per_second: u64,
    pub gamma: u128,
    pub timestamp: i64,
}

/// Emitted when the owner changes a session's gamma before it starts
#[event]
pub struct GammaUpdated {
    pub session_id: u64,
    pub gamma: u128,
    pub timestamp: i64,
}

/// Emitted when an unused boost pool is returned to the owner
#[event]
pub struct BoostPoolRecovered {
    pub session_id: u64,
    pub owner: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}

// ══════════════════════════════════════════════════════════════════════════════
// PARTICIPANT EVENTS
// ══════════════════════════════════════════════════════════════════════════════

/// Emitted on every deposit
#[event]
pub struct Deposited {
    pub session_id: u64,
    pub user: Pubkey,
    pub amount: u64,
    pub stake: u64,
    pub total_staked: u64,
    pub timestamp: i64,
}

/// Emitted on every accepted check-in
#[event]
pub struct CheckedIn {
    pub session_id: u64,
    pub user: Pubkey,
    pub points_awarded: u64,
    pub boost_points: u64,
    pub total_boost_points: u64,
    pub timestamp: i64,
}

/// Emitted when a participant withdraws principal and rewards
#[event]
pub struct Withdrawn {
    pub session_id: u64,
    pub user: Pubkey,
    pub principal: u64,
    pub principal_reward: u64,
    pub boost_stake_part: u64,
    pub boost_hybrid_part: u64,
    pub timestamp: i64,
}
