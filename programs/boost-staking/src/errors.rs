use anchor_lang::prelude::*;

/// Boost Staking Error Codes
///
/// Validation and state errors are raised before any account is mutated.
/// Ledger failures abort the whole instruction.
#[error_code]
pub enum ErrorCode {
    // Session creation
    #[msg("Total reward must be greater than zero")]
    ZeroRewardAmount,

    #[msg("Check-in reward pool must be greater than zero")]
    ZeroCheckInPool,

    #[msg("Session must start in the future")]
    StartNotInFuture,

    #[msg("Session end must be after its start")]
    InvalidWindow,

    #[msg("Session window overlaps a recorded window")]
    WindowOverlap,

    #[msg("Previous session has not ended yet")]
    PreviousSessionActive,

    #[msg("Session not found")]
    SessionNotFound,

    // Gamma
    #[msg("Gamma must be within 0..=1e18")]
    InvalidGamma,

    #[msg("Gamma is frozen once the session has started")]
    GammaFrozen,

    // Participant flow
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Session is not in progress")]
    SessionNotInProgress,

    #[msg("Session has not ended yet")]
    SessionNotEnded,

    #[msg("Nothing staked in this session")]
    NoStake,

    #[msg("Already withdrawn from this session")]
    AlreadyWithdrawn,

    #[msg("Check-in cooldown has not expired")]
    CheckInCooldown,

    #[msg("Stake is below the lowest check-in tier")]
    BelowMinimumTier,

    // Boost pool recovery
    #[msg("Boost points exist - pool belongs to participants")]
    BoostPointsExist,

    #[msg("Boost pool already recovered")]
    BoostPoolAlreadyRecovered,

    // Configuration
    #[msg("Tier table must be non-empty, strictly descending and non-zero")]
    InvalidTierTable,

    #[msg("Check-in cooldown must not be negative")]
    InvalidCooldown,

    // Access / guard
    #[msg("Unauthorized")]
    UnauthorizedAccess,

    #[msg("Reentrant call")]
    ReentrantCall,

    // Ledger
    #[msg("No vault routed for asset")]
    AssetNotRouted,

    #[msg("Mint does not match the session")]
    InvalidParameterMint,

    #[msg("Insufficient funds")]
    InsufficientFunds,

    #[msg("Math overflow")]
    MathOverflow,
}
