use anchor_lang::prelude::*;
use crate::constants::*;
use crate::errors::ErrorCode;
use crate::helpers::fixed::Fixed;

/// One row of the check-in tier table
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierThreshold {
    /// Inclusive lower bound on stake, in base units of the staking mint
    pub min_stake: u64,

    /// Engagement points awarded per check-in at this tier
    pub points: u64,
}

/// Engagement rules injected at initialization
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct StakingConfig {
    /// Seconds a participant must wait between check-ins
    pub check_in_cooldown: i64,

    /// Tier table, highest `min_stake` first
    pub tiers: Vec<TierThreshold>,

    /// Gamma assigned to every new session
    pub default_gamma: Fixed,
}

impl StakingConfig {
    /// Default rules with tier thresholds expressed in `unit` base units per token
    pub fn with_stake_unit(unit: u64) -> Self {
        Self {
            check_in_cooldown: DEFAULT_CHECK_IN_COOLDOWN,
            tiers: DEFAULT_TIER_TABLE
                .iter()
                .map(|&(tokens, points)| TierThreshold {
                    min_stake: tokens.saturating_mul(unit),
                    points,
                })
                .collect(),
            default_gamma: Fixed(DEFAULT_GAMMA),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require!(self.check_in_cooldown >= 0, ErrorCode::InvalidCooldown);
        require!(
            !self.tiers.is_empty() && self.tiers.len() <= MAX_TIERS,
            ErrorCode::InvalidTierTable
        );
        require!(
            self.tiers.iter().all(|t| t.min_stake > 0 && t.points > 0),
            ErrorCode::InvalidTierTable
        );
        require!(
            self.tiers.windows(2).all(|w| w[0].min_stake > w[1].min_stake),
            ErrorCode::InvalidTierTable
        );
        require!(self.default_gamma <= Fixed::ONE, ErrorCode::InvalidGamma);
        Ok(())
    }

    /// Points a single check-in awards at `stake`, reevaluated on every call
    pub fn points_for(&self, stake: u64) -> Result<u64> {
        self.tiers
            .iter()
            .find(|t| stake >= t.min_stake)
            .map(|t| t.points)
            .ok_or_else(|| error!(ErrorCode::BelowMinimumTier))
    }

    /// - check_in_cooldown: 8 bytes (i64)
    /// - tiers: 4 bytes (vec prefix) + 16 bytes per tier
    /// - default_gamma: 16 bytes (Fixed)
    pub fn space(tier_count: usize) -> usize {
        8 + 4 + tier_count * 16 + Fixed::LEN
    }
}

/// Default rules for a 9-decimal staking mint
impl Default for StakingConfig {
    fn default() -> Self {
        Self::with_stake_unit(DEFAULT_STAKE_UNIT)
    }
}

/// A recorded [start, end) session window
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionWindow {
    pub start: i64,
    pub end: i64,
}

impl SessionWindow {
    pub const LEN: usize = 8 + 8;

    pub fn overlaps(&self, start: i64, end: i64) -> bool {
        start < self.end && end > self.start
    }
}

/// Session id allocation and the append-only window history.
///
/// Window `i` belongs to session id `i + 1`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionBook {
    /// Highest session id assigned so far (0 = none)
    pub session_count: u64,

    pub windows: Vec<SessionWindow>,
}

impl SessionBook {
    pub fn space(window_count: usize) -> usize {
        8 + 4 + window_count * SessionWindow::LEN
    }

    pub fn next_session_id(&self) -> u64 {
        self.session_count.saturating_add(1)
    }

    pub fn latest_window(&self) -> Option<&SessionWindow> {
        self.windows.last()
    }

    /// Scheduling rules for a new window, checked before anything is recorded
    pub fn validate_window(&self, start: i64, end: i64, now: i64) -> Result<()> {
        require!(start > now, ErrorCode::StartNotInFuture);
        require!(end > start, ErrorCode::InvalidWindow);
        require!(
            !self.windows.iter().any(|w| w.overlaps(start, end)),
            ErrorCode::WindowOverlap
        );
        if let Some(previous) = self.latest_window() {
            require!(now > previous.end, ErrorCode::PreviousSessionActive);
        }
        Ok(())
    }

    /// Append the window and return the id assigned to it
    pub fn record(&mut self, start: i64, end: i64) -> Result<u64> {
        let id = self
            .session_count
            .checked_add(1)
            .ok_or(ErrorCode::MathOverflow)?;
        self.windows.push(SessionWindow { start, end });
        self.session_count = id;
        Ok(id)
    }

    pub fn ensure_exists(&self, session_id: u64) -> Result<()> {
        require!(
            session_id >= 1 && session_id <= self.session_count,
            ErrorCode::SessionNotFound
        );
        Ok(())
    }

    /// Id of the session whose window contains `now`, if any
    pub fn active_session_id(&self, now: i64) -> Option<u64> {
        self.windows
            .iter()
            .rposition(|w| w.start <= now && now <= w.end)
            .map(|index| index as u64 + 1)
    }
}

/// Single-entry lock wrapped around every mutating operation.
///
/// The registry holds one for session creation; each session holds its own
/// for participant and owner operations on that session.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReentrancyGuard {
    pub status: u8,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self { status: NOT_ENTERED }
    }

    pub fn is_entered(&self) -> bool {
        self.status == ENTERED
    }

    pub fn enter(&mut self) -> Result<()> {
        require!(!self.is_entered(), ErrorCode::ReentrantCall);
        self.status = ENTERED;
        Ok(())
    }

    pub fn exit(&mut self) {
        self.status = NOT_ENTERED;
    }

    /// Run `op` with the guard held; the guard is released whatever `op` returns
    pub fn run<T>(&mut self, op: impl FnOnce() -> Result<T>) -> Result<T> {
        self.enter()?;
        let result = op();
        self.exit();
        result
    }
}

/// Global campaign registry
///
/// Owns the configuration, the session-creation guard and the session book.
/// Participant instructions only read it.
///
/// PDA Seeds: ["registry"]
#[account]
#[derive(Debug, PartialEq)]
pub struct Registry {
    /// Campaign owner, the only key allowed to create sessions and tune gamma
    pub owner: Pubkey,

    /// PDA bump seed
    pub bump: u8,

    pub guard: ReentrancyGuard,

    pub config: StakingConfig,

    pub book: SessionBook,
}

impl Registry {
    pub fn new(owner: Pubkey, config: StakingConfig, bump: u8) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            owner,
            bump,
            guard: ReentrancyGuard::new(),
            config,
            book: SessionBook::default(),
        })
    }

    /// Account size calculation:
    /// - owner: 32 bytes (Pubkey)
    /// - bump: 1 byte
    /// - guard: 1 byte
    /// - config: StakingConfig::space
    /// - book: SessionBook::space
    pub fn space(tier_count: usize, window_count: usize) -> usize {
        32 + 1 + 1 + StakingConfig::space(tier_count) + SessionBook::space(window_count)
    }

    pub fn current_session_id(&self) -> u64 {
        self.book.session_count
    }
}
