use anchor_lang::prelude::*;

pub mod constants;
pub mod contexts;
pub mod engine;
pub mod errors;
pub mod events;
pub mod helpers;
pub mod state;


#[cfg(test)]
mod formal_verification;

pub use constants::*;
pub use contexts::*;
pub use engine::PendingRewards;
pub use errors::ErrorCode;
pub use events::*;
pub use helpers::boost::BoostBreakdown;
pub use helpers::fixed::Fixed;
pub use state::*;

use helpers::cpi::TokenLedger;
use helpers::ledger::Asset;
use helpers::math::format_tokens;

declare_id!("3oViwSMDiFfooeB5rGEgD8FRQbascKUJ1EyFamTBsuUg");

#[program]
pub mod boost_staking {
    use super::*;

    pub fn initialize(ctx: Context<Initialize>, config: StakingConfig) -> Result<()> {
        let clock = Clock::get()?;
        let registry = &mut ctx.accounts.registry;

        registry.set_inner(Registry::new(
            ctx.accounts.owner.key(),
            config,
            ctx.bumps.registry,
        )?);

        emit!(RegistryInitialized {
            owner: registry.owner,
            check_in_cooldown: registry.config.check_in_cooldown,
            tier_count: u8::try_from(registry.config.tiers.len())
                .map_err(|_| ErrorCode::InvalidTierTable)?,
            default_gamma: registry.config.default_gamma.raw(),
            timestamp: clock.unix_timestamp,
        });

        msg!(
            "Registry initialized: owner {}, {} tiers, cooldown {}s",
            registry.owner,
            registry.config.tiers.len(),
            registry.config.check_in_cooldown
        );
        Ok(())
    }

    // ══════════════════════════════════════════════════════════════════════════
    // OWNER INSTRUCTIONS
    // ══════════════════════════════════════════════════════════════════════════

    pub fn create_session(
        ctx: Context<CreateSession>,
        total_reward: u64,
        check_in_pool: u64,
        start_time: i64,
        end_time: i64,
    ) -> Result<()> {
        let clock = Clock::get()?;
        let accounts = &mut *ctx.accounts;
        let owner = accounts.owner.key();

        let params = SessionParams {
            staking_mint: accounts.staking_mint.key(),
            reward_mint: accounts.reward_mint.key(),
            boost_mint: accounts.boost_mint.key(),
            total_reward,
            check_in_pool,
            start_time,
            end_time,
        };

        // Funding only pulls from the owner, no PDA signature involved
        let mut ledger = TokenLedger::new(
            &accounts.token_program,
            accounts.owner.to_account_info(),
            accounts.session.to_account_info(),
            &[],
        )
        .route(Asset::Reward, &accounts.reward_mint, &accounts.reward_vault, &accounts.owner_reward_account)
        .route(Asset::Boost, &accounts.boost_mint, &accounts.boost_vault, &accounts.owner_boost_account);

        let session = engine::create_session(
            &mut accounts.registry,
            &owner,
            &params,
            ctx.bumps.session,
            clock.unix_timestamp,
            &mut ledger,
        )?;
        accounts.session.set_inner(session);

        let session = &accounts.session;
        emit!(SessionCreated {
            session_id: session.id,
            staking_mint: session.staking_mint,
            reward_mint: session.reward_mint,
            boost_mint: session.boost_mint,
            total_reward: session.total_reward,
            check_in_pool: session.check_in_pool,
            start_time: session.start_time,
            end_time: session.end_time,
            reward_per_second: session.reward_per_second,
            gamma: session.gamma.raw(),
            timestamp: clock.unix_timestamp,
        });

        Ok(())
    }

    /// Gamma is a WAD-scaled fraction (1e18 == 1.0)
    pub fn set_gamma(ctx: Context<SetGamma>, session_id: u64, value: u128) -> Result<()> {
        let clock = Clock::get()?;
        let accounts = &mut *ctx.accounts;
        accounts.registry.book.ensure_exists(session_id)?;

        let owner = accounts.owner.key();
        engine::set_gamma(
            &accounts.registry,
            &mut accounts.session,
            &owner,
            Fixed(value),
            clock.unix_timestamp,
        )?;

        emit!(GammaUpdated {
            session_id,
            gamma: value,
            timestamp: clock.unix_timestamp,
        });

        Ok(())
    }

    pub fn recover_unused_boost_pool(ctx: Context<RecoverBoostPool>, session_id: u64) -> Result<()> {
        let clock = Clock::get()?;
        let accounts = &mut *ctx.accounts;
        accounts.registry.book.ensure_exists(session_id)?;

        let owner = accounts.owner.key();
        let id_bytes = session_id.to_le_bytes();
        let bump = [accounts.session.bump];
        let seeds: &[&[u8]] = &[SESSION_SEED, &id_bytes, &bump];

        let mut ledger = TokenLedger::new(
            &accounts.token_program,
            accounts.owner.to_account_info(),
            accounts.session.to_account_info(),
            seeds,
        )
        .route(Asset::Boost, &accounts.boost_mint, &accounts.boost_vault, &accounts.owner_boost_account);

        let amount = engine::recover_unused_boost_pool(
            &accounts.registry,
            &mut accounts.session,
            &owner,
            clock.unix_timestamp,
            &mut ledger,
        )?;

        emit!(BoostPoolRecovered {
            session_id,
            owner,
            amount,
            timestamp: clock.unix_timestamp,
        });

        Ok(())
    }

    // ══════════════════════════════════════════════════════════════════════════
    // PARTICIPANT INSTRUCTIONS
    // ══════════════════════════════════════════════════════════════════════════

    pub fn deposit(ctx: Context<Deposit>, session_id: u64, amount: u64) -> Result<()> {
        let clock = Clock::get()?;
        let accounts = &mut *ctx.accounts;
        accounts.registry.book.ensure_exists(session_id)?;

        let user = accounts.user.key();
        if !accounts.participant.is_initialized() {
            accounts
                .participant
                .set_inner(Participant::new(session_id, user, ctx.bumps.participant));
        }

        let mut ledger = TokenLedger::new(
            &accounts.token_program,
            accounts.user.to_account_info(),
            accounts.session.to_account_info(),
            &[],
        )
        .route(Asset::Stake, &accounts.staking_mint, &accounts.stake_vault, &accounts.user_stake_account);

        engine::deposit(
            &mut accounts.session,
            &mut accounts.participant,
            &user,
            amount,
            clock.unix_timestamp,
            &mut ledger,
        )?;

        emit!(Deposited {
            session_id,
            user,
            amount,
            stake: accounts.participant.stake,
            total_staked: accounts.session.total_staked,
            timestamp: clock.unix_timestamp,
        });

        Ok(())
    }

    pub fn check_in(ctx: Context<CheckIn>, session_id: u64) -> Result<()> {
        let clock = Clock::get()?;
        let accounts = &mut *ctx.accounts;
        accounts.registry.book.ensure_exists(session_id)?;

        let user = accounts.user.key();
        let points_awarded = engine::check_in(
            &accounts.registry.config,
            &mut accounts.session,
            &mut accounts.participant,
            &user,
            clock.unix_timestamp,
        )?;

        emit!(CheckedIn {
            session_id,
            user,
            points_awarded,
            boost_points: accounts.participant.boost_points,
            total_boost_points: accounts.session.total_boost_points,
            timestamp: clock.unix_timestamp,
        });

        Ok(())
    }

    pub fn withdraw(ctx: Context<Withdraw>, session_id: u64) -> Result<()> {
        let clock = Clock::get()?;
        let accounts = &mut *ctx.accounts;
        accounts.registry.book.ensure_exists(session_id)?;

        let user = accounts.user.key();
        let id_bytes = session_id.to_le_bytes();
        let bump = [accounts.session.bump];
        let seeds: &[&[u8]] = &[SESSION_SEED, &id_bytes, &bump];

        let mut ledger = TokenLedger::new(
            &accounts.token_program,
            accounts.user.to_account_info(),
            accounts.session.to_account_info(),
            seeds,
        )
        .route(Asset::Stake, &accounts.staking_mint, &accounts.stake_vault, &accounts.user_stake_account)
        .route(Asset::Reward, &accounts.reward_mint, &accounts.reward_vault, &accounts.user_reward_account)
        .route(Asset::Boost, &accounts.boost_mint, &accounts.boost_vault, &accounts.user_boost_account);

        let receipt = engine::withdraw(
            &mut accounts.session,
            &mut accounts.participant,
            &user,
            clock.unix_timestamp,
            &mut ledger,
        )?;

        let (whole, frac) = format_tokens(receipt.principal_reward, accounts.reward_mint.decimals);
        msg!(
            "Principal reward: {}.{:0width$} tokens",
            whole,
            frac,
            width = accounts.reward_mint.decimals as usize
        );

        emit!(Withdrawn {
            session_id,
            user,
            principal: receipt.principal,
            principal_reward: receipt.principal_reward,
            boost_stake_part: receipt.boost.stake_part,
            boost_hybrid_part: receipt.boost.hybrid_part,
            timestamp: clock.unix_timestamp,
        });

        Ok(())
    }

    // ══════════════════════════════════════════════════════════════════════════
    // VIEWS
    // ══════════════════════════════════════════════════════════════════════════

    pub fn pending_principal_reward(ctx: Context<ParticipantView>, session_id: u64) -> Result<u64> {
        ctx.accounts.registry.book.ensure_exists(session_id)?;
        let now = Clock::get()?.unix_timestamp;
        engine::pending_principal_reward(&ctx.accounts.session, ctx.accounts.participant.as_deref(), now)
    }

    pub fn pending_boost_reward(ctx: Context<ParticipantView>, session_id: u64) -> Result<u64> {
        ctx.accounts.registry.book.ensure_exists(session_id)?;
        engine::pending_boost_reward(&ctx.accounts.session, ctx.accounts.participant.as_deref())
    }

    pub fn get_pending_rewards(ctx: Context<ParticipantView>, session_id: u64) -> Result<PendingRewards> {
        ctx.accounts.registry.book.ensure_exists(session_id)?;
        let now = Clock::get()?.unix_timestamp;
        engine::get_pending_rewards(&ctx.accounts.session, ctx.accounts.participant.as_deref(), now)
    }

    pub fn get_boost_breakdown(ctx: Context<ParticipantView>, session_id: u64) -> Result<BoostBreakdown> {
        ctx.accounts.registry.book.ensure_exists(session_id)?;
        engine::get_boost_breakdown(&ctx.accounts.session, ctx.accounts.participant.as_deref())
    }

    pub fn get_session(ctx: Context<SessionView>, session_id: u64) -> Result<Session> {
        ctx.accounts.registry.book.ensure_exists(session_id)?;
        Ok(Session::clone(&ctx.accounts.session))
    }

    pub fn get_participant(ctx: Context<ParticipantView>, session_id: u64) -> Result<Participant> {
        ctx.accounts.registry.book.ensure_exists(session_id)?;
        Ok(ctx
            .accounts
            .participant
            .as_deref()
            .cloned()
            .unwrap_or_default())
    }

    pub fn current_session_id(ctx: Context<RegistryView>) -> Result<u64> {
        Ok(ctx.accounts.registry.current_session_id())
    }

    /// 0 when no session window contains the current time
    pub fn active_session_id(ctx: Context<RegistryView>) -> Result<u64> {
        let now = Clock::get()?.unix_timestamp;
        Ok(ctx.accounts.registry.book.active_session_id(now).unwrap_or(0))
    }
}
