use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use crate::constants::*;
use crate::errors::ErrorCode;
use crate::state::*;

// ACCOUNTS - Instruction account validation structs

#[derive(Accounts)]
#[instruction(config: StakingConfig)]
pub struct Initialize<'info> {
    #[account(
        init,
        payer = owner,
        space = 8 + Registry::space(config.tiers.len(), 0),
        seeds = [REGISTRY_SEED],
        bump
    )]
    pub registry: Account<'info, Registry>,
    #[account(mut)]
    pub owner: Signer<'info>,
    pub system_program: Program<'info, System>,
}

/// CreateSession - Fund a new session and open its three vaults
///
/// The registry grows by one recorded window per session.
/// Vaults are PDAs owned by the session: ["vault", session, tag].
#[derive(Accounts)]
pub struct CreateSession<'info> {
    #[account(
        mut,
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
        has_one = owner @ ErrorCode::UnauthorizedAccess,
        realloc = 8 + Registry::space(registry.config.tiers.len(), registry.book.windows.len() + 1),
        realloc::payer = owner,
        realloc::zero = false,
    )]
    pub registry: Account<'info, Registry>,
    #[account(
        init,
        payer = owner,
        space = 8 + Session::LEN,
        seeds = [SESSION_SEED, &registry.book.next_session_id().to_le_bytes()],
        bump
    )]
    pub session: Box<Account<'info, Session>>,
    pub staking_mint: Box<InterfaceAccount<'info, Mint>>,
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,
    pub boost_mint: Box<InterfaceAccount<'info, Mint>>,
    #[account(
        init,
        payer = owner,
        seeds = [VAULT_SEED, session.key().as_ref(), STAKE_VAULT_TAG],
        bump,
        token::mint = staking_mint,
        token::authority = session,
        token::token_program = token_program,
    )]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        init,
        payer = owner,
        seeds = [VAULT_SEED, session.key().as_ref(), REWARD_VAULT_TAG],
        bump,
        token::mint = reward_mint,
        token::authority = session,
        token::token_program = token_program,
    )]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        init,
        payer = owner,
        seeds = [VAULT_SEED, session.key().as_ref(), BOOST_VAULT_TAG],
        bump,
        token::mint = boost_mint,
        token::authority = session,
        token::token_program = token_program,
    )]
    pub boost_vault: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        mut,
        token::mint = reward_mint,
        token::authority = owner,
        token::token_program = token_program,
    )]
    pub owner_reward_account: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        mut,
        token::mint = boost_mint,
        token::authority = owner,
        token::token_program = token_program,
    )]
    pub owner_boost_account: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(mut)]
    pub owner: Signer<'info>,
    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(session_id: u64)]
pub struct SetGamma<'info> {
    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
        has_one = owner @ ErrorCode::UnauthorizedAccess
    )]
    pub registry: Account<'info, Registry>,
    #[account(mut, seeds = [SESSION_SEED, &session_id.to_le_bytes()], bump = session.bump)]
    pub session: Box<Account<'info, Session>>,
    pub owner: Signer<'info>,
}

/// RecoverBoostPool - Return the boost pool of a session nobody checked in to
#[derive(Accounts)]
#[instruction(session_id: u64)]
pub struct RecoverBoostPool<'info> {
    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
        has_one = owner @ ErrorCode::UnauthorizedAccess
    )]
    pub registry: Account<'info, Registry>,
    #[account(mut, seeds = [SESSION_SEED, &session_id.to_le_bytes()], bump = session.bump)]
    pub session: Box<Account<'info, Session>>,
    #[account(address = session.boost_mint @ ErrorCode::InvalidParameterMint)]
    pub boost_mint: Box<InterfaceAccount<'info, Mint>>,
    #[account(
        mut,
        seeds = [VAULT_SEED, session.key().as_ref(), BOOST_VAULT_TAG],
        bump,
        token::mint = boost_mint,
        token::authority = session,
        token::token_program = token_program,
    )]
    pub boost_vault: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        mut,
        token::mint = boost_mint,
        token::authority = owner,
        token::token_program = token_program,
    )]
    pub owner_boost_account: Box<InterfaceAccount<'info, TokenAccount>>,
    pub owner: Signer<'info>,
    pub token_program: Interface<'info, TokenInterface>,
}

/// Deposit - Stake into a running session
///
/// The participant record is created on the first deposit.
#[derive(Accounts)]
#[instruction(session_id: u64)]
pub struct Deposit<'info> {
    #[account(seeds = [REGISTRY_SEED], bump = registry.bump)]
    pub registry: Account<'info, Registry>,
    #[account(mut, seeds = [SESSION_SEED, &session_id.to_le_bytes()], bump = session.bump)]
    pub session: Box<Account<'info, Session>>,
    #[account(
        init_if_needed,
        payer = user,
        space = 8 + Participant::LEN,
        seeds = [PARTICIPANT_SEED, session.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub participant: Box<Account<'info, Participant>>,
    #[account(address = session.staking_mint @ ErrorCode::InvalidParameterMint)]
    pub staking_mint: Box<InterfaceAccount<'info, Mint>>,
    #[account(
        mut,
        seeds = [VAULT_SEED, session.key().as_ref(), STAKE_VAULT_TAG],
        bump,
        token::mint = staking_mint,
        token::authority = session,
        token::token_program = token_program,
    )]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        mut,
        token::mint = staking_mint,
        token::authority = user,
        token::token_program = token_program,
    )]
    pub user_stake_account: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(mut)]
    pub user: Signer<'info>,
    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(session_id: u64)]
pub struct CheckIn<'info> {
    #[account(seeds = [REGISTRY_SEED], bump = registry.bump)]
    pub registry: Account<'info, Registry>,
    #[account(mut, seeds = [SESSION_SEED, &session_id.to_le_bytes()], bump = session.bump)]
    pub session: Box<Account<'info, Session>>,
    #[account(
        mut,
        seeds = [PARTICIPANT_SEED, session.key().as_ref(), user.key().as_ref()],
        bump = participant.bump
    )]
    pub participant: Box<Account<'info, Participant>>,
    pub user: Signer<'info>,
}

/// Withdraw - Principal plus both reward streams, once per participant
#[derive(Accounts)]
#[instruction(session_id: u64)]
pub struct Withdraw<'info> {
    #[account(seeds = [REGISTRY_SEED], bump = registry.bump)]
    pub registry: Account<'info, Registry>,
    #[account(mut, seeds = [SESSION_SEED, &session_id.to_le_bytes()], bump = session.bump)]
    pub session: Box<Account<'info, Session>>,
    #[account(
        mut,
        seeds = [PARTICIPANT_SEED, session.key().as_ref(), user.key().as_ref()],
        bump = participant.bump
    )]
    pub participant: Box<Account<'info, Participant>>,
    #[account(address = session.staking_mint @ ErrorCode::InvalidParameterMint)]
    pub staking_mint: Box<InterfaceAccount<'info, Mint>>,
    #[account(address = session.reward_mint @ ErrorCode::InvalidParameterMint)]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,
    #[account(address = session.boost_mint @ ErrorCode::InvalidParameterMint)]
    pub boost_mint: Box<InterfaceAccount<'info, Mint>>,
    #[account(
        mut,
        seeds = [VAULT_SEED, session.key().as_ref(), STAKE_VAULT_TAG],
        bump,
        token::mint = staking_mint,
        token::authority = session,
        token::token_program = token_program,
    )]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        mut,
        seeds = [VAULT_SEED, session.key().as_ref(), REWARD_VAULT_TAG],
        bump,
        token::mint = reward_mint,
        token::authority = session,
        token::token_program = token_program,
    )]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        mut,
        seeds = [VAULT_SEED, session.key().as_ref(), BOOST_VAULT_TAG],
        bump,
        token::mint = boost_mint,
        token::authority = session,
        token::token_program = token_program,
    )]
    pub boost_vault: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        mut,
        token::mint = staking_mint,
        token::authority = user,
        token::token_program = token_program,
    )]
    pub user_stake_account: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        mut,
        token::mint = reward_mint,
        token::authority = user,
        token::token_program = token_program,
    )]
    pub user_reward_account: Box<InterfaceAccount<'info, TokenAccount>>,
    #[account(
        mut,
        token::mint = boost_mint,
        token::authority = user,
        token::token_program = token_program,
    )]
    pub user_boost_account: Box<InterfaceAccount<'info, TokenAccount>>,
    pub user: Signer<'info>,
    pub token_program: Interface<'info, TokenInterface>,
}

// VIEWS - Read-only accounts for query instructions

#[derive(Accounts)]
pub struct RegistryView<'info> {
    #[account(seeds = [REGISTRY_SEED], bump = registry.bump)]
    pub registry: Account<'info, Registry>,
}

#[derive(Accounts)]
#[instruction(session_id: u64)]
pub struct SessionView<'info> {
    #[account(seeds = [REGISTRY_SEED], bump = registry.bump)]
    pub registry: Account<'info, Registry>,
    #[account(seeds = [SESSION_SEED, &session_id.to_le_bytes()], bump = session.bump)]
    pub session: Account<'info, Session>,
}

/// ParticipantView - `participant` may be omitted for a user who never deposited
#[derive(Accounts)]
#[instruction(session_id: u64)]
pub struct ParticipantView<'info> {
    #[account(seeds = [REGISTRY_SEED], bump = registry.bump)]
    pub registry: Account<'info, Registry>,
    #[account(seeds = [SESSION_SEED, &session_id.to_le_bytes()], bump = session.bump)]
    pub session: Account<'info, Session>,
    /// CHECK: only used as a PDA seed
    pub user: UncheckedAccount<'info>,
    #[account(
        seeds = [PARTICIPANT_SEED, session.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub participant: Option<Account<'info, Participant>>,
}
