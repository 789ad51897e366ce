//! Reward accounting operations.
//!
//! Session creation runs under the registry's reentrancy guard and every other
//! mutator under the session's own guard. Each one validates before
//! touching state, stages its changes on copies, performs ledger transfers
//! and only then writes the copies back. The clock is passed in as `now`.

use anchor_lang::prelude::*;
use crate::errors::ErrorCode;
use crate::helpers::boost::{boost_breakdown, BoostBreakdown};
use crate::helpers::fixed::Fixed;
use crate::helpers::ledger::{Asset, Ledger};
use crate::state::*;

/// Both reward streams owed to a participant
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingRewards {
    pub principal_reward: u64,
    pub boost_reward: u64,
}

/// Amounts transferred by a withdrawal
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WithdrawReceipt {
    pub principal: u64,
    pub principal_reward: u64,
    pub boost: BoostBreakdown,
}

fn ensure_owner(registry_owner: &Pubkey, caller: &Pubkey) -> Result<()> {
    require_keys_eq!(*caller, *registry_owner, ErrorCode::UnauthorizedAccess);
    Ok(())
}

fn ensure_participant(session: &Session, participant: &Participant, user: &Pubkey) -> Result<()> {
    require_keys_eq!(participant.user, *user, ErrorCode::UnauthorizedAccess);
    require!(participant.session_id == session.id, ErrorCode::UnauthorizedAccess);
    Ok(())
}

fn checked_add_u64(a: u64, b: u64) -> Result<u64> {
    a.checked_add(b).ok_or_else(|| error!(ErrorCode::MathOverflow))
}

fn checked_add_u128(a: u128, b: u128) -> Result<u128> {
    a.checked_add(b).ok_or_else(|| error!(ErrorCode::MathOverflow))
}

// ══════════════════════════════════════════════════════════════════════════════
// SESSION REGISTRY
// ══════════════════════════════════════════════════════════════════════════════

/// Validate and fund a new session, then record its window.
///
/// Returns the new session; the caller persists it under the assigned id.
pub fn create_session(
    registry: &mut Registry,
    caller: &Pubkey,
    params: &SessionParams,
    bump: u8,
    now: i64,
    ledger: &mut impl Ledger,
) -> Result<Session> {
    let Registry { owner, guard, config, book, .. } = registry;
    guard.run(|| {
        ensure_owner(owner, caller)?;
        require!(params.total_reward > 0, ErrorCode::ZeroRewardAmount);
        require!(params.check_in_pool > 0, ErrorCode::ZeroCheckInPool);
        book.validate_window(params.start_time, params.end_time, now)?;

        let session = Session::new(book.next_session_id(), params, config.default_gamma, bump)?;
        if session.reward_per_second == 0 {
            msg!("Warning: total reward below window length, no principal reward will accrue");
        }

        ledger.transfer_in(Asset::Reward, caller, params.total_reward)?;
        ledger.transfer_in(Asset::Boost, caller, params.check_in_pool)?;

        let id = book.record(params.start_time, params.end_time)?;
        require!(id == session.id, ErrorCode::MathOverflow);

        msg!(
            "Session #{} created: window {}..{}, reward {} ({}/s), boost pool {}",
            id,
            params.start_time,
            params.end_time,
            params.total_reward,
            session.reward_per_second,
            params.check_in_pool
        );
        Ok(session)
    })
}

/// Change the boost split weight of a session that has not started
pub fn set_gamma(
    registry: &Registry,
    session: &mut Session,
    caller: &Pubkey,
    value: Fixed,
    now: i64,
) -> Result<()> {
    session.guarded(|session| {
        ensure_owner(&registry.owner, caller)?;
        session.set_gamma(value, now)?;
        msg!("Session #{} gamma set to {}", session.id, value.raw());
        Ok(())
    })
}

/// Return the boost pool to the owner when nobody ever checked in
pub fn recover_unused_boost_pool(
    registry: &Registry,
    session: &mut Session,
    caller: &Pubkey,
    now: i64,
    ledger: &mut impl Ledger,
) -> Result<u64> {
    session.guarded(|session| {
        ensure_owner(&registry.owner, caller)?;
        require!(session.total_boost_points == 0, ErrorCode::BoostPointsExist);
        require!(session.has_ended(now), ErrorCode::SessionNotEnded);
        require!(!session.boost_pool_recovered, ErrorCode::BoostPoolAlreadyRecovered);

        let amount = session.check_in_pool;
        ledger.transfer_out(Asset::Boost, caller, amount)?;
        session.boost_pool_recovered = true;

        msg!("Session #{}: unused boost pool of {} recovered", session.id, amount);
        Ok(amount)
    })
}

// ══════════════════════════════════════════════════════════════════════════════
// PARTICIPANT LEDGER
// ══════════════════════════════════════════════════════════════════════════════

/// Stake `amount` into a running session, harvesting reward earned on the
/// previous stake first
pub fn deposit(
    session: &mut Session,
    participant: &mut Participant,
    user: &Pubkey,
    amount: u64,
    now: i64,
    ledger: &mut impl Ledger,
) -> Result<()> {
    session.guarded(|session| {
        require!(amount > 0, ErrorCode::ZeroAmount);
        require!(session.is_in_progress(now), ErrorCode::SessionNotInProgress);
        ensure_participant(session, participant, user)?;
        participant.ensure_active()?;

        let mut next_session = session.clone();
        let mut next_participant = participant.clone();

        next_session.accrue(now)?;
        let acc = next_session.acc_reward_per_share;
        let first_deposit = next_participant.stake == 0;

        next_participant.harvest(acc)?;
        next_participant.add_stake(amount, acc)?;

        next_session.total_staked = checked_add_u64(next_session.total_staked, amount)?;
        let added_weight = (amount as u128)
            .checked_mul(next_participant.boost_points as u128)
            .ok_or(ErrorCode::MathOverflow)?;
        next_session.total_weighted_engagement =
            checked_add_u128(next_session.total_weighted_engagement, added_weight)?;
        if first_deposit {
            next_session.participant_count = checked_add_u64(next_session.participant_count, 1)?;
        }

        ledger.transfer_in(Asset::Stake, user, amount)?;

        msg!(
            "Session #{}: {} deposited {} (stake {}, total {})",
            next_session.id,
            user,
            amount,
            next_participant.stake,
            next_session.total_staked
        );

        *session = next_session;
        *participant = next_participant;
        Ok(())
    })
}

/// Award engagement points for the participant's current stake tier.
///
/// Returns the points awarded.
pub fn check_in(
    config: &StakingConfig,
    session: &mut Session,
    participant: &mut Participant,
    user: &Pubkey,
    now: i64,
) -> Result<u64> {
    session.guarded(|session| {
        require!(session.is_in_progress(now), ErrorCode::SessionNotInProgress);
        ensure_participant(session, participant, user)?;
        participant.ensure_active()?;
        require!(participant.stake > 0, ErrorCode::NoStake);
        require!(
            now >= participant.next_check_in_time(config.check_in_cooldown)?,
            ErrorCode::CheckInCooldown
        );

        let points = config.points_for(participant.stake)?;
        let boost_points = checked_add_u64(participant.boost_points, points)?;
        let total_boost_points = checked_add_u64(session.total_boost_points, points)?;
        let added_weight = (participant.stake as u128)
            .checked_mul(points as u128)
            .ok_or(ErrorCode::MathOverflow)?;
        let total_weighted_engagement =
            checked_add_u128(session.total_weighted_engagement, added_weight)?;

        participant.boost_points = boost_points;
        participant.last_check_in_time = now;
        session.total_boost_points = total_boost_points;
        session.total_weighted_engagement = total_weighted_engagement;

        msg!(
            "Session #{}: {} checked in for {} points (total {})",
            session.id,
            user,
            points,
            boost_points
        );
        Ok(points)
    })
}

/// Pay out principal and both reward streams once the session has ended.
///
/// Session totals are left untouched so every payout is computed against
/// the same final state, whatever the withdrawal order.
pub fn withdraw(
    session: &mut Session,
    participant: &mut Participant,
    user: &Pubkey,
    now: i64,
    ledger: &mut impl Ledger,
) -> Result<WithdrawReceipt> {
    session.guarded(|session| {
        ensure_participant(session, participant, user)?;
        require!(session.has_ended(now), ErrorCode::SessionNotEnded);
        require!(participant.stake > 0, ErrorCode::NoStake);
        participant.ensure_active()?;

        let mut next_session = session.clone();
        next_session.accrue(now)?;

        let principal_reward = participant.pending_principal(next_session.acc_reward_per_share)?;
        let boost = boost_breakdown(&next_session, participant)?;
        let boost_reward = boost.total()?;

        let mut next_participant = participant.clone();
        next_participant.withdrawn = true;
        next_session.total_principal_paid =
            checked_add_u64(next_session.total_principal_paid, principal_reward)?;
        next_session.total_boost_paid = checked_add_u64(next_session.total_boost_paid, boost_reward)?;

        let principal = participant.stake;
        ledger.transfer_out(Asset::Stake, user, principal)?;
        if principal_reward > 0 {
            ledger.transfer_out(Asset::Reward, user, principal_reward)?;
        }
        if boost_reward > 0 {
            ledger.transfer_out(Asset::Boost, user, boost_reward)?;
        }

        msg!(
            "Session #{}: {} withdrew {} + reward {} + boost {} ({} stake / {} hybrid)",
            next_session.id,
            user,
            principal,
            principal_reward,
            boost_reward,
            boost.stake_part,
            boost.hybrid_part
        );

        *session = next_session;
        *participant = next_participant;
        Ok(WithdrawReceipt {
            principal,
            principal_reward,
            boost,
        })
    })
}

// ══════════════════════════════════════════════════════════════════════════════
// QUERIES
// ══════════════════════════════════════════════════════════════════════════════

/// Principal reward the participant would receive at `now`
pub fn pending_principal_reward(
    session: &Session,
    participant: Option<&Participant>,
    now: i64,
) -> Result<u64> {
    match participant {
        Some(p) => p.pending_principal(session.projected_acc_reward_per_share(now)?),
        None => Ok(0),
    }
}

/// Boost reward split; an estimate while the session runs, binding after it ends
pub fn get_boost_breakdown(
    session: &Session,
    participant: Option<&Participant>,
) -> Result<BoostBreakdown> {
    match participant {
        Some(p) => boost_breakdown(session, p),
        None => Ok(BoostBreakdown::default()),
    }
}

/// Boost reward still owed (0 once withdrawn)
pub fn pending_boost_reward(session: &Session, participant: Option<&Participant>) -> Result<u64> {
    match participant {
        Some(p) if !p.withdrawn => boost_breakdown(session, p)?.total(),
        _ => Ok(0),
    }
}

pub fn get_pending_rewards(
    session: &Session,
    participant: Option<&Participant>,
    now: i64,
) -> Result<PendingRewards> {
    Ok(PendingRewards {
        principal_reward: pending_principal_reward(session, participant, now)?,
        boost_reward: pending_boost_reward(session, participant)?,
    })
}
