//! Reward accrual for staked liquidity positions.
//!
//! # Math
//!
//! ```text
//! seconds_inside_x32         = (seconds_per_liquidity_inside_x32
//!                               - seconds_per_liquidity_inside_initial_x32) × liquidity
//! total_seconds_unclaimed_x32 = ((max(current_time, end_time) - start_time) << 32)
//!                               - total_seconds_claimed_x32
//! reward                     = total_reward_unclaimed × seconds_inside_x32
//!                               / total_seconds_unclaimed_x32
//! ```
//!
//! The boosted variant substitutes the effective liquidity from
//! [`crate::boost`] for `liquidity`.
//!
//! Until `end_time` the denominator spans the whole window, so every query in
//! `[start_time, end_time]` shares it. After `end_time` it keeps pace with the
//! pool counter, which is still advancing; claimed seconds therefore never
//! exceed elapsed seconds and a late stake always closes.
//!
//! Both entry points are pure: they read only their arguments, so they serve
//! for previews as well as for the final amount at unstake. Division
//! truncates, which under-pays by at most one unit per call. The result is
//! *not* capped at `total_reward_unclaimed`; the caller clamps at disbursement.

use {
    crate::{
        boost::{compute_boost, VotingPower},
        error::StakerError,
        fixed_point::{mul_div_floor, X32},
    },
    serde::{Deserialize, Serialize},
};

/// Inputs shared by both accrual formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardParams {
    /// Reward tokens the incentive still holds.
    pub total_reward_unclaimed: u64,
    /// Liquidity-seconds already paid out by finalized stakes.
    pub total_seconds_claimed_x32: X32,
    pub start_time: i64,
    pub end_time: i64,
    /// Liquidity of the stake, constant while staked.
    pub liquidity: u64,
    /// Counter inside the position's range when the stake opened.
    pub seconds_per_liquidity_inside_initial_x32: X32,
    /// Counter inside the position's range now.
    pub seconds_per_liquidity_inside_x32: X32,
    /// Must not precede `start_time`.
    pub current_time: i64,
}

/// Reward owed to a staked position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardOwed {
    /// Reward token amount.
    pub reward: u64,
    /// Liquidity-seconds inside the position's range over the stake.
    pub seconds_inside_x32: X32,
}

/// Reward owed to a staked position in a boosted incentive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoostedRewardOwed {
    pub reward: u64,
    pub seconds_inside_x32: X32,
    pub effective_liquidity: u64,
    pub boost_percent: u64,
}

impl From<BoostedRewardOwed> for RewardOwed {
    fn from(owed: BoostedRewardOwed) -> Self {
        Self {
            reward: owed.reward,
            seconds_inside_x32: owed.seconds_inside_x32,
        }
    }
}

/// Computes the reward owed to a stake weighted by its full liquidity.
pub fn compute_reward_amount(params: &RewardParams) -> Result<RewardOwed, StakerError> {
    let total_seconds_unclaimed_x32 = total_seconds_unclaimed_x32(params)?;
    let seconds_inside_x32 = seconds_inside_x32(params, params.liquidity)?;
    let reward = reward_for(params, seconds_inside_x32, total_seconds_unclaimed_x32)?;

    Ok(RewardOwed {
        reward,
        seconds_inside_x32,
    })
}

/// Computes the reward owed to a stake weighted by its boosted liquidity.
///
/// `pool_liquidity` and `voting` are snapshots taken at the time of the call;
/// the stake is credited as if its effective liquidity had been constant.
pub fn compute_reward_amount_boosted(
    params: &RewardParams,
    pool_liquidity: u64,
    voting: VotingPower,
) -> Result<BoostedRewardOwed, StakerError> {
    let total_seconds_unclaimed_x32 = total_seconds_unclaimed_x32(params)?;
    let boost = compute_boost(params.liquidity, pool_liquidity, voting)?;
    let seconds_inside_x32 = seconds_inside_x32(params, boost.effective_liquidity)?;
    let reward = reward_for(params, seconds_inside_x32, total_seconds_unclaimed_x32)?;

    Ok(BoostedRewardOwed {
        reward,
        seconds_inside_x32,
        effective_liquidity: boost.effective_liquidity,
        boost_percent: boost.boost_percent,
    })
}

fn seconds_inside_x32(params: &RewardParams, liquidity: u64) -> Result<X32, StakerError> {
    params
        .seconds_per_liquidity_inside_x32
        .checked_sub(params.seconds_per_liquidity_inside_initial_x32)?
        .checked_mul_int(liquidity)
}

/// Also checks that the query does not precede the start time.
fn total_seconds_unclaimed_x32(params: &RewardParams) -> Result<X32, StakerError> {
    if params.current_time < params.start_time {
        return Err(StakerError::RewardQueriedBeforeStart);
    }
    let elapsed = params
        .current_time
        .max(params.end_time)
        .checked_sub(params.start_time)
        .ok_or(StakerError::ArithmeticOverflow)?;
    X32::from_seconds(elapsed)?.checked_sub(params.total_seconds_claimed_x32)
}

fn reward_for(
    params: &RewardParams,
    seconds_inside_x32: X32,
    total_seconds_unclaimed_x32: X32,
) -> Result<u64, StakerError> {
    // Every liquidity-second has been claimed: nothing left to share out.
    if seconds_inside_x32 == X32::ZERO {
        return Ok(0);
    }
    mul_div_floor(
        params.total_reward_unclaimed,
        seconds_inside_x32,
        total_seconds_unclaimed_x32,
    )
}
