//! Vote-escrow boost weighting.
//!
//! A stake in a boosted incentive earns on an *effective* liquidity between
//! 40% and 100% of its real liquidity. The unconditional 40% is the floor; the
//! remaining 60% is unlocked in proportion to the owner's share of the
//! locker's voting power, measured against the pool's total liquidity:
//!
//! ```text
//! base_liquidity      = liquidity × 4 / 10
//! voting_share        = pool_liquidity × voting_power / total_voting_power
//! boosted_liquidity   = base_liquidity + voting_share × 6 / 10
//! effective_liquidity = min(boosted_liquidity, liquidity)
//! boost_percent       = min(effective_liquidity × 100 / base_liquidity, 250)
//! ```
//!
//! All divisions truncate.

use {
    crate::{error::StakerError, fixed_point::mul_div_floor_u64},
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
};

/// Numerator of the unconditional liquidity weight (40%).
pub const BASE_LIQUIDITY_NUMERATOR: u64 = 4;

/// Numerator of the voting-power-scaled weight (60%).
pub const BOOST_LIQUIDITY_NUMERATOR: u64 = 6;

/// Denominator shared by both weights.
pub const LIQUIDITY_WEIGHT_DENOMINATOR: u64 = 10;

/// Boost of a stake with no voting power.
pub const MIN_BOOST_PERCENT: u64 = 100;

/// `100 × 10 / 4`: effective liquidity never exceeds real liquidity.
pub const MAX_BOOST_PERCENT: u64 = 250;

/// Smallest liquidity with a non-zero base.
pub const MIN_BOOSTABLE_LIQUIDITY: u64 = 3;

/// A voter's power and the locker-wide total, as of one timestamp.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct VotingPower {
    pub voting_power: u64,
    pub total_voting_power: u64,
}

impl VotingPower {
    /// No votes against a non-empty supply: weighs a stake at the floor.
    pub const NONE: Self = Self {
        voting_power: 0,
        total_voting_power: 1,
    };
}

/// Output of the boost calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boost {
    /// Liquidity the stake earns on, `≤ liquidity`.
    pub effective_liquidity: u64,
    /// `effective_liquidity` relative to the 40% floor, in `[100, 250]`.
    pub boost_percent: u64,
}

/// Computes effective liquidity and boost percent for one position.
///
/// Zero `total_voting_power` and a position too small to have a non-zero
/// base liquidity are precondition violations.
pub fn compute_boost(
    liquidity: u64,
    pool_liquidity: u64,
    voting: VotingPower,
) -> Result<Boost, StakerError> {
    if voting.total_voting_power == 0 {
        return Err(StakerError::ZeroTotalVotingPower);
    }
    let base_liquidity = base_liquidity(liquidity)?;
    if base_liquidity == 0 {
        return Err(StakerError::ZeroBaseLiquidity);
    }

    // A share of u64::MAX already lifts any position to its full liquidity,
    // so clamping there leaves the min below unchanged.
    let voting_share = (u128::from(pool_liquidity)
        .checked_mul(u128::from(voting.voting_power))
        .ok_or(StakerError::ArithmeticOverflow)?
        / u128::from(voting.total_voting_power))
    .min(u128::from(u64::MAX));
    let boost_share = voting_share
        .checked_mul(u128::from(BOOST_LIQUIDITY_NUMERATOR))
        .ok_or(StakerError::ArithmeticOverflow)?
        / u128::from(LIQUIDITY_WEIGHT_DENOMINATOR);
    let boosted_liquidity = u128::from(base_liquidity)
        .checked_add(boost_share)
        .ok_or(StakerError::ArithmeticOverflow)?;

    // min with a u64 always narrows losslessly.
    let effective_liquidity = boosted_liquidity.min(u128::from(liquidity)) as u64;

    let boost_percent = mul_div_floor_u64(effective_liquidity, 100, base_liquidity)?
        .min(MAX_BOOST_PERCENT);

    Ok(Boost {
        effective_liquidity,
        boost_percent,
    })
}

/// The unconditional 40% of `liquidity`. Zero for positions below
/// [`MIN_BOOSTABLE_LIQUIDITY`].
pub fn base_liquidity(liquidity: u64) -> Result<u64, StakerError> {
    mul_div_floor_u64(liquidity, BASE_LIQUIDITY_NUMERATOR, LIQUIDITY_WEIGHT_DENOMINATOR)
}

/// Boost percent only, for display next to a position.
pub fn compute_boost_percent(
    liquidity: u64,
    pool_liquidity: u64,
    voting_power: u64,
    total_voting_power: u64,
) -> Result<u64, StakerError> {
    let voting = VotingPower {
        voting_power,
        total_voting_power,
    };
    compute_boost(liquidity, pool_liquidity, voting).map(|boost| boost.boost_percent)
}
