//! # TRv1 Liquidity Staker
//!
//! Liquidity mining for concentrated-liquidity LP positions. Operators run
//! time-boxed **incentives** over one pool; LPs deposit their position NFTs,
//! **stake** them, and earn a share of the incentive's reward proportional to
//! the liquidity-seconds their range was active. An incentive bound to a
//! vote-escrow locker **boosts** each stake by the owner's voting power.
//!
//! The crate is the accounting core only. Pool counters and voting power
//! arrive as snapshots ([`PoolSnapshot`], [`VotingPowerSource`]); token
//! movements are reported as amounts for the host to execute.
//!
//! ## Quick start
//!
//! ```rust
//! use {
//!     solana_pubkey::Pubkey,
//!     trv1_liquidity_staker::{
//!         BoostKind, NewIncentive, PoolSnapshot, Staker, StakerConfig, TokenizedPosition, X32,
//!         CLAIM_ALL,
//!     },
//! };
//!
//! let (pool, reward_token, operator, lp) = (
//!     Pubkey::new_unique(),
//!     Pubkey::new_unique(),
//!     Pubkey::new_unique(),
//!     Pubkey::new_unique(),
//! );
//! let mut staker = Staker::new(StakerConfig::default()).unwrap();
//!
//! // A 20-second campaign paying 1_000_000 reward tokens.
//! let now = 1_650_101_377;
//! let incentive = staker
//!     .create_incentive(
//!         NewIncentive {
//!             reward_token,
//!             pool,
//!             refundee: operator,
//!             start_time: now,
//!             end_time: now + 20,
//!             boost: BoostKind::Unboosted,
//!         },
//!         now,
//!     )
//!     .unwrap();
//! staker.add_reward(incentive, 1_000_000).unwrap();
//!
//! // Deposit and stake a position.
//! let position = TokenizedPosition {
//!     mint: Pubkey::new_unique(),
//!     pool,
//!     liquidity: 100_505_830,
//!     tick_lower: -60,
//!     tick_upper: 60,
//! };
//! let mint = position.mint;
//! staker.create_deposit(position, lp, Pubkey::new_unique()).unwrap();
//! let snapshot = |counter| PoolSnapshot {
//!     pool,
//!     liquidity: 100_505_830,
//!     seconds_per_liquidity_inside_x32: X32::from_raw(counter),
//! };
//! staker.stake_token(&mint, incentive, &lp, &snapshot(256), now + 2).unwrap();
//!
//! // Preview, then close the stake and claim.
//! let preview = staker.preview_reward(&mint, incentive, &snapshot(299), now + 5).unwrap();
//! let owed = staker.unstake_token(&mint, incentive, &snapshot(299), now + 5).unwrap();
//! assert_eq!(preview.reward, owed.reward);
//! assert_eq!(staker.claim_reward(&lp, &reward_token, CLAIM_ALL).unwrap(), owed.reward);
//! ```
//!
//! See [`reward_math`] for the accrual formula and [`boost`] for the
//! voting-power weighting.

#![allow(clippy::arithmetic_side_effects)]

pub mod boost;
pub mod config;
pub mod error;
pub mod events;
pub mod fixed_point;
pub mod reward_math;
pub mod snapshot;
pub mod staker;
pub mod state;
pub mod voting_power;


// Re-exports for convenience.
pub use {
    boost::{compute_boost, compute_boost_percent, Boost, VotingPower},
    config::StakerConfig,
    error::StakerError,
    events::StakerEvent,
    fixed_point::X32,
    reward_math::{
        compute_reward_amount, compute_reward_amount_boosted, BoostedRewardOwed, RewardOwed,
        RewardParams,
    },
    snapshot::{PoolSnapshot, TokenizedPosition},
    staker::{NewIncentive, Staker, CLAIM_ALL},
    state::{BoostKind, Deposit, Incentive, IncentiveId, IncentiveStatus, Reward, Stake},
    voting_power::{LockerParams, LockerSnapshot, VotingPowerSource},
};
