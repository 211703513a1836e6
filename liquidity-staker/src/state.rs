//! Entity types held by the staker store.
//!
//! Entities refer to each other by key only: incentives by [`IncentiveId`],
//! deposits by position mint, stakes by `(mint, incentive)` and rewards by
//! `(reward_token, owner)`.

use {
    crate::fixed_point::X32,
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
    solana_pubkey::Pubkey,
    std::fmt,
};

// ---------------------------------------------------------------------------
// Incentive
// ---------------------------------------------------------------------------

/// Store-assigned incentive identifier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct IncentiveId(pub u64);

impl fmt::Display for IncentiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether rewards are weighted by vote-escrow power.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub enum BoostKind {
    /// Stakes earn on their full liquidity.
    Unboosted,
    /// Stakes earn on an effective liquidity derived from the owner's power
    /// in `locker`.
    Boosted { locker: Pubkey },
}

impl BoostKind {
    pub fn locker(&self) -> Option<&Pubkey> {
        match self {
            BoostKind::Unboosted => None,
            BoostKind::Boosted { locker } => Some(locker),
        }
    }

    pub fn is_boosted(&self) -> bool {
        matches!(self, BoostKind::Boosted { .. })
    }
}

/// Lifecycle position of an incentive at a given time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncentiveStatus {
    /// Not started and never funded.
    Created,
    /// Not started, funded at least once.
    Funded,
    /// `start_time ≤ now < end_time`; accepts stakes.
    Active,
    /// `now ≥ end_time`; may be ended once every stake is closed.
    Expired,
    /// Leftover reward refunded. Terminal.
    Ended,
}

/// A funded, time-boxed campaign over one pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Incentive {
    pub id: IncentiveId,
    /// Token paid out as reward.
    pub reward_token: Pubkey,
    /// Pool whose positions may stake.
    pub pool: Pubkey,
    /// Receives leftover reward when the incentive is ended.
    pub refundee: Pubkey,
    pub start_time: i64,
    pub end_time: i64,

    /// Reward not yet moved into reward accounts.
    pub total_reward_unclaimed: u64,

    /// Liquidity-seconds consumed by closed stakes.
    pub total_seconds_claimed_x32: X32,

    pub boost: BoostKind,

    /// Open stakes. An incentive cannot be ended while this is non-zero.
    pub number_of_stakes: u32,

    /// Set by the first `add_reward`.
    pub funded: bool,

    /// Set by `end_incentive`.
    pub ended: bool,
}

impl Incentive {
    pub fn status(&self, now: i64) -> IncentiveStatus {
        if self.ended {
            IncentiveStatus::Ended
        } else if now >= self.end_time {
            IncentiveStatus::Expired
        } else if now >= self.start_time {
            IncentiveStatus::Active
        } else if self.funded {
            IncentiveStatus::Funded
        } else {
            IncentiveStatus::Created
        }
    }

    pub fn is_funded(&self) -> bool {
        self.funded
    }
}

// ---------------------------------------------------------------------------
// Deposit / Stake / Reward
// ---------------------------------------------------------------------------

/// Custody record for one LP position NFT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Deposit {
    pub mint: Pubkey,
    pub owner: Pubkey,
    /// Escrow account holding the NFT.
    pub vault: Pubkey,
    pub pool: Pubkey,
    pub liquidity: u64,
    pub tick_lower: i32,
    pub tick_upper: i32,
    /// The incentive this position is staked in, if any.
    pub staked_in: Option<IncentiveId>,
}

impl Deposit {
    pub fn is_staked(&self) -> bool {
        self.staked_in.is_some()
    }
}

/// An open stake of one position in one incentive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct Stake {
    pub mint: Pubkey,
    pub incentive: IncentiveId,
    /// Fixed for the lifetime of the stake.
    pub liquidity: u64,
    /// Counter inside the position's range when the stake opened.
    pub seconds_per_liquidity_inside_initial_x32: X32,
}

/// Claimable balance of one reward token for one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Reward {
    pub owner: Pubkey,
    pub reward_token: Pubkey,
    pub rewards_owed: u64,
    /// `None` when the account was opened implicitly by an unstake.
    pub vault: Option<Pubkey>,
}

impl Reward {
    pub fn new(reward_token: Pubkey, owner: Pubkey, vault: Option<Pubkey>) -> Self {
        Self {
            owner,
            reward_token,
            rewards_owed: 0,
            vault,
        }
    }
}
