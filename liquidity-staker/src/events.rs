//! Events recorded by the staker store for the host to forward.

use {
    crate::{
        fixed_point::X32,
        state::{BoostKind, IncentiveId},
    },
    serde::{Deserialize, Serialize},
    solana_pubkey::Pubkey,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakerEvent {
    IncentiveCreated {
        incentive: IncentiveId,
        reward_token: Pubkey,
        pool: Pubkey,
        refundee: Pubkey,
        start_time: i64,
        end_time: i64,
        boost: BoostKind,
    },
    RewardAdded {
        incentive: IncentiveId,
        amount: u64,
        total_reward_unclaimed: u64,
    },
    DepositTransferred {
        mint: Pubkey,
        old_owner: Pubkey,
        new_owner: Pubkey,
    },
    TokenStaked {
        mint: Pubkey,
        incentive: IncentiveId,
        liquidity: u64,
    },
    TokenUnstaked {
        mint: Pubkey,
        incentive: IncentiveId,
        owner: Pubkey,
        reward: u64,
        seconds_inside_x32: X32,
        /// Present for boosted incentives.
        boost_percent: Option<u64>,
    },
    RewardClaimed {
        reward_token: Pubkey,
        owner: Pubkey,
        amount: u64,
    },
    IncentiveEnded {
        incentive: IncentiveId,
        refundee: Pubkey,
        refund: u64,
    },
}
