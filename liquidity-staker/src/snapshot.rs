//! Read-only inputs supplied by the AMM.
//!
//! The staker never reads pool state itself; the host takes these snapshots
//! at the operation's timestamp and passes them in.

use {
    crate::{error::StakerError, fixed_point::X32},
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
    solana_pubkey::Pubkey,
};

/// An LP position NFT as reported by the AMM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct TokenizedPosition {
    /// Mint of the position NFT.
    pub mint: Pubkey,
    /// Pool the position provides liquidity to.
    pub pool: Pubkey,
    /// Liquidity units held by the position.
    pub liquidity: u64,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

impl TokenizedPosition {
    pub fn check_tick_range(&self) -> Result<(), StakerError> {
        if self.tick_upper <= self.tick_lower {
            return Err(StakerError::InvalidTickRange);
        }
        Ok(())
    }
}

/// Pool counters for one position's tick range at one timestamp.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct PoolSnapshot {
    pub pool: Pubkey,
    /// Active liquidity of the whole pool.
    pub liquidity: u64,
    /// Cumulative seconds per unit of liquidity inside the position's range.
    pub seconds_per_liquidity_inside_x32: X32,
}
