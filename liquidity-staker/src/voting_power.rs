//! Voting power supplied by a vote-escrow locker.
//!
//! Boosted incentives are bound to a locker. At unstake time the staker asks a
//! [`VotingPowerSource`] for the owner's power and the locker-wide total; the
//! source is the seam to the governance system and is never written to.
//!
//! [`LockerSnapshot`] is an in-memory source for a vote-escrow locker:
//!
//! ```text
//! power       = amount × max_stake_vote_multiplier
//!               × min(escrow_ends_at - now, max_stake_duration) / max_stake_duration
//! total_power = locked_supply × max_stake_vote_multiplier
//! ```
//!
//! The total is the ceiling reached if the whole supply were locked for the
//! maximum period, not the sum of current powers.

use {
    crate::{boost::VotingPower, error::StakerError},
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
    solana_pubkey::Pubkey,
    std::collections::HashMap,
};

/// Governance-side view of voting power.
pub trait VotingPowerSource {
    /// Power of `owner` in `locker` at `timestamp`.
    fn voting_power(
        &self,
        locker: &Pubkey,
        owner: &Pubkey,
        timestamp: i64,
    ) -> Result<u64, StakerError>;

    /// Locker-wide total at `timestamp`.
    fn total_voting_power(&self, locker: &Pubkey, timestamp: i64) -> Result<u64, StakerError>;

    /// Both figures as one snapshot.
    fn snapshot(
        &self,
        locker: &Pubkey,
        owner: &Pubkey,
        timestamp: i64,
    ) -> Result<VotingPower, StakerError> {
        Ok(VotingPower {
            voting_power: self.voting_power(locker, owner, timestamp)?,
            total_voting_power: self.total_voting_power(locker, timestamp)?,
        })
    }
}

/// Locker parameters that shape voting power.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct LockerParams {
    /// Power per locked token at the maximum lock duration.
    pub max_stake_vote_multiplier: u8,
    /// Lock duration, in seconds, that earns the full multiplier.
    pub max_stake_duration: u64,
}

/// Tokens one owner has locked.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct EscrowSnapshot {
    pub amount: u64,
    pub escrow_ends_at: i64,
}

impl EscrowSnapshot {
    /// Power of this escrow at `timestamp` under `params`.
    pub fn voting_power(&self, params: &LockerParams, timestamp: i64) -> Result<u64, StakerError> {
        if params.max_stake_duration == 0 || timestamp >= self.escrow_ends_at {
            return Ok(0);
        }
        let seconds_to_expiry = u64::try_from(
            self.escrow_ends_at
                .checked_sub(timestamp)
                .ok_or(StakerError::ArithmeticOverflow)?,
        )
        .map_err(|_| StakerError::ArithmeticOverflow)?;
        let relevant_duration = seconds_to_expiry.min(params.max_stake_duration);

        let power = u128::from(self.amount)
            .checked_mul(u128::from(params.max_stake_vote_multiplier))
            .and_then(|p| p.checked_mul(u128::from(relevant_duration)))
            .ok_or(StakerError::ArithmeticOverflow)?
            / u128::from(params.max_stake_duration);
        u64::try_from(power).map_err(|_| StakerError::ArithmeticOverflow)
    }
}

/// A locker and its escrows as of one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockerSnapshot {
    pub locker: Pubkey,
    pub params: LockerParams,
    /// Tokens locked across all escrows.
    pub locked_supply: u64,
    pub escrows: HashMap<Pubkey, EscrowSnapshot>,
}

impl LockerSnapshot {
    pub fn new(locker: Pubkey, params: LockerParams) -> Self {
        Self {
            locker,
            params,
            locked_supply: 0,
            escrows: HashMap::new(),
        }
    }

    /// Adds `amount` to `owner`'s escrow, extending it to `escrow_ends_at`
    /// when that is later.
    pub fn lock(
        &mut self,
        owner: Pubkey,
        amount: u64,
        escrow_ends_at: i64,
    ) -> Result<(), StakerError> {
        let locked_supply = self
            .locked_supply
            .checked_add(amount)
            .ok_or(StakerError::ArithmeticOverflow)?;
        let escrow = self.escrows.entry(owner).or_insert(EscrowSnapshot {
            amount: 0,
            escrow_ends_at,
        });
        escrow.amount = escrow
            .amount
            .checked_add(amount)
            .ok_or(StakerError::ArithmeticOverflow)?;
        escrow.escrow_ends_at = escrow.escrow_ends_at.max(escrow_ends_at);
        self.locked_supply = locked_supply;
        Ok(())
    }

    fn check_locker(&self, locker: &Pubkey) -> Result<(), StakerError> {
        if *locker != self.locker {
            return Err(StakerError::UnknownLocker);
        }
        Ok(())
    }
}

impl VotingPowerSource for LockerSnapshot {
    fn voting_power(
        &self,
        locker: &Pubkey,
        owner: &Pubkey,
        timestamp: i64,
    ) -> Result<u64, StakerError> {
        self.check_locker(locker)?;
        match self.escrows.get(owner) {
            Some(escrow) => escrow.voting_power(&self.params, timestamp),
            None => Ok(0),
        }
    }

    fn total_voting_power(&self, locker: &Pubkey, _timestamp: i64) -> Result<u64, StakerError> {
        self.check_locker(locker)?;
        self.locked_supply
            .checked_mul(u64::from(self.params.max_stake_vote_multiplier))
            .ok_or(StakerError::ArithmeticOverflow)
    }
}
