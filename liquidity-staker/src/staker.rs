//! The keyed store and the incentive/deposit/stake/reward lifecycle.
//!
//! Every operation checks all of its preconditions and builds the new entity
//! values before writing any of them, so a failed call leaves the store
//! untouched. The store performs no locking; the host serializes mutations.
//!
//! Reward amounts come from the pure functions in [`crate::reward_math`]. The
//! store only supplies their inputs and applies their outputs.

use {
    crate::{
        boost::{base_liquidity, VotingPower, MIN_BOOSTABLE_LIQUIDITY},
        config::{validate_config, StakerConfig},
        error::StakerError,
        events::StakerEvent,
        fixed_point::X32,
        reward_math::{
            compute_reward_amount, compute_reward_amount_boosted, BoostedRewardOwed, RewardOwed,
            RewardParams,
        },
        snapshot::{PoolSnapshot, TokenizedPosition},
        state::{BoostKind, Deposit, Incentive, IncentiveId, IncentiveStatus, Reward, Stake},
        voting_power::VotingPowerSource,
    },
    log::*,
    solana_pubkey::Pubkey,
    std::collections::HashMap,
};

/// `amount_requested` that claims the whole owed balance.
pub const CLAIM_ALL: u64 = u64::MAX;

/// Arguments to [`Staker::create_incentive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewIncentive {
    pub reward_token: Pubkey,
    pub pool: Pubkey,
    pub refundee: Pubkey,
    pub start_time: i64,
    pub end_time: i64,
    pub boost: BoostKind,
}

/// In-memory store of every staker entity.
#[derive(Debug, Default)]
pub struct Staker {
    config: StakerConfig,
    next_incentive_id: u64,
    incentives: HashMap<IncentiveId, Incentive>,
    deposits: HashMap<Pubkey, Deposit>,
    stakes: HashMap<(Pubkey, IncentiveId), Stake>,
    /// Keyed by `(reward_token, owner)`.
    rewards: HashMap<(Pubkey, Pubkey), Reward>,
    events: Vec<StakerEvent>,
}

impl Staker {
    pub fn new(config: StakerConfig) -> Result<Self, StakerError> {
        validate_config(&config)?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &StakerConfig {
        &self.config
    }

    // -- Queries --

    pub fn incentive(&self, id: IncentiveId) -> Result<&Incentive, StakerError> {
        self.incentives.get(&id).ok_or(StakerError::IncentiveNotFound)
    }

    pub fn deposit(&self, mint: &Pubkey) -> Result<&Deposit, StakerError> {
        self.deposits.get(mint).ok_or(StakerError::DepositNotFound)
    }

    pub fn stake(&self, mint: &Pubkey, incentive: IncentiveId) -> Result<&Stake, StakerError> {
        self.stakes
            .get(&(*mint, incentive))
            .ok_or(StakerError::StakeNotFound)
    }

    pub fn reward(&self, reward_token: &Pubkey, owner: &Pubkey) -> Result<&Reward, StakerError> {
        self.rewards
            .get(&(*reward_token, *owner))
            .ok_or(StakerError::RewardAccountNotFound)
    }

    /// Drains the events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<StakerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Reward an unboosted stake would receive if it were closed now.
    pub fn preview_reward(
        &self,
        mint: &Pubkey,
        incentive_id: IncentiveId,
        pool: &PoolSnapshot,
        now: i64,
    ) -> Result<RewardOwed, StakerError> {
        let stake = self.stake(mint, incentive_id)?;
        let incentive = self.incentive(incentive_id)?;
        if incentive.boost.is_boosted() {
            return Err(StakerError::IncentiveIsBoosted);
        }
        check_pool(incentive, pool)?;
        compute_reward_amount(&reward_params(incentive, stake, pool, now))
    }

    /// Reward a boosted stake would receive if its owner closed it now.
    pub fn preview_reward_boosted(
        &self,
        mint: &Pubkey,
        incentive_id: IncentiveId,
        pool: &PoolSnapshot,
        voting: &impl VotingPowerSource,
        now: i64,
    ) -> Result<BoostedRewardOwed, StakerError> {
        let stake = self.stake(mint, incentive_id)?;
        let incentive = self.incentive(incentive_id)?;
        let BoostKind::Boosted { locker } = incentive.boost else {
            return Err(StakerError::IncentiveNotBoosted);
        };
        let owner = self.deposit(mint)?.owner;
        check_pool(incentive, pool)?;
        let voting_power = voting_power_at(voting, &locker, &owner, now)?;
        compute_reward_amount_boosted(
            &reward_params(incentive, stake, pool, now),
            pool.liquidity,
            voting_power,
        )
    }

    // -- Incentives --

    pub fn create_incentive(
        &mut self,
        params: NewIncentive,
        now: i64,
    ) -> Result<IncentiveId, StakerError> {
        self.config
            .check_incentive_window(params.start_time, params.end_time, now)?;
        let id = IncentiveId(self.next_incentive_id);
        let next_incentive_id = self
            .next_incentive_id
            .checked_add(1)
            .ok_or(StakerError::ArithmeticOverflow)?;

        let incentive = Incentive {
            id,
            reward_token: params.reward_token,
            pool: params.pool,
            refundee: params.refundee,
            start_time: params.start_time,
            end_time: params.end_time,
            total_reward_unclaimed: 0,
            total_seconds_claimed_x32: X32::ZERO,
            boost: params.boost,
            number_of_stakes: 0,
            funded: false,
            ended: false,
        };

        self.next_incentive_id = next_incentive_id;
        self.incentives.insert(id, incentive);
        info!(
            "Created incentive {id} on pool {} for [{}, {})",
            params.pool, params.start_time, params.end_time
        );
        self.events.push(StakerEvent::IncentiveCreated {
            incentive: id,
            reward_token: params.reward_token,
            pool: params.pool,
            refundee: params.refundee,
            start_time: params.start_time,
            end_time: params.end_time,
            boost: params.boost,
        });
        Ok(id)
    }

    /// Returns the new `total_reward_unclaimed`.
    pub fn add_reward(&mut self, incentive_id: IncentiveId, amount: u64) -> Result<u64, StakerError> {
        let incentive = self.incentive(incentive_id)?;
        if incentive.ended {
            warn!("Refusing to fund ended incentive {incentive_id}");
            return Err(StakerError::IncentiveAlreadyEnded);
        }
        let total_reward_unclaimed = incentive
            .total_reward_unclaimed
            .checked_add(amount)
            .ok_or(StakerError::ArithmeticOverflow)?;

        let incentive = self
            .incentives
            .get_mut(&incentive_id)
            .ok_or(StakerError::IncentiveNotFound)?;
        incentive.total_reward_unclaimed = total_reward_unclaimed;
        incentive.funded = true;

        info!("Added {amount} reward to incentive {incentive_id}");
        self.events.push(StakerEvent::RewardAdded {
            incentive: incentive_id,
            amount,
            total_reward_unclaimed,
        });
        Ok(total_reward_unclaimed)
    }

    /// Ends an expired incentive with no open stakes and returns the refund
    /// owed to its refundee.
    pub fn end_incentive(&mut self, incentive_id: IncentiveId, now: i64) -> Result<u64, StakerError> {
        let incentive = self.incentive(incentive_id)?;
        if incentive.ended {
            return Err(StakerError::IncentiveAlreadyEnded);
        }
        if now < incentive.end_time {
            warn!(
                "Incentive {incentive_id} cannot end before {} (now {now})",
                incentive.end_time
            );
            return Err(StakerError::IncentiveNotExpired);
        }
        if incentive.number_of_stakes > 0 {
            warn!(
                "Incentive {incentive_id} still has {} open stakes",
                incentive.number_of_stakes
            );
            return Err(StakerError::IncentiveHasOpenStakes);
        }

        let incentive = self
            .incentives
            .get_mut(&incentive_id)
            .ok_or(StakerError::IncentiveNotFound)?;
        let refund = std::mem::take(&mut incentive.total_reward_unclaimed);
        incentive.ended = true;
        let refundee = incentive.refundee;

        info!("Ended incentive {incentive_id}, refunding {refund} to {refundee}");
        self.events.push(StakerEvent::IncentiveEnded {
            incentive: incentive_id,
            refundee,
            refund,
        });
        Ok(refund)
    }

    // -- Deposits --

    pub fn create_deposit(
        &mut self,
        position: TokenizedPosition,
        owner: Pubkey,
        vault: Pubkey,
    ) -> Result<(), StakerError> {
        if self.deposits.contains_key(&position.mint) {
            return Err(StakerError::DepositAlreadyExists);
        }
        position.check_tick_range()?;

        let deposit = Deposit {
            mint: position.mint,
            owner,
            vault,
            pool: position.pool,
            liquidity: position.liquidity,
            tick_lower: position.tick_lower,
            tick_upper: position.tick_upper,
            staked_in: None,
        };
        debug!("Deposited position {} owned by {owner}", position.mint);
        self.deposits.insert(position.mint, deposit);
        Ok(())
    }

    /// Hands the deposit to `new_owner`. Open stakes stay open and pay the new
    /// owner when they close.
    pub fn transfer_deposit(
        &mut self,
        mint: &Pubkey,
        caller: &Pubkey,
        new_owner: Pubkey,
    ) -> Result<(), StakerError> {
        let deposit = self
            .deposits
            .get_mut(mint)
            .ok_or(StakerError::DepositNotFound)?;
        if deposit.owner != *caller {
            return Err(StakerError::OnlyOwnerCanTransferDeposit);
        }
        let old_owner = std::mem::replace(&mut deposit.owner, new_owner);

        info!("Transferred deposit {mint} from {old_owner} to {new_owner}");
        self.events.push(StakerEvent::DepositTransferred {
            mint: *mint,
            old_owner,
            new_owner,
        });
        Ok(())
    }

    /// Releases custody of the position and returns its deposit record.
    pub fn withdraw_token(&mut self, mint: &Pubkey, caller: &Pubkey) -> Result<Deposit, StakerError> {
        let deposit = self.deposit(mint)?;
        if deposit.owner != *caller {
            return Err(StakerError::OnlyOwnerCanWithdrawToken);
        }
        if let Some(incentive) = deposit.staked_in {
            warn!("Position {mint} is still staked in incentive {incentive}");
            return Err(StakerError::CannotWithdrawTokenWhileStaked);
        }
        debug!("Withdrew position {mint}");
        self.deposits
            .remove(mint)
            .ok_or(StakerError::DepositNotFound)
    }

    // -- Rewards --

    pub fn create_reward_account(
        &mut self,
        reward_token: Pubkey,
        owner: Pubkey,
        vault: Pubkey,
    ) -> Result<(), StakerError> {
        let key = (reward_token, owner);
        if self.rewards.contains_key(&key) {
            return Err(StakerError::RewardAccountAlreadyExists);
        }
        self.rewards
            .insert(key, Reward::new(reward_token, owner, Some(vault)));
        Ok(())
    }

    /// Pays out `min(amount_requested, rewards_owed)` and returns the payout.
    /// Pass [`CLAIM_ALL`] to claim the whole balance.
    pub fn claim_reward(
        &mut self,
        owner: &Pubkey,
        reward_token: &Pubkey,
        amount_requested: u64,
    ) -> Result<u64, StakerError> {
        let reward = self
            .rewards
            .get_mut(&(*reward_token, *owner))
            .ok_or(StakerError::RewardAccountNotFound)?;
        let payout = amount_requested.min(reward.rewards_owed);
        reward.rewards_owed = reward
            .rewards_owed
            .checked_sub(payout)
            .ok_or(StakerError::ArithmeticUnderflow)?;

        info!("Claimed {payout} of {reward_token} for {owner}");
        self.events.push(StakerEvent::RewardClaimed {
            reward_token: *reward_token,
            owner: *owner,
            amount: payout,
        });
        Ok(payout)
    }

    // -- Stakes --

    pub fn stake_token(
        &mut self,
        mint: &Pubkey,
        incentive_id: IncentiveId,
        caller: &Pubkey,
        pool: &PoolSnapshot,
        now: i64,
    ) -> Result<(), StakerError> {
        let incentive = self.incentive(incentive_id)?;
        let deposit = self.deposit(mint)?;

        if deposit.owner != *caller {
            return Err(StakerError::OnlyOwnerCanStakeToken);
        }
        match incentive.status(now) {
            IncentiveStatus::Active => {}
            IncentiveStatus::Ended => return Err(StakerError::IncentiveAlreadyEnded),
            IncentiveStatus::Expired => {
                warn!("Incentive {incentive_id} expired at {}", incentive.end_time);
                return Err(StakerError::IncentiveExpired);
            }
            IncentiveStatus::Created | IncentiveStatus::Funded => {
                warn!("Incentive {incentive_id} has not started (starts {})", incentive.start_time);
                return Err(StakerError::IncentiveNotStarted);
            }
        }
        if deposit.pool != incentive.pool {
            return Err(StakerError::TokenPoolIsNotTheIncentivePool);
        }
        check_pool(incentive, pool)?;
        if deposit.liquidity == 0 {
            return Err(StakerError::CannotStakeTokenWithZeroLiquidity);
        }
        if incentive.boost.is_boosted() && base_liquidity(deposit.liquidity)? == 0 {
            warn!(
                "Position {mint} has liquidity {}, below the boostable minimum {MIN_BOOSTABLE_LIQUIDITY}",
                deposit.liquidity
            );
            return Err(StakerError::LiquidityTooLowToBoost);
        }
        if let Some(staked_in) = deposit.staked_in {
            warn!("Position {mint} is already staked in incentive {staked_in}");
            return Err(StakerError::TokenAlreadyStaked);
        }

        let number_of_stakes = incentive
            .number_of_stakes
            .checked_add(1)
            .ok_or(StakerError::ArithmeticOverflow)?;
        let stake = Stake {
            mint: *mint,
            incentive: incentive_id,
            liquidity: deposit.liquidity,
            seconds_per_liquidity_inside_initial_x32: pool.seconds_per_liquidity_inside_x32,
        };

        if let Some(incentive) = self.incentives.get_mut(&incentive_id) {
            incentive.number_of_stakes = number_of_stakes;
        }
        if let Some(deposit) = self.deposits.get_mut(mint) {
            deposit.staked_in = Some(incentive_id);
        }
        self.stakes.insert((*mint, incentive_id), stake);

        info!(
            "Staked position {mint} in incentive {incentive_id} with liquidity {}",
            stake.liquidity
        );
        self.events.push(StakerEvent::TokenStaked {
            mint: *mint,
            incentive: incentive_id,
            liquidity: stake.liquidity,
        });
        Ok(())
    }

    /// Closes a stake in an unboosted incentive and credits its reward to the
    /// deposit owner. Anyone may close a stake; the reward always goes to the
    /// owner.
    ///
    /// The returned reward is the amount actually credited.
    pub fn unstake_token(
        &mut self,
        mint: &Pubkey,
        incentive_id: IncentiveId,
        pool: &PoolSnapshot,
        now: i64,
    ) -> Result<RewardOwed, StakerError> {
        let stake = *self.stake(mint, incentive_id)?;
        let incentive = self.incentive(incentive_id)?;
        if incentive.boost.is_boosted() {
            return Err(StakerError::IncentiveIsBoosted);
        }
        check_pool(incentive, pool)?;
        let owed = compute_reward_amount(&reward_params(incentive, &stake, pool, now))?;

        let reward = self.close_stake(&stake, owed.reward, owed.seconds_inside_x32, None)?;
        Ok(RewardOwed { reward, ..owed })
    }

    /// Closes a stake in a boosted incentive, weighting it by the owner's
    /// voting power at `now`. Only the deposit owner may do this.
    pub fn unstake_token_boosted(
        &mut self,
        mint: &Pubkey,
        incentive_id: IncentiveId,
        caller: &Pubkey,
        pool: &PoolSnapshot,
        voting: &impl VotingPowerSource,
        now: i64,
    ) -> Result<BoostedRewardOwed, StakerError> {
        let stake = *self.stake(mint, incentive_id)?;
        let incentive = self.incentive(incentive_id)?;
        let BoostKind::Boosted { locker } = incentive.boost else {
            return Err(StakerError::IncentiveNotBoosted);
        };
        if self.deposit(mint)?.owner != *caller {
            return Err(StakerError::OnlyOwnerCanUnstakeFromBoostedIncentive);
        }
        check_pool(incentive, pool)?;
        let voting_power = voting_power_at(voting, &locker, caller, now)?;
        let owed = compute_reward_amount_boosted(
            &reward_params(incentive, &stake, pool, now),
            pool.liquidity,
            voting_power,
        )?;
        debug!(
            "Boost for {mint}: {}% of base, effective liquidity {}",
            owed.boost_percent, owed.effective_liquidity
        );

        let reward = self.close_stake(
            &stake,
            owed.reward,
            owed.seconds_inside_x32,
            Some(owed.boost_percent),
        )?;
        Ok(BoostedRewardOwed { reward, ..owed })
    }

    /// Moves `reward` (clamped to what the incentive still holds) into the
    /// owner's reward account and removes the stake.
    fn close_stake(
        &mut self,
        stake: &Stake,
        reward: u64,
        seconds_inside_x32: X32,
        boost_percent: Option<u64>,
    ) -> Result<u64, StakerError> {
        let mut incentive = self.incentive(stake.incentive)?.clone();
        let mut deposit = self.deposit(&stake.mint)?.clone();

        let paid = reward.min(incentive.total_reward_unclaimed);
        incentive.total_reward_unclaimed = incentive
            .total_reward_unclaimed
            .checked_sub(paid)
            .ok_or(StakerError::ArithmeticUnderflow)?;
        incentive.total_seconds_claimed_x32 = incentive
            .total_seconds_claimed_x32
            .checked_add(seconds_inside_x32)?;
        incentive.number_of_stakes = incentive
            .number_of_stakes
            .checked_sub(1)
            .ok_or(StakerError::ArithmeticUnderflow)?;
        deposit.staked_in = None;

        let key = (incentive.reward_token, deposit.owner);
        let mut reward_account = self
            .rewards
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Reward::new(incentive.reward_token, deposit.owner, None));
        reward_account.rewards_owed = reward_account
            .rewards_owed
            .checked_add(paid)
            .ok_or(StakerError::ArithmeticOverflow)?;

        let owner = deposit.owner;
        self.stakes.remove(&(stake.mint, stake.incentive));
        self.incentives.insert(stake.incentive, incentive);
        self.deposits.insert(stake.mint, deposit);
        self.rewards.insert(key, reward_account);

        info!(
            "Unstaked position {} from incentive {}, credited {paid} to {owner}",
            stake.mint, stake.incentive
        );
        self.events.push(StakerEvent::TokenUnstaked {
            mint: stake.mint,
            incentive: stake.incentive,
            owner,
            reward: paid,
            seconds_inside_x32,
            boost_percent,
        });
        Ok(paid)
    }
}

fn check_pool(incentive: &Incentive, pool: &PoolSnapshot) -> Result<(), StakerError> {
    if pool.pool != incentive.pool {
        return Err(StakerError::PoolMismatch);
    }
    Ok(())
}

/// An empty locker boosts nothing: its stakes close at the 40% floor.
fn voting_power_at(
    voting: &impl VotingPowerSource,
    locker: &Pubkey,
    owner: &Pubkey,
    now: i64,
) -> Result<VotingPower, StakerError> {
    let voting_power = voting.snapshot(locker, owner, now)?;
    if voting_power.total_voting_power == 0 {
        debug!("Locker {locker} has no voting supply at {now}, using the boost floor");
        return Ok(VotingPower::NONE);
    }
    Ok(voting_power)
}

fn reward_params(
    incentive: &Incentive,
    stake: &Stake,
    pool: &PoolSnapshot,
    now: i64,
) -> RewardParams {
    trace!(
        "Reward inputs for {}: counter {} -> {}",
        stake.mint,
        stake.seconds_per_liquidity_inside_initial_x32,
        pool.seconds_per_liquidity_inside_x32
    );
    RewardParams {
        total_reward_unclaimed: incentive.total_reward_unclaimed,
        total_seconds_claimed_x32: incentive.total_seconds_claimed_x32,
        start_time: incentive.start_time,
        end_time: incentive.end_time,
        liquidity: stake.liquidity,
        seconds_per_liquidity_inside_initial_x32: stake.seconds_per_liquidity_inside_initial_x32,
        seconds_per_liquidity_inside_x32: pool.seconds_per_liquidity_inside_x32,
        current_time: now,
    }
}
