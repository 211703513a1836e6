//! Fuzz the staker store with arbitrary operation sequences.
//!
//! Goals:
//! - Find panics in any sequence of lifecycle operations.
//! - Verify reward tokens are conserved: everything added is either still in
//!   an incentive, owed to an owner, claimed, or refunded.
//! - Verify `number_of_stakes` matches the open stakes of each incentive.
//! - Verify a failed operation records no event.

#![no_main]

use {
    arbitrary::Arbitrary,
    libfuzzer_sys::fuzz_target,
    solana_pubkey::Pubkey,
    trv1_liquidity_staker::{
        BoostKind, IncentiveId, NewIncentive, PoolSnapshot, Staker, StakerConfig,
        TokenizedPosition, X32,
    },
};

const OWNERS: u8 = 3;
const MINTS: u8 = 4;
const POOL_LIQUIDITY: u128 = 1 << 24;
const START: i64 = 1_650_000_000;

#[derive(Debug, Arbitrary)]
enum Op {
    CreateIncentive { start_offset: u16, duration: u16 },
    AddReward { incentive: u8, amount: u32 },
    Deposit { mint: u8, owner: u8, liquidity: u16 },
    Transfer { mint: u8, caller: u8, new_owner: u8 },
    Withdraw { mint: u8, caller: u8 },
    Stake { mint: u8, incentive: u8, caller: u8 },
    Unstake { mint: u8, incentive: u8 },
    Claim { owner: u8, amount: u32 },
    End { incentive: u8 },
    Advance { seconds: u16 },
}

fn key(tag: u8, index: u8) -> Pubkey {
    let mut bytes = [0u8; 32];
    bytes[0] = tag;
    bytes[1] = index;
    Pubkey::new_from_array(bytes)
}

fn owner(index: u8) -> Pubkey {
    key(1, index % OWNERS)
}

fn mint(index: u8) -> Pubkey {
    key(2, index % MINTS)
}

fuzz_target!(|ops: Vec<Op>| {
    let pool = key(3, 0);
    let reward_token = key(4, 0);
    let refundee = key(5, 0);

    let Ok(mut staker) = Staker::new(StakerConfig::default()) else {
        return;
    };
    let mut now = START;
    let mut counter: u128 = 0;
    let mut incentives: u8 = 0;
    let mut added: u128 = 0;
    let mut claimed: u128 = 0;
    let mut refunded: u128 = 0;

    for op in ops.into_iter().take(200) {
        let snapshot = PoolSnapshot {
            pool,
            liquidity: POOL_LIQUIDITY as u64,
            seconds_per_liquidity_inside_x32: X32::from_raw(counter),
        };
        let created = incentives.max(1);
        let incentive_id = |index: u8| IncentiveId(u64::from(index % created));

        let ok = match op {
            Op::CreateIncentive {
                start_offset,
                duration,
            } => {
                let start_time = now + i64::from(start_offset);
                staker
                    .create_incentive(
                        NewIncentive {
                            reward_token,
                            pool,
                            refundee,
                            start_time,
                            end_time: start_time + i64::from(duration),
                            boost: BoostKind::Unboosted,
                        },
                        now,
                    )
                    .map(|_| incentives += 1)
                    .is_ok()
            }
            Op::AddReward { incentive, amount } => {
                let result = staker.add_reward(incentive_id(incentive), u64::from(amount));
                if result.is_ok() {
                    added += u128::from(amount);
                }
                result.is_ok()
            }
            Op::Deposit {
                mint: index,
                owner: owner_index,
                liquidity,
            } => staker
                .create_deposit(
                    TokenizedPosition {
                        mint: mint(index),
                        pool,
                        liquidity: u64::from(liquidity),
                        tick_lower: -60,
                        tick_upper: 60,
                    },
                    owner(owner_index),
                    key(6, index),
                )
                .is_ok(),
            Op::Transfer {
                mint: index,
                caller,
                new_owner,
            } => staker
                .transfer_deposit(&mint(index), &owner(caller), owner(new_owner))
                .is_ok(),
            Op::Withdraw {
                mint: index,
                caller,
            } => staker.withdraw_token(&mint(index), &owner(caller)).is_ok(),
            Op::Stake {
                mint: index,
                incentive,
                caller,
            } => staker
                .stake_token(
                    &mint(index),
                    incentive_id(incentive),
                    &owner(caller),
                    &snapshot,
                    now,
                )
                .is_ok(),
            Op::Unstake {
                mint: index,
                incentive,
            } => staker
                .unstake_token(&mint(index), incentive_id(incentive), &snapshot, now)
                .is_ok(),
            Op::Claim {
                owner: owner_index,
                amount,
            } => match staker.claim_reward(&owner(owner_index), &reward_token, u64::from(amount)) {
                Ok(payout) => {
                    assert!(payout <= u64::from(amount));
                    claimed += u128::from(payout);
                    true
                }
                Err(_) => false,
            },
            Op::End { incentive } => match staker.end_incentive(incentive_id(incentive), now) {
                Ok(refund) => {
                    refunded += u128::from(refund);
                    true
                }
                Err(_) => false,
            },
            Op::Advance { seconds } => {
                now += i64::from(seconds);
                counter += (u128::from(seconds) << 32) / POOL_LIQUIDITY;
                true
            }
        };

        let events = staker.take_events();
        if !ok {
            assert!(events.is_empty(), "failed operation recorded {events:?}");
        }

        // ── Invariant: reward tokens are conserved ──
        let in_incentives: u128 = (0..incentives)
            .filter_map(|i| staker.incentive(IncentiveId(u64::from(i))).ok())
            .map(|incentive| u128::from(incentive.total_reward_unclaimed))
            .sum();
        let owed: u128 = (0..OWNERS)
            .filter_map(|i| staker.reward(&reward_token, &owner(i)).ok())
            .map(|reward| u128::from(reward.rewards_owed))
            .sum();
        assert_eq!(added, in_incentives + owed + claimed + refunded);

        // ── Invariant: stake counts match open stakes ──
        for i in 0..incentives {
            let id = IncentiveId(u64::from(i));
            let Ok(incentive) = staker.incentive(id) else {
                continue;
            };
            let open = (0..MINTS)
                .filter(|m| staker.stake(&mint(*m), id).is_ok())
                .count();
            assert_eq!(incentive.number_of_stakes as usize, open);
        }
    }
});
