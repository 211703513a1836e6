//! Property-based tests for the incentive lifecycle.
//!
//! Properties tested:
//! 1. An incentive with open stakes cannot be ended
//! 2. Once every stake is closed, ending refunds exactly what was not paid
//! 3. Previews agree with the amount credited at unstake
//! 4. Claims pay `min(requested, owed)`
//! 5. Staggered stakes, some closed after the end time, all close without
//!    overpaying

#[cfg(test)]
mod tests {
    use {
        proptest::prelude::*,
        solana_pubkey::Pubkey,
        trv1_liquidity_staker::{
            BoostKind, IncentiveId, NewIncentive, PoolSnapshot, Staker, StakerConfig,
            StakerError, TokenizedPosition, X32,
        },
    };

    const START: i64 = 1_650_000_000;

    struct Campaign {
        staker: Staker,
        id: IncentiveId,
        pool: Pubkey,
        reward_token: Pubkey,
        owner: Pubkey,
        mints: Vec<Pubkey>,
    }

    /// A funded incentive over `[START, START + duration)` with one staked
    /// position per entry in `liquidities`, all opened at `START`.
    fn campaign(funded: u64, duration: i64, liquidities: &[u64]) -> Campaign {
        let mut staker = Staker::new(StakerConfig::default()).unwrap();
        let pool = Pubkey::new_unique();
        let reward_token = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let id = staker
            .create_incentive(
                NewIncentive {
                    reward_token,
                    pool,
                    refundee: Pubkey::new_unique(),
                    start_time: START,
                    end_time: START + duration,
                    boost: BoostKind::Unboosted,
                },
                START,
            )
            .unwrap();
        staker.add_reward(id, funded).unwrap();

        let opening = snapshot(pool, 0);
        let mints = liquidities
            .iter()
            .map(|liquidity| {
                let mint = Pubkey::new_unique();
                let position = TokenizedPosition {
                    mint,
                    pool,
                    liquidity: *liquidity,
                    tick_lower: -60,
                    tick_upper: 60,
                };
                staker
                    .create_deposit(position, owner, Pubkey::new_unique())
                    .unwrap();
                staker
                    .stake_token(&mint, id, &owner, &opening, START)
                    .unwrap();
                mint
            })
            .collect();

        Campaign {
            staker,
            id,
            pool,
            reward_token,
            owner,
            mints,
        }
    }

    fn snapshot(pool: Pubkey, counter: u128) -> PoolSnapshot {
        PoolSnapshot {
            pool,
            liquidity: 0,
            seconds_per_liquidity_inside_x32: X32::from_raw(counter),
        }
    }

    /// Counter value after the whole window with every position in range.
    fn closing_counter(duration: i64, liquidities: &[u64]) -> u128 {
        let pool_liquidity: u128 = liquidities.iter().map(|l| u128::from(*l)).sum();
        ((duration as u128) << 32) / pool_liquidity
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 1-2. Ending an incentive
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn end_incentive_requires_every_stake_closed(
            funded in 0..=(1u64 << 48),
            duration in 1..=2_592_000i64,
            liquidities in prop::collection::vec(1..=(1u64 << 40), 1..6),
            end_delay in 0..=1_000_000i64,
        ) {
            let mut c = campaign(funded, duration, &liquidities);
            let now = START + duration + end_delay;
            let closing = snapshot(c.pool, closing_counter(duration, &liquidities));

            let mut paid = 0u64;
            for mint in &c.mints {
                prop_assert_eq!(
                    c.staker.end_incentive(c.id, now),
                    Err(StakerError::IncentiveHasOpenStakes)
                );
                paid += c.staker.unstake_token(mint, c.id, &closing, now).unwrap().reward;
            }

            let refund = c.staker.end_incentive(c.id, now).unwrap();
            prop_assert_eq!(paid + refund, funded);
            prop_assert_eq!(c.staker.incentive(c.id).unwrap().total_reward_unclaimed, 0);
            prop_assert_eq!(
                c.staker.reward(&c.reward_token, &c.owner).unwrap().rewards_owed,
                paid
            );
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 3. Preview / unstake agreement
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn preview_matches_unstake(
            funded in 0..=(1u64 << 48),
            duration in 1..=2_592_000i64,
            liquidity in 1..=(1u64 << 40),
            elapsed_per_mille in 0..=1_000i64,
        ) {
            let mut c = campaign(funded, duration, &[liquidity]);
            let elapsed = duration * elapsed_per_mille / 1_000;
            let counter = closing_counter(elapsed.max(0), &[liquidity]);
            let now = START + elapsed;
            let current = snapshot(c.pool, counter);
            let mint = c.mints[0];

            let preview = c.staker.preview_reward(&mint, c.id, &current, now).unwrap();
            let owed = c.staker.unstake_token(&mint, c.id, &current, now).unwrap();
            prop_assert_eq!(preview, owed);
            prop_assert_eq!(
                c.staker.reward(&c.reward_token, &c.owner).unwrap().rewards_owed,
                preview.reward
            );
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 4. Claim clamping
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn claims_never_exceed_owed(
            funded in 1..=(1u64 << 48),
            requests in prop::collection::vec(any::<u64>(), 1..6),
        ) {
            let mut c = campaign(funded, 100, &[1_000]);
            let closing = snapshot(c.pool, closing_counter(100, &[1_000]));
            let mint = c.mints[0];
            c.staker.unstake_token(&mint, c.id, &closing, START + 100).unwrap();

            let mut owed = c.staker.reward(&c.reward_token, &c.owner).unwrap().rewards_owed;
            for requested in requests {
                let payout = c.staker.claim_reward(&c.owner, &c.reward_token, requested).unwrap();
                prop_assert_eq!(payout, requested.min(owed));
                owed -= payout;
                prop_assert_eq!(
                    c.staker.reward(&c.reward_token, &c.owner).unwrap().rewards_owed,
                    owed
                );
            }
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 5. Staggered stakes closed past the end
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn staggered_stakes_always_close(
            funded in 0..=(1u64 << 48),
            duration in 1..=100_000i64,
            positions in prop::collection::vec(
                (1..=(1u64 << 20), 0..1_000i64, 0..=3_000i64),
                1..8,
            ),
        ) {
            let mut c = campaign(funded, duration, &[]);
            let end_time = START + duration;

            // Every position sits in range in the same pool for the whole run,
            // so the counter advances by 2^32 / pool liquidity per second.
            let pool_liquidity: u128 = positions.iter().map(|(l, _, _)| u128::from(*l)).sum();
            let counter = |now: i64| (((now - START) as u128) << 32) / pool_liquidity;

            let mut timeline = Vec::new();
            for (index, (liquidity, open_per_mille, hold_per_mille)) in positions.iter().enumerate() {
                let open = START + duration * open_per_mille / 1_000;
                let close = open + duration * hold_per_mille / 1_000;
                let mint = Pubkey::new_unique();
                c.staker
                    .create_deposit(
                        TokenizedPosition {
                            mint,
                            pool: c.pool,
                            liquidity: *liquidity,
                            tick_lower: -60,
                            tick_upper: 60,
                        },
                        c.owner,
                        Pubkey::new_unique(),
                    )
                    .unwrap();
                // Opens sort before closes at the same second.
                timeline.push((open, 0u8, index, mint));
                timeline.push((close, 1u8, index, mint));
            }
            timeline.sort_by_key(|(at, kind, index, _)| (*at, *kind, *index));

            let mut paid = 0u64;
            let mut last = START;
            for (at, kind, _, mint) in timeline {
                let current = snapshot(c.pool, counter(at));
                if kind == 0 {
                    c.staker.stake_token(&mint, c.id, &c.owner, &current, at).unwrap();
                } else {
                    let owed = c.staker.unstake_token(&mint, c.id, &current, at);
                    prop_assert!(owed.is_ok(), "unstake at {} failed: {:?}", at, owed);
                    paid += owed.unwrap().reward;
                    prop_assert!(paid <= funded);
                }
                last = at;
            }

            let incentive = c.staker.incentive(c.id).unwrap();
            prop_assert_eq!(incentive.number_of_stakes, 0);
            prop_assert!(
                incentive.total_seconds_claimed_x32
                    <= X32::from_raw(((last.max(end_time) - START) as u128) << 32)
            );
            let refund = c.staker.end_incentive(c.id, last.max(end_time)).unwrap();
            prop_assert_eq!(paid + refund, funded);
        }
    }
}
