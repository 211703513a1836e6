//! Property-based tests for the boost calculator.
//!
//! Properties tested:
//! 1. Effective liquidity never exceeds real liquidity
//! 2. Effective liquidity is non-decreasing in voting power
//! 3. Boost percent stays within [100, 250], exactly 100 without votes
//! 4. Boosted and unboosted rewards agree once the boost is full

#[cfg(test)]
mod tests {
    use {
        proptest::prelude::*,
        trv1_liquidity_staker::{
            boost::{compute_boost, MAX_BOOST_PERCENT, MIN_BOOSTABLE_LIQUIDITY, MIN_BOOST_PERCENT},
            compute_reward_amount, compute_reward_amount_boosted, RewardParams, VotingPower, X32,
        },
    };

    fn voting(voting_power: u64, total_voting_power: u64) -> VotingPower {
        VotingPower {
            voting_power,
            total_voting_power,
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 1-2. Bounded and monotone in voting power
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn effective_liquidity_bounded_and_monotone(
            liquidity in MIN_BOOSTABLE_LIQUIDITY..=u64::MAX,
            pool_liquidity in any::<u64>(),
            total_voting_power in 1..=u64::MAX,
            a in any::<u64>(),
            b in any::<u64>(),
        ) {
            let low = a.min(b) % total_voting_power.saturating_add(1);
            let high = a.max(b).min(total_voting_power).max(low);

            let at_low = compute_boost(liquidity, pool_liquidity, voting(low, total_voting_power)).unwrap();
            let at_high = compute_boost(liquidity, pool_liquidity, voting(high, total_voting_power)).unwrap();

            prop_assert!(at_low.effective_liquidity <= liquidity);
            prop_assert!(at_high.effective_liquidity <= liquidity);
            prop_assert!(
                at_low.effective_liquidity <= at_high.effective_liquidity,
                "power {} -> {}, power {} -> {}",
                low, at_low.effective_liquidity, high, at_high.effective_liquidity
            );
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 3. Boost percent range
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn boost_percent_within_range(
            liquidity in MIN_BOOSTABLE_LIQUIDITY..=u64::MAX,
            pool_liquidity in any::<u64>(),
            voting_power in any::<u64>(),
            total_voting_power in 1..=u64::MAX,
        ) {
            let boost = compute_boost(
                liquidity,
                pool_liquidity,
                voting(voting_power, total_voting_power),
            )
            .unwrap();
            prop_assert!(boost.boost_percent >= MIN_BOOST_PERCENT);
            prop_assert!(boost.boost_percent <= MAX_BOOST_PERCENT);
        }

        #[test]
        fn no_voting_power_means_no_boost(
            liquidity in MIN_BOOSTABLE_LIQUIDITY..=u64::MAX,
            pool_liquidity in any::<u64>(),
            total_voting_power in 1..=u64::MAX,
        ) {
            let boost = compute_boost(liquidity, pool_liquidity, voting(0, total_voting_power)).unwrap();
            prop_assert_eq!(boost.boost_percent, MIN_BOOST_PERCENT);
            prop_assert_eq!(u128::from(boost.effective_liquidity), u128::from(liquidity) * 4 / 10);
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 4. Convergence at full boost
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn full_boost_matches_unboosted_reward(
            liquidity in MIN_BOOSTABLE_LIQUIDITY..=(1u64 << 40),
            total_voting_power in 1..=u64::MAX,
            total_reward_unclaimed in 0..=(1u64 << 32),
            duration in 1..=1_000_000i64,
            elapsed in 0..=2_000_000i64,
            initial in 0..=(1u128 << 64),
            delta in 0..=(1u128 << 20),
        ) {
            let start_time = 1_650_000_000;
            let params = RewardParams {
                total_reward_unclaimed,
                total_seconds_claimed_x32: X32::ZERO,
                start_time,
                end_time: start_time + duration,
                liquidity,
                seconds_per_liquidity_inside_initial_x32: X32::from_raw(initial),
                seconds_per_liquidity_inside_x32: X32::from_raw(initial + delta),
                current_time: start_time + elapsed,
            };
            // The whole voting supply lifts the 60% share past the position.
            let pool_liquidity = liquidity * 2;
            let full = voting(total_voting_power, total_voting_power);

            let boosted = compute_reward_amount_boosted(&params, pool_liquidity, full).unwrap();
            let plain = compute_reward_amount(&params).unwrap();

            prop_assert_eq!(boosted.effective_liquidity, liquidity);
            prop_assert_eq!(boosted.reward, plain.reward);
            prop_assert_eq!(boosted.seconds_inside_x32, plain.seconds_inside_x32);
        }
    }
}
