//! Fuzz the boost calculator and reward accrual with arbitrary inputs.
//!
//! Goals:
//! - Find panics, overflows, or division-by-zero.
//! - Verify effective liquidity never exceeds liquidity.
//! - Verify boost percent stays within [100, 250].
//! - Verify a stake never earns more than the incentive holds while its
//!   liquidity-seconds fit in the unclaimed window.

#![no_main]

use {
    arbitrary::{Arbitrary, Unstructured},
    libfuzzer_sys::fuzz_target,
    trv1_liquidity_staker::{
        boost::{compute_boost, MAX_BOOST_PERCENT, MIN_BOOST_PERCENT},
        compute_reward_amount, compute_reward_amount_boosted, RewardParams, StakerError,
        VotingPower, X32,
    },
};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    total_reward_unclaimed: u64,
    total_seconds_claimed_x32: u128,
    start_time: i64,
    duration: u32,
    liquidity: u64,
    counter_initial: u128,
    counter_delta: u128,
    current_offset: i64,
    pool_liquidity: u64,
    voting_power: u64,
    total_voting_power: u64,
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let input: FuzzInput = match u.arbitrary() {
        Ok(i) => i,
        Err(_) => return,
    };

    let voting = VotingPower {
        voting_power: input.voting_power,
        total_voting_power: input.total_voting_power,
    };

    // ── Boost: must not panic; bounded when it succeeds ──
    match compute_boost(input.liquidity, input.pool_liquidity, voting) {
        Ok(boost) => {
            assert!(boost.effective_liquidity <= input.liquidity);
            assert!(boost.boost_percent >= MIN_BOOST_PERCENT);
            assert!(boost.boost_percent <= MAX_BOOST_PERCENT);
        }
        Err(err) => assert!(err.is_precondition_violation(), "unexpected {err:?}"),
    }

    // ── Accrual: must not panic ──
    let Some(end_time) = input.start_time.checked_add(i64::from(input.duration)) else {
        return;
    };
    let params = RewardParams {
        total_reward_unclaimed: input.total_reward_unclaimed,
        total_seconds_claimed_x32: X32::from_raw(input.total_seconds_claimed_x32),
        start_time: input.start_time,
        end_time,
        liquidity: input.liquidity,
        seconds_per_liquidity_inside_initial_x32: X32::from_raw(input.counter_initial),
        seconds_per_liquidity_inside_x32: X32::from_raw(
            input.counter_initial.saturating_add(input.counter_delta),
        ),
        current_time: input.start_time.saturating_add(input.current_offset),
    };

    let plain = compute_reward_amount(&params);
    let boosted = compute_reward_amount_boosted(&params, input.pool_liquidity, voting);

    let outcomes = [
        plain.map(|o| (o.reward, o.seconds_inside_x32)),
        boosted.map(|o| (o.reward, o.seconds_inside_x32)),
    ];
    for outcome in outcomes {
        match outcome {
            Ok((reward, seconds_inside_x32)) => {
                let window = X32::from_seconds(i64::from(input.duration))
                    .and_then(|w| w.checked_sub(params.total_seconds_claimed_x32));
                if let Ok(unclaimed) = window {
                    if seconds_inside_x32 <= unclaimed {
                        assert!(
                            reward <= params.total_reward_unclaimed,
                            "reward {reward} > unclaimed {}",
                            params.total_reward_unclaimed
                        );
                    }
                }
            }
            Err(
                StakerError::ArithmeticOverflow
                | StakerError::ArithmeticUnderflow
                | StakerError::DivisionByZero
                | StakerError::RewardQueriedBeforeStart
                | StakerError::ZeroTotalVotingPower
                | StakerError::ZeroBaseLiquidity,
            ) => {}
            Err(err) => panic!("unexpected error {err:?}"),
        }
    }
});
