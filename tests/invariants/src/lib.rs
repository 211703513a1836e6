//! TRv1 Liquidity Staker Property-Based Invariant Tests
//!
//! Uses proptest to verify:
//! - Boost weighting bounds and monotonicity
//! - Reward accrual time clamping and conservation
//! - Incentive lifecycle accounting through the store

pub mod boost_invariants;
pub mod lifecycle_invariants;
