//! TRv1 Liquidity Staker Benchmark Suite
//!
//! Run all benchmarks:
//! ```bash
//! cargo bench -p trv1-staker-bench
//! ```
//!
//! Run a specific benchmark group:
//! ```bash
//! cargo bench -p trv1-staker-bench --bench reward_bench
//! cargo bench -p trv1-staker-bench --bench lifecycle_bench
//! ```
