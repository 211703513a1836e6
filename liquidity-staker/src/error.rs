//! Error types for the TRv1 liquidity staker.

use {
    num_derive::{FromPrimitive, ToPrimitive},
    thiserror::Error,
};

#[derive(Error, Debug, Clone, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum StakerError {
    // ── Precondition violations (caller or upstream bug) ─────────────────
    #[error("Reward queried before the incentive start time")]
    RewardQueriedBeforeStart = 0,

    #[error("Total voting power is zero")]
    ZeroTotalVotingPower = 1,

    #[error("Base liquidity is zero: position too small to boost")]
    ZeroBaseLiquidity = 2,

    #[error("Incentive end time must be after its start time")]
    InvalidIncentiveWindow = 3,

    #[error("Arithmetic overflow in fixed-point calculation")]
    ArithmeticOverflow = 4,

    #[error("Arithmetic underflow in fixed-point calculation")]
    ArithmeticUnderflow = 5,

    #[error("Division by zero in fixed-point calculation")]
    DivisionByZero = 6,

    // ── Configuration ────────────────────────────────────────────────────
    #[error("Invalid staker configuration")]
    InvalidConfig = 7,

    // ── Incentive lifecycle ──────────────────────────────────────────────
    #[error("Incentive not found")]
    IncentiveNotFound = 8,

    #[error("Incentive duration exceeds the configured maximum")]
    IncentiveDurationTooLong = 9,

    #[error("Incentive start time is too far in the future")]
    IncentiveStartTooFarInFuture = 10,

    #[error("Incentive has already been ended")]
    IncentiveAlreadyEnded = 11,

    #[error("Incentive cannot be ended before its end time")]
    IncentiveNotExpired = 12,

    #[error("Incentive cannot be ended while stakes are open")]
    IncentiveHasOpenStakes = 13,

    #[error("Incentive has not started")]
    IncentiveNotStarted = 14,

    #[error("Incentive has expired")]
    IncentiveExpired = 15,

    #[error("Incentive is boosted: unstake through the boosted entry point")]
    IncentiveIsBoosted = 16,

    #[error("Incentive is not boosted")]
    IncentiveNotBoosted = 17,

    // ── Deposits ─────────────────────────────────────────────────────────
    #[error("Deposit not found for this mint")]
    DepositNotFound = 18,

    #[error("A deposit already exists for this mint")]
    DepositAlreadyExists = 19,

    #[error("Position tick range is invalid")]
    InvalidTickRange = 20,

    #[error("Only the deposit owner can transfer the deposit")]
    OnlyOwnerCanTransferDeposit = 21,

    #[error("Only the deposit owner can withdraw the token")]
    OnlyOwnerCanWithdrawToken = 22,

    #[error("Cannot withdraw a token while it is staked")]
    CannotWithdrawTokenWhileStaked = 23,

    // ── Stakes ───────────────────────────────────────────────────────────
    #[error("Only the deposit owner can stake the token")]
    OnlyOwnerCanStakeToken = 24,

    #[error("Only the deposit owner can unstake from a boosted incentive")]
    OnlyOwnerCanUnstakeFromBoostedIncentive = 25,

    #[error("Token pool is not the incentive pool")]
    TokenPoolIsNotTheIncentivePool = 26,

    #[error("Pool snapshot does not belong to the incentive pool")]
    PoolMismatch = 27,

    #[error("Cannot stake a token with zero liquidity")]
    CannotStakeTokenWithZeroLiquidity = 28,

    #[error("Token is already staked")]
    TokenAlreadyStaked = 29,

    #[error("No open stake for this token and incentive")]
    StakeNotFound = 30,

    #[error("Token liquidity is too low to stake in a boosted incentive")]
    LiquidityTooLowToBoost = 34,

    // ── Rewards ──────────────────────────────────────────────────────────
    #[error("Reward account not found")]
    RewardAccountNotFound = 31,

    #[error("Reward account already exists")]
    RewardAccountAlreadyExists = 32,

    // ── Governance ───────────────────────────────────────────────────────
    #[error("Voting power requested from an unknown locker")]
    UnknownLocker = 33,
}

impl StakerError {
    /// Fatal conditions: the inputs were impossible, not merely refused.
    ///
    /// A host should abort the enclosing transaction on these rather than
    /// surface them to the end user as an ordinary rejection.
    pub fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            StakerError::RewardQueriedBeforeStart
                | StakerError::ZeroTotalVotingPower
                | StakerError::ZeroBaseLiquidity
                | StakerError::InvalidIncentiveWindow
                | StakerError::ArithmeticOverflow
                | StakerError::ArithmeticUnderflow
                | StakerError::DivisionByZero
        )
    }
}
