use {
    crate::error::StakerError,
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
};

/// Two years.
pub const DEFAULT_MAX_INCENTIVE_DURATION: i64 = 63_072_000;

/// Thirty days.
pub const DEFAULT_MAX_INCENTIVE_START_LEAD_TIME: i64 = 2_592_000;

/// Limits applied when incentives are created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct StakerConfig {
    /// Longest allowed `end_time - start_time`, in seconds.
    pub max_incentive_duration: i64,

    /// How far after creation an incentive may start, in seconds.
    pub max_incentive_start_lead_time: i64,
}

impl Default for StakerConfig {
    fn default() -> Self {
        Self {
            max_incentive_duration: DEFAULT_MAX_INCENTIVE_DURATION,
            max_incentive_start_lead_time: DEFAULT_MAX_INCENTIVE_START_LEAD_TIME,
        }
    }
}

impl StakerConfig {
    /// Checks a proposed incentive window against the configured limits.
    ///
    /// `end_time ≤ start_time` is a precondition violation; the limits are
    /// ordinary domain rules.
    pub fn check_incentive_window(
        &self,
        start_time: i64,
        end_time: i64,
        current_time: i64,
    ) -> Result<(), StakerError> {
        if end_time <= start_time {
            return Err(StakerError::InvalidIncentiveWindow);
        }
        let duration = end_time
            .checked_sub(start_time)
            .ok_or(StakerError::ArithmeticOverflow)?;
        if duration > self.max_incentive_duration {
            return Err(StakerError::IncentiveDurationTooLong);
        }
        let lead_time = start_time
            .checked_sub(current_time)
            .ok_or(StakerError::ArithmeticOverflow)?;
        if lead_time > self.max_incentive_start_lead_time {
            return Err(StakerError::IncentiveStartTooFarInFuture);
        }
        Ok(())
    }
}

/// Validate that a `StakerConfig` is internally consistent.
pub fn validate_config(config: &StakerConfig) -> Result<(), StakerError> {
    if config.max_incentive_duration <= 0 || config.max_incentive_start_lead_time < 0 {
        return Err(StakerError::InvalidConfig);
    }
    Ok(())
}
