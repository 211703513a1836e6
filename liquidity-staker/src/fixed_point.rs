//! Q32 fixed-point arithmetic.
//!
//! A value is an unsigned integer implicitly scaled by 2^32 ("X32"). The raw
//! representation is a `u128`: per-liquidity counters multiplied by liquidity
//! up to ~2^64 and durations up to ~2^32 seconds shifted by 32 bits both stay
//! well inside 128 bits, and reward products (`u64 × X32`) are checked.
//!
//! Nothing here saturates. Every operation that could leave the representable
//! range returns [`StakerError::ArithmeticOverflow`] or
//! [`StakerError::ArithmeticUnderflow`].

use {
    crate::error::StakerError,
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// Number of fractional bits.
pub const RESOLUTION: u32 = 32;

/// `1.0` in X32.
pub const Q32: u128 = 1 << RESOLUTION;

/// An unsigned Q32 fixed-point quantity.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct X32(u128);

impl X32 {
    pub const ZERO: X32 = X32(0);
    pub const ONE: X32 = X32(Q32);

    /// Wraps an already-scaled raw value.
    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// The underlying scaled integer.
    pub const fn raw(self) -> u128 {
        self.0
    }

    /// Converts a plain integer into X32 (`value << 32`).
    pub fn from_int(value: u64) -> Self {
        // u64 << 32 always fits in u128.
        Self(u128::from(value) << RESOLUTION)
    }

    /// Converts a plain signed duration into X32, rejecting negatives.
    pub fn from_seconds(seconds: i64) -> Result<Self, StakerError> {
        let seconds = u64::try_from(seconds).map_err(|_| StakerError::ArithmeticUnderflow)?;
        Ok(Self::from_int(seconds))
    }

    /// Truncates back to a plain integer (`value >> 32`).
    pub fn to_int_floor(self) -> u128 {
        self.0 >> RESOLUTION
    }

    pub fn checked_add(self, other: X32) -> Result<X32, StakerError> {
        self.0
            .checked_add(other.0)
            .map(X32)
            .ok_or(StakerError::ArithmeticOverflow)
    }

    pub fn checked_sub(self, other: X32) -> Result<X32, StakerError> {
        self.0
            .checked_sub(other.0)
            .map(X32)
            .ok_or(StakerError::ArithmeticUnderflow)
    }

    /// Multiplies by a plain integer; the result keeps the X32 scale.
    pub fn checked_mul_int(self, factor: u64) -> Result<X32, StakerError> {
        self.0
            .checked_mul(u128::from(factor))
            .map(X32)
            .ok_or(StakerError::ArithmeticOverflow)
    }

    /// Multiplies two X32 values, truncating the extra fractional bits.
    pub fn checked_mul(self, other: X32) -> Result<X32, StakerError> {
        self.0
            .checked_mul(other.0)
            .map(|product| X32(product >> RESOLUTION))
            .ok_or(StakerError::ArithmeticOverflow)
    }

    /// Divides two X32 values with truncation, keeping the X32 scale.
    pub fn checked_div(self, other: X32) -> Result<X32, StakerError> {
        if other.0 == 0 {
            return Err(StakerError::DivisionByZero);
        }
        let numerator = self
            .0
            .checked_shl(RESOLUTION)
            .filter(|shifted| shifted >> RESOLUTION == self.0)
            .ok_or(StakerError::ArithmeticOverflow)?;
        Ok(X32(numerator / other.0))
    }
}

impl fmt::Display for X32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fraction = self.0 & (Q32 - 1);
        write!(f, "{}+{}/2^32", self.to_int_floor(), fraction)
    }
}

/// `floor(value × numerator / denominator)`, narrowed to `u64`.
///
/// Used for `reward = total_reward × seconds_inside / total_seconds`: the X32
/// scale of numerator and denominator cancels, so the result is a plain token
/// amount.
pub fn mul_div_floor(value: u64, numerator: X32, denominator: X32) -> Result<u64, StakerError> {
    if denominator.0 == 0 {
        return Err(StakerError::DivisionByZero);
    }
    let product = u128::from(value)
        .checked_mul(numerator.0)
        .ok_or(StakerError::ArithmeticOverflow)?;
    u64::try_from(product / denominator.0).map_err(|_| StakerError::ArithmeticOverflow)
}

/// `floor(value × numerator / denominator)` over plain integers.
pub fn mul_div_floor_u64(value: u64, numerator: u64, denominator: u64) -> Result<u64, StakerError> {
    if denominator == 0 {
        return Err(StakerError::DivisionByZero);
    }
    let product = u128::from(value)
        .checked_mul(u128::from(numerator))
        .ok_or(StakerError::ArithmeticOverflow)?;
    u64::try_from(product / u128::from(denominator)).map_err(|_| StakerError::ArithmeticOverflow)
}
