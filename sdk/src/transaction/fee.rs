//! Fee calculation.
//!
//! The max fee written into a header is never just the caller's number: it
//! is raised to at least `multiplier × size`, where size is the full
//! serialized length. Serializing is therefore two passes, the body first to
//! learn the size and then the header carrying the final fee.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::codec::CodecError;

/// Per-byte fee multiplier presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeCalculationStrategy {
    Zero,
    Low,
    #[default]
    Middle,
    High,
}

impl FeeCalculationStrategy {
    pub fn multiplier(self) -> u64 {
        match self {
            FeeCalculationStrategy::Zero => 0,
            FeeCalculationStrategy::Low => 10,
            FeeCalculationStrategy::Middle => 250,
            FeeCalculationStrategy::High => 1000,
        }
    }
}

impl fmt::Display for FeeCalculationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FeeCalculationStrategy::Zero => "zero",
            FeeCalculationStrategy::Low => "low",
            FeeCalculationStrategy::Middle => "middle",
            FeeCalculationStrategy::High => "high",
        })
    }
}

impl FromStr for FeeCalculationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zero" => Ok(FeeCalculationStrategy::Zero),
            "low" => Ok(FeeCalculationStrategy::Low),
            "middle" => Ok(FeeCalculationStrategy::Middle),
            "high" => Ok(FeeCalculationStrategy::High),
            other => Err(format!("unknown fee strategy {other:?}")),
        }
    }
}

/// `max(max_fee, multiplier × size)`, failing instead of wrapping.
pub fn calculate_fee(
    strategy: FeeCalculationStrategy,
    max_fee: u64,
    transaction_size: usize,
) -> Result<u64, CodecError> {
    let size = u64::try_from(transaction_size).map_err(|_| CodecError::Overflow {
        value: transaction_size.to_string(),
        width: "u64",
    })?;
    let computed = strategy
        .multiplier()
        .checked_mul(size)
        .ok_or_else(|| CodecError::Overflow {
            value: format!("{} * {}", strategy.multiplier(), size),
            width: "u64",
        })?;
    Ok(max_fee.max(computed))
}
