//! Time-interval values (`interval=`, `offset=`)
//!
//! A number followed by at most one unit: `us`, `ms`, `s`, `m`, `h`, `d`
//! (case-insensitive). Bare integers are microseconds.

use crate::error::{ReqError, Result};

const UNITS: [(&str, f64); 6] = [
    ("us", 1.0),
    ("ms", 1_000.0),
    ("s", 1_000_000.0),
    ("m", 60_000_000.0),
    ("h", 3_600_000_000.0),
    ("d", 86_400_000_000.0),
];

/// Parse an interval string into microseconds
pub fn parse_interval(text: &str) -> Result<u64> {
    let lowered = text.trim().to_ascii_lowercase();
    let invalid = || {
        ReqError::InvalidArgument(format!(
            "'{}' is not a valid time-interval string (e.g. '1.5s', '2us', '3m')",
            text
        ))
    };

    let split = lowered
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(lowered.len());
    let (number, unit) = lowered.split_at(split);

    if unit.is_empty() {
        return number.parse::<u64>().map_err(|_| invalid());
    }

    let multiplier = UNITS
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, m)| *m)
        .ok_or_else(invalid)?;

    let value: f64 = number.parse().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }
    let micros = value * multiplier;
    if micros > u64::MAX as f64 {
        return Err(invalid());
    }
    Ok(micros as u64)
}
