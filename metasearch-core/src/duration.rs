//! Parsing of request timeout strings such as `300ms`, `1.5s` or `1m30s`.
//!
//! A duration is a sequence of `<decimal><unit>` terms. Accepted units are
//! `ns`, `us` (also `µs`/`μs`), `ms`, `s`, `m` and `h`. A bare `0` is
//! accepted. Negative durations are rejected.

use std::time::Duration;

use crate::error::SearchError;

const UNITS: &[(&str, f64)] = &[
    ("ns", 1.0),
    ("us", 1e3),
    ("µs", 1e3),
    ("μs", 1e3),
    ("ms", 1e6),
    ("s", 1e9),
    ("m", 60e9),
    ("h", 3_600e9),
];

/// Parse a duration string.
///
/// # Errors
///
/// Returns [`SearchError::Parse`] for empty, negative, unit-less or otherwise
/// malformed input.
pub fn parse_duration(raw: &str) -> Result<Duration, SearchError> {
    let invalid = || SearchError::Parse(format!("invalid duration {raw:?}"));

    let s = raw.trim();
    let s = s.strip_prefix('+').unwrap_or(s);
    if s.is_empty() || s.starts_with('-') {
        return Err(invalid());
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut rest = s;
    let mut total_nanos = 0f64;
    while !rest.is_empty() {
        let num_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(num_len);
        if number.is_empty() || number == "." {
            return Err(invalid());
        }
        let value: f64 = number.parse().map_err(|_| invalid())?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        let scale = UNITS
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, scale)| *scale)
            .ok_or_else(invalid)?;

        total_nanos += value * scale;
        rest = tail;
    }

    if !total_nanos.is_finite() || total_nanos > u64::MAX as f64 {
        return Err(invalid());
    }
    Ok(Duration::from_nanos(total_nanos.round() as u64))
}
