//! Elapsed-duration parsing for benchmark records.
//!
//! Benchmark workers print their elapsed time as a unit-suffixed sequence
//! such as `5s`, `1m30s`, `1.5s` or `250ms`. This module parses that syntax
//! into a signed nanosecond count and exposes the whole-second truncation
//! used by samples.

use std::fmt;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_MINUTE: u128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MINUTE;

/// Error returned for an unparseable duration string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationError {
    input: String,
    reason: &'static str,
}

impl DurationError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

impl fmt::Display for DurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid duration {:?}: {}", self.input, self.reason)
    }
}

impl std::error::Error for DurationError {}

/// Parse a duration string into signed nanoseconds.
///
/// Accepts an optional leading sign followed by one or more
/// `<decimal><unit>` groups, where unit is one of `ns`, `us`, `µs`, `μs`,
/// `ms`, `s`, `m`, `h`. The bare string `0` is also accepted.
///
/// # Errors
///
/// Returns [`DurationError`] when the input is empty, a group is missing its
/// number or unit, the unit is unknown, or the total overflows `i64`
/// nanoseconds.
pub fn parse_duration_nanos(input: &str) -> Result<i64, DurationError> {
    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    if rest == "0" {
        return Ok(0);
    }
    if rest.is_empty() {
        return Err(DurationError::new(input, "empty"));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);
        let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(DurationError::new(input, "missing number"));
        }
        if frac.contains('.') {
            return Err(DurationError::new(input, "malformed number"));
        }

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);
        let scale = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => NANOS_PER_MICRO,
            "ms" => NANOS_PER_MILLI,
            "s" => NANOS_PER_SECOND,
            "m" => NANOS_PER_MINUTE,
            "h" => NANOS_PER_HOUR,
            "" => return Err(DurationError::new(input, "missing unit")),
            _ => return Err(DurationError::new(input, "unknown unit")),
        };

        let whole_value: u128 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| DurationError::new(input, "number out of range"))?
        };
        let mut group = whole_value
            .checked_mul(scale)
            .ok_or_else(|| DurationError::new(input, "overflow"))?;

        // Fractional digits beyond nanosecond precision are truncated.
        let mut place = scale;
        for digit in frac.bytes() {
            place /= 10;
            if place == 0 {
                break;
            }
            group = group.saturating_add(u128::from(digit - b'0') * place);
        }

        total = total
            .checked_add(group)
            .ok_or_else(|| DurationError::new(input, "overflow"))?;
        rest = next;
    }

    let limit = if negative {
        i64::MIN.unsigned_abs().into()
    } else {
        u128::from(i64::MAX.unsigned_abs())
    };
    if total > limit {
        return Err(DurationError::new(input, "overflow"));
    }

    let magnitude = i128::try_from(total).map_err(|_| DurationError::new(input, "overflow"))?;
    let signed = if negative { -magnitude } else { magnitude };
    i64::try_from(signed).map_err(|_| DurationError::new(input, "overflow"))
}

/// Parse a duration string and truncate it toward zero to whole seconds.
///
/// # Errors
///
/// See [`parse_duration_nanos`].
pub fn parse_elapsed_secs(input: &str) -> Result<i64, DurationError> {
    const NANOS: i64 = 1_000_000_000;
    parse_duration_nanos(input).map(|nanos| nanos / NANOS)
}
