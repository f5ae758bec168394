//! Time-of-day parser for schedule labels
//!
//! Extracts an hour/minute pair written as `H시[M분]` from a free-form
//! fragment. Whitespace is ignored, the minute defaults to zero, and any
//! failure is reported as a typed [`TimeParseError`] rather than a panic.

use chrono::NaiveTime;
use regex::Regex;
use std::sync::LazyLock;

static RE_HOUR_MINUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{1,2})시(?:([0-9]{1,2})분)?").expect("valid hour/minute regex")
});

/// Why a time fragment could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    #[error("no `H시[M분]` pattern in {0:?}")]
    NoMatch(String),

    #[error("hour out of range: {0}")]
    HourOutOfRange(u32),

    #[error("minute out of range: {0}")]
    MinuteOutOfRange(u32),

    #[error("malformed digits: {0:?}")]
    BadDigits(String),
}

/// Parse a fragment such as `"14시"`, `"13시30분"` or `" 9 시 5 분"`
///
/// # Returns
/// * `Ok(NaiveTime)` with seconds set to zero
/// * `Err(TimeParseError)` if no pattern matched or a field is out of range
pub fn parse_time_fragment(fragment: &str) -> Result<NaiveTime, TimeParseError> {
    let compact: String = fragment.chars().filter(|c| !c.is_whitespace()).collect();

    let caps = RE_HOUR_MINUTE
        .captures(&compact)
        .ok_or_else(|| TimeParseError::NoMatch(fragment.to_string()))?;

    let hour = parse_digits(&caps[1])?;
    let minute = match caps.get(2) {
        Some(m) => parse_digits(m.as_str())?,
        None => 0,
    };

    if hour > 23 {
        return Err(TimeParseError::HourOutOfRange(hour));
    }
    if minute > 59 {
        return Err(TimeParseError::MinuteOutOfRange(minute));
    }

    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| TimeParseError::BadDigits(compact.clone()))
}

fn parse_digits(digits: &str) -> Result<u32, TimeParseError> {
    digits
        .parse::<u32>()
        .map_err(|_| TimeParseError::BadDigits(digits.to_string()))
}
