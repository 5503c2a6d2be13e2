//! Tick-rate configuration and the rate-write payload decoder.
//!
//! The rate is stored in whole hertz and the tick period is derived with
//! integer division, so 9 Hz yields a 111 ms period rather than 111.1 ms.
//! Writes arrive as short ASCII payloads (`echo 4 > ...`); [`parse_rate_payload`]
//! turns them into a candidate value that [`RateConfig::set`] then validates.

use core::fmt;
use core::str;

use winnow::ascii::dec_int;
use winnow::error::ContextError;
use winnow::prelude::*;

/// Slowest accepted tick rate.
pub const MIN_RATE_HZ: u8 = 1;
/// Fastest accepted tick rate.
pub const MAX_RATE_HZ: u8 = 9;
/// Rate applied at start-up.
pub const DEFAULT_RATE_HZ: u8 = 1;
/// Longest rate-write payload accepted, in bytes.
pub const MAX_RATE_PAYLOAD: usize = 10;

const MILLIS_PER_SECOND: u32 = 1_000;

/// Reasons a rate payload could not be decoded.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RateParseError {
    /// Payload was empty or whitespace only.
    Empty,
    /// Payload exceeded [`MAX_RATE_PAYLOAD`] bytes.
    TooLong { len: usize },
    /// Payload was not a decimal integer.
    Malformed,
}

impl fmt::Display for RateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateParseError::Empty => f.write_str("empty payload"),
            RateParseError::TooLong { len } => {
                write!(f, "payload of {len} bytes exceeds {MAX_RATE_PAYLOAD}")
            }
            RateParseError::Malformed => f.write_str("not a decimal integer"),
        }
    }
}

/// Rejected rate write. The previous configuration is always kept.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RateError {
    OutOfRange { requested: i64 },
    Parse(RateParseError),
}

impl fmt::Display for RateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateError::OutOfRange { requested } => write!(
                f,
                "rate {requested} Hz outside {MIN_RATE_HZ}..={MAX_RATE_HZ} Hz"
            ),
            RateError::Parse(err) => write!(f, "rate payload rejected: {err}"),
        }
    }
}

impl From<RateParseError> for RateError {
    fn from(error: RateParseError) -> Self {
        RateError::Parse(error)
    }
}

/// Configured tick rate and its derived period.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RateConfig {
    hz: u8,
    period_ms: u32,
}

impl RateConfig {
    /// Creates the start-up configuration ([`DEFAULT_RATE_HZ`]).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            hz: DEFAULT_RATE_HZ,
            period_ms: period_for(DEFAULT_RATE_HZ),
        }
    }

    /// Stores a new rate, rejecting values outside `1..=9` Hz.
    pub fn set(&mut self, hz: i32) -> Result<(), RateError> {
        let hz = validate(i64::from(hz))?;
        self.hz = hz;
        self.period_ms = period_for(hz);
        Ok(())
    }

    #[must_use]
    pub const fn current_hz(&self) -> u8 {
        self.hz
    }

    /// Tick period in whole milliseconds (`1000 / hz`, truncated).
    #[must_use]
    pub const fn period_ms(&self) -> u32 {
        self.period_ms
    }
}

impl Default for RateConfig {
    fn default() -> Self {
        Self::new()
    }
}

const fn period_for(hz: u8) -> u32 {
    MILLIS_PER_SECOND / hz as u32
}

fn validate(requested: i64) -> Result<u8, RateError> {
    u8::try_from(requested)
        .ok()
        .filter(|hz| (MIN_RATE_HZ..=MAX_RATE_HZ).contains(hz))
        .ok_or(RateError::OutOfRange { requested })
}

/// Decodes a rate-write payload into the requested value in hertz.
///
/// Surrounding ASCII whitespace is ignored; the number itself may carry a
/// sign so that negative writes are reported as out of range rather than
/// malformed.
pub fn parse_rate_payload(payload: &[u8]) -> Result<i64, RateParseError> {
    if payload.len() > MAX_RATE_PAYLOAD {
        return Err(RateParseError::TooLong { len: payload.len() });
    }

    let text = str::from_utf8(payload)
        .map_err(|_| RateParseError::Malformed)?
        .trim_ascii();
    if text.is_empty() {
        return Err(RateParseError::Empty);
    }

    dec_int::<_, i64, ContextError>
        .parse(text)
        .map_err(|_| RateParseError::Malformed)
}

/// Parses and validates a payload in one step, returning the accepted rate.
///
/// Used by the write path; the caller applies the value under its own lock.
pub fn decode_rate_write(payload: &[u8]) -> Result<i32, RateError> {
    let requested = parse_rate_payload(payload)?;
    let hz = validate(requested)?;
    Ok(i32::from(hz))
}
