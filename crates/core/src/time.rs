use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{CwqError, Result};

/// Precision of the display strings that form the time axis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Resolution {
    #[default]
    Seconds,
    Date,
}

impl Resolution {
    fn format(self) -> &'static str {
        match self {
            Self::Seconds => "%Y-%m-%d %H:%M:%S",
            Self::Date => "%Y-%m-%d",
        }
    }
}

impl FromStr for Resolution {
    type Err = CwqError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "seconds" | "second" | "s" => Ok(Self::Seconds),
            "date" | "day" | "d" => Ok(Self::Date),
            _ => Err(CwqError::Parse(format!("unknown resolution: {s}"))),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seconds => f.write_str("seconds"),
            Self::Date => f.write_str("date"),
        }
    }
}

pub fn parse_timestamp(input: &str) -> Result<DateTime<FixedOffset>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(ts);
    }
    DateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f%z")
        .map_err(|e| CwqError::Parse(format!("invalid timestamp {input}: {e}")))
}

/// Converts `input` to `tz` and renders it as a fixed-width, sortable string.
pub fn normalize_timestamp<Tz>(input: &str, tz: &Tz, resolution: Resolution) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let ts = parse_timestamp(input)?;
    Ok(ts.with_timezone(tz).format(resolution.format()).to_string())
}

/// Parses an aggregation period given as whole seconds or a duration such as
/// `1d`. CloudWatch accepts 1, 5, 10, 30 or any multiple of 60.
pub fn parse_period(input: &str) -> Result<u32> {
    let secs = match input.trim().parse::<u64>() {
        Ok(secs) => secs,
        Err(_) => {
            let duration = humantime::parse_duration(input.trim())
                .map_err(|e| CwqError::Parse(format!("invalid period {input}: {e}")))?;
            if duration.subsec_nanos() != 0 {
                return Err(CwqError::Parse(format!(
                    "period must be whole seconds, got {input}"
                )));
            }
            duration.as_secs()
        }
    };
    validate_period(secs)
}

pub fn validate_period(secs: u64) -> Result<u32> {
    let valid = matches!(secs, 1 | 5 | 10 | 30) || (secs > 0 && secs % 60 == 0);
    if !valid {
        return Err(CwqError::Parse(format!(
            "period must be 1, 5, 10, 30 or a multiple of 60 seconds, got {secs}"
        )));
    }
    u32::try_from(secs).map_err(|_| CwqError::Parse(format!("period too large: {secs}")))
}

pub fn period_duration(secs: u32) -> Duration {
    Duration::from_secs(u64::from(secs))
}
