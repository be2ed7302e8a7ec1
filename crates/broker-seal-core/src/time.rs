//! Clock sources and certificate timestamp formatting.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TimeError;

/// `YYYY-MM-DDTHH:MM:SSZ`. The `Z` is literal in every zone.
pub const ISO8601_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Wall-clock time at two granularities.
pub trait Clock: Send + Sync {
    /// Seconds since the unix epoch, for certificate timestamps.
    fn now_secs(&self) -> u64;

    /// Milliseconds since the unix epoch, for ingestion timestamps.
    fn now_millis(&self) -> u64;
}

/// The host's system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> u64 {
        self.now_millis() / 1000
    }

    fn now_millis(&self) -> u64 {
        // A clock before 1970 reads as the epoch.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    millis: u64,
}

impl FixedClock {
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self {
            millis: secs.saturating_mul(1000),
        }
    }
}

impl Clock for FixedClock {
    fn now_secs(&self) -> u64 {
        self.millis / 1000
    }

    fn now_millis(&self) -> u64 {
        self.millis
    }
}

/// The zone certificate creation times are rendered in.
///
/// Defaults to the host's local zone; UTC and fixed offsets are opt-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CreateTimeZone {
    Utc,
    /// The host's local time zone.
    #[default]
    Local,
    /// A fixed offset east of UTC.
    Fixed(FixedOffset),
}

impl CreateTimeZone {
    /// Render unix seconds as `YYYY-MM-DDTHH:MM:SSZ` in this zone.
    pub fn format(&self, unix_secs: u64) -> Result<String, TimeError> {
        let utc = i64::try_from(unix_secs)
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .ok_or(TimeError::OutOfRange(unix_secs))?;

        let offset = match self {
            CreateTimeZone::Utc => Utc.fix(),
            CreateTimeZone::Local => Local.offset_from_utc_datetime(&utc.naive_utc()).fix(),
            CreateTimeZone::Fixed(offset) => *offset,
        };

        Ok(utc.with_timezone(&offset).format(ISO8601_FORMAT).to_string())
    }

    /// Parse a string produced by [`CreateTimeZone::format`] back to unix seconds.
    pub fn parse(&self, value: &str) -> Result<u64, TimeError> {
        let unparsable = |reason: String| TimeError::Unparsable {
            value: value.to_string(),
            reason,
        };

        let naive = NaiveDateTime::parse_from_str(value, ISO8601_FORMAT)
            .map_err(|e| unparsable(e.to_string()))?;

        let secs = match self {
            CreateTimeZone::Utc => naive.and_utc().timestamp(),
            CreateTimeZone::Local => Local
                .from_local_datetime(&naive)
                .earliest()
                .ok_or_else(|| unparsable("not a valid local time".into()))?
                .timestamp(),
            CreateTimeZone::Fixed(offset) => offset
                .from_local_datetime(&naive)
                .single()
                .ok_or_else(|| unparsable("not a valid time at offset".into()))?
                .timestamp(),
        };

        u64::try_from(secs).map_err(|_| unparsable("before the unix epoch".into()))
    }
}

impl fmt::Display for CreateTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreateTimeZone::Utc => f.write_str("utc"),
            CreateTimeZone::Local => f.write_str("local"),
            CreateTimeZone::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

impl FromStr for CreateTimeZone {
    type Err = TimeError;

    /// Accepts `utc`, `local`, or an offset such as `+01:00`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" | "z" => Ok(CreateTimeZone::Utc),
            "local" => Ok(CreateTimeZone::Local),
            other => other
                .parse::<FixedOffset>()
                .map(CreateTimeZone::Fixed)
                .map_err(|_| TimeError::UnknownZone(s.to_string())),
        }
    }
}

impl TryFrom<String> for CreateTimeZone {
    type Error = TimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CreateTimeZone> for String {
    fn from(zone: CreateTimeZone) -> Self {
        zone.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: u64 = 1733393632;

    fn plus_one_hour() -> CreateTimeZone {
        CreateTimeZone::Fixed(FixedOffset::east_opt(3600).unwrap())
    }

    #[test]
    fn test_default_zone_is_local() {
        assert_eq!(CreateTimeZone::default(), CreateTimeZone::Local);
    }

    #[test]
    fn test_fixed_clock_from_secs_saturates() {
        assert_eq!(FixedClock::from_secs(SAMPLE).now_millis(), SAMPLE * 1000);
        assert_eq!(FixedClock::from_secs(SAMPLE).now_secs(), SAMPLE);
        assert_eq!(FixedClock::from_secs(u64::MAX).now_millis(), u64::MAX);
    }

    #[test]
    fn test_format_utc() {
        assert_eq!(
            CreateTimeZone::Utc.format(SAMPLE).unwrap(),
            "2024-12-05T10:13:52Z"
        );
    }

    #[test]
    fn test_format_central_european_wall_clock() {
        assert_eq!(
            plus_one_hour().format(SAMPLE).unwrap(),
            "2024-12-05T11:13:52Z"
        );
    }

    #[test]
    fn test_parse_reverses_format() {
        for zone in [CreateTimeZone::Utc, CreateTimeZone::Local, plus_one_hour()] {
            let s = zone.format(SAMPLE).unwrap();
            assert_eq!(zone.parse(&s).unwrap(), SAMPLE, "zone {zone}");
        }
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            CreateTimeZone::Utc.format(u64::MAX),
            Err(TimeError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_parse_rejects_other_layouts() {
        assert!(CreateTimeZone::Utc.parse("2024-12-05 10:13:52").is_err());
        assert!(CreateTimeZone::Utc.parse("2024-12-05T10:13:52+00:00").is_err());
    }

    #[test]
    fn test_zone_from_str() {
        assert_eq!("UTC".parse::<CreateTimeZone>().unwrap(), CreateTimeZone::Utc);
        assert_eq!("local".parse::<CreateTimeZone>().unwrap(), CreateTimeZone::Local);
        assert_eq!("+01:00".parse::<CreateTimeZone>().unwrap(), plus_one_hour());
        assert!("mars".parse::<CreateTimeZone>().is_err());
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::from_millis(1_733_393_632_123);
        assert_eq!(clock.now_secs(), SAMPLE);
        assert_eq!(clock.now_millis(), 1_733_393_632_123);
    }

    #[test]
    fn test_system_clock_granularities_agree() {
        let clock = SystemClock;
        let secs = clock.now_secs();
        let millis = clock.now_millis();
        assert!(millis / 1000 >= secs);
        assert!(secs > 1_700_000_000);
    }
}
