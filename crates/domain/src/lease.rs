//! Lease parameters attached to roles and issued credentials.

use std::time::Duration;

use camgate_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Time-to-live settings for an issued credential.
///
/// A zero value means "use the host default". When both `ttl` and `max_ttl`
/// are set, `ttl` never exceeds `max_ttl`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseParams {
    #[serde(with = "duration_seconds", default)]
    ttl: Duration,
    #[serde(with = "duration_seconds", default)]
    max_ttl: Duration,
    #[serde(with = "duration_seconds", default)]
    period: Duration,
}

impl LeaseParams {
    /// Creates validated lease parameters.
    pub fn new(ttl: Duration, max_ttl: Duration, period: Duration) -> AppResult<Self> {
        if !max_ttl.is_zero() && ttl > max_ttl {
            return Err(AppError::TtlExceedsMaxTtl {
                ttl_seconds: ttl.as_secs(),
                max_ttl_seconds: max_ttl.as_secs(),
            });
        }

        Ok(Self {
            ttl,
            max_ttl,
            period,
        })
    }

    /// Returns the default lease duration.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the ceiling on the lease lifetime.
    #[must_use]
    pub fn max_ttl(&self) -> Duration {
        self.max_ttl
    }

    /// Returns the renewal period.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }
}

/// Parses a duration given as whole seconds or with an `s`, `m`, `h` or `d` suffix.
pub fn parse_duration(field: &str, value: &str) -> AppResult<Duration> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(Duration::ZERO);
    }

    let (digits, multiplier) = match trimmed.char_indices().last() {
        Some((index, 's')) => (&trimmed[..index], 1),
        Some((index, 'm')) => (&trimmed[..index], 60),
        Some((index, 'h')) => (&trimmed[..index], 60 * 60),
        Some((index, 'd')) => (&trimmed[..index], 24 * 60 * 60),
        _ => (trimmed, 1),
    };

    let amount = digits.parse::<u64>().map_err(|error| AppError::Decode {
        field: field.to_owned(),
        reason: format!("'{value}' is not a duration: {error}"),
    })?;

    amount
        .checked_mul(multiplier)
        .map(Duration::from_secs)
        .ok_or_else(|| AppError::Decode {
            field: field.to_owned(),
            reason: format!("'{value}' overflows a duration"),
        })
}

mod duration_seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use camgate_core::AppError;

    use super::{LeaseParams, parse_duration};

    #[test]
    fn ttl_above_max_ttl_is_rejected() {
        let result = LeaseParams::new(
            Duration::from_secs(20),
            Duration::from_secs(10),
            Duration::ZERO,
        );

        assert!(matches!(
            result,
            Err(AppError::TtlExceedsMaxTtl {
                ttl_seconds: 20,
                max_ttl_seconds: 10
            })
        ));
    }

    #[test]
    fn zero_max_ttl_leaves_ttl_unbounded() {
        let result = LeaseParams::new(Duration::from_secs(20), Duration::ZERO, Duration::ZERO);
        assert!(result.is_ok());
    }

    #[test]
    fn parses_suffixed_durations() {
        assert!(matches!(parse_duration("ttl", "10"), Ok(value) if value == Duration::from_secs(10)));
        assert!(matches!(parse_duration("ttl", "90s"), Ok(value) if value == Duration::from_secs(90)));
        assert!(matches!(parse_duration("ttl", "5m"), Ok(value) if value == Duration::from_secs(300)));
        assert!(matches!(parse_duration("ttl", "2h"), Ok(value) if value == Duration::from_secs(7200)));
        assert!(matches!(parse_duration("ttl", "1d"), Ok(value) if value == Duration::from_secs(86400)));
        assert!(matches!(parse_duration("ttl", ""), Ok(value) if value.is_zero()));
    }

    #[test]
    fn rejects_garbage_durations() {
        assert!(matches!(
            parse_duration("max_ttl", "ten"),
            Err(AppError::Decode { field, .. }) if field == "max_ttl"
        ));
        assert!(parse_duration("max_ttl", "-5").is_err());
        assert!(parse_duration("max_ttl", "1w").is_err());
    }
}
