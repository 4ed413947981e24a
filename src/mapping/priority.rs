//! Canonical four-tier priority and its mapping onto the backend 0-9 scale.
//!
//! The mapping is intentionally lossy: the reverse direction buckets a range
//! of backend values into each tier, so only the four representative values
//! below survive a round trip unchanged. Do not widen [`Priority`] to recover
//! the lost resolution.

use std::fmt;
use std::str::FromStr;

use crate::error::RemkitError;

/// Backend value written for [`Priority::None`].
pub const INTERNAL_NONE: u8 = 0;
/// Backend value written for [`Priority::High`].
pub const INTERNAL_HIGH: u8 = 1;
/// Backend value written for [`Priority::Medium`].
pub const INTERNAL_MEDIUM: u8 = 5;
/// Backend value written for [`Priority::Low`].
pub const INTERNAL_LOW: u8 = 9;

/// Backend values read back as [`Priority::High`].
pub const HIGH_BAND: std::ops::RangeInclusive<u8> = 1..=4;
/// Backend values read back as [`Priority::Low`] (anything above is clamped here too).
pub const LOW_BAND: std::ops::RangeInclusive<u8> = 6..=9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    None,
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::None => "none",
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// The representative backend value for this tier.
    pub fn to_internal(self) -> u8 {
        match self {
            Priority::None => INTERNAL_NONE,
            Priority::High => INTERNAL_HIGH,
            Priority::Medium => INTERNAL_MEDIUM,
            Priority::Low => INTERNAL_LOW,
        }
    }

    /// Bucket a backend value into a tier.
    pub fn from_internal(value: u8) -> Self {
        match value {
            INTERNAL_NONE => Priority::None,
            v if HIGH_BAND.contains(&v) => Priority::High,
            INTERNAL_MEDIUM => Priority::Medium,
            _ => Priority::Low,
        }
    }

    /// Sort rank: high sorts first, none last.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
            Priority::None => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = RemkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Priority::None),
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(RemkitError::Validation(format!(
                "unknown priority '{other}'; expected one of none, low, medium, high"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    const ALL: [Priority; 4] = [
        Priority::None,
        Priority::Low,
        Priority::Medium,
        Priority::High,
    ];

    #[test]
    fn canonical_round_trip_is_identity() {
        for p in ALL {
            assert_eq!(Priority::from_internal(p.to_internal()), p);
        }
    }

    #[test]
    fn reverse_mapping_buckets_ranges() {
        assert_eq!(Priority::from_internal(0), Priority::None);
        for v in 1..=4 {
            assert_eq!(Priority::from_internal(v), Priority::High);
        }
        assert_eq!(Priority::from_internal(5), Priority::Medium);
        for v in 6..=9 {
            assert_eq!(Priority::from_internal(v), Priority::Low);
        }
        assert_eq!(Priority::from_internal(42), Priority::Low);
    }

    #[test]
    fn mapping_is_stable_for_bucketed_values() {
        // 3 reads as high and writes back as the high representative.
        assert_eq!(Priority::from_internal(3).to_internal(), INTERNAL_HIGH);
        assert_eq!(Priority::from_internal(7).to_internal(), INTERNAL_LOW);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(" medium ".parse::<Priority>().unwrap(), Priority::Medium);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn rank_orders_high_first() {
        let mut tiers = ALL.to_vec();
        tiers.sort_by_key(|p| p.rank());
        assert_eq!(
            tiers,
            vec![
                Priority::High,
                Priority::Medium,
                Priority::Low,
                Priority::None
            ]
        );
    }
}
