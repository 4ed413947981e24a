//! Flexible ISO-8601 parsing and offset-preserving formatting.
//!
//! Input may carry a numeric offset, `Z`, fractional seconds, no offset at all
//! (read as UTC), or be a bare date. Output is always
//! `YYYY-MM-DDTHH:MM:SS±HH:MM`; the `Z` shorthand is never emitted so that
//! formatting a parsed value and parsing it again is stable.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

use crate::error::{RemkitError, Result};

const OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

/// A parsed date plus whether the input named a time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDate {
    pub value: DateTime<FixedOffset>,
    pub includes_time: bool,
}

/// Parse a flexible ISO-8601 string. Date-only input resolves to midnight UTC.
pub fn parse_date(input: &str) -> Result<ParsedDate> {
    let s = input.trim();

    if let Ok(value) = DateTime::parse_from_rfc3339(s) {
        return Ok(ParsedDate {
            value,
            includes_time: true,
        });
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(value) = DateTime::parse_from_str(s, fmt) {
            return Ok(ParsedDate {
                value,
                includes_time: true,
            });
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ParsedDate {
                value: naive.and_utc().fixed_offset(),
                includes_time: true,
            });
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_ONLY_FORMAT)
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(ParsedDate {
            value: midnight.and_utc().fixed_offset(),
            includes_time: false,
        });
    }

    Err(RemkitError::parse(
        input,
        "expected an ISO-8601 date or date-time (e.g. 2026-03-01 or 2026-03-01T09:00:00+01:00)",
    ))
}

/// Parse a date-range bound.
///
/// A date-only upper bound covers the whole day, so `dateTo=2026-03-01`
/// includes a reminder due at 09:00 that day.
pub fn parse_range_bound(input: &str, upper: bool) -> Result<DateTime<FixedOffset>> {
    let parsed = parse_date(input)?;
    if upper && !parsed.includes_time {
        let end_of_day = parsed
            .value
            .date_naive()
            .and_hms_milli_opt(23, 59, 59, 999)
            .map(|naive| naive.and_utc().fixed_offset());
        return end_of_day.ok_or_else(|| RemkitError::parse(input, "date out of range"));
    }
    Ok(parsed.value)
}

/// Format with an explicit numeric offset, never `Z`.
pub fn format_date(value: &DateTime<FixedOffset>) -> String {
    value.format(OUTPUT_FORMAT).to_string()
}
