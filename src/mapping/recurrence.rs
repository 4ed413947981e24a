//! Recurrence wire shape and validation.
//!
//! ```json
//! {"frequency": "monthly", "interval": 1, "daysOfWeek": ["monday"],
//!  "weekPosition": "last", "end": {"count": 6}}
//! ```
//!
//! The wire schema has a single `weekPosition` that applies to every entry in
//! `daysOfWeek`, while the internal model stores a week number per day. Going
//! in, the position is copied onto each day; coming out, the first non-zero
//! week number is reported. Rules with mixed per-day positions therefore lose
//! information on read. This is accepted behavior.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::{RemkitError, Result};
use crate::model::{DayOfWeek, Frequency, RecurrenceDay, RecurrenceEnd, RecurrenceRule};

use super::dates::{format_date, parse_date};

/// Wire names for week positions, paired with their internal week numbers.
pub const WEEK_POSITIONS: [(&str, i8); 9] = [
    ("first", 1),
    ("second", 2),
    ("third", 3),
    ("fourth", 4),
    ("fifth", 5),
    ("last", -1),
    ("secondToLast", -2),
    ("thirdToLast", -3),
    ("fourthToLast", -4),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceEndWire {
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceWire {
    pub frequency: String,
    #[serde(default)]
    pub interval: Option<i64>,
    #[serde(default)]
    pub days_of_week: Option<Vec<String>>,
    #[serde(default)]
    pub days_of_month: Option<Vec<i64>>,
    #[serde(default)]
    pub months_of_year: Option<Vec<i64>>,
    #[serde(default)]
    pub week_position: Option<String>,
    #[serde(default)]
    pub end: Option<RecurrenceEndWire>,
}

fn parse_frequency(raw: &str) -> Result<Frequency> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "daily" => Ok(Frequency::Daily),
        "weekly" => Ok(Frequency::Weekly),
        "monthly" => Ok(Frequency::Monthly),
        "yearly" => Ok(Frequency::Yearly),
        other => Err(RemkitError::Validation(format!(
            "unknown recurrence frequency '{other}'; expected daily, weekly, monthly or yearly"
        ))),
    }
}

fn frequency_name(frequency: Frequency) -> &'static str {
    match frequency {
        Frequency::Daily => "daily",
        Frequency::Weekly => "weekly",
        Frequency::Monthly => "monthly",
        Frequency::Yearly => "yearly",
    }
}

fn parse_day(raw: &str) -> Result<DayOfWeek> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "sunday" | "sun" => Ok(DayOfWeek::Sunday),
        "monday" | "mon" => Ok(DayOfWeek::Monday),
        "tuesday" | "tue" => Ok(DayOfWeek::Tuesday),
        "wednesday" | "wed" => Ok(DayOfWeek::Wednesday),
        "thursday" | "thu" => Ok(DayOfWeek::Thursday),
        "friday" | "fri" => Ok(DayOfWeek::Friday),
        "saturday" | "sat" => Ok(DayOfWeek::Saturday),
        other => Err(RemkitError::Validation(format!(
            "unknown day of week '{other}'"
        ))),
    }
}

fn day_name(day: DayOfWeek) -> &'static str {
    match day {
        DayOfWeek::Sunday => "sunday",
        DayOfWeek::Monday => "monday",
        DayOfWeek::Tuesday => "tuesday",
        DayOfWeek::Wednesday => "wednesday",
        DayOfWeek::Thursday => "thursday",
        DayOfWeek::Friday => "friday",
        DayOfWeek::Saturday => "saturday",
    }
}

fn parse_week_position(raw: &str) -> Result<i8> {
    WEEK_POSITIONS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(raw.trim()))
        .map(|(_, n)| *n)
        .ok_or_else(|| {
            RemkitError::Validation(format!(
                "unknown weekPosition '{raw}'; expected one of first..fifth, last, secondToLast, thirdToLast, fourthToLast"
            ))
        })
}

fn week_position_name(week_number: i8) -> Option<&'static str> {
    WEEK_POSITIONS
        .iter()
        .find(|(_, n)| *n == week_number)
        .map(|(name, _)| *name)
}

impl RecurrenceWire {
    pub fn into_rule(self) -> Result<RecurrenceRule> {
        let frequency = parse_frequency(&self.frequency)?;

        let interval = self.interval.unwrap_or(1);
        if interval < 1 {
            return Err(RemkitError::Validation(format!(
                "recurrence interval must be at least 1, got {interval}"
            )));
        }
        let interval = u32::try_from(interval).map_err(|_| {
            RemkitError::Validation(format!("recurrence interval {interval} is too large"))
        })?;

        let week_number = match self.week_position.as_deref() {
            Some(raw) => parse_week_position(raw)?,
            None => 0,
        };

        let days_of_week = self
            .days_of_week
            .unwrap_or_default()
            .iter()
            .map(|d| {
                parse_day(d).map(|day| RecurrenceDay { day, week_number })
            })
            .collect::<Result<Vec<_>>>()?;

        if week_number != 0 && days_of_week.is_empty() {
            return Err(RemkitError::Validation(
                "weekPosition requires at least one entry in daysOfWeek".into(),
            ));
        }

        let days_of_month = self
            .days_of_month
            .unwrap_or_default()
            .into_iter()
            .map(|d| {
                if d == 0 || !(-31..=31).contains(&d) {
                    Err(RemkitError::Validation(format!(
                        "day of month {d} out of range; expected 1..31 or -31..-1"
                    )))
                } else {
                    Ok(d as i8)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let months_of_year = self
            .months_of_year
            .unwrap_or_default()
            .into_iter()
            .map(|m| {
                if (1..=12).contains(&m) {
                    Ok(m as u8)
                } else {
                    Err(RemkitError::Validation(format!(
                        "month {m} out of range; expected 1..12"
                    )))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let end = match self.end {
            None => None,
            Some(RecurrenceEndWire {
                count: Some(_),
                date: Some(_),
            }) => {
                return Err(RemkitError::Validation(
                    "recurrence end may set count or date, not both".into(),
                ));
            }
            Some(RecurrenceEndWire {
                count: Some(0), ..
            }) => {
                return Err(RemkitError::Validation(
                    "recurrence end count must be at least 1".into(),
                ));
            }
            Some(RecurrenceEndWire {
                count: Some(count),
                ..
            }) => Some(RecurrenceEnd::Count(count)),
            Some(RecurrenceEndWire {
                date: Some(date), ..
            }) => Some(RecurrenceEnd::Date(parse_date(&date)?.value)),
            Some(RecurrenceEndWire {
                count: None,
                date: None,
            }) => None,
        };

        Ok(RecurrenceRule {
            frequency,
            interval,
            days_of_week,
            days_of_month,
            months_of_year,
            end,
        })
    }
}

pub fn rule_to_wire(rule: &RecurrenceRule) -> Value {
    let mut out = Map::new();
    out.insert("frequency".into(), json!(frequency_name(rule.frequency)));
    out.insert("interval".into(), json!(rule.interval));
    if !rule.days_of_week.is_empty() {
        let days: Vec<&str> = rule.days_of_week.iter().map(|d| day_name(d.day)).collect();
        out.insert("daysOfWeek".into(), json!(days));
        let position = rule
            .days_of_week
            .iter()
            .map(|d| d.week_number)
            .find(|n| *n != 0)
            .and_then(week_position_name);
        if let Some(position) = position {
            out.insert("weekPosition".into(), json!(position));
        }
    }
    if !rule.days_of_month.is_empty() {
        out.insert("daysOfMonth".into(), json!(rule.days_of_month));
    }
    if !rule.months_of_year.is_empty() {
        out.insert("monthsOfYear".into(), json!(rule.months_of_year));
    }
    match &rule.end {
        Some(RecurrenceEnd::Count(count)) => {
            out.insert("end".into(), json!({"count": count}));
        }
        Some(RecurrenceEnd::Date(date)) => {
            out.insert("end".into(), json!({"date": format_date(date)}));
        }
        None => {}
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn wire(value: Value) -> RecurrenceWire {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn weekly_rule_round_trip() {
        let input = json!({
            "frequency": "weekly",
            "interval": 2,
            "daysOfWeek": ["monday", "thursday"],
            "end": {"count": 10}
        });
        let rule = wire(input.clone()).into_rule().unwrap();
        assert_eq!(rule.frequency, Frequency::Weekly);
        assert_eq!(rule.interval, 2);
        assert_eq!(rule.days_of_week.len(), 2);
        assert_eq!(rule_to_wire(&rule), input);
    }

    #[test]
    fn interval_defaults_to_one() {
        let rule = wire(json!({"frequency": "daily"})).into_rule().unwrap();
        assert_eq!(rule.interval, 1);
        assert_eq!(rule_to_wire(&rule), json!({"frequency": "daily", "interval": 1}));
    }

    #[test]
    fn week_position_applies_to_every_day() {
        let rule = wire(json!({
            "frequency": "monthly",
            "daysOfWeek": ["monday", "friday"],
            "weekPosition": "last"
        }))
        .into_rule()
        .unwrap();
        assert!(rule.days_of_week.iter().all(|d| d.week_number == -1));
        assert_eq!(rule_to_wire(&rule)["weekPosition"], "last");
    }

    #[test]
    fn mixed_week_numbers_collapse_to_the_first() {
        let rule = RecurrenceRule {
            frequency: Frequency::Monthly,
            interval: 1,
            days_of_week: vec![
                RecurrenceDay {
                    day: DayOfWeek::Monday,
                    week_number: 2,
                },
                RecurrenceDay {
                    day: DayOfWeek::Friday,
                    week_number: -1,
                },
            ],
            days_of_month: vec![],
            months_of_year: vec![],
            end: None,
        };
        assert_eq!(rule_to_wire(&rule)["weekPosition"], "second");
    }

    #[test]
    fn end_date_round_trip() {
        let rule = wire(json!({
            "frequency": "yearly",
            "monthsOfYear": [1, 7],
            "daysOfMonth": [1, -1],
            "end": {"date": "2027-01-01"}
        }))
        .into_rule()
        .unwrap();
        let out = rule_to_wire(&rule);
        assert_eq!(out["end"]["date"], "2027-01-01T00:00:00+00:00");
        assert_eq!(out["daysOfMonth"], json!([1, -1]));
    }

    #[test]
    fn invalid_rules_are_validation_errors() {
        let cases = [
            json!({"frequency": "hourly"}),
            json!({"frequency": "daily", "interval": 0}),
            json!({"frequency": "daily", "end": {"count": 3, "date": "2027-01-01"}}),
            json!({"frequency": "daily", "end": {"count": 0}}),
            json!({"frequency": "monthly", "daysOfWeek": ["monday"], "weekPosition": "sixth"}),
            json!({"frequency": "monthly", "weekPosition": "first"}),
            json!({"frequency": "monthly", "daysOfMonth": [0]}),
            json!({"frequency": "monthly", "daysOfMonth": [32]}),
            json!({"frequency": "yearly", "monthsOfYear": [13]}),
            json!({"frequency": "weekly", "daysOfWeek": ["funday"]}),
        ];
        for case in cases {
            let err = wire(case.clone()).into_rule().unwrap_err();
            assert!(
                matches!(err, RemkitError::Validation(_)),
                "{case} gave {err}"
            );
        }
    }

    #[test]
    fn all_week_positions_parse() {
        for (name, n) in WEEK_POSITIONS {
            assert_eq!(parse_week_position(name).unwrap(), n);
            assert_eq!(week_position_name(n), Some(name));
        }
    }
}
