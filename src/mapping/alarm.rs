//! Alarm wire shape: `{type: "absolute" | "relative", date?, offset?}`.
//!
//! `offset` on the wire is seconds *before* the due date and must be
//! non-negative. Internally the sign is flipped, so `offset: 3600` is stored as
//! `Alarm::Relative(-3600)`.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{RemkitError, Result};
use crate::model::Alarm;

use super::dates::{format_date, parse_date};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmWire {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub offset: Option<i64>,
}

impl AlarmWire {
    pub fn into_alarm(self) -> Result<Alarm> {
        match self.kind.trim().to_ascii_lowercase().as_str() {
            "absolute" => {
                if self.offset.is_some() {
                    return Err(RemkitError::Validation(
                        "absolute alarm must not carry an offset".into(),
                    ));
                }
                let date = self.date.ok_or_else(|| {
                    RemkitError::Validation("absolute alarm requires a date".into())
                })?;
                Ok(Alarm::Absolute(parse_date(&date)?.value))
            }
            "relative" => {
                if self.date.is_some() {
                    return Err(RemkitError::Validation(
                        "relative alarm must not carry a date".into(),
                    ));
                }
                let offset = self.offset.ok_or_else(|| {
                    RemkitError::Validation(
                        "relative alarm requires an offset (seconds before due date)".into(),
                    )
                })?;
                if offset < 0 {
                    return Err(RemkitError::Validation(format!(
                        "relative alarm offset must be non-negative, got {offset}"
                    )));
                }
                Ok(Alarm::Relative(-offset))
            }
            other => Err(RemkitError::Validation(format!(
                "unknown alarm type '{other}'; expected absolute or relative"
            ))),
        }
    }
}

/// Parse a list of wire alarms, failing on the first malformed entry.
pub fn alarms_from_wire(alarms: Vec<AlarmWire>) -> Result<Vec<Alarm>> {
    alarms
        .into_iter()
        .enumerate()
        .map(|(i, a)| {
            a.into_alarm().map_err(|e| match e {
                RemkitError::Validation(msg) => RemkitError::Validation(format!("alarms[{i}]: {msg}")),
                other => other,
            })
        })
        .collect()
}

pub fn alarm_to_wire(alarm: &Alarm) -> Value {
    match alarm {
        Alarm::Absolute(date) => json!({"type": "absolute", "date": format_date(date)}),
        Alarm::Relative(seconds) => json!({"type": "relative", "offset": -seconds}),
    }
}
