//! zap / Kubernetes tab-delimited line parser.
//!
//! `TIMESTAMP\tLEVEL\t[CALLER\t]MESSAGE[\t{JSON}]`

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use super::Outcome;
use crate::types::{FieldValue, Level, Record};

static RE_ZAP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?Z)\t([A-Z]+)\t(?:([a-z0-9.\-]+)\t)?([^{]+)(?:\t(\{.*))?$",
    )
    .unwrap()
});

pub fn parse_line(line: &str) -> Outcome {
    let Some(caps) = RE_ZAP.captures(line) else {
        return Outcome::NotMine;
    };
    let Ok(timestamp) = DateTime::parse_from_rfc3339(&caps[1]) else {
        return Outcome::NotMine;
    };
    let fields = match caps.get(5) {
        Some(tail) => match serde_json::from_str::<Map<String, Value>>(tail.as_str()) {
            Ok(map) => map
                .iter()
                .map(|(key, value)| (key.clone(), FieldValue::from_json(value)))
                .collect(),
            Err(_) => return Outcome::NotMine,
        },
        None => Vec::new(),
    };

    Outcome::Emit(Record {
        timestamp: Some(timestamp.with_timezone(&Utc)),
        level: Level::parse(&caps[2]),
        caller: caps.get(3).map(|m| m.as_str().to_string()),
        message: caps[4].trim().to_string(),
        fields,
    })
}
