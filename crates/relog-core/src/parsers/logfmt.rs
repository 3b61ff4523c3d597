//! logfmt (`key=value key2="quoted value"`) parser with typed coercion.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use super::Outcome;
use crate::time::parse_fuzzy_time;
use crate::types::{FieldValue, Level, Record};

// Cheap gate before decoding: a bare word key, `=`, and a value.
static RE_CRUDE_LOGFMT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\w+=[^ ]+").unwrap());

const TIME_KEYS: &[&str] = &["time", "timestamp", "@timestamp", "ts", "t", "datetime"];
const LEVEL_KEYS: &[&str] = &["level", "lvl", "severity"];
const MESSAGE_KEYS: &[&str] = &["message", "msg"];

/// Malformed logfmt input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogfmtError {
    #[error("unterminated quoted value for key {0:?}")]
    UnterminatedQuote(String),

    #[error("unexpected {ch:?} at byte {offset}")]
    Unexpected { ch: char, offset: usize },
}

/// Decode every `key=value` pair of a logfmt record, in order.
///
/// A bare key without `=` decodes to an empty value. Quoted values accept
/// `\"`, `\\`, `\n`, `\t` and `\r` escapes.
pub fn decode_pairs(text: &str) -> Result<Vec<(String, String)>, LogfmtError> {
    let mut pairs = Vec::new();
    let mut chars = text.char_indices().peekable();

    loop {
        while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
        let Some(&(offset, first)) = chars.peek() else {
            break;
        };
        if first == '=' || first == '"' {
            return Err(LogfmtError::Unexpected { ch: first, offset });
        }

        let mut key = String::new();
        while let Some((_, c)) = chars.next_if(|&(_, c)| c != '=' && c != '"' && !c.is_whitespace()) {
            key.push(c);
        }
        match chars.peek() {
            Some(&(_, '=')) => {
                chars.next();
            }
            Some(&(offset, '"')) => return Err(LogfmtError::Unexpected { ch: '"', offset }),
            _ => {
                pairs.push((key, String::new()));
                continue;
            }
        }

        let mut value = String::new();
        if chars.next_if(|&(_, c)| c == '"').is_some() {
            loop {
                match chars.next() {
                    None => return Err(LogfmtError::UnterminatedQuote(key)),
                    Some((_, '"')) => break,
                    Some((_, '\\')) => match chars.next() {
                        Some((_, 'n')) => value.push('\n'),
                        Some((_, 't')) => value.push('\t'),
                        Some((_, 'r')) => value.push('\r'),
                        Some((_, c)) => value.push(c),
                        None => return Err(LogfmtError::UnterminatedQuote(key)),
                    },
                    Some((_, c)) => value.push(c),
                }
            }
        } else {
            while let Some((_, c)) = chars.next_if(|&(_, c)| !c.is_whitespace()) {
                value.push(c);
            }
        }
        pairs.push((key, value));
    }

    Ok(pairs)
}

/// Attach a decoded pair to `record` with typed coercion.
///
/// Numbers and booleans keep their type. Otherwise `err` becomes an error
/// value, an explicit `caller` fills the record caller, and `logger` or
/// `source` stand in for the caller unless `has_caller` says a real one
/// exists.
pub(crate) fn add_field(record: &mut Record, key: String, value: &str, has_caller: bool) {
    let text = match FieldValue::coerce(value) {
        FieldValue::Str(text) => text,
        typed => {
            record.fields.push((key, typed));
            return;
        }
    };
    match key.as_str() {
        "caller" if record.caller.is_none() => record.caller = Some(text),
        "err" => record.fields.push((key, FieldValue::Error(text))),
        "logger" | "source" if !has_caller && record.caller.is_none() => record.caller = Some(text),
        _ => record.fields.push((key, FieldValue::Str(text))),
    }
}

pub fn parse_line(line: &str) -> Outcome {
    if !RE_CRUDE_LOGFMT.is_match(line) {
        return Outcome::NotMine;
    }
    let Ok(pairs) = decode_pairs(line) else {
        return Outcome::NotMine;
    };

    let mut record = Record::default();
    let (mut has_time, mut has_level, mut has_message, mut has_caller) = (false, false, false, false);
    let mut rest = Vec::new();

    for (key, value) in pairs {
        let name = key.as_str();
        if !has_time && TIME_KEYS.contains(&name) {
            if let Some(ts) = parse_fuzzy_time(&value) {
                record.timestamp = Some(ts);
                has_time = true;
                continue;
            }
        } else if !has_level && LEVEL_KEYS.contains(&name) {
            record.level = Level::parse(&value);
            has_level = true;
            continue;
        } else if !has_message && MESSAGE_KEYS.contains(&name) {
            record.message = value;
            has_message = true;
            continue;
        } else if !has_caller && name == "caller" {
            has_caller = true;
        }
        rest.push((key, value));
    }

    if rest.is_empty() && !has_time && !has_level && !has_message {
        return Outcome::NotMine;
    }
    for (key, value) in rest {
        add_field(&mut record, key, &value, has_caller);
    }
    Outcome::Emit(record)
}
