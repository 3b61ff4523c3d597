//! Structured JSON line normalizer, including the MongoDB dialect.
//!
//! A JSON object may be split across several physical lines. When parsing
//! stops at end of input the line is kept in a pending buffer and the next
//! line is appended to it. Any other parse failure drops the buffer.

use chrono::{DateTime, Utc};
use serde_json::error::Category;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::Outcome;
use crate::level::mongo_level;
use crate::padding::PaddedColumn;
use crate::time::parse_fuzzy_time;
use crate::types::{FieldValue, Level, Record};

const LEVEL_KEYS: &[&str] = &["level", "lvl", "severity", "log.level"];
const MESSAGE_KEYS: &[&str] = &["message", "msg"];
const TIME_KEYS: &[&str] = &["time", "timestamp", "@timestamp", "ts", "datetime"];
const STACK_KEYS: &[&str] = &["stacktrace", "stack_trace", "stack"];
const CALLER_KEYS: [&str; 4] = [
    "caller_file_name",
    "caller_line_number",
    "caller_class_name",
    "caller_method_name",
];

const STACKTRACE_BANNER: &str = "\n\tSTACKTRACE\n\t==========\n\t";

/// JSON detector state: the pending multi-line buffer and the MongoDB
/// caller columns.
#[derive(Debug)]
pub struct JsonNormalizer {
    pending: Vec<u8>,
    max_buffered_bytes: usize,
    component: PaddedColumn,
    context: PaddedColumn,
    id: PaddedColumn,
}

impl JsonNormalizer {
    pub fn new(padding_window: usize, max_buffered_bytes: usize) -> Self {
        Self {
            pending: Vec::new(),
            max_buffered_bytes,
            component: PaddedColumn::new(padding_window),
            context: PaddedColumn::new(padding_window),
            id: PaddedColumn::new(padding_window),
        }
    }

    /// Whether a partial object is waiting for more lines.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Take the pending partial object, leaving the buffer empty.
    pub fn take_pending(&mut self) -> Option<Vec<u8>> {
        if self.pending.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.pending))
        }
    }

    pub fn process(&mut self, line: &[u8]) -> Outcome {
        let continuing = self.has_pending();
        // Only an object opener may start a unit. Anything else is left to
        // the later detectors without touching the buffer.
        if !continuing && line.trim_ascii_start().first() != Some(&b'{') {
            return Outcome::NotMine;
        }

        self.pending.extend_from_slice(line);
        match serde_json::from_slice::<Map<String, Value>>(&self.pending) {
            Ok(root) => {
                self.pending.clear();
                Outcome::Emit(self.normalize(&root))
            }
            Err(e) if e.classify() == Category::Eof => {
                if self.pending.len() > self.max_buffered_bytes {
                    debug!(
                        bytes = self.pending.len(),
                        limit = self.max_buffered_bytes,
                        "Discarding oversized partial JSON object"
                    );
                    self.pending.clear();
                    return Outcome::NotMine;
                }
                trace!(bytes = self.pending.len(), "Buffering partial JSON object");
                Outcome::Absorbed
            }
            Err(e) => {
                if continuing {
                    debug!(error = %e, "Dropping partial JSON object");
                }
                self.pending.clear();
                Outcome::NotMine
            }
        }
    }

    fn normalize(&mut self, root: &Map<String, Value>) -> Record {
        let mut record = Record::default();
        let mut consumed: Vec<&str> = Vec::new();
        let mut mongo = false;

        if let Some((key, value)) = find_any(root, LEVEL_KEYS) {
            if let Value::String(name) = value {
                record.level = Level::parse(name);
                consumed.push(key);
            }
        } else if let Some(Value::String(code)) = root.get("s")
            && let Some(level) = mongo_level(code)
        {
            record.level = Some(level);
            mongo = true;
            consumed.push("s");
        }

        if let Some((key, Value::String(message))) = find_any(root, MESSAGE_KEYS) {
            record.message = message.clone();
            consumed.push(key);
        }

        if mongo {
            match (root.get("c"), root.get("ctx"), root.get("id")) {
                (Some(component), Some(context), Some(id)) => {
                    record.caller = Some(format!(
                        "[{}|{}|{}]",
                        self.component.next(&text_of(component)),
                        self.context.next(&text_of(context)),
                        self.id.next(&text_of(id)),
                    ));
                    consumed.extend(["c", "ctx", "id"]);
                }
                _ => mongo = false,
            }
        }

        if let Some((key, value)) = find_any(root, TIME_KEYS)
            && let Some(ts) = parse_timestamp_value(value)
        {
            record.timestamp = Some(ts);
            consumed.push(key);
        } else if mongo
            && let Some(ts) = root
                .get("t")
                .and_then(|t| t.get("$date"))
                .and_then(parse_timestamp_value)
        {
            record.timestamp = Some(ts);
            consumed.push("t");
        }

        // MongoDB keeps the interesting payload under `attr`; the envelope
        // has been fully consumed above.
        let (source, mut consumed) = match root.get("attr") {
            Some(Value::Object(attr)) if mongo => (attr, Vec::new()),
            _ => (root, consumed),
        };

        if let Some((key, stack)) = find_any(source, STACK_KEYS) {
            let stack = match stack {
                Value::Array(frames) => frames.iter().map(text_of).collect::<Vec<_>>().join("\n\t"),
                other => text_of(other).replace('\n', "\n\t"),
            };
            record.message = format!("{}{STACKTRACE_BANNER}{stack}", record.message);
            consumed.push(key);
        }

        if let [Some(file), Some(line), Some(class), Some(method)] =
            CALLER_KEYS.map(|key| source.get(key))
        {
            record.caller = Some(format!(
                "{}:{} ({}:{})",
                text_of(file),
                text_of(line),
                text_of(class),
                text_of(method),
            ));
            consumed.extend(CALLER_KEYS);
        }

        record.fields = source
            .iter()
            .filter(|(key, _)| !consumed.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), FieldValue::from_json(value)))
            .collect();
        record
    }
}

/// First member, in document order, whose key is any of `names`.
fn find_any<'a>(map: &'a Map<String, Value>, names: &[&str]) -> Option<(&'a str, &'a Value)> {
    map.iter()
        .find(|(key, _)| names.contains(&key.as_str()))
        .map(|(key, value)| (key.as_str(), value))
}

/// String contents, or compact JSON for anything else.
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numbers are Unix seconds, strings go through the fuzzy parser.
fn parse_timestamp_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            if let Some(secs) = n.as_i64() {
                return DateTime::from_timestamp(secs, 0);
            }
            let secs = n.as_f64()?;
            let whole = secs.floor();
            DateTime::from_timestamp(whole as i64, ((secs - whole) * 1e9) as u32)
        }
        Value::String(s) => parse_fuzzy_time(s),
        _ => None,
    }
}
