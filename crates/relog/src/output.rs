//! Record sinks: aligned console text and JSON lines.

use std::io::Write;

use owo_colors::{OwoColorize, Style};
use serde_json::{Map, Value};

use relog_core::level::level_style;
use relog_core::{FieldValue, Level, Record, RecordSink, RelogError, RelogResult};

/// Color styles for console output.
struct ColorStyles {
    timestamp: Style,
    caller: Style,
    key: Style,
    error: Style,
}

impl ColorStyles {
    fn new() -> Self {
        Self {
            timestamp: Style::new().dimmed(),
            caller: Style::new().bold(),
            key: Style::new().cyan(),
            error: Style::new().red(),
        }
    }
}

fn level_tag(level: Option<Level>) -> &'static str {
    match level {
        Some(Level::Trace) => "TRC",
        Some(Level::Debug) => "DBG",
        Some(Level::Info) => "INF",
        Some(Level::Warn) => "WRN",
        Some(Level::Error) => "ERR",
        Some(Level::Fatal) => "FTL",
        None => "???",
    }
}

/// Render a field value for the console. Strings needing it are quoted.
fn console_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Null => "null".to_string(),
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::Int(i) => i.to_string(),
        FieldValue::Float(f) => f.to_string(),
        FieldValue::Str(s) | FieldValue::Error(s) => {
            if s.is_empty() || s.contains(char::is_whitespace) || s.contains('"') {
                serde_json::to_string(s).unwrap_or_else(|_| s.clone())
            } else {
                s.clone()
            }
        }
        FieldValue::Array(_) | FieldValue::Object(_) => {
            serde_json::to_string(value).unwrap_or_else(|_| "<unrenderable>".to_string())
        }
    }
}

/// Human-readable sink: `TIME LVL caller > message key=value ...`.
pub struct ConsoleSink<W: Write> {
    out: W,
    time_format: String,
    use_color: bool,
    styles: ColorStyles,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, time_format: impl Into<String>, use_color: bool) -> Self {
        Self {
            out,
            time_format: time_format.into(),
            use_color,
            styles: ColorStyles::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.use_color {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    /// Render one record without the trailing newline.
    pub fn render(&self, record: &Record) -> String {
        let time = match record.timestamp {
            Some(ts) => ts.format(&self.time_format).to_string(),
            None => "<nil>".to_string(),
        };
        let tag = level_tag(record.level);
        let tag = match record.level {
            Some(level) => self.paint(tag, level_style(level)),
            None => self.paint(tag, Style::new().bold()),
        };

        let mut line = format!("{} {tag}", self.paint(&time, self.styles.timestamp));
        if let Some(caller) = &record.caller {
            line.push(' ');
            line.push_str(&self.paint(caller, self.styles.caller));
            line.push_str(" >");
        }
        if !record.message.is_empty() {
            line.push(' ');
            line.push_str(&record.message);
        }
        for (key, value) in &record.fields {
            let rendered = console_value(value);
            let rendered = match value {
                FieldValue::Error(_) => self.paint(&rendered, self.styles.error),
                _ => rendered,
            };
            line.push(' ');
            line.push_str(&self.paint(&format!("{key}="), self.styles.key));
            line.push_str(&rendered);
        }
        line
    }
}

impl<W: Write> RecordSink for ConsoleSink<W> {
    fn emit(&mut self, record: &Record) -> RelogResult<()> {
        let line = self.render(record);
        writeln!(self.out, "{line}").map_err(|e| RelogError::Sink(e.to_string()))
    }

    fn flush(&mut self) -> RelogResult<()> {
        self.out.flush().map_err(|e| RelogError::Sink(e.to_string()))
    }
}

const RESERVED_KEYS: [&str; 4] = ["time", "level", "caller", "message"];

/// Machine-readable sink: one JSON object per record.
///
/// Fields follow `time`, `level`, `caller` and `message`. A field whose key
/// collides with one of those is written as `fields.<key>`.
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn to_value(record: &Record) -> RelogResult<Value> {
        let mut object = Map::new();
        object.insert(
            "time".into(),
            record.timestamp.map_or(Value::Null, |ts| Value::String(ts.to_rfc3339())),
        );
        object.insert(
            "level".into(),
            record.level.map_or(Value::Null, |l| Value::String(l.as_str().into())),
        );
        if let Some(caller) = &record.caller {
            object.insert("caller".into(), Value::String(caller.clone()));
        }
        object.insert("message".into(), Value::String(record.message.clone()));

        for (key, value) in &record.fields {
            let value = serde_json::to_value(value).map_err(|e| RelogError::Sink(e.to_string()))?;
            let key = if RESERVED_KEYS.contains(&key.as_str()) {
                format!("fields.{key}")
            } else {
                key.clone()
            };
            object.insert(key, value);
        }
        Ok(Value::Object(object))
    }
}

impl<W: Write> RecordSink for JsonSink<W> {
    fn emit(&mut self, record: &Record) -> RelogResult<()> {
        let value = Self::to_value(record)?;
        serde_json::to_writer(&mut self.out, &value).map_err(|e| RelogError::Sink(e.to_string()))?;
        self.out
            .write_all(b"\n")
            .map_err(|e| RelogError::Sink(e.to_string()))
    }

    fn flush(&mut self) -> RelogResult<()> {
        self.out.flush().map_err(|e| RelogError::Sink(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample() -> Record {
        let mut record = Record::new(Some(Level::Warn), "disk low");
        record.timestamp = Some(Utc.with_ymd_and_hms(2024, 3, 14, 15, 9, 26).unwrap());
        record.caller = Some("main.go:12".into());
        record.fields = vec![
            ("free".into(), FieldValue::Int(10)),
            ("mount".into(), FieldValue::Str("/var/lib data".into())),
            ("err".into(), FieldValue::Error("timeout".into())),
            ("tags".into(), FieldValue::Array(vec![FieldValue::Str("a".into())])),
        ];
        record
    }

    #[test]
    fn console_layout_without_color() {
        let sink = ConsoleSink::new(Vec::new(), "%b-%d %H:%M", false);
        assert_eq!(
            sink.render(&sample()),
            r#"Mar-14 15:09 WRN main.go:12 > disk low free=10 mount="/var/lib data" err=timeout tags=["a"]"#
        );
    }

    #[test]
    fn console_missing_parts() {
        let sink = ConsoleSink::new(Vec::new(), "%H:%M", false);
        assert_eq!(sink.render(&Record::new(None, "bare")), "<nil> ??? bare");
        assert_eq!(sink.render(&Record::new(Some(Level::Info), "")), "<nil> INF");
    }

    #[test]
    fn console_color_marks_errors() {
        let sink = ConsoleSink::new(Vec::new(), "%H:%M", true);
        let line = sink.render(&sample());
        assert!(line.contains("\x1b["));
        assert!(line.contains("timeout"));
    }

    #[test]
    fn console_emit_writes_lines() {
        let mut sink = ConsoleSink::new(Vec::new(), "%H:%M", false);
        sink.emit(&Record::new(Some(Level::Error), "one")).unwrap();
        sink.emit(&Record::new(Some(Level::Fatal), "two")).unwrap();
        sink.flush().unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "<nil> ERR one\n<nil> FTL two\n");
    }

    #[test]
    fn json_object_order_and_types() {
        let mut sink = JsonSink::new(Vec::new());
        sink.emit(&sample()).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            out,
            "{\"time\":\"2024-03-14T15:09:26+00:00\",\"level\":\"warn\",\"caller\":\"main.go:12\",\
             \"message\":\"disk low\",\"free\":10,\"mount\":\"/var/lib data\",\"err\":\"timeout\",\"tags\":[\"a\"]}\n"
        );
    }

    #[test]
    fn json_reserved_field_is_prefixed() {
        let mut record = Record::new(None, "first");
        record.fields.push(("message".into(), FieldValue::Str("second".into())));
        let value = JsonSink::<Vec<u8>>::to_value(&record).unwrap();
        assert_eq!(value["message"], "first");
        assert_eq!(value["fields.message"], "second");
        assert!(value["time"].is_null());
        assert!(value["level"].is_null());
        assert!(value.get("caller").is_none());
    }
}
