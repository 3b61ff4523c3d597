//! Core relog types: severity levels, typed field values and the normalized record.

use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};

// ── Level ─────────────────────────────────────────────────────

/// Log severity level, ordered from least to most severe.
///
/// Variant declaration order matters: `#[derive(Ord)]` uses it,
/// so Trace < Debug < Info < Warn < Error < Fatal. A record without a
/// recognizable severity carries `Option::<Level>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }

    /// Parse a level name as written by common structured loggers.
    ///
    /// Case-insensitive. Unknown names yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" | "trc" => Some(Self::Trace),
            "debug" | "dbg" => Some(Self::Debug),
            "info" | "inf" | "information" | "informational" => Some(Self::Info),
            "warn" | "warning" | "wrn" => Some(Self::Warn),
            "error" | "err" | "erro" => Some(Self::Error),
            "fatal" | "ftl" | "panic" | "dpanic" | "critical" | "crit" => Some(Self::Fatal),
            _ => None,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Processor ─────────────────────────────────────────────────

/// The detector that claimed a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Processor {
    /// Structured JSON object (including the MongoDB dialect).
    Json,
    /// zap / Kubernetes tab-delimited line.
    Zap,
    /// klog prefix line.
    Klog,
    /// key=value logfmt line.
    Logfmt,
    /// Free-form text fallback.
    PlainText,
}

impl Processor {
    /// Detectors that may decline a line, in the order they are tried.
    /// `PlainText` is the fallback after all of them.
    pub const DETECTORS: [Processor; 4] = [
        Processor::Json,
        Processor::Zap,
        Processor::Klog,
        Processor::Logfmt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Zap => "zap",
            Self::Klog => "klog",
            Self::Logfmt => "logfmt",
            Self::PlainText => "plain_text",
        }
    }
}

// ── Field Value ───────────────────────────────────────────────

/// A typed field value attached to a record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Error text, from a logfmt `err` key.
    Error(String),
    Array(Vec<FieldValue>),
    /// Object members in source order.
    Object(Vec<(String, FieldValue)>),
}

impl FieldValue {
    /// Convert a JSON value, keeping its native type.
    ///
    /// Numbers are tried as `i64` first, then finite `f64`, then kept as
    /// their literal text.
    pub fn from_json(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(f) = n.as_f64()
                    && f.is_finite()
                {
                    Self::Float(f)
                } else {
                    Self::Str(n.as_str().to_string())
                }
            }
            Value::String(s) => Self::Str(s.clone()),
            Value::Array(items) => Self::Array(items.iter().map(Self::from_json).collect()),
            Value::Object(map) => Self::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Coerce a raw text value: `i64`, then finite `f64`, then
    /// `true`/`false`, else a plain string.
    pub fn coerce(raw: &str) -> Self {
        if let Ok(i) = raw.parse::<i64>() {
            Self::Int(i)
        } else if let Ok(f) = raw.parse::<f64>()
            && f.is_finite()
        {
            Self::Float(f)
        } else if raw == "true" {
            Self::Bool(true)
        } else if raw == "false" {
            Self::Bool(false)
        } else {
            Self::Str(raw.to_string())
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Str(s) | Self::Error(s) => serializer.serialize_str(s),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(members) => serialize_members(members, serializer),
        }
    }
}

/// Serialize ordered key/value pairs as a map, keeping their order.
pub fn serialize_members<S>(members: &[(String, FieldValue)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(members.len()))?;
    for (k, v) in members {
        map.serialize_entry(k, v)?;
    }
    map.end()
}

// ── Record ────────────────────────────────────────────────────

/// A normalized log record, handed to the sink and never retained.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Record {
    /// Resolved instant. See `TimestampCarry` for how lines without their
    /// own timestamp are stamped.
    pub timestamp: Option<DateTime<Utc>>,
    pub level: Option<Level>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller: Option<String>,
    pub message: String,
    #[serde(serialize_with = "serialize_members")]
    pub fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new(level: Option<Level>, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            ..Default::default()
        }
    }

    /// First field with the given key.
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}
