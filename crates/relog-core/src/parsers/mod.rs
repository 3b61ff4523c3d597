//! Line dispatcher and the format detectors it drives.
//!
//! Each line is offered to JSON, zap, klog and logfmt in that order. The
//! first detector to claim it produces the record; plain text takes
//! whatever none of them wants.

pub mod json;
pub mod klog;
pub mod logfmt;
pub mod plaintext;
pub mod prefix;
pub mod zap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::types::{Processor, Record};
use json::JsonNormalizer;
use plaintext::PlainText;

pub const DEFAULT_PADDING_WINDOW: usize = 100;
pub const DEFAULT_MAX_BUFFERED_BYTES: usize = 1024 * 1024;

/// Result of offering a line to a detector.
#[derive(Debug)]
pub enum Outcome {
    /// The line produced a record.
    Emit(Record),
    /// The line was kept as part of an unfinished multi-line unit.
    Absorbed,
    /// Not this detector's format. No state was changed.
    NotMine,
}

/// How records from lines without a timestamp of their own are stamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampCarry {
    /// Reuse the most recently resolved timestamp.
    #[default]
    Persist,
    /// Leave the timestamp empty.
    Reset,
}

#[derive(Debug, Clone)]
pub struct RelogOptions {
    /// History length of each MongoDB caller column.
    pub padding_window: usize,
    /// Upper bound for a pending multi-line JSON object.
    pub max_buffered_bytes: usize,
    pub timestamp_carry: TimestampCarry,
    /// Recolor severity keywords found in plain-text messages.
    pub colorize: bool,
}

impl Default for RelogOptions {
    fn default() -> Self {
        Self {
            padding_window: DEFAULT_PADDING_WINDOW,
            max_buffered_bytes: DEFAULT_MAX_BUFFERED_BYTES,
            timestamp_carry: TimestampCarry::default(),
            colorize: false,
        }
    }
}

/// Stateful line dispatcher.
///
/// Holds everything that spans lines: the pending JSON buffer, the MongoDB
/// padding columns, the previous detector and plain-text level, and the
/// last resolved timestamp.
#[derive(Debug)]
pub struct Relogger {
    options: RelogOptions,
    json: JsonNormalizer,
    plain: PlainText,
    last_processor: Option<Processor>,
    last_timestamp: Option<DateTime<Utc>>,
    /// Runtime prefix timestamp of the first line of a pending JSON object.
    pending_prefix: Option<DateTime<Utc>>,
}

impl Relogger {
    pub fn new(options: RelogOptions) -> Self {
        Self {
            json: JsonNormalizer::new(options.padding_window, options.max_buffered_bytes),
            plain: PlainText::new(),
            last_processor: None,
            last_timestamp: None,
            pending_prefix: None,
            options,
        }
    }

    /// Classify one line (without its terminator).
    ///
    /// Returns `None` only when the line was absorbed into a pending JSON
    /// object.
    pub fn process_line(&mut self, line: &[u8]) -> Option<Record> {
        let (prefix_ts, body) = prefix::strip_runtime_timestamp(line);
        let text = String::from_utf8_lossy(body);

        for processor in Processor::DETECTORS {
            let outcome = match processor {
                Processor::Json => self.process_json(body),
                Processor::Zap => zap::parse_line(&text),
                Processor::Klog => klog::parse_line(&text),
                Processor::Logfmt => logfmt::parse_line(&text),
                // Fallback, handled after the loop.
                Processor::PlainText => Outcome::NotMine,
            };
            match outcome {
                Outcome::Emit(record) => return Some(self.accept(processor, record, prefix_ts)),
                Outcome::Absorbed => {
                    self.pending_prefix = self.pending_prefix.or(prefix_ts);
                    return None;
                }
                Outcome::NotMine => {}
            }
        }

        let record = self.process_plain(&text);
        Some(self.accept(Processor::PlainText, record, prefix_ts))
    }

    /// Flush state at end of input.
    ///
    /// An unfinished JSON object is emitted as plain text so its content is
    /// not lost.
    pub fn finish(&mut self) -> Option<Record> {
        let pending = self.json.take_pending()?;
        debug!(bytes = pending.len(), "Flushing unfinished JSON object as text");
        let text = String::from_utf8_lossy(&pending).into_owned();
        let record = self.process_plain(&text);
        Some(self.accept(Processor::PlainText, record, None))
    }

    /// Detector that produced the most recent record.
    pub fn last_processor(&self) -> Option<Processor> {
        self.last_processor
    }

    pub fn has_pending_json(&self) -> bool {
        self.json.has_pending()
    }

    fn process_json(&mut self, body: &[u8]) -> Outcome {
        let outcome = self.json.process(body);
        if matches!(outcome, Outcome::NotMine) {
            self.pending_prefix = None;
        }
        outcome
    }

    fn process_plain(&mut self, text: &str) -> Record {
        let follows_plain = self.last_processor == Some(Processor::PlainText);
        self.plain.process(text, follows_plain, self.options.colorize)
    }

    /// Apply the runtime prefix and timestamp carry, and remember the
    /// detector.
    fn accept(
        &mut self,
        processor: Processor,
        mut record: Record,
        prefix_ts: Option<DateTime<Utc>>,
    ) -> Record {
        if let Some(ts) = self.pending_prefix.take().or(prefix_ts) {
            record.timestamp = Some(ts);
        }
        if self.options.timestamp_carry == TimestampCarry::Persist {
            match record.timestamp {
                Some(ts) => self.last_timestamp = Some(ts),
                None => record.timestamp = self.last_timestamp,
            }
        }

        trace!(processor = processor.as_str(), "Line classified");
        self.last_processor = Some(processor);
        record
    }
}

impl Default for Relogger {
    fn default() -> Self {
        Self::new(RelogOptions::default())
    }
}
