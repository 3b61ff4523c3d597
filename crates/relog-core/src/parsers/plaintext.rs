//! Plain-text fallback with heuristic severity detection.
//!
//! Accepts every line. An indented line directly after another plain-text
//! line is a continuation and inherits that line's level.

use crate::level::detect_level;
use crate::time::{cut_brackets, cut_prefix_fuzzy_time};
use crate::types::{Level, Record};

#[derive(Debug, Default)]
pub struct PlainText {
    last_level: Option<Level>,
}

impl PlainText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Level assigned to the most recent plain-text line.
    pub fn last_level(&self) -> Option<Level> {
        self.last_level
    }

    /// Turn `line` into a record.
    ///
    /// `follows_plain` tells whether the previous line was also handled here,
    /// which makes an indented `line` a continuation.
    pub fn process(&mut self, line: &str, follows_plain: bool, colorize: bool) -> Record {
        let continuation = follows_plain && line.starts_with(char::is_whitespace);

        let mut record = Record::default();
        let mut text = line;
        if let Some((ts, rest)) = cut_prefix_fuzzy_time(line.trim_start()) {
            record.timestamp = Some(ts);
            text = rest;
        }

        let mut message = if continuation {
            record.level = self.last_level;
            text.to_string()
        } else {
            let (level, rewritten) = detect_level(text.trim_start(), colorize);
            record.level = level;
            rewritten
        };

        if let Some((caller, rest)) = cut_brackets(&message, '[', ']')
            && !caller.is_empty()
        {
            record.caller = Some(caller.to_string());
            message = rest.to_string();
        }

        record.message = message;
        self.last_level = record.level;
        record
    }
}
