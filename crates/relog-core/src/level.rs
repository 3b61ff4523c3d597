//! Severity keyword detection and recoloring for free-form text.
//!
//! Keyword tiers are checked from most to least severe. The first tier with
//! any match decides the level; later tiers are never consulted.

use owo_colors::{OwoColorize, Style};
use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::types::Level;

struct LevelPattern {
    regex: Regex,
    level: Level,
}

/// Build a tier matching any of `keywords` as a whole word. Tolerates
/// surrounding brackets and a directly preceding ANSI color sequence.
fn tier(keywords: &str, level: Level) -> LevelPattern {
    let pattern = format!(r"\[?(?:\x1b\[[0-9;]*m|\b)(?:{keywords})\b\]?");
    LevelPattern {
        regex: Regex::new(&pattern).unwrap(),
        level,
    }
}

// Most severe first.
static LEVEL_PATTERNS: LazyLock<Vec<LevelPattern>> = LazyLock::new(|| {
    vec![
        tier("ERROR|error|ERRO|erro|ERR|err|E\\d+", Level::Error),
        tier("WARNING|warning|WARN|warn|WRN|wrn|W\\d+", Level::Warn),
        tier("INFO|info|INF|inf|I\\d+", Level::Info),
        tier("DEBUG|debug|DBG|dbg|D\\d+", Level::Debug),
        tier("TRACE|trace|TRC|trc|T\\d+", Level::Trace),
    ]
});

/// Terminal style used for a level's keyword and tag.
pub fn level_style(level: Level) -> Style {
    match level {
        Level::Trace => Style::new().magenta(),
        Level::Debug => Style::new().yellow(),
        Level::Info => Style::new().green(),
        Level::Warn => Style::new().red(),
        Level::Error => Style::new().red().bold(),
        Level::Fatal => Style::new().bright_red().bold(),
    }
}

/// Detect the severity of a free-form line.
///
/// Every match of the winning tier is recolored in place when `colorize` is
/// set. A match at the very start of the line is a level prefix and is
/// removed along with any following `:` and whitespace. Returns the level
/// (if any) and the rewritten text.
pub fn detect_level(line: &str, colorize: bool) -> (Option<Level>, String) {
    for pattern in LEVEL_PATTERNS.iter() {
        let Some(first) = pattern.regex.find(line) else {
            continue;
        };
        let style = level_style(pattern.level);
        let replaced = pattern.regex.replace_all(line, |caps: &Captures| {
            let (start, keyword) = caps.get(0).map_or((0, ""), |m| (m.start(), m.as_str()));
            if start == 0 {
                String::new()
            } else if colorize {
                keyword.style(style).to_string()
            } else {
                keyword.to_string()
            }
        });
        let text = if first.start() == 0 {
            replaced
                .trim_start_matches(|c: char| c == ':' || c.is_whitespace())
                .to_string()
        } else {
            replaced.into_owned()
        };
        return (Some(pattern.level), text);
    }
    (None, line.to_string())
}

// ── Letter codes ──────────────────────────────────────────────

/// Map a MongoDB severity code (`F`, `E`, `W`, `I`, `D1`..`D5`).
pub fn mongo_level(code: &str) -> Option<Level> {
    match code {
        "F" => Some(Level::Fatal),
        "E" => Some(Level::Error),
        "W" => Some(Level::Warn),
        "I" => Some(Level::Info),
        "D1" => Some(Level::Debug),
        "D2" | "D3" | "D4" | "D5" => Some(Level::Trace),
        _ => None,
    }
}

/// Map a klog severity letter.
pub fn klog_level(letter: char) -> Option<Level> {
    match letter {
        'E' => Some(Level::Error),
        'W' => Some(Level::Warn),
        'I' => Some(Level::Info),
        'D' => Some(Level::Debug),
        'T' => Some(Level::Trace),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_each_tier() {
        assert_eq!(detect_level("got an error here", false).0, Some(Level::Error));
        assert_eq!(detect_level("a WARNING appears", false).0, Some(Level::Warn));
        assert_eq!(detect_level("just info", false).0, Some(Level::Info));
        assert_eq!(detect_level("some dbg output", false).0, Some(Level::Debug));
        assert_eq!(detect_level("TRACE spans", false).0, Some(Level::Trace));
        assert_eq!(detect_level("nothing to see", false).0, None);
    }

    #[test]
    fn error_beats_lower_tiers() {
        let (level, _) = detect_level("INFO retry failed with ERROR", false);
        assert_eq!(level, Some(Level::Error));
    }

    #[test]
    fn fatal_keywords_are_not_a_tier() {
        let (level, text) = detect_level("FATAL disk error", false);
        assert_eq!(level, Some(Level::Error));
        assert_eq!(text, "FATAL disk error");

        assert_eq!(detect_level("CRITICAL stuff", false).0, None);
    }

    #[test]
    fn numeric_suffix_codes() {
        assert_eq!(detect_level("code E42 raised", false).0, Some(Level::Error));
        assert_eq!(detect_level("W2 pending", false).0, Some(Level::Warn));
    }

    #[test]
    fn keyword_must_be_whole_word() {
        assert_eq!(detect_level("terrorist information", false).0, None);
        assert_eq!(detect_level("errors everywhere", false).0, None);
    }

    #[test]
    fn leading_keyword_is_stripped() {
        let (level, text) = detect_level("ERROR: something broke", false);
        assert_eq!(level, Some(Level::Error));
        assert_eq!(text, "something broke");

        let (_, text) = detect_level("[WARN] [db] slow query", false);
        assert_eq!(text, "[db] slow query");
    }

    #[test]
    fn inner_keyword_is_kept() {
        let (_, text) = detect_level("request ERROR twice", false);
        assert_eq!(text, "request ERROR twice");
    }

    #[test]
    fn inner_keyword_is_recolored() {
        let (_, text) = detect_level("request failed: error", true);
        assert!(text.starts_with("request failed: "));
        assert!(text.contains("\x1b["));
        assert!(text.contains("error"));
    }

    #[test]
    fn keyword_after_ansi_sequence() {
        let (level, _) = detect_level("\x1b[31mERROR\x1b[0m boom", false);
        assert_eq!(level, Some(Level::Error));
    }

    #[test]
    fn mongo_codes() {
        assert_eq!(mongo_level("F"), Some(Level::Fatal));
        assert_eq!(mongo_level("I"), Some(Level::Info));
        assert_eq!(mongo_level("D1"), Some(Level::Debug));
        assert_eq!(mongo_level("D4"), Some(Level::Trace));
        assert_eq!(mongo_level("D6"), None);
        assert_eq!(mongo_level("info"), None);
    }

    #[test]
    fn klog_letters() {
        assert_eq!(klog_level('I'), Some(Level::Info));
        assert_eq!(klog_level('T'), Some(Level::Trace));
        assert_eq!(klog_level('F'), None);
    }
}
