//! klog line parser.
//!
//! `Lmmdd hh:mm:ss.uuuuuu threadid file:line] "msg" key=value ...`

use regex::Regex;
use std::sync::LazyLock;

use super::Outcome;
use super::logfmt::{add_field, decode_pairs};
use crate::level::klog_level;
use crate::time::parse_yearless;
use crate::types::Record;

static RE_KLOG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^([EWIDT])(\d{4} \d{2}:\d{2}:\d{2}(?:\.\d+)?) +\d+ +([^\]]+)\] +(?:"([^"]*)")? *((?:\S+=.*)*)(.*)$"#,
    )
    .unwrap()
});

pub fn parse_line(line: &str) -> Outcome {
    let Some(caps) = RE_KLOG.captures(line) else {
        return Outcome::NotMine;
    };
    let Some(level) = caps[1].chars().next().and_then(klog_level) else {
        return Outcome::NotMine;
    };
    let timestamp = match parse_yearless(&caps[2], "%m%d %H:%M:%S%.f") {
        Some((ts, 0)) => ts.and_utc(),
        _ => return Outcome::NotMine,
    };

    let mut record = Record {
        timestamp: Some(timestamp),
        level: Some(level),
        caller: Some(caps[3].to_string()),
        ..Default::default()
    };

    let tail = &caps[5];
    if !tail.is_empty() {
        let Ok(pairs) = decode_pairs(tail) else {
            return Outcome::NotMine;
        };
        for (key, value) in pairs {
            add_field(&mut record, key, &value, true);
        }
    }

    record.message = match caps.get(4) {
        Some(quoted) => quoted.as_str().to_string(),
        None => caps[6].trim().to_string(),
    };
    Outcome::Emit(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldValue, Level};
    use chrono::{Datelike, Timelike, Utc};

    fn emit(line: &str) -> Record {
        match parse_line(line) {
            Outcome::Emit(record) => record,
            other => panic!("expected a record, got {other:?}"),
        }
    }

    #[test]
    fn quoted_message_with_pairs() {
        let record = emit(r#"I0102 03:04:05.000000 1 controller.go:42] "Reconciling" key=val"#);
        assert_eq!(record.level, Some(Level::Info));
        assert_eq!(record.caller.as_deref(), Some("controller.go:42"));
        assert_eq!(record.message, "Reconciling");
        assert_eq!(record.fields, vec![("key".to_string(), FieldValue::Str("val".into()))]);

        let ts = record.timestamp.unwrap();
        assert_eq!((ts.month(), ts.day()), (1, 2));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (3, 4, 5));
        assert_eq!(ts.year(), Utc::now().year());
    }

    #[test]
    fn leap_day_header_is_parsed() {
        let record = emit(r#"I0229 03:04:05.000000 1 controller.go:42] "Reconciling" key=val"#);
        assert_eq!(record.caller.as_deref(), Some("controller.go:42"));
        assert_eq!(record.message, "Reconciling");
        let ts = record.timestamp.unwrap();
        assert_eq!((ts.month(), ts.day()), (2, 29));
    }

    #[test]
    fn plain_message() {
        let record = emit("E1231 23:59:59.999999   12345 server.go:7] listener closed unexpectedly");
        assert_eq!(record.level, Some(Level::Error));
        assert_eq!(record.caller.as_deref(), Some("server.go:7"));
        assert_eq!(record.message, "listener closed unexpectedly");
        assert!(record.fields.is_empty());
    }

    #[test]
    fn typed_pairs_keep_caller() {
        let record = emit(r#"W0102 03:04:05 7 pod.go:1] "Slow" took=1.5 logger=kubelet err="context deadline""#);
        assert_eq!(record.caller.as_deref(), Some("pod.go:1"));
        assert_eq!(record.field("took"), Some(&FieldValue::Float(1.5)));
        assert_eq!(record.field("logger"), Some(&FieldValue::Str("kubelet".into())));
        assert_eq!(
            record.field("err"),
            Some(&FieldValue::Error("context deadline".into()))
        );
    }

    #[test]
    fn empty_message_is_allowed() {
        let record = emit("D0102 03:04:05 1 x.go:1] ");
        assert_eq!(record.level, Some(Level::Debug));
        assert_eq!(record.message, "");
    }

    #[test]
    fn invalid_date_is_not_mine() {
        assert!(matches!(
            parse_line("I1399 03:04:05 1 x.go:1] msg"),
            Outcome::NotMine
        ));
    }

    #[test]
    fn other_letters_are_not_mine() {
        assert!(matches!(
            parse_line("F0102 03:04:05 1 x.go:1] msg"),
            Outcome::NotMine
        ));
        assert!(matches!(parse_line("Info: hello"), Outcome::NotMine));
    }

    #[test]
    fn malformed_tail_is_not_mine() {
        assert!(matches!(
            parse_line(r#"I0102 03:04:05 1 x.go:1] "m" a="open"#),
            Outcome::NotMine
        ));
    }
}
