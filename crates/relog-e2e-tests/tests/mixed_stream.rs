//! E2E tests for a stream interleaving every supported format.

mod helpers;

use chrono::{Datelike, TimeZone, Timelike, Utc};

use relog_core::{FieldValue, Level};
use relog_e2e_tests::fixtures::MIXED_STREAM;

#[tokio::test]
async fn e2e_each_line_is_normalized_by_its_format() {
    let run = helpers::run(MIXED_STREAM).await;
    assert_eq!(run.stats.lines_read, 5);
    assert_eq!(run.stats.records_emitted, 5);
    assert_eq!(run.stats.lines_absorbed, 0);

    // JSON
    let r = &run.records[0];
    assert_eq!(r.level, Some(Level::Info));
    assert_eq!(r.message, "server started");
    assert_eq!(r.field("port"), Some(&FieldValue::Int(8080)));
    assert!(r.timestamp.is_none());

    // zap
    let r = &run.records[1];
    assert_eq!(r.level, Some(Level::Info));
    assert_eq!(r.caller.as_deref(), Some("manager.controller"));
    assert_eq!(r.message, "Reconciling");
    assert_eq!(r.field("name"), Some(&FieldValue::Str("web".into())));
    assert_eq!(
        r.timestamp,
        Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap() + chrono::Duration::milliseconds(123))
    );

    // klog
    let r = &run.records[2];
    assert_eq!(r.level, Some(Level::Info));
    assert_eq!(r.caller.as_deref(), Some("kubelet.go:7"));
    assert_eq!(r.message, "Pod ready");
    assert_eq!(r.field("pod"), Some(&FieldValue::Str("web-0".into())));
    let ts = r.timestamp.unwrap();
    assert_eq!(ts.year(), Utc::now().year());
    assert_eq!((ts.month(), ts.day(), ts.hour()), (1, 2, 3));

    // logfmt
    let r = &run.records[3];
    assert_eq!(r.level, Some(Level::Warn));
    assert_eq!(r.message, "disk low");
    assert_eq!(r.field("free"), Some(&FieldValue::Int(10)));
    assert_eq!(r.timestamp, Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 6).unwrap()));

    // plain text
    let r = &run.records[4];
    assert_eq!(r.level, Some(Level::Error));
    assert_eq!(r.message, "connection refused");
}

#[tokio::test]
async fn e2e_plain_line_inherits_previous_timestamp() {
    let run = helpers::run(MIXED_STREAM).await;
    assert_eq!(run.records[4].timestamp, run.records[3].timestamp);
}

#[tokio::test]
async fn e2e_garbage_never_drops_lines() {
    let lines = ["", "}", "=", "\t\t", "{}{}", "level=", "[]", "{\"unterminated\": \"x"];
    let run = helpers::run(&lines).await;
    assert_eq!(run.stats.lines_absorbed, 1);
    assert_eq!(run.records.len(), lines.len());
    // The unterminated object is flushed as text at end of input.
    assert_eq!(run.records[7].message, "{\"unterminated\": \"x");
}
