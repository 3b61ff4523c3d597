//! E2E tests for runtime prefixes and timestamp carry-over.

mod helpers;

use chrono::{TimeZone, Utc};

use relog_core::{Level, RelogOptions, TimestampCarry};
use relog_e2e_tests::fixtures::RUNTIME_PREFIXED;

fn at(h: u32, m: u32, s: u32, ms: i64) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, h, m, s).unwrap() + chrono::Duration::milliseconds(ms)
}

#[tokio::test]
async fn e2e_runtime_prefix_wins_and_persists() {
    let run = helpers::run(RUNTIME_PREFIXED).await;
    assert_eq!(run.records.len(), 3);

    assert_eq!(run.records[0].message, "inside");
    assert_eq!(run.records[0].timestamp, Some(at(10, 0, 0, 500)));
    assert!(run.records[0].field("time").is_none());

    assert_eq!(run.records[1].level, Some(Level::Warn));
    assert_eq!(run.records[1].message, "no inner timestamp");
    assert_eq!(run.records[1].timestamp, Some(at(10, 0, 1, 0)));

    assert_eq!(run.records[2].timestamp, Some(at(10, 0, 1, 0)));
}

#[tokio::test]
async fn e2e_reset_leaves_unstamped_lines_empty() {
    let options = RelogOptions {
        timestamp_carry: TimestampCarry::Reset,
        ..Default::default()
    };
    let run = helpers::run_with(RUNTIME_PREFIXED, options).await;
    assert_eq!(run.records[0].timestamp, Some(at(10, 0, 0, 500)));
    assert_eq!(run.records[1].timestamp, Some(at(10, 0, 1, 0)));
    assert!(run.records[2].timestamp.is_none());
}

#[tokio::test]
async fn e2e_prefixed_multi_line_object_keeps_first_prefix() {
    let lines = [
        "2024-06-01T10:00:02Z {",
        r#"2024-06-01T10:00:03Z "msg": "split"}"#,
    ];
    let run = helpers::run(&lines).await;
    assert_eq!(run.records.len(), 1);
    assert_eq!(run.records[0].message, "split");
    assert_eq!(run.records[0].timestamp, Some(at(10, 0, 2, 0)));
}
