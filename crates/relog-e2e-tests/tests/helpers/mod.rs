//! Shared harness: runs a fixture stream through the full pipeline.

#![allow(dead_code)]

use relog::output::{ConsoleSink, JsonSink};
use relog_core::{
    MemorySink, MockLineSource, Record, RelogOptions, RelogStats, Relogger, relog_all,
};

/// Records and counters produced by one run.
pub struct Run {
    pub records: Vec<Record>,
    pub stats: RelogStats,
}

pub async fn run_with(lines: &[&str], options: RelogOptions) -> Run {
    let mut source = MockLineSource::from_lines(lines.iter().copied());
    let mut relogger = Relogger::new(options);
    let mut sink = MemorySink::new();
    let stats = relog_all(&mut source, &mut relogger, &mut sink)
        .await
        .expect("in-memory run cannot fail");
    assert!(sink.flushed, "sink should be flushed at end of input");
    Run {
        records: sink.records,
        stats,
    }
}

pub async fn run(lines: &[&str]) -> Run {
    run_with(lines, RelogOptions::default()).await
}

/// Render a stream through the uncolored console sink.
pub async fn console(lines: &[&str], time_format: &str) -> String {
    let mut source = MockLineSource::from_lines(lines.iter().copied());
    let mut sink = ConsoleSink::new(Vec::new(), time_format, false);
    relog_all(&mut source, &mut Relogger::default(), &mut sink)
        .await
        .expect("in-memory run cannot fail");
    String::from_utf8(sink.into_inner()).expect("console output is UTF-8")
}

/// Render a stream through the JSON sink and parse each output line back.
pub async fn json_lines(lines: &[&str]) -> Vec<serde_json::Value> {
    let mut source = MockLineSource::from_lines(lines.iter().copied());
    let mut sink = JsonSink::new(Vec::new());
    relog_all(&mut source, &mut Relogger::default(), &mut sink)
        .await
        .expect("in-memory run cannot fail");
    String::from_utf8(sink.into_inner())
        .expect("JSON output is UTF-8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("each output line is a JSON object"))
        .collect()
}
