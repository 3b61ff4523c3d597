//! Test doubles: an in-memory line source and a collecting sink.

use async_trait::async_trait;
use std::collections::VecDeque;

use crate::error::{RelogError, RelogResult};
use crate::sink::RecordSink;
use crate::source::LineSource;
use crate::types::Record;

/// A line source serving pre-loaded lines.
#[derive(Debug, Default)]
pub struct MockLineSource {
    lines: VecDeque<Vec<u8>>,
    fail_after: Option<usize>,
    served: usize,
}

impl MockLineSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut source = Self::new();
        for line in lines {
            source.push_line(line);
        }
        source
    }

    pub fn push_line(&mut self, line: impl AsRef<[u8]>) {
        self.lines.push_back(line.as_ref().to_vec());
    }

    /// Fail with an I/O error once `count` lines have been served.
    pub fn failing_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }
}

#[async_trait]
impl LineSource for MockLineSource {
    async fn next_line(&mut self) -> RelogResult<Option<Vec<u8>>> {
        if self.fail_after.is_some_and(|limit| self.served >= limit) {
            return Err(RelogError::Io("mock read failure".into()));
        }
        let line = self.lines.pop_front();
        if line.is_some() {
            self.served += 1;
        }
        Ok(line)
    }
}

/// A sink collecting every record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<Record>,
    pub flushed: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.message.as_str()).collect()
    }
}

impl RecordSink for MemorySink {
    fn emit(&mut self, record: &Record) -> RelogResult<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn flush(&mut self) -> RelogResult<()> {
        self.flushed = true;
        Ok(())
    }
}
