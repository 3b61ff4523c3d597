//! Record sinks and the stream driver.

use tracing::debug;

use crate::error::RelogResult;
use crate::parsers::Relogger;
use crate::source::LineSource;
use crate::types::Record;

/// Consumer of normalized records (console renderer, JSON writer, test
/// collector).
pub trait RecordSink {
    fn emit(&mut self, record: &Record) -> RelogResult<()>;

    /// Called once after the last record.
    fn flush(&mut self) -> RelogResult<()> {
        Ok(())
    }
}

/// Counters for one run of [`relog_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelogStats {
    pub lines_read: u64,
    pub records_emitted: u64,
    /// Lines held back as part of a multi-line JSON object.
    pub lines_absorbed: u64,
}

/// Drive `source` through `relogger` into `sink` until end of input.
///
/// A read or write failure stops the run and is returned.
pub async fn relog_all<S, K>(
    source: &mut S,
    relogger: &mut Relogger,
    sink: &mut K,
) -> RelogResult<RelogStats>
where
    S: LineSource + ?Sized,
    K: RecordSink + ?Sized,
{
    let mut stats = RelogStats::default();

    while let Some(line) = source.next_line().await? {
        stats.lines_read += 1;
        match relogger.process_line(&line) {
            Some(record) => {
                sink.emit(&record)?;
                stats.records_emitted += 1;
            }
            None => stats.lines_absorbed += 1,
        }
    }

    if let Some(record) = relogger.finish() {
        sink.emit(&record)?;
        stats.records_emitted += 1;
    }
    sink.flush()?;

    debug!(
        lines = stats.lines_read,
        records = stats.records_emitted,
        absorbed = stats.lines_absorbed,
        "Input exhausted"
    );
    Ok(stats)
}
