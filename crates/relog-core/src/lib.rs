//! Log line classification and normalization for relog.
//!
//! Turns a stream of heterogeneous log lines (JSON and the MongoDB dialect,
//! zap/Kubernetes, klog, logfmt and free text) into normalized records. Holds
//! the cross-line state (multi-line JSON buffer, plain-text continuation,
//! padded MongoDB caller columns), the fuzzy timestamp parser, the level
//! detector, and the `LineSource` / `RecordSink` seams used by the binary
//! and by tests.

pub mod error;
pub mod level;
pub mod mock;
pub mod padding;
pub mod parsers;
pub mod sink;
pub mod source;
pub mod time;
pub mod types;

// Re-export key types for convenience
pub use error::{RelogError, RelogResult};
pub use mock::{MemorySink, MockLineSource};
pub use padding::PaddedColumn;
pub use parsers::{Outcome, RelogOptions, Relogger, TimestampCarry};
pub use sink::{RecordSink, RelogStats, relog_all};
pub use source::{LineSource, ReaderSource};
pub use types::{FieldValue, Level, Processor, Record};
