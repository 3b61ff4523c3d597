//! Line source abstraction. Reads raw lines from stdin, files, or mocks.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::RelogResult;

/// A forward-only stream of raw lines.
///
/// Enables mocking for tests and swappable inputs (stdin, file, socket).
#[async_trait]
pub trait LineSource: Send {
    /// Next line without its terminator, or `None` at end of input.
    async fn next_line(&mut self) -> RelogResult<Option<Vec<u8>>>;
}

/// Reads `\n`-terminated lines from any buffered tokio reader.
///
/// A trailing `\r` is dropped along with the newline. Lines are kept as
/// bytes; invalid UTF-8 is left for the dispatcher to deal with.
pub struct ReaderSource<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R> ReaderSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

#[async_trait]
impl<R> LineSource for ReaderSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_line(&mut self) -> RelogResult<Option<Vec<u8>>> {
        self.buf.clear();
        let n = self.reader.read_until(b'\n', &mut self.buf).await?;
        if n == 0 {
            return Ok(None);
        }
        let mut line = self.buf.as_slice();
        if let Some(rest) = line.strip_suffix(b"\n") {
            line = rest;
        }
        if let Some(rest) = line.strip_suffix(b"\r") {
            line = rest;
        }
        Ok(Some(line.to_vec()))
    }
}
