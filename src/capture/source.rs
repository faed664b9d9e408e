//! Line-oriented capture sources
//!
//! Keyboard-wedge QR readers and most decoder pipelines emit one decoded
//! payload per line, so a buffered reader is the whole adapter.

use super::error::CaptureError;
use async_trait::async_trait;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// A stream of raw text lines from the decoding capability.
#[async_trait]
pub trait CaptureSource: Send {
    /// Next line without its terminator, or `Ok(None)` at end of stream.
    async fn next_line(&mut self) -> Result<Option<String>, CaptureError>;
}

pub struct LineSource<R> {
    reader: R,
    buffer: Vec<u8>,
}

impl<R> LineSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(128),
        }
    }
}

impl LineSource<BufReader<tokio::io::Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl LineSource<BufReader<tokio::fs::File>> {
    /// Open a file or FIFO written to by an external decoder.
    pub async fn open(path: &Path) -> Result<Self, CaptureError> {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| CaptureError::Open {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

#[async_trait]
impl<R> CaptureSource for LineSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_line(&mut self) -> Result<Option<String>, CaptureError> {
        self.buffer.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.buffer)
            .await
            .map_err(|e| CaptureError::Read {
                reason: e.to_string(),
            })?;
        if read == 0 {
            return Ok(None);
        }

        if self.buffer.last() == Some(&b'\n') {
            self.buffer.pop();
            if self.buffer.last() == Some(&b'\r') {
                self.buffer.pop();
            }
        }

        match std::str::from_utf8(&self.buffer) {
            Ok(line) => Ok(Some(line.to_string())),
            Err(_) => Err(CaptureError::Undecodable {
                length: self.buffer.len(),
            }),
        }
    }
}
