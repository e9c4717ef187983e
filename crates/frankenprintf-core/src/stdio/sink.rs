//! Output sink abstraction.
//!
//! A sink accepts a run of bytes and reports how many it took. The buffer
//! treats anything short of the full run as a failure, so sinks never need to
//! resume a partial write themselves.

use std::io::Write;

use crate::error::SinkError;

/// Destination for formatted bytes.
pub trait Sink {
    /// Write `bytes`, returning how many were accepted.
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        (**self).write(bytes)
    }
}

impl Sink for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        self.extend_from_slice(bytes);
        Ok(bytes.len())
    }
}

/// Adapter from any [`std::io::Write`] to a [`Sink`].
///
/// Issues one `write` per flush; a short count is passed through for the
/// buffer to reject.
#[derive(Debug)]
pub struct WriteSink<W> {
    inner: W,
}

impl<W: Write> WriteSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Sink for WriteSink<W> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        let written = self.inner.write(bytes)?;
        if written == 0 && !bytes.is_empty() {
            return Err(SinkError::Closed);
        }
        Ok(written)
    }
}
