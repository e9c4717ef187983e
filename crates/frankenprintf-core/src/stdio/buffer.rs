//! Bounded output buffer.
//!
//! Accumulates rendered bytes and hands them to the sink in capacity-sized
//! runs. The buffer flushes only when a byte would not fit, or when the
//! caller asks; dropping it discards whatever is still pending.
//!
//! Invariants:
//! - `len <= data.len()`
//! - `data.len()` (the capacity) is fixed at creation and never zero

use super::sink::Sink;
use crate::error::SinkError;

/// Fixed-capacity byte buffer in front of a [`Sink`].
#[derive(Debug)]
pub struct OutputBuffer<S> {
    data: Vec<u8>,
    /// Number of pending bytes at the front of `data`.
    len: usize,
    sink: S,
}

impl<S: Sink> OutputBuffer<S> {
    /// Create a buffer of `capacity` bytes (zero is treated as one).
    pub fn new(sink: S, capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity.max(1)],
            len: 0,
            sink,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes accepted but not yet flushed.
    pub fn pending(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Append one byte, flushing first if the buffer is full.
    pub fn put(&mut self, byte: u8) -> Result<(), SinkError> {
        if self.len == self.data.len() {
            self.flush()?;
        }
        self.data[self.len] = byte;
        self.len += 1;
        Ok(())
    }

    /// Append a run of bytes. Flushes exactly where repeated [`put`](Self::put)
    /// calls would.
    pub fn put_slice(&mut self, mut bytes: &[u8]) -> Result<(), SinkError> {
        while !bytes.is_empty() {
            if self.len == self.data.len() {
                self.flush()?;
            }
            let take = bytes.len().min(self.data.len() - self.len);
            self.data[self.len..self.len + take].copy_from_slice(&bytes[..take]);
            self.len += take;
            bytes = &bytes[take..];
        }
        Ok(())
    }

    /// Append `count` copies of `byte`.
    pub fn pad(&mut self, byte: u8, mut count: usize) -> Result<(), SinkError> {
        while count > 0 {
            if self.len == self.data.len() {
                self.flush()?;
            }
            let take = count.min(self.data.len() - self.len);
            self.data[self.len..self.len + take].fill(byte);
            self.len += take;
            count -= take;
        }
        Ok(())
    }

    /// Write all pending bytes to the sink in a single call.
    ///
    /// A short write is a failure; the pending bytes are left in place and
    /// the caller is expected to abandon the buffer.
    pub fn flush(&mut self) -> Result<(), SinkError> {
        if self.len == 0 {
            return Ok(());
        }
        let written = self.sink.write(&self.data[..self.len])?;
        if written != self.len {
            return Err(SinkError::ShortWrite {
                expected: self.len,
                written,
            });
        }
        self.len = 0;
        Ok(())
    }

    /// Give the sink back, discarding anything still pending.
    pub fn into_sink(self) -> S {
        self.sink
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Records each sink call separately so flush boundaries are visible.
    #[derive(Default)]
    struct Chunks {
        writes: Vec<Vec<u8>>,
        fail_on: Option<usize>,
        short_on: Option<usize>,
    }

    impl Sink for Chunks {
        fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
            let call = self.writes.len();
            if self.fail_on == Some(call) {
                return Err(SinkError::Closed);
            }
            if self.short_on == Some(call) {
                self.writes.push(bytes[..1].to_vec());
                return Ok(1);
            }
            self.writes.push(bytes.to_vec());
            Ok(bytes.len())
        }
    }

    #[test]
    fn small_writes_stay_pending() {
        let mut buf = OutputBuffer::new(Chunks::default(), 8);
        buf.put_slice(b"abc").unwrap();
        assert_eq!(buf.pending(), b"abc");
        assert!(buf.into_sink().writes.is_empty());
    }

    #[test]
    fn put_flushes_only_when_full() {
        let mut buf = OutputBuffer::new(Chunks::default(), 4);
        for &b in b"abcd" {
            buf.put(b).unwrap();
        }
        assert_eq!(buf.len(), 4);
        buf.put(b'e').unwrap();
        assert_eq!(buf.pending(), b"e");
        let sink = buf.into_sink();
        assert_eq!(sink.writes, vec![b"abcd".to_vec()]);
    }

    #[test]
    fn put_slice_splits_at_capacity() {
        let mut buf = OutputBuffer::new(Chunks::default(), 4);
        buf.put_slice(b"0123456789").unwrap();
        buf.flush().unwrap();
        let sink = buf.into_sink();
        assert_eq!(
            sink.writes,
            vec![b"0123".to_vec(), b"4567".to_vec(), b"89".to_vec()]
        );
    }

    #[test]
    fn pad_fills_across_flushes() {
        let mut buf = OutputBuffer::new(Chunks::default(), 3);
        buf.put(b'|').unwrap();
        buf.pad(b' ', 5).unwrap();
        buf.flush().unwrap();
        let all: Vec<u8> = buf.into_sink().writes.concat();
        assert_eq!(all, b"|     ");
    }

    #[test]
    fn flush_of_empty_buffer_does_not_touch_sink() {
        let mut buf = OutputBuffer::new(Chunks::default(), 4);
        buf.flush().unwrap();
        buf.flush().unwrap();
        assert!(buf.into_sink().writes.is_empty());
    }

    #[test]
    fn zero_capacity_is_normalized() {
        let mut buf = OutputBuffer::new(Vec::new(), 0);
        assert_eq!(buf.capacity(), 1);
        buf.put_slice(b"xyz").unwrap();
        buf.flush().unwrap();
        assert_eq!(buf.into_sink(), b"xyz");
    }

    #[test]
    fn sink_failure_propagates() {
        let sink = Chunks {
            fail_on: Some(0),
            ..Default::default()
        };
        let mut buf = OutputBuffer::new(sink, 2);
        buf.put_slice(b"ab").unwrap();
        assert!(matches!(buf.put(b'c'), Err(SinkError::Closed)));
    }

    #[test]
    fn short_write_is_an_error() {
        let sink = Chunks {
            short_on: Some(0),
            ..Default::default()
        };
        let mut buf = OutputBuffer::new(sink, 8);
        buf.put_slice(b"abcd").unwrap();
        match buf.flush() {
            Err(SinkError::ShortWrite { expected, written }) => {
                assert_eq!(expected, 4);
                assert_eq!(written, 1);
            }
            other => panic!("expected short write, got {other:?}"),
        }
    }

    #[test]
    fn dropped_buffer_discards_pending() {
        let mut out = Vec::new();
        {
            let mut buf = OutputBuffer::new(&mut out, 4);
            buf.put_slice(b"abcdef").unwrap();
            assert_eq!(buf.pending(), b"ef");
        }
        assert_eq!(out, b"abcd");
    }
}
