//! Sink over a raw file descriptor.

use std::ffi::c_int;

use frankenprintf_core::{Sink, SinkError};

/// Writes each flushed run with a single `write(2)` call.
///
/// The descriptor is borrowed: `FdSink` never closes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FdSink {
    fd: c_int,
}

impl FdSink {
    #[must_use]
    pub const fn new(fd: c_int) -> Self {
        Self { fd }
    }

    #[must_use]
    pub const fn stdout() -> Self {
        Self::new(libc::STDOUT_FILENO)
    }

    #[must_use]
    pub const fn stderr() -> Self {
        Self::new(libc::STDERR_FILENO)
    }

    #[must_use]
    pub const fn fd(&self) -> c_int {
        self.fd
    }
}

impl Sink for FdSink {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        // SAFETY: `bytes` is a live slice for the duration of the call; the
        // kernel validates the descriptor.
        let rc = unsafe { libc::write(self.fd, bytes.as_ptr().cast(), bytes.len()) };
        if rc < 0 {
            return Err(SinkError::Io(std::io::Error::last_os_error()));
        }
        Ok(rc as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipe() -> (c_int, c_int) {
        let mut fds = [0 as c_int; 2];
        // SAFETY: `fds` has room for the two descriptors.
        let rc = unsafe { libc::pipe(fds.as_mut_ptr()) };
        assert_eq!(rc, 0, "pipe failed");
        (fds[0], fds[1])
    }

    fn read_all(fd: c_int) -> Vec<u8> {
        let mut out = Vec::new();
        let mut chunk = [0u8; 256];
        loop {
            // SAFETY: `chunk` is writable for its full length.
            let n = unsafe { libc::read(fd, chunk.as_mut_ptr().cast(), chunk.len()) };
            if n <= 0 {
                break;
            }
            out.extend_from_slice(&chunk[..n as usize]);
        }
        out
    }

    fn close(fd: c_int) {
        // SAFETY: closing a descriptor this test opened.
        unsafe { libc::close(fd) };
    }

    #[test]
    fn test_write_reaches_descriptor() {
        let (r, w) = pipe();
        let mut sink = FdSink::new(w);
        assert_eq!(sink.write(b"hello").unwrap(), 5);
        close(w);
        assert_eq!(read_all(r), b"hello");
        close(r);
    }

    #[test]
    fn test_bad_descriptor_is_io_error() {
        let mut sink = FdSink::new(-1);
        match sink.write(b"x") {
            Err(SinkError::Io(e)) => assert_eq!(e.raw_os_error(), Some(libc::EBADF)),
            other => panic!("expected EBADF, got {other:?}"),
        }
    }

    #[test]
    fn test_standard_streams() {
        assert_eq!(FdSink::stdout().fd(), 1);
        assert_eq!(FdSink::stderr().fd(), 2);
    }
}
